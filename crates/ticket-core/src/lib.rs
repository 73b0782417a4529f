//! ticket-core
//!
//! Pure box-office logic, no networking:
//! - messages (request/response types)
//! - event inventory and its listing format
//! - reservation ledger with cookies and expiry
//! - ticket code allocation
//! - the `BoxOffice` orchestrator tying them together

pub mod box_office;
pub mod cookie;
pub mod error;
pub mod expiry;
pub mod inventory;
pub mod messages;
pub mod reservation;
pub mod ticket;

pub use messages::{
    EventId,
    EventListing,
    Request,
    ReservationGranted,
    ReservationId,
    ReservationRequest,
    Response,
    TicketBatch,
    TicketsRequest,
};

pub use box_office::{unix_seconds, BoxOffice, BoxOfficeSettings, Refusal};
pub use cookie::{Cookie, COOKIE_LEN};
pub use error::{InventoryError, Rejection};
pub use expiry::ExpiryScheduler;
pub use inventory::{Event, Inventory};
pub use reservation::{Reservation, ReservationLedger, ReservationStatus};
pub use ticket::{TicketAllocator, TicketCode, TICKET_CODE_LEN};

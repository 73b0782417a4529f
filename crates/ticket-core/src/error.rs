//! Error types for the box-office core.
//!
//! Two families live here:
//! - [`InventoryError`]: the inventory listing could not be loaded. These
//!   only occur at startup.
//! - [`Rejection`]: why a well-formed request was answered with
//!   `BadRequest`. The reason is for logs only; the wire reply carries
//!   nothing but the offending id.

use thiserror::Error;

use crate::inventory::{MAX_DESCRIPTION_LEN, MAX_EVENTS};

/// Failure while parsing an inventory listing.
///
/// Line numbers are 1-based and refer to the listing text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    #[error("line {line}: ticket count {value:?} is not a number in 0..=65535")]
    InvalidTicketCount { line: usize, value: String },

    #[error("line {line}: description is {len} bytes, at most {} allowed", MAX_DESCRIPTION_LEN)]
    DescriptionTooLong { line: usize, len: usize },

    #[error("listing holds more than {} events", MAX_EVENTS)]
    TooManyEvents,
}

/// Reason a request was refused.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum Rejection {
    #[error("no such event")]
    UnknownEvent,

    #[error("ticket count must be positive")]
    InvalidTicketCount,

    #[error("not enough tickets available")]
    NotEnoughTickets,

    #[error("ticket count exceeds the per-request maximum")]
    TooManyTickets,

    #[error("reservation id space exhausted")]
    ReservationIdsExhausted,

    #[error("no such reservation")]
    UnknownReservation,

    #[error("cookie does not match")]
    CookieMismatch,

    #[error("reservation expired")]
    ReservationExpired,

    #[error("ticket code space exhausted")]
    TicketCodesExhausted,
}

impl Rejection {
    /// Rejections caused by the server running out of ids rather than by
    /// anything the client did.
    pub fn is_exhaustion(self) -> bool {
        matches!(
            self,
            Rejection::ReservationIdsExhausted | Rejection::TicketCodesExhausted
        )
    }
}

//! Box office orchestrator.
//!
//! Owns the [`Inventory`] and the [`ReservationLedger`] and turns each
//! logical [`Request`] into exactly one [`Response`]. Time is always
//! passed in by the caller, so the same instance behaves identically
//! under a real clock and under a test clock.
//!
//! All mutation goes through `&mut self`: whoever owns the `BoxOffice`
//! is the single serialization point for requests and expiry alike.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::Rejection;
use crate::inventory::Inventory;
use crate::messages::{
    EventId, Request, ReservationGranted, ReservationId, ReservationRequest, Response,
    TicketBatch, TicketsRequest,
};
use crate::reservation::ReservationLedger;

/// Tunables for a [`BoxOffice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxOfficeSettings {
    /// How long a reservation is held before it expires.
    pub timeout: Duration,

    /// Largest ticket count a single reservation may ask for.
    pub max_tickets_per_request: u16,
}

/// A request the box office refused, and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Refusal {
    /// Event or reservation id echoed back to the client.
    pub id: u32,
    pub reason: Rejection,
}

impl Refusal {
    pub fn into_response(self) -> Response {
        Response::bad_request(self.id)
    }
}

#[derive(Debug)]
pub struct BoxOffice {
    inventory: Inventory,
    ledger: ReservationLedger,
    max_tickets_per_request: u16,
}

impl BoxOffice {
    pub fn new(inventory: Inventory, settings: BoxOfficeSettings) -> Self {
        BoxOffice {
            inventory,
            ledger: ReservationLedger::new(settings.timeout),
            max_tickets_per_request: settings.max_tickets_per_request,
        }
    }

    /// Process a single request, folding refusals into `BadRequest`.
    pub fn process_request(&mut self, request: Request, now: SystemTime) -> Response {
        self.handle(request, now)
            .unwrap_or_else(Refusal::into_response)
    }

    /// Process a single request, keeping the refusal reason visible.
    pub fn handle(&mut self, request: Request, now: SystemTime) -> Result<Response, Refusal> {
        match request {
            Request::GetEvents => Ok(Response::Events(self.inventory.list())),
            Request::GetReservation(req) => self.process_reservation(req, now),
            Request::GetTickets(req) => self.process_tickets(req, now),
        }
    }

    /// Expire every pending reservation whose deadline has passed.
    pub fn expire_due(&mut self, now: SystemTime) -> Vec<ReservationId> {
        self.ledger.expire_due(&mut self.inventory, now)
    }

    /// When the next pending reservation expires, if any.
    pub fn next_expiry(&mut self) -> Option<SystemTime> {
        self.ledger.next_expiry()
    }

    // -------------------------------------------------------------------------
    // Internal handlers
    // -------------------------------------------------------------------------

    fn process_reservation(
        &mut self,
        req: ReservationRequest,
        now: SystemTime,
    ) -> Result<Response, Refusal> {
        let ReservationRequest {
            event_id,
            ticket_count,
        } = req;
        let refuse = |reason| Refusal {
            id: event_id,
            reason,
        };

        if self.inventory.get(event_id).is_none() {
            return Err(refuse(Rejection::UnknownEvent));
        }
        if ticket_count > self.max_tickets_per_request {
            return Err(refuse(Rejection::TooManyTickets));
        }
        if !self.ledger.has_free_id() {
            return Err(refuse(Rejection::ReservationIdsExhausted));
        }

        self.inventory
            .reserve(event_id, ticket_count)
            .map_err(refuse)?;

        let reservation = match self.ledger.create(event_id, ticket_count, now) {
            Ok(reservation) => reservation,
            Err(reason) => {
                self.inventory.release(event_id, ticket_count);
                return Err(refuse(reason));
            }
        };

        Ok(Response::Reservation(ReservationGranted {
            reservation_id: reservation.id,
            event_id,
            ticket_count,
            cookie: reservation.cookie,
            expiration_time: unix_seconds(reservation.expires_at),
        }))
    }

    fn process_tickets(
        &mut self,
        req: TicketsRequest,
        now: SystemTime,
    ) -> Result<Response, Refusal> {
        let reservation_id = req.reservation_id;

        let tickets = self
            .ledger
            .confirm(reservation_id, &req.cookie, now)
            .map_err(|reason| Refusal {
                id: reservation_id,
                reason,
            })?;

        Ok(Response::Tickets(TicketBatch {
            reservation_id,
            tickets: tickets.to_vec(),
        }))
    }

    // -------------------------------------------------------------------------
    // Accessors (tests / admin)
    // -------------------------------------------------------------------------

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn ledger(&self) -> &ReservationLedger {
        &self.ledger
    }

    /// Tickets currently available for `event_id`.
    pub fn available(&self, event_id: EventId) -> Option<u16> {
        self.inventory
            .get(event_id)
            .map(|event| event.ticket_count_available)
    }
}

/// Whole seconds since the Unix epoch, rounded down.
pub fn unix_seconds(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

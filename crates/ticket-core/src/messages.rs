//! Message types used by the box office.
//!
//! These are **transport-agnostic** logical messages:
//! - [`Request`]: what the box office consumes.
//! - [`Response`]: what it answers with.
//!
//! Byte layouts live in the `ticket-protocol` crate; this module is
//! purely logical.

use crate::cookie::Cookie;
use crate::ticket::TicketCode;

/// Dense event identifier, assigned at load time starting from 0.
pub type EventId = u32;

/// Reservation identifier. Drawn from a range disjoint from event ids.
pub type ReservationId = u32;

/// A client request, already validated at the wire level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// List every event that still has tickets available.
    GetEvents,

    /// Put a hold on `ticket_count` tickets of one event.
    GetReservation(ReservationRequest),

    /// Exchange a reservation and its cookie for ticket codes.
    GetTickets(TicketsRequest),
}

/// The box office's answer to a single [`Request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Events with `available > 0`, ascending by id.
    ///
    /// Splitting this into several datagrams is the codec's business.
    Events(Vec<EventListing>),

    /// A freshly created hold.
    Reservation(ReservationGranted),

    /// Ticket codes of a confirmed reservation.
    Tickets(TicketBatch),

    /// The request was well-formed but could not be honored. `id` echoes
    /// the event id or reservation id the request named.
    BadRequest { id: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservationRequest {
    pub event_id: EventId,
    pub ticket_count: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketsRequest {
    pub reservation_id: ReservationId,
    pub cookie: Cookie,
}

/// One line of the events listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventListing {
    pub event_id: EventId,
    pub tickets_available: u16,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationGranted {
    pub reservation_id: ReservationId,
    pub event_id: EventId,
    pub ticket_count: u16,
    pub cookie: Cookie,

    /// Expiry deadline in whole seconds since the Unix epoch, rounded down.
    pub expiration_time: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketBatch {
    pub reservation_id: ReservationId,
    pub tickets: Vec<TicketCode>,
}

impl Request {
    /// Convenience constructor for a reservation request.
    pub fn reservation(event_id: EventId, ticket_count: u16) -> Self {
        Request::GetReservation(ReservationRequest {
            event_id,
            ticket_count,
        })
    }

    /// Convenience constructor for a tickets request.
    pub fn tickets(reservation_id: ReservationId, cookie: Cookie) -> Self {
        Request::GetTickets(TicketsRequest {
            reservation_id,
            cookie,
        })
    }
}

impl Response {
    pub fn bad_request(id: u32) -> Self {
        Response::BadRequest { id }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Response::Events(_) => "events",
            Response::Reservation(_) => "reservation",
            Response::Tickets(_) => "tickets",
            Response::BadRequest { .. } => "bad_request",
        }
    }
}

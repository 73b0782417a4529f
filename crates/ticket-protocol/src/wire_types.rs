//! Low-level wire types and constants.
//!
//! This module defines:
//! - Message type IDs for requests and responses.
//! - Fixed request lengths.
//! - Datagram size limits.
//!
//! The actual encode/decode logic lives in `binary_codec`.

use ticket_core::{COOKIE_LEN, TICKET_CODE_LEN};

/// Largest UDP payload over IPv4 (65535 - 8 byte UDP header - 20 byte IP header).
pub const MAX_DATAGRAM_SIZE: usize = 65_507;

/// Request types (client → server).
///
/// These IDs are used in the first byte of each datagram.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WireRequestType {
    GetEvents = 1,
    GetReservation = 3,
    GetTickets = 5,
}

impl WireRequestType {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            1 => Some(WireRequestType::GetEvents),
            3 => Some(WireRequestType::GetReservation),
            5 => Some(WireRequestType::GetTickets),
            _ => None,
        }
    }

    /// Exact datagram length for this request type, type byte included.
    pub fn wire_len(self) -> usize {
        match self {
            WireRequestType::GetEvents => GET_EVENTS_LEN,
            WireRequestType::GetReservation => GET_RESERVATION_LEN,
            WireRequestType::GetTickets => GET_TICKETS_LEN,
        }
    }
}

/// Response types (server → client).
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WireResponseType {
    Events = 2,
    Reservation = 4,
    Tickets = 6,
    BadRequest = 255,
}

impl WireResponseType {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            2 => Some(WireResponseType::Events),
            4 => Some(WireResponseType::Reservation),
            6 => Some(WireResponseType::Tickets),
            255 => Some(WireResponseType::BadRequest),
            _ => None,
        }
    }
}

pub const GET_EVENTS_LEN: usize = 1;
pub const GET_RESERVATION_LEN: usize = 1 + 4 + 2;
pub const GET_TICKETS_LEN: usize = 1 + 4 + COOKIE_LEN;

pub const RESERVATION_LEN: usize = 1 + 4 + 4 + 2 + COOKIE_LEN + 8;
pub const BAD_REQUEST_LEN: usize = 1 + 4;

/// Tickets header: type, reservation_id, ticket_count.
pub const TICKETS_HEADER_LEN: usize = 1 + 4 + 2;

/// Events record header: event_id, ticket_count, description_length.
pub const EVENT_RECORD_HEADER_LEN: usize = 4 + 2 + 1;

/// Largest ticket count whose Tickets reply still fits one datagram.
pub const fn max_tickets_per_datagram() -> u16 {
    ((MAX_DATAGRAM_SIZE - TICKETS_HEADER_LEN) / TICKET_CODE_LEN) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_lengths() {
        assert_eq!(WireRequestType::GetEvents.wire_len(), 1);
        assert_eq!(WireRequestType::GetReservation.wire_len(), 7);
        assert_eq!(WireRequestType::GetTickets.wire_len(), 53);
    }

    #[test]
    fn response_types_are_not_requests() {
        for ty in [2u8, 4, 6, 255, 0] {
            assert!(WireRequestType::from_u8(ty).is_none());
        }
    }

    #[test]
    fn ticket_limit_fits_a_datagram() {
        let max = max_tickets_per_datagram() as usize;
        assert_eq!(max, 9_357);
        assert!(TICKETS_HEADER_LEN + max * TICKET_CODE_LEN <= MAX_DATAGRAM_SIZE);
    }
}

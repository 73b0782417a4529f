//! Binary encoding/decoding for box-office messages.
//!
//! This module converts between:
//! - raw datagram payloads (`&[u8]`)
//! - high-level `ticket_core::Request` / `Response`
//!
//! Layout (one message per datagram, all integers big-endian):
//!
//! ```text
//! Requests (client → server), exact lengths
//! -----------------------------------------
//! GetEvents (type=1, 1 byte):
//!   [0]      type
//!
//! GetReservation (type=3, 7 bytes):
//!   [1..5]   event_id (u32)
//!   [5..7]   ticket_count (u16)
//!
//! GetTickets (type=5, 53 bytes):
//!   [1..5]   reservation_id (u32)
//!   [5..53]  cookie (48 bytes)
//!
//! Responses (server → client)
//! ---------------------------
//! Events (type=2):
//!   repeated until end of datagram:
//!     event_id (u32), ticket_count (u16),
//!     description_length (u8), description (bytes)
//!
//! Reservation (type=4, 67 bytes):
//!   [1..5]   reservation_id (u32)
//!   [5..9]   event_id (u32)
//!   [9..11]  ticket_count (u16)
//!   [11..59] cookie (48 bytes)
//!   [59..67] expiration_time (u64, Unix seconds)
//!
//! Tickets (type=6):
//!   [1..5]   reservation_id (u32)
//!   [5..7]   ticket_count (u16)
//!   [7..]    ticket_count × ticket code (7 bytes each)
//!
//! BadRequest (type=255, 5 bytes):
//!   [1..5]   event_id or reservation_id (u32)
//! ```
//!
//! Decoding is strict: a datagram whose length is not exactly what its
//! type byte calls for is rejected as a whole. The server drops such
//! datagrams without replying.

use thiserror::Error;

use ticket_core::{
    Cookie, EventListing, Request, ReservationGranted, Response, TicketBatch, TicketCode,
    TicketsRequest, COOKIE_LEN, TICKET_CODE_LEN,
};

use crate::wire_types::{
    WireRequestType, WireResponseType, BAD_REQUEST_LEN, EVENT_RECORD_HEADER_LEN,
    RESERVATION_LEN, TICKETS_HEADER_LEN,
};

/// Errors that can arise when encoding/decoding a datagram.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("empty datagram")]
    Empty,

    #[error("unknown message type: {0}")]
    UnknownMessageType(u8),

    #[error("length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("datagram truncated")]
    Truncated,

    #[error("description of {0} bytes does not fit a length byte")]
    DescriptionTooLong(usize),

    #[error("description is not valid UTF-8")]
    InvalidDescription,

    #[error("{0} tickets do not fit a count field")]
    TooManyTickets(usize),
}

// ============================================================================
// REQUESTS: client → server
// ============================================================================

/// Decode a single request datagram.
///
/// Any `Err` means "not a request": the caller must ignore the datagram.
pub fn decode_request(buf: &[u8]) -> Result<Request, ProtocolError> {
    let (&msg_type, _) = buf.split_first().ok_or(ProtocolError::Empty)?;

    let wire_type =
        WireRequestType::from_u8(msg_type).ok_or(ProtocolError::UnknownMessageType(msg_type))?;

    let expected = wire_type.wire_len();
    if buf.len() != expected {
        return Err(ProtocolError::LengthMismatch {
            expected,
            actual: buf.len(),
        });
    }

    let mut reader = WireReader::new(&buf[1..]);
    let request = match wire_type {
        WireRequestType::GetEvents => Request::GetEvents,
        WireRequestType::GetReservation => {
            let event_id = reader.u32()?;
            let ticket_count = reader.u16()?;
            Request::reservation(event_id, ticket_count)
        }
        WireRequestType::GetTickets => {
            let reservation_id = reader.u32()?;
            let cookie = Cookie::from_bytes(reader.array::<COOKIE_LEN>()?);
            Request::GetTickets(TicketsRequest {
                reservation_id,
                cookie,
            })
        }
    };
    reader.finish()?;

    Ok(request)
}

/// Encode a single request. The encoded bytes are appended to `out`.
pub fn encode_request(request: &Request, out: &mut Vec<u8>) {
    match request {
        Request::GetEvents => out.push(WireRequestType::GetEvents as u8),
        Request::GetReservation(r) => {
            out.push(WireRequestType::GetReservation as u8);
            out.extend_from_slice(&r.event_id.to_be_bytes());
            out.extend_from_slice(&r.ticket_count.to_be_bytes());
        }
        Request::GetTickets(t) => {
            out.push(WireRequestType::GetTickets as u8);
            out.extend_from_slice(&t.reservation_id.to_be_bytes());
            out.extend_from_slice(t.cookie.as_bytes());
        }
    }
}

// ============================================================================
// RESPONSES: server → client
// ============================================================================

/// Encode a single response. The encoded bytes are appended to `out`.
///
/// `Events` is written as one message regardless of size; servers should
/// use [`encode_events`] to split it across datagrams.
pub fn encode_response(response: &Response, out: &mut Vec<u8>) -> Result<(), ProtocolError> {
    match response {
        Response::Events(listings) => {
            out.push(WireResponseType::Events as u8);
            for listing in listings {
                encode_event_record(listing, out)?;
            }
        }
        Response::Reservation(r) => encode_reservation(r, out),
        Response::Tickets(t) => encode_tickets(t, out)?,
        Response::BadRequest { id } => {
            out.push(WireResponseType::BadRequest as u8);
            out.extend_from_slice(&id.to_be_bytes());
        }
    }
    Ok(())
}

/// Pack an events listing into as few datagrams as fit `budget` bytes each.
///
/// Records are appended in order while the datagram stays within budget;
/// the next record that would overflow starts a new datagram. Every
/// datagram is a complete Events message, and an empty listing still
/// produces one (empty) datagram. A record that exceeds `budget` on its
/// own is sent alone.
pub fn encode_events(
    listings: &[EventListing],
    budget: usize,
) -> Result<Vec<Vec<u8>>, ProtocolError> {
    let mut datagrams = Vec::new();
    let mut current = vec![WireResponseType::Events as u8];

    for listing in listings {
        let record_len = EVENT_RECORD_HEADER_LEN + listing.description.len();
        if current.len() > 1 && current.len() + record_len > budget {
            let full = std::mem::replace(&mut current, vec![WireResponseType::Events as u8]);
            datagrams.push(full);
        }
        encode_event_record(listing, &mut current)?;
    }

    datagrams.push(current);
    Ok(datagrams)
}

/// Decode a single response datagram.
///
/// This is useful on the **client** side when reading from the server.
pub fn decode_response(buf: &[u8]) -> Result<Response, ProtocolError> {
    let (&msg_type, body) = buf.split_first().ok_or(ProtocolError::Empty)?;

    let wire_type =
        WireResponseType::from_u8(msg_type).ok_or(ProtocolError::UnknownMessageType(msg_type))?;

    match wire_type {
        WireResponseType::Events => decode_events(body),
        WireResponseType::Reservation => {
            expect_len(buf, RESERVATION_LEN)?;
            decode_reservation(body)
        }
        WireResponseType::Tickets => decode_tickets(body),
        WireResponseType::BadRequest => {
            expect_len(buf, BAD_REQUEST_LEN)?;
            let mut reader = WireReader::new(body);
            let id = reader.u32()?;
            reader.finish()?;
            Ok(Response::bad_request(id))
        }
    }
}

fn encode_event_record(listing: &EventListing, out: &mut Vec<u8>) -> Result<(), ProtocolError> {
    let description = listing.description.as_bytes();
    let len = u8::try_from(description.len())
        .map_err(|_| ProtocolError::DescriptionTooLong(description.len()))?;

    out.extend_from_slice(&listing.event_id.to_be_bytes());
    out.extend_from_slice(&listing.tickets_available.to_be_bytes());
    out.push(len);
    out.extend_from_slice(description);

    Ok(())
}

fn encode_reservation(r: &ReservationGranted, out: &mut Vec<u8>) {
    out.push(WireResponseType::Reservation as u8);
    out.extend_from_slice(&r.reservation_id.to_be_bytes());
    out.extend_from_slice(&r.event_id.to_be_bytes());
    out.extend_from_slice(&r.ticket_count.to_be_bytes());
    out.extend_from_slice(r.cookie.as_bytes());
    out.extend_from_slice(&r.expiration_time.to_be_bytes());
}

fn encode_tickets(t: &TicketBatch, out: &mut Vec<u8>) -> Result<(), ProtocolError> {
    let count =
        u16::try_from(t.tickets.len()).map_err(|_| ProtocolError::TooManyTickets(t.tickets.len()))?;

    out.reserve(TICKETS_HEADER_LEN + t.tickets.len() * TICKET_CODE_LEN);
    out.push(WireResponseType::Tickets as u8);
    out.extend_from_slice(&t.reservation_id.to_be_bytes());
    out.extend_from_slice(&count.to_be_bytes());
    for ticket in &t.tickets {
        out.extend_from_slice(ticket.as_bytes());
    }

    Ok(())
}

fn decode_events(body: &[u8]) -> Result<Response, ProtocolError> {
    let mut reader = WireReader::new(body);
    let mut listings = Vec::new();

    while !reader.is_empty() {
        let event_id = reader.u32()?;
        let tickets_available = reader.u16()?;
        let len = reader.u8()? as usize;
        let description = std::str::from_utf8(reader.bytes(len)?)
            .map_err(|_| ProtocolError::InvalidDescription)?
            .to_string();

        listings.push(EventListing {
            event_id,
            tickets_available,
            description,
        });
    }

    Ok(Response::Events(listings))
}

fn decode_reservation(body: &[u8]) -> Result<Response, ProtocolError> {
    let mut reader = WireReader::new(body);

    let reservation_id = reader.u32()?;
    let event_id = reader.u32()?;
    let ticket_count = reader.u16()?;
    let cookie = Cookie::from_bytes(reader.array::<COOKIE_LEN>()?);
    let expiration_time = reader.u64()?;
    reader.finish()?;

    Ok(Response::Reservation(ReservationGranted {
        reservation_id,
        event_id,
        ticket_count,
        cookie,
        expiration_time,
    }))
}

fn decode_tickets(body: &[u8]) -> Result<Response, ProtocolError> {
    let mut reader = WireReader::new(body);

    let reservation_id = reader.u32()?;
    let count = reader.u16()? as usize;

    let expected = TICKETS_HEADER_LEN + count * TICKET_CODE_LEN;
    if body.len() + 1 != expected {
        return Err(ProtocolError::LengthMismatch {
            expected,
            actual: body.len() + 1,
        });
    }

    let mut tickets = Vec::with_capacity(count);
    for _ in 0..count {
        tickets.push(TicketCode::from_bytes(reader.array::<TICKET_CODE_LEN>()?));
    }
    reader.finish()?;

    Ok(Response::Tickets(TicketBatch {
        reservation_id,
        tickets,
    }))
}

// -----------------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------------

fn expect_len(buf: &[u8], expected: usize) -> Result<(), ProtocolError> {
    if buf.len() == expected {
        Ok(())
    } else {
        Err(ProtocolError::LengthMismatch {
            expected,
            actual: buf.len(),
        })
    }
}

/// Bounds-checked big-endian cursor over a message body.
struct WireReader<'a> {
    buf: &'a [u8],
}

impl<'a> WireReader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        WireReader { buf }
    }

    fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    fn bytes(&mut self, n: usize) -> Result<&'a [u8], ProtocolError> {
        if self.buf.len() < n {
            return Err(ProtocolError::Truncated);
        }
        let (head, rest) = self.buf.split_at(n);
        self.buf = rest;
        Ok(head)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], ProtocolError> {
        let mut arr = [0u8; N];
        arr.copy_from_slice(self.bytes(N)?);
        Ok(arr)
    }

    fn u8(&mut self) -> Result<u8, ProtocolError> {
        Ok(self.array::<1>()?[0])
    }

    fn u16(&mut self) -> Result<u16, ProtocolError> {
        Ok(u16::from_be_bytes(self.array()?))
    }

    fn u32(&mut self) -> Result<u32, ProtocolError> {
        Ok(u32::from_be_bytes(self.array()?))
    }

    fn u64(&mut self) -> Result<u64, ProtocolError> {
        Ok(u64::from_be_bytes(self.array()?))
    }

    /// Fails if anything is left over.
    fn finish(self) -> Result<(), ProtocolError> {
        if self.buf.is_empty() {
            Ok(())
        } else {
            Err(ProtocolError::Truncated)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cookie() -> Cookie {
        Cookie::from_bytes([b'!'; COOKIE_LEN])
    }

    fn listing(event_id: u32, description: &str) -> EventListing {
        EventListing {
            event_id,
            tickets_available: 7,
            description: description.to_string(),
        }
    }

    #[test]
    fn decodes_well_formed_requests() {
        assert_eq!(decode_request(&[1]), Ok(Request::GetEvents));
        assert_eq!(
            decode_request(&[3, 0, 0, 0, 42, 0x01, 0x00]),
            Ok(Request::reservation(42, 256))
        );

        let mut buf = vec![5, 0, 0x0F, 0x42, 0x40];
        buf.extend_from_slice(cookie().as_bytes());
        assert_eq!(
            decode_request(&buf),
            Ok(Request::tickets(1_000_000, cookie()))
        );
    }

    #[test]
    fn rejects_unknown_types() {
        for ty in [0u8, 2, 4, 6, 255] {
            assert_eq!(
                decode_request(&[ty]),
                Err(ProtocolError::UnknownMessageType(ty))
            );
        }
        assert_eq!(decode_request(&[]), Err(ProtocolError::Empty));
    }

    #[test]
    fn rejects_wrong_lengths() {
        // Trailing byte on each request type.
        assert!(decode_request(&[1, 3]).is_err());
        assert!(decode_request(&[3, 0, 0, 0, 0, 0, 1, 0]).is_err());
        let mut long_tickets = vec![5, 0, 0x0F, 0x42, 0x40];
        long_tickets.extend_from_slice(cookie().as_bytes());
        long_tickets.push(0);
        assert!(decode_request(&long_tickets).is_err());

        // Missing bytes.
        assert_eq!(
            decode_request(&[3, 0, 0, 0, 0]),
            Err(ProtocolError::LengthMismatch {
                expected: 7,
                actual: 5
            })
        );
        assert!(decode_request(&[5, 0, 0x0F, 0x42, 0x40]).is_err());
    }

    #[test]
    fn encoded_requests_decode() {
        for request in [
            Request::GetEvents,
            Request::reservation(3, 9),
            Request::tickets(1_000_123, cookie()),
        ] {
            let mut buf = Vec::new();
            encode_request(&request, &mut buf);
            assert_eq!(decode_request(&buf), Ok(request));
        }
    }

    #[test]
    fn reservation_layout() {
        let response = Response::Reservation(ReservationGranted {
            reservation_id: 1_000_000,
            event_id: 2,
            ticket_count: 5,
            cookie: cookie(),
            expiration_time: 0x0102_0304_0506_0708,
        });

        let mut buf = Vec::new();
        encode_response(&response, &mut buf).unwrap();

        assert_eq!(buf.len(), RESERVATION_LEN);
        assert_eq!(buf[0], 4);
        assert_eq!(&buf[1..5], &1_000_000u32.to_be_bytes());
        assert_eq!(&buf[5..9], &[0, 0, 0, 2]);
        assert_eq!(&buf[9..11], &[0, 5]);
        assert_eq!(&buf[59..67], &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(decode_response(&buf), Ok(response));
    }

    #[test]
    fn tickets_layout() {
        let response = Response::Tickets(TicketBatch {
            reservation_id: 1_000_001,
            tickets: vec![
                TicketCode::from_bytes(*b"0000000"),
                TicketCode::from_bytes(*b"0000001"),
            ],
        });

        let mut buf = Vec::new();
        encode_response(&response, &mut buf).unwrap();
        assert_eq!(buf.len(), TICKETS_HEADER_LEN + 2 * TICKET_CODE_LEN);
        assert_eq!(&buf[5..7], &[0, 2]);
        assert_eq!(&buf[7..14], b"0000000");
        assert_eq!(decode_response(&buf), Ok(response));

        buf.pop();
        assert!(decode_response(&buf).is_err());
    }

    #[test]
    fn bad_request_layout() {
        let mut buf = Vec::new();
        encode_response(&Response::bad_request(7), &mut buf).unwrap();
        assert_eq!(buf, vec![255, 0, 0, 0, 7]);
    }

    #[test]
    fn events_records_decode_in_order() {
        let response = Response::Events(vec![listing(0, "Hamlet"), listing(4, "")]);
        let mut buf = Vec::new();
        encode_response(&response, &mut buf).unwrap();
        assert_eq!(buf[0], 2);
        assert_eq!(decode_response(&buf), Ok(response));

        // A record cut short is not a valid Events message.
        buf.pop();
        assert!(decode_response(&buf).is_err());
    }

    #[test]
    fn empty_listing_is_one_empty_datagram() {
        let datagrams = encode_events(&[], 64).unwrap();
        assert_eq!(datagrams, vec![vec![2]]);
    }

    #[test]
    fn events_are_split_to_fit_budget() {
        // Each record is 7 + 3 = 10 bytes; budget of 21 fits two per datagram.
        let listings: Vec<EventListing> = (0..5).map(|id| listing(id, "abc")).collect();
        let datagrams = encode_events(&listings, 21).unwrap();

        assert_eq!(datagrams.len(), 3);
        assert!(datagrams.iter().all(|d| d.len() <= 21));

        let mut seen = Vec::new();
        for datagram in &datagrams {
            let Ok(Response::Events(part)) = decode_response(datagram) else {
                panic!("not an events datagram");
            };
            seen.extend(part.into_iter().map(|l| l.event_id));
        }
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn oversized_record_travels_alone() {
        let listings = vec![listing(0, "a"), listing(1, &"x".repeat(40)), listing(2, "b")];
        let datagrams = encode_events(&listings, 20).unwrap();
        assert_eq!(datagrams.len(), 3);
    }

    #[test]
    fn description_longer_than_length_byte_is_an_error() {
        let long = listing(0, &"x".repeat(256));
        assert_eq!(
            encode_events(&[long], 65_507),
            Err(ProtocolError::DescriptionTooLong(256))
        );
    }
}

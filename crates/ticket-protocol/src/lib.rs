//! ticket-protocol
//!
//! Wire-level encoding/decoding for the ticket server.
//!
//! This crate turns logical box-office messages
//! (`ticket_core::Request` / `Response`) into datagram payloads and
//! back again.
//!
//! - [`wire_types`]   : message ids, fixed lengths, size limits
//! - [`binary_codec`] : the codec itself, including Events pagination

pub mod wire_types;
pub mod binary_codec;

pub use binary_codec::{
    ProtocolError,
    decode_request,
    encode_request,
    decode_response,
    encode_response,
    encode_events,
};

pub use wire_types::{max_tickets_per_datagram, MAX_DATAGRAM_SIZE};

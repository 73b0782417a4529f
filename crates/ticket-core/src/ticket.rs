//! Ticket codes and their allocator.
//!
//! Codes carry no security property; they only have to be unique for the
//! lifetime of the process. The allocator renders a monotonically
//! increasing counter in base 36, so a code is never handed out twice,
//! even after the reservation that owned it is long gone.

use std::fmt;

use crate::error::Rejection;

/// Ticket code length on the wire.
pub const TICKET_CODE_LEN: usize = 7;

const ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Number of distinct codes: 36^7.
const CODE_SPACE: u64 = 78_364_164_096;

/// A 7-character ticket code.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TicketCode([u8; TICKET_CODE_LEN]);

impl TicketCode {
    pub fn from_bytes(bytes: [u8; TICKET_CODE_LEN]) -> Self {
        TicketCode(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; TICKET_CODE_LEN] {
        &self.0
    }

    /// Base-36 rendering of `n`, most significant digit first.
    fn from_index(mut n: u64) -> Self {
        let mut bytes = [ALPHABET[0]; TICKET_CODE_LEN];
        for slot in bytes.iter_mut().rev() {
            *slot = ALPHABET[(n % 36) as usize];
            n /= 36;
        }
        TicketCode(bytes)
    }
}

impl fmt::Debug for TicketCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TicketCode({})", self)
    }
}

impl fmt::Display for TicketCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

/// Hands out process-unique ticket codes.
#[derive(Debug, Default)]
pub struct TicketAllocator {
    /// Index of the next code to issue.
    next: u64,
}

impl TicketAllocator {
    pub fn new() -> Self {
        TicketAllocator::default()
    }

    /// Allocate `n` distinct codes never issued before.
    ///
    /// Either all `n` codes are issued or none are.
    pub fn allocate(&mut self, n: u16) -> Result<Vec<TicketCode>, Rejection> {
        let end = self.next + u64::from(n);
        if end > CODE_SPACE {
            return Err(Rejection::TicketCodesExhausted);
        }

        let codes = (self.next..end).map(TicketCode::from_index).collect();
        self.next = end;
        Ok(codes)
    }

    /// Number of codes issued so far.
    pub fn issued(&self) -> u64 {
        self.next
    }
}

//! Reservation ledger.
//!
//! Every reservation goes through one of two life cycles:
//!
//! ```text
//! create ──> Pending ──confirm──> Confirmed   (kept for the process lifetime)
//!               │
//!               └──expire──> removed          (tickets go back to the event)
//! ```
//!
//! A Pending reservation always has a live entry in the
//! [`ExpiryScheduler`]; confirming cancels that entry in the same call,
//! so a reservation can never both expire and confirm.

use std::collections::HashMap;
use std::time::{Duration, SystemTime};

use crate::cookie::Cookie;
use crate::error::Rejection;
use crate::expiry::ExpiryScheduler;
use crate::inventory::{Inventory, MAX_EVENTS};
use crate::messages::{EventId, ReservationId};
use crate::ticket::{TicketAllocator, TicketCode};

/// First reservation id: right above the largest possible event id.
pub const FIRST_RESERVATION_ID: ReservationId = MAX_EVENTS as ReservationId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationStatus {
    Pending,
    Confirmed,
}

#[derive(Debug, Clone)]
pub struct Reservation {
    pub id: ReservationId,
    pub event_id: EventId,
    pub ticket_count: u16,
    pub cookie: Cookie,
    pub expires_at: SystemTime,
    pub status: ReservationStatus,

    /// Empty until confirmed.
    pub tickets: Vec<TicketCode>,
}

impl Reservation {
    pub fn is_pending(&self) -> bool {
        self.status == ReservationStatus::Pending
    }
}

/// All reservations the server knows about, plus the expiry and
/// ticket-code state that goes with them.
#[derive(Debug)]
pub struct ReservationLedger {
    reservations: HashMap<ReservationId, Reservation>,
    expiry: ExpiryScheduler,
    allocator: TicketAllocator,

    /// `None` once the id space is used up.
    next_id: Option<ReservationId>,

    /// How long a hold lasts before it expires.
    timeout: Duration,
}

impl ReservationLedger {
    pub fn new(timeout: Duration) -> Self {
        ReservationLedger {
            reservations: HashMap::new(),
            expiry: ExpiryScheduler::new(),
            allocator: TicketAllocator::new(),
            next_id: Some(FIRST_RESERVATION_ID),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether [`create`](Self::create) can still hand out an id.
    pub fn has_free_id(&self) -> bool {
        self.next_id.is_some()
    }

    /// Record a new pending hold.
    ///
    /// The caller must already have taken the tickets off the inventory.
    pub fn create(
        &mut self,
        event_id: EventId,
        ticket_count: u16,
        now: SystemTime,
    ) -> Result<&Reservation, Rejection> {
        let id = self.next_id.ok_or(Rejection::ReservationIdsExhausted)?;
        self.next_id = id.checked_add(1);

        let expires_at = now + self.timeout;
        self.expiry.schedule(id, expires_at);

        let reservation = Reservation {
            id,
            event_id,
            ticket_count,
            cookie: Cookie::generate(),
            expires_at,
            status: ReservationStatus::Pending,
            tickets: Vec::new(),
        };

        let reservation: &Reservation = self.reservations.entry(id).or_insert(reservation);
        Ok(reservation)
    }

    /// Exchange a reservation and its cookie for ticket codes.
    ///
    /// Confirming an already confirmed reservation returns the same codes
    /// again, so a client whose reply got lost can simply retry.
    pub fn confirm(
        &mut self,
        id: ReservationId,
        cookie: &Cookie,
        now: SystemTime,
    ) -> Result<&[TicketCode], Rejection> {
        let reservation = self
            .reservations
            .get_mut(&id)
            .ok_or(Rejection::UnknownReservation)?;

        if reservation.cookie != *cookie {
            return Err(Rejection::CookieMismatch);
        }

        if reservation.is_pending() {
            // Past the deadline counts as expired even if the scheduler
            // has not fired yet.
            if now >= reservation.expires_at {
                return Err(Rejection::ReservationExpired);
            }

            reservation.tickets = self.allocator.allocate(reservation.ticket_count)?;
            reservation.status = ReservationStatus::Confirmed;
            self.expiry.cancel(id);
        }

        Ok(&reservation.tickets)
    }

    /// Expire every pending reservation whose deadline is `<= now`,
    /// returning its tickets to the inventory.
    ///
    /// Returns the ids that expired.
    pub fn expire_due(&mut self, inventory: &mut Inventory, now: SystemTime) -> Vec<ReservationId> {
        let mut expired = Vec::new();

        while let Some(id) = self.expiry.pop_due(now) {
            let Some(reservation) = self.reservations.remove(&id) else {
                debug_assert!(false, "scheduled reservation {} missing", id);
                continue;
            };
            debug_assert!(reservation.is_pending());

            inventory.release(reservation.event_id, reservation.ticket_count);
            expired.push(id);
        }

        expired
    }

    /// Deadline of the next reservation to expire.
    pub fn next_expiry(&mut self) -> Option<SystemTime> {
        self.expiry.next_deadline()
    }

    pub fn get(&self, id: ReservationId) -> Option<&Reservation> {
        self.reservations.get(&id)
    }

    /// Number of reservations held, pending and confirmed.
    pub fn len(&self) -> usize {
        self.reservations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reservations.is_empty()
    }

    /// Number of reservations still waiting for confirmation.
    pub fn pending(&self) -> usize {
        self.expiry.len()
    }
}

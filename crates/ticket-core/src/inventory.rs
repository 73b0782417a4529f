//! Event inventory.
//!
//! The event list is fixed once loaded; only the per-event available
//! counter moves afterwards:
//! - down when a reservation is created,
//! - up when a pending reservation expires.
//!
//! Confirmation does not touch it.

use crate::error::{InventoryError, Rejection};
use crate::messages::{EventId, EventListing};

/// Longest description the wire format can carry (one length byte).
pub const MAX_DESCRIPTION_LEN: usize = u8::MAX as usize;

/// Event ids run `0..MAX_EVENTS`; reservation ids start right above.
pub const MAX_EVENTS: usize = 1_000_000;

/// A single event and its ticket counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: EventId,
    pub description: String,
    pub ticket_count_total: u16,
    pub ticket_count_available: u16,
}

impl Event {
    fn listing(&self) -> EventListing {
        EventListing {
            event_id: self.id,
            tickets_available: self.ticket_count_available,
            description: self.description.clone(),
        }
    }
}

/// All events, indexed by id.
#[derive(Debug, Default)]
pub struct Inventory {
    /// `events[i].id == i`.
    events: Vec<Event>,
}

impl Inventory {
    /// Build an inventory from `(description, ticket_count_total)` pairs.
    ///
    /// Ids are assigned in order, starting at 0.
    pub fn new<I, S>(entries: I) -> Result<Self, InventoryError>
    where
        I: IntoIterator<Item = (S, u16)>,
        S: Into<String>,
    {
        let mut events = Vec::new();

        for (index, (description, total)) in entries.into_iter().enumerate() {
            let description = description.into();
            if description.len() > MAX_DESCRIPTION_LEN {
                return Err(InventoryError::DescriptionTooLong {
                    line: 2 * index + 1,
                    len: description.len(),
                });
            }
            if index >= MAX_EVENTS {
                return Err(InventoryError::TooManyEvents);
            }

            events.push(Event {
                id: index as EventId,
                description,
                ticket_count_total: total,
                ticket_count_available: total,
            });
        }

        Ok(Inventory { events })
    }

    /// Parse an inventory listing.
    ///
    /// The listing alternates a description line with a ticket count
    /// line. A final description without a count line is ignored.
    pub fn from_listing(text: &str) -> Result<Self, InventoryError> {
        let mut entries = Vec::new();
        let mut lines = text.lines().enumerate();

        while let Some((_, description)) = lines.next() {
            let Some((count_index, count)) = lines.next() else {
                break;
            };

            let total = count.trim().parse::<u16>().map_err(|_| {
                InventoryError::InvalidTicketCount {
                    line: count_index + 1,
                    value: count.to_string(),
                }
            })?;
            entries.push((description, total));
        }

        Self::new(entries)
    }

    /// Events with tickets left, ascending by id.
    pub fn list(&self) -> Vec<EventListing> {
        self.events
            .iter()
            .filter(|e| e.ticket_count_available > 0)
            .map(Event::listing)
            .collect()
    }

    pub fn get(&self, event_id: EventId) -> Option<&Event> {
        self.events.get(event_id as usize)
    }

    /// Take `count` tickets off the available counter.
    pub fn reserve(&mut self, event_id: EventId, count: u16) -> Result<(), Rejection> {
        let event = self
            .events
            .get_mut(event_id as usize)
            .ok_or(Rejection::UnknownEvent)?;

        if count == 0 {
            return Err(Rejection::InvalidTicketCount);
        }
        if count > event.ticket_count_available {
            return Err(Rejection::NotEnoughTickets);
        }

        event.ticket_count_available -= count;
        Ok(())
    }

    /// Give `count` tickets back to an event.
    ///
    /// Only expiring reservations call this, so the counter can never
    /// legitimately climb above the total.
    pub fn release(&mut self, event_id: EventId, count: u16) {
        let Some(event) = self.events.get_mut(event_id as usize) else {
            debug_assert!(false, "release for unknown event {}", event_id);
            return;
        };

        let restored = event.ticket_count_available.saturating_add(count);
        debug_assert!(
            restored <= event.ticket_count_total,
            "event {} available {} above total {}",
            event_id,
            restored,
            event.ticket_count_total
        );
        event.ticket_count_available = restored.min(event.ticket_count_total);
    }

    /// Number of events loaded, sold out or not.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

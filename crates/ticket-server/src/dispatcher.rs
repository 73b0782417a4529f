//! Datagram-level request dispatch.
//!
//! One inbound payload in, zero or more reply payloads out:
//! - undecodable payloads are dropped without a reply,
//! - refused requests become a single `BadRequest`,
//! - an events listing may span several datagrams.
//!
//! Due reservations are expired before every request, so a request
//! never observes a hold that should already have lapsed.

use std::time::SystemTime;

use ticket_core::{BoxOffice, Response};
use ticket_protocol::{decode_request, encode_events, encode_response, MAX_DATAGRAM_SIZE};
use tracing::{debug, error, warn};

#[derive(Debug)]
pub struct Dispatcher {
    box_office: BoxOffice,

    /// Largest reply datagram, in bytes.
    datagram_budget: usize,
}

impl Dispatcher {
    pub fn new(box_office: BoxOffice) -> Self {
        Dispatcher {
            box_office,
            datagram_budget: MAX_DATAGRAM_SIZE,
        }
    }

    /// Override the reply size limit (events pagination).
    pub fn with_datagram_budget(mut self, datagram_budget: usize) -> Self {
        self.datagram_budget = datagram_budget;
        self
    }

    /// Handle one inbound datagram and return the reply datagrams.
    pub fn handle_datagram(&mut self, payload: &[u8], now: SystemTime) -> Vec<Vec<u8>> {
        self.expire_due(now);

        let request = match decode_request(payload) {
            Ok(request) => request,
            Err(err) => {
                debug!(len = payload.len(), %err, "dropping malformed datagram");
                return Vec::new();
            }
        };

        debug!(?request, "request");

        let response = match self.box_office.handle(request, now) {
            Ok(response) => response,
            Err(refusal) => {
                if refusal.reason.is_exhaustion() {
                    warn!(id = refusal.id, reason = %refusal.reason, "request refused");
                } else {
                    debug!(id = refusal.id, reason = %refusal.reason, "request refused");
                }
                refusal.into_response()
            }
        };

        self.encode(&response)
    }

    /// Expire due reservations. Returns how many lapsed.
    pub fn expire_due(&mut self, now: SystemTime) -> usize {
        let expired = self.box_office.expire_due(now);
        if !expired.is_empty() {
            debug!(count = expired.len(), ?expired, "reservations expired");
        }
        expired.len()
    }

    /// When the next pending reservation expires, if any.
    pub fn next_expiry(&mut self) -> Option<SystemTime> {
        self.box_office.next_expiry()
    }

    pub fn box_office(&self) -> &BoxOffice {
        &self.box_office
    }

    fn encode(&self, response: &Response) -> Vec<Vec<u8>> {
        let encoded = match response {
            Response::Events(listings) => encode_events(listings, self.datagram_budget),
            other => {
                let mut buf = Vec::with_capacity(64);
                encode_response(other, &mut buf).map(|()| vec![buf])
            }
        };

        match encoded {
            Ok(datagrams) => datagrams,
            Err(err) => {
                error!(kind = response.kind(), %err, "failed to encode response");
                Vec::new()
            }
        }
    }
}

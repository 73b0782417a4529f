//! Central box-office loop.
//!
//! This task owns the [`Dispatcher`] (and through it all inventory and
//! reservation state). It wakes for exactly two reasons:
//! - a datagram arrived,
//! - the earliest pending reservation reached its deadline.
//!
//! Each wake-up runs to completion before the next one, which is what
//! keeps confirm and expire from ever interleaving.

use std::time::{Duration, SystemTime};

use tracing::info;

use crate::dispatcher::Dispatcher;
use crate::types::{Datagram, InboundRx, OutboundTx};

/// Run the box-office processing loop.
///
/// - `inbound_rx`: datagrams from the receiver task.
/// - `outbound_tx`: replies for the sender task.
pub async fn run_box_office_loop(
    mut dispatcher: Dispatcher,
    mut inbound_rx: InboundRx,
    outbound_tx: OutboundTx,
) {
    loop {
        let wait = dispatcher.next_expiry().map(|deadline| {
            deadline
                .duration_since(SystemTime::now())
                .unwrap_or(Duration::ZERO)
        });

        let expiry_timer = async move {
            match wait {
                Some(wait) => tokio::time::sleep(wait).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            inbound = inbound_rx.recv() => {
                let Some(Datagram { peer, payload }) = inbound else {
                    break;
                };

                for reply in dispatcher.handle_datagram(&payload, SystemTime::now()) {
                    let reply = Datagram { peer, payload: reply.into() };
                    if outbound_tx.send(reply).is_err() {
                        info!("outbound channel closed");
                        return;
                    }
                }
            }
            _ = expiry_timer => {
                dispatcher.expire_due(SystemTime::now());
            }
        }
    }

    info!("box office loop shutting down (inbound channel closed)");
}

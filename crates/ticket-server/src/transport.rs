//! UDP socket I/O.
//!
//! Two tasks share the socket:
//! - the receiver forwards every inbound datagram to the box-office task,
//! - the sender writes whatever the box-office task queues for output.
//!
//! Neither touches box-office state, so socket I/O never stalls request
//! processing.

use std::sync::Arc;

use bytes::Bytes;
use tokio::net::UdpSocket;
use tracing::{debug, warn};

use crate::types::{Datagram, InboundTx, OutboundRx};

/// Large enough for any UDP payload, so an oversized datagram is never
/// truncated into something that decodes as a valid request.
const RECV_BUFFER_SIZE: usize = 65_536;

/// Read datagrams until the box-office task goes away.
pub async fn run_receiver(socket: Arc<UdpSocket>, inbound_tx: InboundTx) {
    let mut buf = vec![0u8; RECV_BUFFER_SIZE];

    loop {
        let (len, peer) = match socket.recv_from(&mut buf).await {
            Ok(received) => received,
            Err(e) => {
                // e.g. ICMP unreachable surfacing from an earlier send.
                warn!(error = %e, "recv_from failed");
                continue;
            }
        };

        let datagram = Datagram {
            peer,
            payload: Bytes::copy_from_slice(&buf[..len]),
        };

        if inbound_tx.send(datagram).is_err() {
            debug!("box office closed, receiver stopping");
            break;
        }
    }
}

/// Write reply datagrams until every sender handle is dropped.
pub async fn run_sender(socket: Arc<UdpSocket>, mut outbound_rx: OutboundRx) {
    while let Some(datagram) = outbound_rx.recv().await {
        if let Err(e) = socket.send_to(&datagram.payload, datagram.peer).await {
            warn!(peer = %datagram.peer, error = %e, "send_to failed");
        }
    }

    debug!("outbound channel closed, sender stopping");
}

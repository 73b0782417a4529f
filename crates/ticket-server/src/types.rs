//! Shared types for the ticket server.
//!
//! This module defines:
//! - `Datagram`: one UDP payload and the peer it came from / goes to
//! - channel aliases between the socket tasks and the box-office task

use std::net::SocketAddr;

use bytes::Bytes;
use tokio::sync::mpsc;

/// A single datagram and its remote peer.
#[derive(Debug, Clone)]
pub struct Datagram {
    pub peer: SocketAddr,
    pub payload: Bytes,
}

/// Channel from the receiver task → box-office task.
pub type InboundTx = mpsc::UnboundedSender<Datagram>;
pub type InboundRx = mpsc::UnboundedReceiver<Datagram>;

/// Channel from the box-office task → sender task.
pub type OutboundTx = mpsc::UnboundedSender<Datagram>;
pub type OutboundRx = mpsc::UnboundedReceiver<Datagram>;

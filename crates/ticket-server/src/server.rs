//! UDP socket and top-level server wiring.
//!
//! This module:
//! - Binds the configured address/port.
//! - Spawns:
//!   - a single box-office task that owns all ticket state,
//!   - a sender task writing replies back to the socket,
//! - and runs the receiver loop on the calling task.
//!
//! The per-datagram logic and the box-office loop live in `dispatcher`
//! and `box_office_task` respectively.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use ticket_core::{BoxOffice, Inventory};
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tracing::info;

use crate::box_office_task;
use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::transport;
use crate::types::{InboundRx, InboundTx, OutboundRx, OutboundTx};

/// A bound, not yet running, ticket server.
#[derive(Debug)]
pub struct Server {
    socket: Arc<UdpSocket>,
    dispatcher: Dispatcher,
}

impl Server {
    /// Bind the socket and build the box office.
    pub async fn bind(config: &Config, inventory: Inventory) -> anyhow::Result<Self> {
        config.validate()?;

        let addr = config.socket_addr();
        let socket = UdpSocket::bind(addr)
            .await
            .with_context(|| format!("failed to bind UDP socket on {}", addr))?;

        info!(
            addr = %socket.local_addr()?,
            events = inventory.len(),
            timeout_secs = config.timeout,
            max_tickets = config.max_tickets,
            "ticket server bound"
        );

        let box_office = BoxOffice::new(inventory, config.box_office_settings());

        Ok(Server {
            socket: Arc::new(socket),
            dispatcher: Dispatcher::new(box_office),
        })
    }

    /// Address actually bound (useful with port 0).
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Serve until the box-office task stops.
    pub async fn run(self) -> anyhow::Result<()> {
        let (inbound_tx, inbound_rx): (InboundTx, InboundRx) = mpsc::unbounded_channel();
        let (outbound_tx, outbound_rx): (OutboundTx, OutboundRx) = mpsc::unbounded_channel();

        let box_office = tokio::spawn(box_office_task::run_box_office_loop(
            self.dispatcher,
            inbound_rx,
            outbound_tx,
        ));
        let sender = tokio::spawn(transport::run_sender(self.socket.clone(), outbound_rx));

        transport::run_receiver(self.socket, inbound_tx).await;

        box_office.await.context("box office task failed")?;
        sender.await.context("sender task failed")?;
        Ok(())
    }
}

/// Bind and run a server with the given configuration.
pub async fn run(config: Config, inventory: Inventory) -> anyhow::Result<()> {
    Server::bind(&config, inventory).await?.run().await
}

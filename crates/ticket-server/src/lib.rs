//! ticket-server
//!
//! UDP box-office server: datagram dispatch, socket tasks and the
//! single task that owns all ticket state.

pub mod config;
pub mod dispatcher;
pub mod server;
pub mod types;

// these are internal modules, not re-exported
mod box_office_task;
mod transport;

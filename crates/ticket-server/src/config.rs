//! Configuration for the ticket server.
//!
//! Everything comes from the command line, with a couple of environment
//! overrides for deployment knobs:
//!
//! - `-f, --file`    inventory listing (required)
//! - `-p, --port`    UDP port (default: 2022)
//! - `-t, --timeout` reservation hold in seconds (default: 5)
//! - `--bind`        / `TICKET_BIND_ADDR`   (default: "0.0.0.0")
//! - `--max-tickets` / `TICKET_MAX_TICKETS` (default: largest count whose
//!   Tickets reply fits one datagram)

use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{ensure, Context};
use clap::Parser;
use ticket_core::{BoxOfficeSettings, Inventory};
use ticket_protocol::max_tickets_per_datagram;

pub const DEFAULT_PORT: u16 = 2022;
pub const DEFAULT_TIMEOUT_SECS: u32 = 5;
pub const MIN_TIMEOUT_SECS: u32 = 1;
pub const MAX_TIMEOUT_SECS: u32 = 86_400;

/// Server configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "ticket-server")]
#[command(about = "UDP box office selling tickets from a fixed event inventory")]
pub struct Config {
    /// Inventory listing: description and ticket count on alternating lines.
    #[arg(short = 'f', long = "file")]
    pub events_file: PathBuf,

    /// UDP port to listen on.
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_PORT,
        value_parser = clap::value_parser!(u16).range(1024..)
    )]
    pub port: u16,

    /// Seconds a reservation is held before it expires.
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u32).range(MIN_TIMEOUT_SECS as i64..=MAX_TIMEOUT_SECS as i64)
    )]
    pub timeout: u32,

    /// IP address / interface to bind to.
    #[arg(long = "bind", env = "TICKET_BIND_ADDR", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub bind_addr: IpAddr,

    /// Largest ticket count a single reservation may ask for.
    #[arg(
        long = "max-tickets",
        env = "TICKET_MAX_TICKETS",
        default_value_t = max_tickets_per_datagram(),
        value_parser = clap::value_parser!(u16).range(1..=max_tickets_per_datagram() as i64)
    )]
    pub max_tickets: u16,
}

impl Config {
    /// Checks that clap enforces on the command line, repeated for
    /// configs built in code.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            (MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&self.timeout),
            "timeout must be within {}..={} seconds, got {}",
            MIN_TIMEOUT_SECS,
            MAX_TIMEOUT_SECS,
            self.timeout
        );
        ensure!(
            (1..=max_tickets_per_datagram()).contains(&self.max_tickets),
            "max tickets must be within 1..={}, got {}",
            max_tickets_per_datagram(),
            self.max_tickets
        );
        Ok(())
    }

    /// Convenience: `addr:port` socket address.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    pub fn box_office_settings(&self) -> BoxOfficeSettings {
        BoxOfficeSettings {
            timeout: Duration::from_secs(u64::from(self.timeout)),
            max_tickets_per_request: self.max_tickets,
        }
    }

    /// Read and parse the inventory listing.
    pub fn load_inventory(&self) -> anyhow::Result<Inventory> {
        let path = &self.events_file;
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read inventory file {}", path.display()))?;

        Inventory::from_listing(&text)
            .with_context(|| format!("invalid inventory file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config, clap::Error> {
        Config::try_parse_from(std::iter::once("ticket-server").chain(args.iter().copied()))
    }

    #[test]
    fn defaults() {
        let config = parse(&["-f", "events.txt"]).unwrap();
        assert_eq!(config.events_file, PathBuf::from("events.txt"));
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.max_tickets, max_tickets_per_datagram());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn file_is_required() {
        assert!(parse(&["-p", "3000"]).is_err());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(parse(&["-f", "e", "-t", "0"]).is_err());
        assert!(parse(&["-f", "e", "-t", "86401"]).is_err());
        assert!(parse(&["-f", "e", "-p", "80"]).is_err());
        assert!(parse(&["-f", "e", "-p", "65536"]).is_err());
        assert!(parse(&["-f", "e", "--max-tickets", "0"]).is_err());
        assert!(parse(&["-f", "e", "-t", "abc"]).is_err());
    }

    #[test]
    fn explicit_values() {
        let config = parse(&["-f", "e", "-p", "4000", "-t", "777", "--bind", "127.0.0.1"]).unwrap();
        assert_eq!(config.socket_addr(), "127.0.0.1:4000".parse::<SocketAddr>().unwrap());
        assert_eq!(
            config.box_office_settings().timeout,
            Duration::from_secs(777)
        );
    }

    #[test]
    fn validate_catches_hand_built_configs() {
        let mut config = parse(&["-f", "e"]).unwrap();
        config.max_tickets = max_tickets_per_datagram() + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_inventory_file_is_an_error() {
        let config = parse(&["-f", "/definitely/not/here"]).unwrap();
        let err = config.load_inventory().unwrap_err();
        assert!(err.to_string().contains("failed to read inventory file"));
    }
}

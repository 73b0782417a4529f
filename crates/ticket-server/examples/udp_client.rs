use std::env;
use std::error::Error;
use std::io::{self, Write};
use std::time::Duration;

use ticket_core::{Cookie, Request, Response, COOKIE_LEN};
use ticket_protocol::{decode_response, encode_request};
use tokio::net::UdpSocket;
use tokio::time::timeout;

/// Parse one command line into a request.
fn parse_command(line: &str) -> Option<Request> {
    let mut parts = line.split_whitespace();
    let request = match parts.next()? {
        "events" => Request::GetEvents,
        "reserve" => {
            let event_id = parts.next()?.parse().ok()?;
            let ticket_count = parts.next()?.parse().ok()?;
            Request::reservation(event_id, ticket_count)
        }
        "tickets" => {
            let reservation_id = parts.next()?.parse().ok()?;
            let cookie: [u8; COOKIE_LEN] = parts.next()?.as_bytes().try_into().ok()?;
            Request::tickets(reservation_id, Cookie::from_bytes(cookie))
        }
        _ => return None,
    };

    // Trailing junk is a typo, not something to silently ignore.
    match parts.next() {
        Some(_) => None,
        None => Some(request),
    }
}

fn print_response(response: &Response) {
    match response {
        Response::Events(listings) => {
            if listings.is_empty() {
                println!("<< no events available");
            }
            for l in listings {
                println!("<< event {} ({} left): {}", l.event_id, l.tickets_available, l.description);
            }
        }
        Response::Reservation(r) => {
            println!(
                "<< reservation {} for {} x event {}, expires at {}",
                r.reservation_id, r.ticket_count, r.event_id, r.expiration_time
            );
            println!(
                "<< cookie {}",
                String::from_utf8_lossy(r.cookie.as_bytes())
            );
        }
        Response::Tickets(batch) => {
            let codes: Vec<String> = batch.tickets.iter().map(|t| t.to_string()).collect();
            println!("<< reservation {} tickets: {}", batch.reservation_id, codes.join(" "));
        }
        Response::BadRequest { id } => println!("<< bad request ({})", id),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Where to send: env override or default.
    let addr = env::var("TICKET_CLIENT_ADDR").unwrap_or_else(|_| "127.0.0.1:2022".to_string());

    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    socket.connect(&addr).await?;
    println!("Sending to {}.", addr);
    println!("Commands:");
    println!("  events");
    println!("  reserve <event-id> <count>");
    println!("  tickets <reservation-id> <cookie>");
    println!("Type 'quit' or 'exit' to leave.\n");

    let stdin = io::stdin();
    let mut buf = vec![0u8; 65_536];

    loop {
        print!(">> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            println!("\nEOF on stdin, exiting client.");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
            println!("Exiting client.");
            break;
        }

        let Some(request) = parse_command(trimmed) else {
            eprintln!("Could not parse command.");
            continue;
        };

        let mut payload = Vec::with_capacity(64);
        encode_request(&request, &mut payload);
        socket.send(&payload).await?;

        // An events listing may come back in several datagrams; keep
        // reading until the line goes quiet.
        let mut replies = 0;
        loop {
            let len = match timeout(Duration::from_millis(300), socket.recv(&mut buf)).await {
                Ok(Ok(len)) => len,
                Ok(Err(e)) => {
                    eprintln!("Receive error: {}", e);
                    break;
                }
                Err(_) => break,
            };

            replies += 1;
            match decode_response(&buf[..len]) {
                Ok(response) => print_response(&response),
                Err(e) => eprintln!("Undecodable reply: {}", e),
            }
        }

        if replies == 0 {
            println!("<< (no reply)");
        }
    }

    Ok(())
}

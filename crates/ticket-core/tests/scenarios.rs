// crates/ticket-core/tests/scenarios.rs
use std::collections::HashSet;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use ticket_core::{
    BoxOffice, BoxOfficeSettings, Cookie, Inventory, Request, ReservationGranted, Response,
    TicketCode, COOKIE_LEN,
};
use ticket_protocol::decode_request;

const TIMEOUT: Duration = Duration::from_secs(5);

fn at(secs: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(secs)
}

fn office_with(entries: &[(&str, u16)]) -> BoxOffice {
    let inventory = Inventory::new(entries.iter().copied()).expect("valid inventory");
    BoxOffice::new(
        inventory,
        BoxOfficeSettings {
            timeout: TIMEOUT,
            max_tickets_per_request: 1_000,
        },
    )
}

fn reserve(office: &mut BoxOffice, event_id: u32, count: u16, now: SystemTime) -> ReservationGranted {
    match office.process_request(Request::reservation(event_id, count), now) {
        Response::Reservation(granted) => granted,
        other => panic!("expected reservation, got {:?}", other),
    }
}

fn claim(office: &mut BoxOffice, id: u32, cookie: Cookie, now: SystemTime) -> Response {
    office.process_request(Request::tickets(id, cookie), now)
}

fn listed_ids(office: &mut BoxOffice) -> Vec<u32> {
    match office.process_request(Request::GetEvents, at(0)) {
        Response::Events(listings) => listings.iter().map(|l| l.event_id).collect(),
        other => panic!("expected events, got {:?}", other),
    }
}

#[test]
fn single_event_reserve_confirm_then_oversell() {
    let mut office = office_with(&[("Rock concert", 10)]);

    let granted = reserve(&mut office, 0, 5, at(100));
    assert_eq!(granted.ticket_count, 5);
    assert_eq!(office.available(0), Some(5));

    let Response::Tickets(batch) = claim(&mut office, granted.reservation_id, granted.cookie, at(101))
    else {
        panic!("expected tickets");
    };
    assert_eq!(batch.tickets.len(), 5);
    let distinct: HashSet<TicketCode> = batch.tickets.iter().copied().collect();
    assert_eq!(distinct.len(), 5);

    assert_eq!(
        office.process_request(Request::reservation(0, 6), at(102)),
        Response::bad_request(0)
    );
    assert_eq!(office.available(0), Some(5));
}

#[test]
fn empty_inventory_lists_nothing_and_refuses_everything() {
    let mut office = office_with(&[]);

    assert_eq!(
        office.process_request(Request::GetEvents, at(0)),
        Response::Events(Vec::new())
    );

    for event_id in [0, 1, 42, 999_999] {
        assert_eq!(
            office.process_request(Request::reservation(event_id, 1), at(0)),
            Response::bad_request(event_id)
        );
    }

    let cookie = Cookie::from_bytes([b'!'; COOKIE_LEN]);
    assert_eq!(claim(&mut office, 1_000_000, cookie, at(0)), Response::bad_request(1_000_000));
}

#[test]
fn unconfirmed_reservation_expires_and_returns_tickets() {
    let mut office = office_with(&[("Ballet", 3)]);

    let granted = reserve(&mut office, 0, 1, at(10));
    assert_eq!(office.available(0), Some(2));
    assert_eq!(office.next_expiry(), Some(at(15)));

    assert_eq!(office.expire_due(at(15)), vec![granted.reservation_id]);
    assert_eq!(office.available(0), Some(3));

    assert_eq!(
        claim(&mut office, granted.reservation_id, granted.cookie, at(16)),
        Response::bad_request(granted.reservation_id)
    );

    // Expiry never double-counts.
    assert!(office.expire_due(at(1_000)).is_empty());
    assert_eq!(office.available(0), Some(3));
}

#[test]
fn late_claim_is_refused_before_the_scheduler_fires() {
    let mut office = office_with(&[("Ballet", 3)]);
    let granted = reserve(&mut office, 0, 2, at(10));

    assert_eq!(
        claim(&mut office, granted.reservation_id, granted.cookie, at(20)),
        Response::bad_request(granted.reservation_id)
    );

    // The hold is still returned exactly once when expiry runs.
    assert_eq!(office.expire_due(at(20)).len(), 1);
    assert_eq!(office.available(0), Some(3));
}

#[test]
fn replayed_claim_returns_identical_tickets() {
    let mut office = office_with(&[("Opera", 20)]);
    let granted = reserve(&mut office, 0, 4, at(0));

    let first = claim(&mut office, granted.reservation_id, granted.cookie, at(1));
    let second = claim(&mut office, granted.reservation_id, granted.cookie, at(60));
    assert!(matches!(first, Response::Tickets(_)));
    assert_eq!(first, second);

    // Confirmed holds are not returned to the inventory.
    assert!(office.expire_due(at(1_000)).is_empty());
    assert_eq!(office.available(0), Some(16));
}

#[test]
fn sold_out_events_are_not_listed() {
    let mut office = office_with(&[("A", 2), ("B", 0), ("C", 1)]);
    assert_eq!(listed_ids(&mut office), vec![0, 2]);

    reserve(&mut office, 2, 1, at(0));
    assert_eq!(listed_ids(&mut office), vec![0]);

    office.expire_due(at(5));
    assert_eq!(listed_ids(&mut office), vec![0, 2]);
}

#[test]
fn ticket_codes_are_unique_across_reservations() {
    let mut office = office_with(&[("A", 500), ("B", 500)]);
    let mut seen = HashSet::new();

    for round in 0..50u64 {
        let event_id = (round % 2) as u32;
        let granted = reserve(&mut office, event_id, 7, at(round));
        let Response::Tickets(batch) =
            claim(&mut office, granted.reservation_id, granted.cookie, at(round))
        else {
            panic!("expected tickets");
        };
        for code in batch.tickets {
            assert!(seen.insert(code), "duplicate ticket code {}", code);
        }
    }
    assert_eq!(seen.len(), 350);
}

#[test]
fn malformed_datagrams_never_reach_the_box_office() {
    let mut office = office_with(&[("A", 5)]);
    reserve(&mut office, 0, 1, at(0));

    let garbage: [&[u8]; 6] = [
        &[0],
        &[2],
        &[1, 3],
        &[3, 0, 0, 0, 0],
        &[3, 0, 0, 0, 0, 0, 1, 0],
        &[255, 0, 0, 0, 0],
    ];

    for datagram in garbage {
        if let Ok(request) = decode_request(datagram) {
            office.process_request(request, at(1));
        }
    }

    assert_eq!(office.available(0), Some(4));
    assert_eq!(office.ledger().len(), 1);
}

// tests/extract_calendar.rs
use std::fs;

use econ_calendar_service::calendar::extract::extract_events;
use econ_calendar_service::Impact;

#[test]
fn parses_calendar_fixture() {
    let html = fs::read_to_string("tests/fixtures/calendar_day.html").expect("fixture");
    let events = extract_events(&html).expect("ok");

    // Day-breaker row, the row without a currency cell, and the row with a
    // blank title are dropped; the four complete rows survive, in order.
    assert_eq!(events.len(), 4);
    assert_eq!(events[0].title, "Non-Farm Employment Change");
    assert_eq!(events[1].title, "Unemployment Rate");
    assert_eq!(events[2].title, "Ivey PMI");
    assert_eq!(events[3].title, "French Bank Holiday");
}

#[test]
fn fixture_impacts_follow_the_marker_classes() {
    let html = fs::read_to_string("tests/fixtures/calendar_day.html").expect("fixture");
    let events = extract_events(&html).expect("ok");

    assert_eq!(events[0].impact, Impact::High);
    assert_eq!(events[1].impact, Impact::High);
    assert_eq!(events[2].impact, Impact::Medium);
    assert_eq!(events[3].impact, Impact::Low);
}

#[test]
fn fixture_optional_cells_map_blank_to_none() {
    let html = fs::read_to_string("tests/fixtures/calendar_day.html").expect("fixture");
    let events = extract_events(&html).expect("ok");

    // Whitespace-only actual on the Ivey PMI row.
    assert_eq!(events[2].actual, None);
    assert_eq!(events[2].forecast.as_deref(), Some("52.1"));
    assert_eq!(events[2].previous.as_deref(), Some("53.5"));

    // Holiday row carries no figures at all.
    assert_eq!(events[3].actual, None);
    assert_eq!(events[3].forecast, None);
    assert_eq!(events[3].previous, None);
}

#[test]
fn every_extracted_event_satisfies_the_mandatory_field_invariant() {
    let html = fs::read_to_string("tests/fixtures/calendar_day.html").expect("fixture");
    let events = extract_events(&html).expect("ok");

    assert!(events.iter().all(|e| !e.time.is_empty()));
    assert!(events.iter().all(|e| !e.currency.is_empty()));
    assert!(events.iter().all(|e| !e.title.is_empty()));
    assert!(events
        .iter()
        .all(|e| matches!(e.impact, Impact::Low | Impact::Medium | Impact::High)));
}

use serde_json::json;

use earnings_digest::service::calendar::{extract_first_date, load_saved_calendar, CalendarError};

#[test]
fn extracts_date_from_a_list_payload() {
    let payload = json!({
        "data": [{
            "attributes": {
                "earningsDate": "2025-11-04T21:30:00",
                "company": "Upstart Holdings",
            }
        }]
    });

    let date = extract_first_date(&payload).expect("should extract");
    assert_eq!(date.format("%Y-%m-%d").to_string(), "2025-11-04");
}

#[test]
fn extracts_date_from_an_object_payload() {
    let payload = json!({"data": {"reportDate": "11/04/2025"}});
    let date = extract_first_date(&payload).expect("should extract");
    assert_eq!(date.format("%Y-%m-%d").to_string(), "2025-11-04");
}

#[test]
fn later_fields_are_tried_when_earlier_ones_fail_to_parse() {
    let payload = json!({
        "data": [{
            "attributes": {
                "earningsDate": "sometime next week",
                "date": "2025-11-05",
            }
        }]
    });

    let date = extract_first_date(&payload).expect("should fall through");
    assert_eq!(date.format("%Y-%m-%d").to_string(), "2025-11-05");
}

#[test]
fn missing_date_yields_none() {
    assert_eq!(extract_first_date(&json!({"data": []})), None);
    assert_eq!(extract_first_date(&json!({"data": [{"attributes": {}}]})), None);
    assert_eq!(extract_first_date(&json!({})), None);
}

#[test]
fn saved_calendar_reload_drops_unparseable_dates() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("earnings_calendar.json");
    std::fs::write(
        &path,
        r#"[
  {"symbol": "AAPL", "earnings_date": "2025-10-30T00:00:00", "company": "Apple"},
  {"symbol": "BAD", "earnings_date": "sometime soon"}
]"#,
    )
    .expect("write calendar");

    let events = load_saved_calendar(&path).expect("load");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].symbol, "AAPL");
    assert_eq!(events[0].company.as_deref(), Some("Apple"));
}

#[test]
fn missing_calendar_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nope.json");
    let err = load_saved_calendar(&path).expect_err("missing file must fail");
    assert!(matches!(err, CalendarError::NotFound(_)), "got: {err}");
}

use serde_json::json;

use earnings_digest::service::transcripts::{extract_transcript_text, select_transcript_id};

#[test]
fn select_transcript_id_skips_slide_decks() {
    let items = vec![
        json!({
            "id": "111",
            "attributes": {
                "title": "Upstart Holdings Q3 2025 Earnings Call Slide Deck",
                "contentType": "slideshow",
            }
        }),
        json!({
            "id": "222",
            "attributes": {
                "title": "Upstart Holdings Q3 2025 Earnings Call Transcript",
                "contentType": "transcript",
            }
        }),
    ];

    assert_eq!(select_transcript_id(&items), Some("222".to_string()));
}

#[test]
fn select_transcript_id_is_order_stable() {
    let items = vec![
        json!({
            "id": "1",
            "attributes": {"title": "Acme Q1 Earnings Call Transcript"}
        }),
        json!({
            "id": "2",
            "attributes": {"title": "Acme Q2 Earnings Call Transcript"}
        }),
    ];

    assert_eq!(select_transcript_id(&items), Some("1".to_string()));
}

#[test]
fn select_transcript_id_returns_none_when_no_transcript_like_items() {
    let items = vec![json!({
        "id": "333",
        "attributes": {
            "title": "Company Overview Presentation",
            "contentType": "article",
        }
    })];

    assert_eq!(select_transcript_id(&items), None);
}

#[test]
fn select_transcript_id_accepts_numeric_ids() {
    let items = vec![json!({
        "id": 4690123,
        "attributes": {"title": "Acme Q3 Earnings Call Transcript"}
    })];

    assert_eq!(select_transcript_id(&items), Some("4690123".to_string()));
}

#[test]
fn transcript_text_prefers_nested_attributes_content() {
    let details = json!({
        "data": {
            "attributes": {
                "content": "Operator: Good afternoon.",
            }
        },
        "content": "top-level should lose",
    });

    assert_eq!(extract_transcript_text(&details), "Operator: Good afternoon.");
}

#[test]
fn transcript_text_falls_back_to_top_level_fields() {
    let details = json!({"transcript": "Full call text."});
    assert_eq!(extract_transcript_text(&details), "Full call text.");
}

#[test]
fn transcript_text_serializes_unknown_shapes() {
    let details = json!({"unexpected": {"shape": true}});
    let text = extract_transcript_text(&details);
    assert!(text.contains("unexpected"), "raw payload should be preserved: {text}");
}

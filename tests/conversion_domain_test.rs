use std::str::FromStr;

use soundpress::domain::{
    sanitize_title, ArtifactKey, Conversion, ConversionId, ConversionStatus, SessionId,
};

#[test]
fn given_status_strings_when_parsing_then_round_trips() {
    for status in [
        ConversionStatus::Pending,
        ConversionStatus::ConvertingMp3,
        ConversionStatus::ConvertingText,
        ConversionStatus::Completed,
        ConversionStatus::Failed,
    ] {
        let parsed = ConversionStatus::from_str(status.as_str()).unwrap();
        assert_eq!(parsed, status);
    }
}

#[test]
fn given_unknown_status_string_when_parsing_then_returns_error() {
    assert!(ConversionStatus::from_str("queued").is_err());
    assert!(ConversionStatus::from_str("PENDING").is_err());
}

#[test]
fn given_transition_graph_when_checking_legal_edges_then_accepted() {
    use ConversionStatus::*;
    assert!(Pending.can_transition_to(ConvertingMp3));
    assert!(ConvertingMp3.can_transition_to(Completed));
    assert!(ConvertingMp3.can_transition_to(Failed));
    assert!(Completed.can_transition_to(ConvertingText));
    assert!(ConvertingText.can_transition_to(Completed));
    assert!(ConvertingText.can_transition_to(Failed));
}

#[test]
fn given_transition_graph_when_checking_illegal_edges_then_rejected() {
    use ConversionStatus::*;
    assert!(!Pending.can_transition_to(Completed));
    assert!(!Pending.can_transition_to(ConvertingText));
    assert!(!Completed.can_transition_to(ConvertingMp3));
    assert!(!Completed.can_transition_to(Pending));
    assert!(!Failed.can_transition_to(Pending));
    assert!(!Failed.can_transition_to(ConvertingMp3));
    assert!(!Failed.can_transition_to(ConvertingText));
    assert!(!ConvertingText.can_transition_to(ConvertingMp3));
}

#[test]
fn given_terminal_statuses_when_checking_then_only_completed_and_failed() {
    assert!(ConversionStatus::Completed.is_terminal());
    assert!(ConversionStatus::Failed.is_terminal());
    assert!(!ConversionStatus::Pending.is_terminal());
    assert!(!ConversionStatus::ConvertingMp3.is_terminal());
    assert!(!ConversionStatus::ConvertingText.is_terminal());
}

#[test]
fn given_title_with_punctuation_when_sanitizing_then_safe_characters_remain() {
    assert_eq!(sanitize_title("Cool Video! #1"), "Cool Video 1");
}

#[test]
fn given_title_with_hyphens_when_sanitizing_then_hyphens_survive() {
    assert_eq!(sanitize_title("lo-fi beats - vol 2"), "lo-fi beats - vol 2");
}

#[test]
fn given_overlong_title_when_sanitizing_then_capped_at_fifty_chars() {
    let raw = "a".repeat(120);
    let sanitized = sanitize_title(&raw);
    assert_eq!(sanitized.chars().count(), 50);
}

#[test]
fn given_messy_whitespace_when_sanitizing_then_runs_collapse() {
    assert_eq!(sanitize_title("  spaced   out  "), "spaced out");
}

#[test]
fn given_only_unsafe_characters_when_sanitizing_then_result_is_empty() {
    assert_eq!(sanitize_title("!!!###"), "");
    assert_eq!(sanitize_title("___"), "");
}

#[test]
fn given_fullwidth_unicode_when_sanitizing_then_normalized_first() {
    assert_eq!(sanitize_title("Ｃool video"), "Cool video");
}

#[test]
fn given_record_id_and_filename_when_building_key_then_record_prefixed() {
    let id = ConversionId::new();
    let key = ArtifactKey::new(&id, "track.mp3");

    assert_eq!(key.as_str(), format!("{}/track.mp3", id.as_uuid()));
    assert_eq!(key.filename(), "track.mp3");
}

#[test]
fn given_conversion_id_when_shortened_then_eight_hex_chars() {
    let id = ConversionId::new();
    let short = id.short();
    assert_eq!(short.len(), 8);
    assert!(short.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn given_new_conversion_when_created_then_pending_with_empty_results() {
    let conversion = Conversion::new(
        SessionId::new("session-1"),
        "https://example.com/watch?v=abc".to_string(),
    );

    assert_eq!(conversion.status, ConversionStatus::Pending);
    assert!(conversion.title.is_none());
    assert!(conversion.audio_artifact.is_none());
    assert!(conversion.transcript.is_none());
    assert!(conversion.error_message.is_none());
    assert_eq!(conversion.created_at, conversion.updated_at);
}

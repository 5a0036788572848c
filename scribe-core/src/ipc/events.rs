//! Event types published by the engine when the session changes.
//!
//! Hosts that prefer push over polling subscribe with
//! `ScribeEngine::subscribe_updates()` and refresh their view on each event.

use serde::{Deserialize, Serialize};

use super::view::Speaker;

/// Emitted once per accepted utterance, after findings have been extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUpdateEvent {
    /// Session revision after the utterance was applied (1-based).
    pub seq: u64,
    pub speaker: Speaker,
    /// Trimmed utterance text.
    pub text: String,
    /// Findings created by this utterance, in vocabulary order.
    pub new_findings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_event_serializes_with_camel_case_fields() {
        let event = SessionUpdateEvent {
            seq: 3,
            speaker: Speaker::Provider,
            text: "Any cough or sore throat?".into(),
            new_findings: vec!["cough".into(), "sore throat".into()],
        };

        let json = serde_json::to_value(&event).expect("serialize update event");
        assert_eq!(json["seq"], 3);
        assert_eq!(json["speaker"], "provider");
        assert_eq!(json["newFindings"][1], "sore throat");

        let round_trip: SessionUpdateEvent =
            serde_json::from_value(json).expect("deserialize update event");
        assert_eq!(round_trip, event);
    }
}

//! Session snapshot types pulled by the presentation host.
//!
//! Everything except `TranscriptLine` and `Finding` is recomputed from scratch
//! on every `ScribeEngine::current_view()` call and never stored.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Transcript
// ---------------------------------------------------------------------------

/// Who produced an utterance, as guessed by the speaker classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Patient,
    Provider,
}

impl Speaker {
    pub fn as_str(self) -> &'static str {
        match self {
            Speaker::Patient => "patient",
            Speaker::Provider => "provider",
        }
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One accepted utterance. Appended in arrival order, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptLine {
    pub speaker: Speaker,
    /// Utterance text, trimmed.
    pub text: String,
}

// ---------------------------------------------------------------------------
// Evidence
// ---------------------------------------------------------------------------

/// A finding asserted by the transcript. Keyed by `name`; at most one per name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub name: String,
    /// Certainty in [0.0, 1.0]. Fixed at creation.
    pub certainty: f64,
}

// ---------------------------------------------------------------------------
// Derived results
// ---------------------------------------------------------------------------

/// A scored diagnosis candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diff {
    pub label: String,
    /// Independent sigmoid of the diagnosis logit, strictly inside (0, 1).
    pub score: f64,
    /// Findings that touched this diagnosis' logit, in finding order.
    pub rationale: Vec<String>,
}

/// A suggested question targeting a finding not yet seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUp {
    /// The targeted finding name.
    pub id: String,
    pub question_text: String,
    pub target_findings: Vec<String>,
    /// Always `false` today; reserved for a "mark as asked" interaction.
    pub asked: bool,
    /// Always `false` today; reserved for a "mark as answered" interaction.
    pub answered: bool,
}

/// Lab vs. imaging classification of a suggested order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    Lab,
    Imaging,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub name: String,
    pub kind: OrderKind,
}

/// Four-section clinical note. Sections may be empty strings; placeholders
/// for blank sections are the renderer's job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Soap {
    pub subjective: String,
    pub objective: String,
    pub assessment: String,
    pub plan: String,
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Immutable snapshot returned by `ScribeEngine::current_view()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    /// Number of accepted utterances when the snapshot was taken.
    pub revision: u64,
    pub transcript: Vec<TranscriptLine>,
    pub findings: Vec<Finding>,
    pub followups: Vec<FollowUp>,
    /// All diagnoses, score descending, ties by label ascending.
    pub diffs: Vec<Diff>,
    pub orders: Vec<Order>,
    pub soap: Soap,
}

impl SessionView {
    /// Pretty JSON for exports and debugging.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speaker_and_order_kind_serialize_lowercase() {
        assert_eq!(
            serde_json::to_value(Speaker::Provider).expect("serialize speaker"),
            "provider"
        );
        assert_eq!(
            serde_json::to_value(OrderKind::Imaging).expect("serialize kind"),
            "imaging"
        );
        let err = serde_json::from_str::<Speaker>(r#""Patient""#);
        assert!(err.is_err(), "expected invalid casing to fail");
    }

    #[test]
    fn followup_serializes_with_camel_case_fields() {
        let followup = FollowUp {
            id: "fever".into(),
            question_text: "Have you had a measured fever?".into(),
            target_findings: vec!["fever".into()],
            asked: false,
            answered: false,
        };

        let json = serde_json::to_value(&followup).expect("serialize followup");
        assert_eq!(json["id"], "fever");
        assert_eq!(json["questionText"], "Have you had a measured fever?");
        assert_eq!(json["targetFindings"][0], "fever");
        assert_eq!(json["asked"], false);
        assert_eq!(json["answered"], false);
    }

    #[test]
    fn session_view_round_trips_through_json() {
        let view = SessionView {
            revision: 2,
            transcript: vec![TranscriptLine {
                speaker: Speaker::Patient,
                text: "I have a cough.".into(),
            }],
            findings: vec![Finding {
                name: "cough".into(),
                certainty: 0.7,
            }],
            followups: vec![],
            diffs: vec![Diff {
                label: "Influenza".into(),
                score: 0.38,
                rationale: vec!["cough".into()],
            }],
            orders: vec![Order {
                name: "CXR PA/LAT".into(),
                kind: OrderKind::Imaging,
            }],
            soap: Soap {
                subjective: "I have a cough.".into(),
                ..Soap::default()
            },
        };

        let raw = view.to_json_pretty().expect("serialize view");
        let back: SessionView = serde_json::from_str(&raw).expect("deserialize view");
        assert_eq!(back, view);

        let json: serde_json::Value = serde_json::from_str(&raw).expect("parse view");
        assert_eq!(json["transcript"][0]["speaker"], "patient");
        assert_eq!(json["orders"][0]["kind"], "imaging");
        assert_eq!(json["soap"]["subjective"], "I have a cough.");
    }
}

//! SOAP note composition.
//!
//! | Section | Source |
//! |---------|--------|
//! | Subjective | patient utterances, space-joined, transcript order |
//! | Objective | `- {name} (c={certainty:.2})` per finding |
//! | Assessment | `{label} ({score%})` for the top diffs |
//! | Plan | `- {order}` per planned order |
//!
//! Blank sections are returned as empty strings.

use crate::engine::EngineConfig;
use crate::ipc::view::{Diff, Finding, Soap, Speaker, TranscriptLine};
use crate::knowledge::KnowledgeBase;
use crate::planning::plan_orders;

pub fn subjective(transcript: &[TranscriptLine]) -> String {
    transcript
        .iter()
        .filter(|line| line.speaker == Speaker::Patient)
        .map(|line| line.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn objective(findings: &[Finding]) -> String {
    findings
        .iter()
        .map(|f| format!("- {} (c={:.2})", f.name, f.certainty))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn assessment(diffs: &[Diff], depth: usize) -> String {
    diffs
        .iter()
        .take(depth)
        .map(|d| format!("{} ({}%)", d.label, percent(d.score)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Score as a whole percentage, rounded half away from zero.
pub fn percent(score: f64) -> i64 {
    (score * 100.0).round() as i64
}

pub fn compose_soap(
    kb: &KnowledgeBase,
    transcript: &[TranscriptLine],
    findings: &[Finding],
    diffs: &[Diff],
    config: &EngineConfig,
) -> Soap {
    let plan = plan_orders(kb, diffs, config)
        .iter()
        .map(|o| format!("- {}", o.name))
        .collect::<Vec<_>>()
        .join("\n");

    Soap {
        subjective: subjective(transcript),
        objective: objective(findings),
        assessment: assessment(diffs, config.assessment_depth),
        plan,
    }
}

//! Diagnosis scoring.
//!
//! Each diagnosis gets an independent logistic score:
//!
//! ```text
//! logit = prior
//!       + Σ positive          for weighted findings with certainty > threshold
//!       + Σ negative · damping for weighted findings at or below threshold
//! score = sigmoid(logit)
//! ```
//!
//! Scores are not normalised across diagnoses and need not sum to 1.

use std::cmp::Ordering;

use crate::engine::EngineConfig;
use crate::ipc::view::{Diff, Finding};
use crate::knowledge::{DiagnosisDefinition, KnowledgeBase};

/// Largest score below 1.0, so saturated logits stay inside (0, 1).
const SCORE_CEIL: f64 = 1.0 - f64::EPSILON;

/// Logistic function clamped to the open interval (0, 1).
pub fn sigmoid(x: f64) -> f64 {
    let s = 1.0 / (1.0 + (-x).exp());
    s.clamp(f64::MIN_POSITIVE, SCORE_CEIL)
}

/// Logit and rationale for one diagnosis given the current findings.
pub fn diagnosis_logit(
    dx: &DiagnosisDefinition,
    findings: &[Finding],
    config: &EngineConfig,
) -> (f64, Vec<String>) {
    let mut logit = dx.prior;
    let mut rationale = Vec::new();
    for f in findings {
        if let Some(w) = dx.weight_for(&f.name) {
            logit += if f.certainty > config.certainty_threshold {
                w.positive
            } else {
                w.negative * config.negative_damping
            };
            rationale.push(f.name.clone());
        }
    }
    (logit, rationale)
}

/// Score every KB diagnosis and rank by score descending, label ascending on ties.
pub fn score_diagnoses(
    kb: &KnowledgeBase,
    findings: &[Finding],
    config: &EngineConfig,
) -> Vec<Diff> {
    let mut diffs: Vec<Diff> = kb
        .diagnoses()
        .iter()
        .map(|dx| {
            let (logit, rationale) = diagnosis_logit(dx, findings, config);
            Diff {
                label: dx.label.clone(),
                score: sigmoid(logit),
                rationale,
            }
        })
        .collect();
    diffs.sort_by(rank_order);
    diffs
}

fn rank_order(a: &Diff, b: &Diff) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.label.cmp(&b.label))
}

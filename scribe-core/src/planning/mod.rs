//! Planners that turn ranked diagnoses into follow-up questions and orders.
//!
//! Both planners only look at the leading diagnoses (depth set by
//! `EngineConfig`) and keep first-seen order while de-duplicating.

pub mod followup;
pub mod orders;

pub use followup::plan_followups;
pub use orders::{classify_order, plan_orders};

use crate::ipc::view::Diff;
use crate::knowledge::{DiagnosisDefinition, KnowledgeBase};

/// Definitions of the top `depth` diffs, in rank order.
///
/// Diffs always come from scoring the same KB, so every label resolves.
pub(crate) fn leading_definitions<'kb>(
    kb: &'kb KnowledgeBase,
    diffs: &[Diff],
    depth: usize,
) -> Vec<&'kb DiagnosisDefinition> {
    diffs
        .iter()
        .take(depth)
        .filter_map(|d| kb.diagnosis_by_label(&d.label))
        .collect()
}

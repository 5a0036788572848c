//! View assembly: every derived result recomputed from the raw session.

use crate::engine::EngineConfig;
use crate::inference::score_diagnoses;
use crate::ipc::view::{Finding, SessionView, TranscriptLine};
use crate::knowledge::KnowledgeBase;
use crate::note::compose_soap;
use crate::planning::{plan_followups, plan_orders};

/// Scorer → follow-up planner → order planner → note composer.
///
/// Pure function of its inputs; nothing is cached between calls.
pub fn build_view(
    kb: &KnowledgeBase,
    config: &EngineConfig,
    revision: u64,
    transcript: Vec<TranscriptLine>,
    findings: Vec<Finding>,
) -> SessionView {
    let diffs = score_diagnoses(kb, &findings, config);
    let followups = plan_followups(kb, &diffs, &findings, config);
    let orders = plan_orders(kb, &diffs, config);
    let soap = compose_soap(kb, &transcript, &findings, &diffs, config);

    SessionView {
        revision,
        transcript,
        findings,
        followups,
        diffs,
        orders,
        soap,
    }
}

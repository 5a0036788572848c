//! Follow-up planner: ask about what the leading diagnoses still need.

use crate::engine::EngineConfig;
use crate::ipc::view::{Diff, Finding, FollowUp};
use crate::knowledge::KnowledgeBase;

use super::leading_definitions;

/// Questions for every finding weighted by a leading diagnosis that is not
/// yet in `findings`.
///
/// The top diagnosis' missing findings come first (definition order), then
/// those of the next diagnosis not already collected. No cap is applied.
pub fn plan_followups(
    kb: &KnowledgeBase,
    diffs: &[Diff],
    findings: &[Finding],
    config: &EngineConfig,
) -> Vec<FollowUp> {
    let mut needed: Vec<&str> = Vec::new();
    for dx in leading_definitions(kb, diffs, config.followup_depth) {
        for name in dx.finding_names() {
            let known = findings.iter().any(|f| f.name == name);
            if !known && !needed.contains(&name) {
                needed.push(name);
            }
        }
    }

    needed
        .into_iter()
        .map(|name| FollowUp {
            id: name.to_string(),
            question_text: kb.follow_up_text(name),
            target_findings: vec![name.to_string()],
            asked: false,
            answered: false,
        })
        .collect()
}

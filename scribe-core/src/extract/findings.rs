//! Keyword scan of the accumulated transcript against the KB vocabulary.

use tracing::debug;

use crate::ipc::view::{Finding, TranscriptLine};
use crate::knowledge::KnowledgeBase;

/// All transcript text joined by single spaces and lowercased.
pub fn accumulated_text(transcript: &[TranscriptLine]) -> String {
    transcript
        .iter()
        .map(|line| line.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Re-scan the whole transcript and append any vocabulary finding that is
/// mentioned but not yet present.
///
/// Findings are created with `certainty` and appended in vocabulary order.
/// Existing findings are never touched, so repeating the scan over the same
/// transcript is a no-op.
///
/// Returns the names of the findings created by this call.
pub fn scan_findings(
    kb: &KnowledgeBase,
    transcript: &[TranscriptLine],
    findings: &mut Vec<Finding>,
    certainty: f64,
) -> Vec<String> {
    let text = accumulated_text(transcript);
    let mut created = Vec::new();

    for spec in kb.findings() {
        if findings.iter().any(|f| f.name == spec.name) {
            continue;
        }
        if spec.triggers().any(|trigger| text.contains(&trigger)) {
            debug!(finding = %spec.name, "finding detected");
            findings.push(Finding {
                name: spec.name.clone(),
                certainty,
            });
            created.push(spec.name.clone());
        }
    }

    created
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipc::view::Speaker;
    use crate::knowledge::FindingSpec;

    fn line(text: &str) -> TranscriptLine {
        TranscriptLine {
            speaker: Speaker::Patient,
            text: text.into(),
        }
    }

    fn names(findings: &[Finding]) -> Vec<&str> {
        findings.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn accumulated_text_joins_with_spaces_and_lowercases() {
        let transcript = vec![line("Sore"), line("THROAT today")];
        assert_eq!(accumulated_text(&transcript), "sore throat today");
    }

    #[test]
    fn phrase_split_across_lines_is_detected() {
        let kb = KnowledgeBase::builtin();
        let transcript = vec![line("My throat is sore"), line("throat hurts")];
        let mut findings = Vec::new();
        scan_findings(&kb, &transcript, &mut findings, 0.7);
        // "...is sore throat hurts" contains "sore throat" once lines are joined.
        assert_eq!(names(&findings), vec!["sore throat"]);
    }

    #[test]
    fn findings_are_appended_in_vocabulary_order() {
        let kb = KnowledgeBase::builtin();
        let transcript = vec![line("Sore throat, cough and a FEVER.")];
        let mut findings = Vec::new();
        let created = scan_findings(&kb, &transcript, &mut findings, 0.7);
        assert_eq!(created, vec!["fever", "cough", "sore throat"]);
        assert!(findings.iter().all(|f| f.certainty == 0.7));
    }

    #[test]
    fn rescan_is_idempotent() {
        let kb = KnowledgeBase::builtin();
        let transcript = vec![line("fever and cough")];
        let mut findings = Vec::new();
        scan_findings(&kb, &transcript, &mut findings, 0.7);
        let before = findings.clone();

        let created = scan_findings(&kb, &transcript, &mut findings, 0.9);
        assert!(created.is_empty());
        assert_eq!(findings, before);
    }

    #[test]
    fn negated_mention_still_registers() {
        let kb = KnowledgeBase::builtin();
        let transcript = vec![line("No fever at all.")];
        let mut findings = Vec::new();
        scan_findings(&kb, &transcript, &mut findings, 0.7);
        assert_eq!(names(&findings), vec!["fever"]);
    }

    #[test]
    fn synonyms_without_vocabulary_entry_do_not_match() {
        let kb = KnowledgeBase::builtin();
        let transcript = vec![line("Body aches, just tired, some chest pain.")];
        let mut findings = Vec::new();
        scan_findings(&kb, &transcript, &mut findings, 0.7);
        assert!(findings.is_empty());
    }

    #[test]
    fn alias_records_canonical_name() {
        let kb = KnowledgeBase::new(
            vec![],
            vec![FindingSpec {
                name: "myalgias".into(),
                question: "Do you have body aches or chills?".into(),
                aliases: vec!["Body Aches".into()],
            }],
        )
        .expect("valid KB");
        let transcript = vec![line("I've had fever and body aches since yesterday.")];
        let mut findings = Vec::new();
        let created = scan_findings(&kb, &transcript, &mut findings, 0.7);
        assert_eq!(created, vec!["myalgias"]);
    }
}

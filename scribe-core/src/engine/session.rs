//! Mutable session aggregate: transcript log plus finding set.

use tracing::debug;

use crate::engine::EngineConfig;
use crate::extract::{classify_speaker, scan_findings};
use crate::ipc::events::SessionUpdateEvent;
use crate::ipc::view::{Finding, TranscriptLine};
use crate::knowledge::KnowledgeBase;

/// Transcript and findings of one encounter.
///
/// Both collections only grow. `revision` counts accepted utterances.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    transcript: Vec<TranscriptLine>,
    findings: Vec<Finding>,
    revision: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an utterance and re-scan for findings.
    ///
    /// Blank input is dropped without touching the session; `None` is
    /// returned in that case.
    pub fn add_line(
        &mut self,
        kb: &KnowledgeBase,
        config: &EngineConfig,
        raw: &str,
    ) -> Option<SessionUpdateEvent> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }

        let speaker = classify_speaker(text);
        self.transcript.push(TranscriptLine {
            speaker,
            text: text.to_string(),
        });
        let new_findings = scan_findings(
            kb,
            &self.transcript,
            &mut self.findings,
            config.default_certainty,
        );
        self.revision += 1;

        debug!(
            revision = self.revision,
            %speaker,
            new_findings = ?new_findings,
            "utterance applied"
        );

        Some(SessionUpdateEvent {
            seq: self.revision,
            speaker,
            text: text.to_string(),
            new_findings,
        })
    }

    pub fn transcript(&self) -> &[TranscriptLine] {
        &self.transcript
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

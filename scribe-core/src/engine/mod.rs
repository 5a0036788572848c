//! `ScribeEngine` — the session-level entry point.
//!
//! ## Flow
//!
//! ```text
//! submit_utterance(text)
//!     └─► SessionState::add_line   (speaker tag, append, finding scan)
//!         └─► broadcast SessionUpdateEvent
//!
//! current_view()
//!     └─► snapshot (transcript, findings) under the session lock
//!         └─► build_view: score → follow-ups → orders → SOAP
//! ```
//!
//! ## Threading
//!
//! Appends and snapshots go through one `parking_lot::Mutex`, so a view
//! never observes a half-applied utterance. Derived results are computed
//! after the lock is released.

pub mod session;
pub mod view;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::ipc::events::SessionUpdateEvent;
use crate::ipc::view::SessionView;
use crate::knowledge::KnowledgeBase;

use session::SessionState;

/// Broadcast channel capacity: 64 update events buffered for slow consumers.
const BROADCAST_CAP: usize = 64;

/// Tunables for extraction, scoring and planning.
///
/// `Default` reproduces the reference behaviour.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Certainty assigned to newly detected findings. Default: 0.7.
    pub default_certainty: f64,
    /// Findings held above this certainty add their positive weight.
    /// Default: 0.5.
    pub certainty_threshold: f64,
    /// Multiplier applied to negative weights. Default: 0.5.
    pub negative_damping: f64,
    /// Leading diagnoses considered by the follow-up planner. Default: 2.
    pub followup_depth: usize,
    /// Leading diagnoses considered by the order planner. Default: 2.
    pub order_depth: usize,
    /// Diagnoses listed in the Assessment section. Default: 3.
    pub assessment_depth: usize,
    /// Case-insensitive substring marking an order as imaging. Default: "CXR".
    pub imaging_marker: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_certainty: 0.7,
            certainty_threshold: 0.5,
            negative_damping: 0.5,
            followup_depth: 2,
            order_depth: 2,
            assessment_depth: 3,
            imaging_marker: "CXR".into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct EngineDiagnostics {
    pub utterances_accepted: AtomicUsize,
    pub utterances_ignored: AtomicUsize,
    pub findings_extracted: AtomicUsize,
    pub views_built: AtomicUsize,
}

impl EngineDiagnostics {
    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        DiagnosticsSnapshot {
            utterances_accepted: self.utterances_accepted.load(Ordering::Relaxed),
            utterances_ignored: self.utterances_ignored.load(Ordering::Relaxed),
            findings_extracted: self.findings_extracted.load(Ordering::Relaxed),
            views_built: self.views_built.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticsSnapshot {
    pub utterances_accepted: usize,
    pub utterances_ignored: usize,
    pub findings_extracted: usize,
    pub views_built: usize,
}

/// The top-level engine handle.
///
/// `ScribeEngine` is `Send + Sync`. Wrap in `Arc<ScribeEngine>` to share
/// between the utterance producer and view consumers.
pub struct ScribeEngine {
    config: EngineConfig,
    kb: Arc<KnowledgeBase>,
    session: Mutex<SessionState>,
    update_tx: broadcast::Sender<SessionUpdateEvent>,
    diagnostics: EngineDiagnostics,
}

impl ScribeEngine {
    pub fn new(config: EngineConfig, kb: Arc<KnowledgeBase>) -> Self {
        let (update_tx, _) = broadcast::channel(BROADCAST_CAP);
        info!(
            diagnoses = kb.diagnoses().len(),
            findings = kb.findings().len(),
            "scribe engine created"
        );
        Self {
            config,
            kb,
            session: Mutex::new(SessionState::new()),
            update_tx,
            diagnostics: EngineDiagnostics::default(),
        }
    }

    /// Engine over the built-in knowledge base with default tunables.
    pub fn with_builtin() -> Self {
        Self::new(EngineConfig::default(), Arc::new(KnowledgeBase::builtin()))
    }

    /// Feed one recognised utterance into the session.
    ///
    /// Never fails. Blank text is ignored.
    pub fn submit_utterance(&self, text: &str) {
        let applied = {
            let mut session = self.session.lock();
            session.add_line(&self.kb, &self.config, text)
        };

        let Some(event) = applied else {
            self.diagnostics
                .utterances_ignored
                .fetch_add(1, Ordering::Relaxed);
            debug!("blank utterance ignored");
            return;
        };

        self.diagnostics
            .utterances_accepted
            .fetch_add(1, Ordering::Relaxed);
        self.diagnostics
            .findings_extracted
            .fetch_add(event.new_findings.len(), Ordering::Relaxed);
        if !event.new_findings.is_empty() {
            info!(
                seq = event.seq,
                new_findings = ?event.new_findings,
                "new findings extracted"
            );
        }
        let _ = self.update_tx.send(event);
    }

    /// Fresh snapshot of transcript, findings and all derived results.
    pub fn current_view(&self) -> SessionView {
        let (revision, transcript, findings) = {
            let session = self.session.lock();
            (
                session.revision(),
                session.transcript().to_vec(),
                session.findings().to_vec(),
            )
        };
        self.diagnostics.views_built.fetch_add(1, Ordering::Relaxed);
        view::build_view(&self.kb, &self.config, revision, transcript, findings)
    }

    /// Number of accepted utterances so far.
    pub fn revision(&self) -> u64 {
        self.session.lock().revision()
    }

    /// Subscribe to per-utterance update events.
    pub fn subscribe_updates(&self) -> broadcast::Receiver<SessionUpdateEvent> {
        self.update_tx.subscribe()
    }

    pub fn knowledge_base(&self) -> &Arc<KnowledgeBase> {
        &self.kb
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn diagnostics_snapshot(&self) -> DiagnosticsSnapshot {
        self.diagnostics.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::error::TryRecvError;

    #[test]
    fn blank_utterance_is_a_no_op() {
        let engine = ScribeEngine::with_builtin();
        let before = engine.current_view();
        engine.submit_utterance("   ");
        let after = engine.current_view();

        assert_eq!(before, after);
        assert_eq!(engine.revision(), 0);
        let diag = engine.diagnostics_snapshot();
        assert_eq!(diag.utterances_ignored, 1);
        assert_eq!(diag.utterances_accepted, 0);
        assert_eq!(diag.views_built, 2);
    }

    #[test]
    fn consecutive_views_are_identical() {
        let engine = ScribeEngine::with_builtin();
        engine.submit_utterance("I have a fever and a cough.");
        assert_eq!(engine.current_view(), engine.current_view());
    }

    #[test]
    fn update_events_follow_accepted_utterances() {
        let engine = ScribeEngine::with_builtin();
        let mut rx = engine.subscribe_updates();

        engine.submit_utterance("Any fever?");
        engine.submit_utterance("");
        engine.submit_utterance("Yes, since Monday.");

        let first = rx.try_recv().expect("first update");
        assert_eq!(first.seq, 1);
        assert_eq!(first.new_findings, vec!["fever"]);

        let second = rx.try_recv().expect("second update");
        assert_eq!(second.seq, 2);
        assert!(second.new_findings.is_empty());

        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
        assert_eq!(engine.diagnostics_snapshot().findings_extracted, 1);
    }

    #[test]
    fn submitting_without_subscribers_does_not_panic() {
        let engine = ScribeEngine::with_builtin();
        engine.submit_utterance("cough");
        assert_eq!(engine.current_view().findings.len(), 1);
    }

    #[test]
    fn engine_uses_injected_knowledge_base() {
        let raw = r#"{
            "diagnoses": [
                { "key": "strep", "label": "Strep pharyngitis", "prior": -1.0,
                  "findingWeights": [ { "finding": "sore throat", "positive": 2.0, "negative": -0.5 } ],
                  "recommendedOrders": ["Rapid strep antigen"] }
            ],
            "findings": [ { "name": "sore throat", "question": "Pain on swallowing?" } ]
        }"#;
        let kb = Arc::new(KnowledgeBase::from_json(raw).expect("parse KB"));
        let engine = ScribeEngine::new(EngineConfig::default(), kb);
        engine.submit_utterance("My sore throat is awful.");

        let view = engine.current_view();
        assert_eq!(view.diffs.len(), 1);
        assert_eq!(view.diffs[0].label, "Strep pharyngitis");
        assert!(view.followups.is_empty());
        assert_eq!(view.orders[0].name, "Rapid strep antigen");
        assert_eq!(view.soap.plan, "- Rapid strep antigen");
    }
}

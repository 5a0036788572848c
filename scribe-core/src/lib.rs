//! # scribe-core
//!
//! Incremental clinical inference over a running conversation transcript.
//!
//! ## Architecture
//!
//! ```text
//! recognised utterance → ScribeEngine::submit_utterance
//!                                │
//!                     speaker tag + keyword finding scan
//!                                │
//!                     SessionState (transcript, findings)
//!                                │
//!               ScribeEngine::current_view (on demand)
//!                                │
//!     score diagnoses → follow-ups → orders → SOAP note → SessionView
//! ```
//!
//! The knowledge base is immutable and injected as `Arc<KnowledgeBase>`.
//! Nothing derived is cached: every view is rebuilt from the session.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod engine;
pub mod error;
pub mod extract;
pub mod inference;
pub mod ipc;
pub mod knowledge;
pub mod note;
pub mod planning;

// Convenience re-exports for downstream crates
pub use engine::{EngineConfig, ScribeEngine};
pub use error::ScribeError;
pub use ipc::events::SessionUpdateEvent;
pub use ipc::view::{
    Diff, Finding, FollowUp, Order, OrderKind, SessionView, Soap, Speaker, TranscriptLine,
};
pub use knowledge::{DiagnosisDefinition, FindingSpec, FindingWeight, KnowledgeBase};

/// Canned encounter used by demo hosts and the benchmark.
pub const DEMO_SCRIPT: [&str; 5] = [
    "I've had fever and body aches since yesterday.",
    "Any cough or sore throat?",
    "Yeah I have a cough and some sore throat.",
    "Any chest pain or shortness of breath?",
    "No chest pain, just tired.",
];

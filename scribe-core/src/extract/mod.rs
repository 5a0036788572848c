//! Evidence extraction: speaker tagging and keyword finding detection.
//!
//! ```text
//! utterance ──► classify_speaker ──► TranscriptLine ──► transcript log
//!                                                           │
//!                                   scan_findings (whole log, every line)
//!                                                           │
//!                                                     finding set
//! ```
//!
//! Matching is plain lowercase substring containment. There is no
//! tokenisation and no negation handling: "no chest pain" still contains
//! "chest pain".

pub mod findings;
pub mod speaker;

pub use findings::{accumulated_text, scan_findings};
pub use speaker::classify_speaker;

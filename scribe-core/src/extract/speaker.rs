//! Question-form heuristic that tells the provider from the patient.

use crate::ipc::view::Speaker;

/// Lead words that mark an utterance as a provider question.
/// Each includes its trailing space so "isn't" or "dozen" never match.
const QUESTION_LEADS: [&str; 10] = [
    "do ", "did ", "are ", "is ", "have ", "has ", "what ", "when ", "where ", "how ",
];

/// Classify an utterance as provider (question form) or patient (anything else).
///
/// Blank input matches nothing and is therefore `Patient`.
pub fn classify_speaker(text: &str) -> Speaker {
    let s = text.trim().to_lowercase();
    if s.ends_with('?') || QUESTION_LEADS.iter().any(|lead| s.starts_with(lead)) {
        Speaker::Provider
    } else {
        Speaker::Patient
    }
}

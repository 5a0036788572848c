//! Plain-text rendering of a `SessionView` for the terminal.

use std::fmt::Write as _;

use scribe_core::note::percent;
use scribe_core::{OrderKind, SessionView};

/// Shown in place of a blank SOAP section.
pub const EMPTY_SECTION: &str = "\u{2014}"; // "—"

#[derive(Debug, Clone, Copy)]
pub struct RenderLimits {
    pub max_diffs: usize,
    pub max_followups: usize,
}

fn or_placeholder(section: &str) -> &str {
    if section.trim().is_empty() {
        EMPTY_SECTION
    } else {
        section
    }
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n== {title} ==");
}

pub fn render_view(view: &SessionView, limits: RenderLimits) -> String {
    let mut out = String::new();
    let _ = write!(out, "-- session revision {} --", view.revision);

    heading(&mut out, "Transcript");
    if view.transcript.is_empty() {
        out.push_str("(nothing heard yet)\n");
    }
    for line in &view.transcript {
        let _ = writeln!(out, "\u{2022} {}: {}", line.speaker, line.text);
    }

    heading(&mut out, "Follow-ups");
    if view.followups.is_empty() {
        out.push_str("No follow-ups yet. Keep talking.\n");
    }
    for f in view.followups.iter().take(limits.max_followups) {
        let _ = writeln!(out, "\u{2022} {}", f.question_text);
    }
    let hidden = view.followups.len().saturating_sub(limits.max_followups);
    if hidden > 0 {
        let _ = writeln!(out, "  (+{hidden} more)");
    }

    heading(&mut out, "Differential (top)");
    for d in view.diffs.iter().take(limits.max_diffs) {
        let _ = writeln!(out, "{} \u{2014} {}%", d.label, percent(d.score));
    }

    heading(&mut out, "Suggested labs & imaging");
    for o in &view.orders {
        let kind = match o.kind {
            OrderKind::Lab => "lab",
            OrderKind::Imaging => "imaging",
        };
        let _ = writeln!(out, "\u{2022} {} [{kind}]", o.name);
    }

    heading(&mut out, "SOAP");
    for (title, body) in [
        ("Subjective", &view.soap.subjective),
        ("Objective", &view.soap.objective),
        ("Assessment", &view.soap.assessment),
        ("Plan", &view.soap.plan),
    ] {
        let _ = writeln!(out, "{title}\n{}\n", or_placeholder(body));
    }

    out
}

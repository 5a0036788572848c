//! Command handlers for lines typed on stdin.
//!
//! Lines starting with `:` are host commands; every other line is an
//! utterance handed to the engine.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use scribe_core::{SessionView, DEMO_SCRIPT};
use serde::Serialize;
use tracing::info;

use crate::render::{render_view, RenderLimits};
use crate::settings::save_settings;
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Utterance(String),
    View,
    Json,
    Stats,
    Demo,
    Save(PathBuf),
    SaveSettings,
    Help,
    Quit,
    Unknown(String),
}

/// Whether the input loop keeps running after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    let Some(rest) = trimmed.strip_prefix(':') else {
        return Command::Utterance(line.to_string());
    };
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    match name.to_ascii_lowercase().as_str() {
        "view" | "v" => Command::View,
        "json" => Command::Json,
        "stats" => Command::Stats,
        "demo" => Command::Demo,
        "save" if !arg.is_empty() => Command::Save(PathBuf::from(arg)),
        "save-settings" => Command::SaveSettings,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => Command::Unknown(trimmed.to_string()),
    }
}

const HELP: &str = "\
Type an utterance and press enter, or one of:
  :view            render the current view
  :json            print the current view as JSON
  :stats           engine counters and latency
  :demo            replay the canned demo encounter
  :save <path>     export the current view as JSON
  :save-settings   write current settings to the settings file
  :quit            exit";

pub fn limits(state: &AppState) -> RenderLimits {
    RenderLimits {
        max_diffs: state.settings.max_diffs_displayed,
        max_followups: state.settings.max_followups_displayed,
    }
}

pub fn seed_demo(state: &AppState) {
    info!(lines = DEMO_SCRIPT.len(), "seeding demo encounter");
    for line in DEMO_SCRIPT {
        state.submit(line);
    }
}

pub fn execute(state: &AppState, command: Command, out: &mut impl Write) -> anyhow::Result<Flow> {
    match command {
        Command::Utterance(text) => state.submit(&text),
        Command::View => {
            let view = state.view();
            writeln!(out, "{}", render_view(&view, limits(state)))?;
        }
        Command::Json => {
            let view = state.view();
            writeln!(out, "{}", view.to_json_pretty()?)?;
        }
        Command::Stats => {
            let snap = state.perf_snapshot();
            writeln!(out, "{}", serde_json::to_string_pretty(&snap)?)?;
        }
        Command::Demo => seed_demo(state),
        Command::Save(path) => {
            let view = state.view();
            export_view(&path, &view)?;
            writeln!(out, "saved view to {}", path.display())?;
        }
        Command::SaveSettings => {
            save_settings(&state.settings_path, &state.settings).with_context(|| {
                format!("writing settings to {}", state.settings_path.display())
            })?;
            writeln!(out, "saved settings to {}", state.settings_path.display())?;
        }
        Command::Help => writeln!(out, "{HELP}")?,
        Command::Quit => return Ok(Flow::Exit),
        Command::Unknown(raw) => writeln!(out, "unknown command: {raw} (try :help)")?,
    }
    Ok(Flow::Continue)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportedView<'a> {
    exported_at: String,
    view: &'a SessionView,
}

pub fn export_view(path: &Path, view: &SessionView) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let export = ExportedView {
        exported_at: chrono::Utc::now().to_rfc3339(),
        view,
    };
    let json = serde_json::to_string_pretty(&export)?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    info!(path = ?path, revision = view.revision, "view exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::AppSettings;
    use scribe_core::ScribeEngine;
    use std::sync::Arc;

    fn state() -> AppState {
        AppState::new(
            Arc::new(ScribeEngine::with_builtin()),
            AppSettings::default(),
            std::env::temp_dir().join(format!("scribe-cmd-{}", std::process::id())),
        )
    }

    #[test]
    fn parses_commands_and_utterances() {
        assert_eq!(parse_command(":view"), Command::View);
        assert_eq!(parse_command("  :Q "), Command::Quit);
        assert_eq!(
            parse_command(":save out/note.json"),
            Command::Save(PathBuf::from("out/note.json"))
        );
        assert_eq!(parse_command(":save"), Command::Unknown(":save".into()));
        assert_eq!(
            parse_command("Any cough?"),
            Command::Utterance("Any cough?".into())
        );
        assert_eq!(parse_command(":frobnicate"), Command::Unknown(":frobnicate".into()));
    }

    #[test]
    fn utterances_reach_the_engine_and_quit_exits() {
        let state = state();
        let mut out = Vec::new();
        let flow = execute(&state, parse_command("I have a fever."), &mut out).expect("execute");
        assert_eq!(flow, Flow::Continue);
        assert_eq!(state.engine.revision(), 1);

        let flow = execute(&state, Command::Quit, &mut out).expect("execute");
        assert_eq!(flow, Flow::Exit);
    }

    #[test]
    fn json_command_prints_parseable_view() {
        let state = state();
        seed_demo(&state);
        let mut out = Vec::new();
        execute(&state, Command::Json, &mut out).expect("execute");

        let printed = String::from_utf8(out).expect("utf8");
        let view: SessionView = serde_json::from_str(printed.trim()).expect("parse view");
        assert_eq!(view.revision, DEMO_SCRIPT.len() as u64);
        assert_eq!(view.diffs[0].label, "Influenza");
    }

    #[test]
    fn save_writes_timestamped_export() {
        let state = state();
        seed_demo(&state);
        let dir = std::env::temp_dir().join(format!("scribe-export-{}", std::process::id()));
        let path = dir.join("note.json");

        let mut out = Vec::new();
        execute(&state, Command::Save(path.clone()), &mut out).expect("execute");

        let raw = std::fs::read_to_string(&path).expect("read export");
        let json: serde_json::Value = serde_json::from_str(&raw).expect("parse export");
        assert!(json["exportedAt"].as_str().is_some());
        assert_eq!(json["view"]["soap"]["plan"].as_str().map(|p| p.lines().count()), Some(4));

        let _ = std::fs::remove_dir_all(dir);
    }
}

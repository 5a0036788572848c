//! Scribe terminal host.
//!
//! Stands in for the speech and display collaborators: every stdin line is
//! treated as one finalised utterance, and the session view is re-pulled on a
//! fixed tick and repainted when it changed.
//!
//! ## Threads
//!
//! ```text
//! stdin reader ──(crossbeam channel)──► main loop ◄──(tick)── poll timer
//!                                           │
//!                                     ScribeEngine
//! ```

mod commands;
mod render;
mod settings;
mod state;

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use crossbeam_channel::{select, tick, unbounded};
use scribe_core::{EngineConfig, KnowledgeBase, ScribeEngine};
use tracing::{info, warn};

use commands::{execute, limits, parse_command, seed_demo, Flow};
use render::render_view;
use settings::{apply_env_overrides, default_settings_path, load_settings};
use state::AppState;

#[derive(Debug, Default)]
struct CliArgs {
    settings_path: Option<PathBuf>,
    knowledge_base: Option<PathBuf>,
    demo: bool,
    quiet: bool,
}

fn parse_args() -> anyhow::Result<CliArgs> {
    let mut args = CliArgs::default();
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--settings" => {
                let v = it.next().context("missing value for --settings")?;
                args.settings_path = Some(PathBuf::from(v));
            }
            "--kb" => {
                let v = it.next().context("missing value for --kb")?;
                args.knowledge_base = Some(PathBuf::from(v));
            }
            "--demo" => args.demo = true,
            "--quiet" => args.quiet = true,
            "--help" | "-h" => {
                println!(
                    "Usage: scribe [--settings <settings.json>] [--kb <kb.json>] [--demo] [--quiet]\n\
                     Reads one utterance per line from stdin. Type :help for commands."
                );
                std::process::exit(0);
            }
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }
    Ok(args)
}

/// Configured knowledge base, or the built-in one if it cannot be loaded.
fn load_knowledge_base(path: Option<PathBuf>) -> KnowledgeBase {
    let Some(path) = path else {
        info!("using built-in knowledge base");
        return KnowledgeBase::builtin();
    };
    match KnowledgeBase::load(&path) {
        Ok(kb) => kb,
        Err(e) => {
            warn!(path = ?path, "knowledge base load failed ({e}), falling back to built-in");
            KnowledgeBase::builtin()
        }
    }
}

fn handle_line(state: &AppState, line: &str) -> anyhow::Result<Flow> {
    let mut out = std::io::stdout().lock();
    match execute(state, parse_command(line), &mut out) {
        Ok(flow) => Ok(flow),
        Err(e) => {
            writeln!(out, "error: {e:#}")?;
            Ok(Flow::Continue)
        }
    }
}

fn repaint_if_changed(state: &AppState) -> anyhow::Result<()> {
    if let Some(view) = state.poll_changed() {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{}", render_view(&view, limits(state)))?;
        out.flush()?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // ── Tracing ───────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("scribe_app=info,scribe_core=info")),
        )
        .init();

    let cli = parse_args()?;

    // ── Settings ──────────────────────────────────────────────────────────
    let settings_path = cli.settings_path.clone().unwrap_or_else(default_settings_path);
    let mut app_settings = load_settings(&settings_path);
    apply_env_overrides(&mut app_settings);
    if let Some(kb) = &cli.knowledge_base {
        app_settings.knowledge_base_path = Some(kb.display().to_string());
    }
    if cli.demo {
        app_settings.demo_on_start = true;
    }
    if cli.quiet {
        app_settings.auto_render = false;
    }
    app_settings.normalize();
    info!(
        settings_path = ?settings_path,
        poll_interval_ms = app_settings.poll_interval_ms,
        knowledge_base = ?app_settings.knowledge_base_path,
        "settings loaded"
    );

    // ── Engine setup ──────────────────────────────────────────────────────
    let kb = Arc::new(load_knowledge_base(app_settings.knowledge_base_path()));
    let engine = Arc::new(ScribeEngine::new(EngineConfig::default(), kb));
    let state = AppState::new(engine, app_settings, settings_path);

    if state.settings.demo_on_start {
        seed_demo(&state);
    }

    // ── Input reader ──────────────────────────────────────────────────────
    let (line_tx, line_rx) = unbounded::<String>();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if line_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("stdin read failed: {e}");
                    break;
                }
            }
        }
    });

    // ── Main loop ─────────────────────────────────────────────────────────
    let ticker = tick(Duration::from_millis(state.settings.poll_interval_ms));
    loop {
        let flow = select! {
            recv(line_rx) -> msg => match msg {
                Ok(line) => handle_line(&state, &line)?,
                Err(_) => {
                    info!("input closed");
                    Flow::Exit
                }
            },
            recv(ticker) -> _ => {
                if state.settings.auto_render {
                    repaint_if_changed(&state)?;
                }
                Flow::Continue
            }
        };
        if flow == Flow::Exit {
            break;
        }
    }

    // Final paint so piped input always ends with the complete note.
    let view = state.view();
    let mut out = std::io::stdout().lock();
    writeln!(out, "{}", render_view(&view, limits(&state)))?;
    out.flush()?;

    let snap = state.perf_snapshot();
    info!(
        utterances_accepted = snap.utterances_accepted,
        utterances_ignored = snap.utterances_ignored,
        findings_extracted = snap.findings_extracted,
        views_built = snap.views_built,
        view_p95_ms = snap.view_ms.p95_ms,
        "session ended"
    );
    Ok(())
}

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use scribe_core::{EngineConfig, KnowledgeBase, ScribeEngine, DEMO_SCRIPT};
use serde::Serialize;

#[derive(Debug)]
struct Args {
    transcript: Option<PathBuf>,
    knowledge_base: Option<PathBuf>,
    iterations: usize,
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
struct StageSummary {
    runs: usize,
    p50_ms: f64,
    p95_ms: f64,
    avg_ms: f64,
    max_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
struct Summary {
    transcript: String,
    iterations: usize,
    utterances: usize,
    final_transcript_len: usize,
    final_findings: Vec<String>,
    top_diagnosis: Option<String>,
    submit: StageSummary,
    view: StageSummary,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("benchmark failed: {e}");
        std::process::exit(1);
    }
}

fn parse_args() -> Result<Args, String> {
    let mut transcript: Option<PathBuf> = None;
    let mut knowledge_base: Option<PathBuf> = None;
    let mut iterations: usize = 20;
    let mut output: Option<PathBuf> = None;

    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--transcript" => {
                let Some(v) = it.next() else {
                    return Err("missing value for --transcript".into());
                };
                transcript = Some(PathBuf::from(v));
            }
            "--kb" => {
                let Some(v) = it.next() else {
                    return Err("missing value for --kb".into());
                };
                knowledge_base = Some(PathBuf::from(v));
            }
            "--iterations" => {
                let Some(v) = it.next() else {
                    return Err("missing value for --iterations".into());
                };
                iterations = v
                    .parse::<usize>()
                    .map_err(|_| "invalid value for --iterations".to_string())?
                    .clamp(1, 1_000);
            }
            "--output" => {
                let Some(v) = it.next() else {
                    return Err("missing value for --output".into());
                };
                output = Some(PathBuf::from(v));
            }
            "--help" | "-h" => {
                println!(
                    "Usage: cargo run -p scribe-core --bin benchmark -- \\
  [--transcript <file.txt>] [--kb <kb.json>] [--iterations <n>] [--output <file.json>]"
                );
                std::process::exit(0);
            }
            other => {
                return Err(format!("unknown argument: {other}"));
            }
        }
    }

    Ok(Args {
        transcript,
        knowledge_base,
        iterations,
        output,
    })
}

/// One utterance per non-blank line.
fn read_transcript(path: &Path) -> Result<Vec<String>, String> {
    let raw = std::fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    if sorted.len() == 1 {
        return sorted[0];
    }
    let idx = ((sorted.len() - 1) as f64 * p.clamp(0.0, 1.0)).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

fn summarize(latencies: &[f64]) -> StageSummary {
    StageSummary {
        runs: latencies.len(),
        p50_ms: percentile(latencies, 0.50),
        p95_ms: percentile(latencies, 0.95),
        avg_ms: if latencies.is_empty() {
            0.0
        } else {
            latencies.iter().sum::<f64>() / latencies.len() as f64
        },
        max_ms: latencies.iter().copied().fold(0.0, f64::max),
    }
}

fn run() -> Result<(), String> {
    let args = parse_args()?;

    let utterances = match &args.transcript {
        Some(path) => read_transcript(path)?,
        None => DEMO_SCRIPT.iter().map(|s| s.to_string()).collect(),
    };
    if utterances.is_empty() {
        return Err("transcript contains no utterances".into());
    }

    let kb = match &args.knowledge_base {
        Some(path) => KnowledgeBase::load(path).map_err(|e| e.to_string())?,
        None => KnowledgeBase::builtin(),
    };
    let kb = Arc::new(kb);

    println!(
        "Running Scribe benchmark on {} utterances (iterations={})",
        utterances.len(),
        args.iterations
    );

    // Each iteration appends the whole transcript again, so later views
    // run over a longer session.
    let engine = ScribeEngine::new(EngineConfig::default(), Arc::clone(&kb));
    let mut submit_ms = Vec::new();
    let mut view_ms = Vec::new();
    for iteration in 1..=args.iterations {
        for line in &utterances {
            let started = Instant::now();
            engine.submit_utterance(line);
            submit_ms.push(started.elapsed().as_secs_f64() * 1000.0);

            let started = Instant::now();
            let _view = engine.current_view();
            view_ms.push(started.elapsed().as_secs_f64() * 1000.0);
        }
        println!(
            "[{iteration}/{iters}] transcript_len={len}",
            iters = args.iterations,
            len = engine.revision()
        );
    }

    let view = engine.current_view();
    let summary = Summary {
        transcript: args
            .transcript
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<demo>".into()),
        iterations: args.iterations,
        utterances: utterances.len(),
        final_transcript_len: view.transcript.len(),
        final_findings: view.findings.iter().map(|f| f.name.clone()).collect(),
        top_diagnosis: view.diffs.first().map(|d| d.label.clone()),
        submit: summarize(&submit_ms),
        view: summarize(&view_ms),
    };

    println!(
        "Done. views={} p50={:.3}ms p95={:.3}ms",
        summary.view.runs, summary.view.p50_ms, summary.view.p95_ms
    );

    let json = serde_json::to_string_pretty(&summary).map_err(|e| e.to_string())?;
    if let Some(out) = args.output {
        if let Some(parent) = out.parent() {
            std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        std::fs::write(&out, json).map_err(|e| e.to_string())?;
        println!("Wrote benchmark report: {}", out.display());
    } else {
        println!("{json}");
    }

    Ok(())
}

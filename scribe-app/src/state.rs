//! Host state shared by the input loop and command handlers.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use scribe_core::{ScribeEngine, SessionView};
use serde::Serialize;

use crate::settings::AppSettings;

pub struct AppState {
    /// The core engine. Wrapped in `Arc` so a future push-based renderer can
    /// hold its own handle.
    pub engine: Arc<ScribeEngine>,
    pub settings: AppSettings,
    /// Absolute path to `settings.json`.
    pub settings_path: PathBuf,
    /// Revision of the last view painted by the poll loop.
    pub last_rendered_revision: Mutex<Option<u64>>,
    /// Rolling stage latency metrics.
    pub perf_metrics: Mutex<PerfMetrics>,
}

impl AppState {
    pub fn new(engine: Arc<ScribeEngine>, settings: AppSettings, settings_path: PathBuf) -> Self {
        Self {
            engine,
            settings,
            settings_path,
            last_rendered_revision: Mutex::new(None),
            perf_metrics: Mutex::new(PerfMetrics::default()),
        }
    }

    /// Submit an utterance and record how long the engine took.
    pub fn submit(&self, text: &str) {
        let started = Instant::now();
        self.engine.submit_utterance(text);
        self.perf_metrics
            .lock()
            .record_submit(started.elapsed().as_secs_f64() * 1000.0);
    }

    /// Pull a view and record how long it took to build.
    pub fn view(&self) -> SessionView {
        let started = Instant::now();
        let view = self.engine.current_view();
        self.perf_metrics
            .lock()
            .record_view(started.elapsed().as_secs_f64() * 1000.0);
        view
    }

    /// `Some(view)` when the session changed since the last poll.
    pub fn poll_changed(&self) -> Option<SessionView> {
        let revision = self.engine.revision();
        let mut last = self.last_rendered_revision.lock();
        if *last == Some(revision) {
            return None;
        }
        *last = Some(revision);
        drop(last);
        Some(self.view())
    }

    pub fn perf_snapshot(&self) -> PerfSnapshot {
        let engine = self.engine.diagnostics_snapshot();
        let metrics = self.perf_metrics.lock().snapshot();
        PerfSnapshot {
            utterances_accepted: engine.utterances_accepted,
            utterances_ignored: engine.utterances_ignored,
            findings_extracted: engine.findings_extracted,
            views_built: engine.views_built,
            submit_ms: metrics.submit_ms,
            view_ms: metrics.view_ms,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerfSnapshot {
    pub utterances_accepted: usize,
    pub utterances_ignored: usize,
    pub findings_extracted: usize,
    pub views_built: usize,
    pub submit_ms: PerfStageSnapshot,
    pub view_ms: PerfStageSnapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerfStageSnapshot {
    pub count: usize,
    pub mean_ms: f64,
    pub p50_ms: f64,
    pub p95_ms: f64,
    pub max_ms: f64,
}

#[derive(Debug, Default)]
pub struct PerfMetrics {
    submit_ms: StageWindow,
    view_ms: StageWindow,
}

impl PerfMetrics {
    pub fn record_submit(&mut self, elapsed_ms: f64) {
        self.submit_ms.record(elapsed_ms);
    }

    pub fn record_view(&mut self, elapsed_ms: f64) {
        self.view_ms.record(elapsed_ms);
    }

    pub fn snapshot(&self) -> PerfMetricsSnapshot {
        PerfMetricsSnapshot {
            submit_ms: self.submit_ms.snapshot(),
            view_ms: self.view_ms.snapshot(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PerfMetricsSnapshot {
    pub submit_ms: PerfStageSnapshot,
    pub view_ms: PerfStageSnapshot,
}

#[derive(Debug)]
struct StageWindow {
    samples: VecDeque<f64>,
    cap: usize,
    count: usize,
    sum_ms: f64,
    max_ms: f64,
}

impl Default for StageWindow {
    fn default() -> Self {
        Self {
            samples: VecDeque::with_capacity(256),
            cap: 256,
            count: 0,
            sum_ms: 0.0,
            max_ms: 0.0,
        }
    }
}

impl StageWindow {
    fn record(&mut self, elapsed_ms: f64) {
        let v = if elapsed_ms.is_finite() {
            elapsed_ms.max(0.0)
        } else {
            0.0
        };
        if self.samples.len() == self.cap {
            let _ = self.samples.pop_front();
        }
        self.samples.push_back(v);
        self.count = self.count.saturating_add(1);
        self.sum_ms += v;
        if v > self.max_ms {
            self.max_ms = v;
        }
    }

    fn snapshot(&self) -> PerfStageSnapshot {
        if self.samples.is_empty() {
            return PerfStageSnapshot {
                count: 0,
                mean_ms: 0.0,
                p50_ms: 0.0,
                p95_ms: 0.0,
                max_ms: 0.0,
            };
        }
        let mut sorted: Vec<f64> = self.samples.iter().copied().collect();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let percentile = |p: f64| -> f64 {
            let n = sorted.len();
            if n == 1 {
                return sorted[0];
            }
            let idx = ((n - 1) as f64 * p).round() as usize;
            sorted[idx.min(n - 1)]
        };

        PerfStageSnapshot {
            count: self.count,
            mean_ms: self.sum_ms / self.count as f64,
            p50_ms: percentile(0.50),
            p95_ms: percentile(0.95),
            max_ms: self.max_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::new(
            Arc::new(ScribeEngine::with_builtin()),
            AppSettings::default(),
            PathBuf::from("settings.json"),
        )
    }

    #[test]
    fn stage_window_reports_percentiles() {
        let mut window = StageWindow::default();
        for v in 1..=100 {
            window.record(v as f64);
        }
        let snap = window.snapshot();
        assert_eq!(snap.count, 100);
        assert_eq!(snap.p50_ms, 51.0);
        assert_eq!(snap.p95_ms, 95.0);
        assert_eq!(snap.max_ms, 100.0);
        assert!((snap.mean_ms - 50.5).abs() < 1e-9);
    }

    #[test]
    fn stage_window_drops_oldest_beyond_cap_and_sanitizes_input() {
        let mut window = StageWindow::default();
        window.record(f64::NAN);
        window.record(-5.0);
        assert_eq!(window.snapshot().max_ms, 0.0);

        for _ in 0..300 {
            window.record(1.0);
        }
        assert_eq!(window.samples.len(), 256);
        assert_eq!(window.snapshot().count, 302);
    }

    #[test]
    fn poll_reports_only_changes() {
        let state = state();
        assert!(state.poll_changed().is_some(), "first poll always paints");
        assert!(state.poll_changed().is_none());

        state.submit("I have a cough.");
        let view = state.poll_changed().expect("changed after submit");
        assert_eq!(view.revision, 1);
        assert!(state.poll_changed().is_none());

        state.submit("   ");
        assert!(state.poll_changed().is_none(), "blank input changes nothing");
    }

    #[test]
    fn perf_snapshot_counts_engine_activity() {
        let state = state();
        state.submit("fever");
        state.submit("");
        let _ = state.view();

        let snap = state.perf_snapshot();
        assert_eq!(snap.utterances_accepted, 1);
        assert_eq!(snap.utterances_ignored, 1);
        assert_eq!(snap.findings_extracted, 1);
        assert_eq!(snap.submit_ms.count, 2);
        assert_eq!(snap.view_ms.count, 1);
    }
}

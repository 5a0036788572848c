//! Persistent host settings (JSON file in the app data directory).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct AppSettings {
    /// How often the view is re-pulled and repainted when it changed.
    pub poll_interval_ms: u64,
    /// Alternate knowledge base; `None` uses the built-in one.
    pub knowledge_base_path: Option<String>,
    pub max_diffs_displayed: usize,
    pub max_followups_displayed: usize,
    /// Seed the canned demo encounter at startup.
    pub demo_on_start: bool,
    /// Print the whole view on every change instead of only on `:view`.
    pub auto_render: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
            knowledge_base_path: None,
            max_diffs_displayed: 5,
            max_followups_displayed: 8,
            demo_on_start: false,
            auto_render: true,
        }
    }
}

impl AppSettings {
    pub fn normalize(&mut self) {
        self.poll_interval_ms = self.poll_interval_ms.clamp(50, 10_000);
        self.max_diffs_displayed = self.max_diffs_displayed.clamp(1, 50);
        self.max_followups_displayed = self.max_followups_displayed.clamp(1, 50);
        self.knowledge_base_path = self
            .knowledge_base_path
            .as_ref()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
    }

    pub fn knowledge_base_path(&self) -> Option<PathBuf> {
        self.knowledge_base_path.as_ref().map(PathBuf::from)
    }
}

/// Environment variables win over the settings file.
pub fn apply_env_overrides(settings: &mut AppSettings) {
    if let Ok(path) = std::env::var("SCRIBE_KB_PATH") {
        settings.knowledge_base_path = Some(path);
    }
    if let Ok(raw) = std::env::var("SCRIBE_POLL_INTERVAL_MS") {
        match raw.trim().parse::<u64>() {
            Ok(ms) => settings.poll_interval_ms = ms,
            Err(_) => tracing::warn!(value = %raw, "ignoring invalid SCRIBE_POLL_INTERVAL_MS"),
        }
    }
    if let Ok(raw) = std::env::var("SCRIBE_DEMO") {
        settings.demo_on_start = matches!(raw.trim(), "1" | "true" | "yes");
    }
    settings.normalize();
}

pub fn default_settings_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Lattice Labs")
            .join("Scribe")
            .join("settings.json")
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                std::env::var_os("HOME")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("/tmp"))
                    .join(".local")
                    .join("share")
            })
            .join("scribe")
            .join("settings.json")
    }
}

/// Missing or unreadable settings fall back to defaults.
pub fn load_settings(path: &Path) -> AppSettings {
    let mut settings = fs::read_to_string(path)
        .ok()
        .and_then(|raw| serde_json::from_str::<AppSettings>(&raw).ok())
        .unwrap_or_default();
    settings.normalize();
    settings
}

pub fn save_settings(path: &Path, settings: &AppSettings) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings).map_err(std::io::Error::other)?;
    fs::write(path, json)
}

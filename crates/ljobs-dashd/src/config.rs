use std::{
    fs,
    net::{Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
};

use anyhow::Context;
use ljobs_core::settings::ReportSettings;
use ljobs_model::FarmSnapshot;
use ljobs_observe::LoggerConfig;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 8087;

/// Daemon configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashdConfig {
    pub logger: LoggerConfig,
    pub settings: ReportSettings,
    pub listen: SocketAddr,
    /// JSON farm snapshot to report on.
    pub snapshot_path: PathBuf,
    /// Where settings changed through the API are saved. Read back on startup when present.
    pub settings_path: Option<PathBuf>,
}

impl Default for DashdConfig {
    fn default() -> Self {
        Self {
            logger: LoggerConfig::default(),
            settings: ReportSettings::default(),
            listen: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            snapshot_path: PathBuf::from("farm.json"),
            settings_path: None,
        }
    }
}

impl DashdConfig {
    /// Read the config file, or use defaults when no path is given.
    ///
    /// Relative snapshot and settings paths are resolved against the config file's directory.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let mut cfg: Self = serde_json::from_str(&text)
            .with_context(|| format!("parse config {}", path.display()))?;

        if let Some(base) = path.parent() {
            cfg.snapshot_path = base.join(&cfg.snapshot_path);
            cfg.settings_path = cfg.settings_path.map(|p| base.join(p));
        }
        cfg.load_saved_settings()?;
        Ok(cfg)
    }

    fn load_saved_settings(&mut self) -> anyhow::Result<()> {
        let Some(path) = self.settings_path.as_deref() else {
            return Ok(());
        };
        if !path.exists() {
            return Ok(());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("read settings {}", path.display()))?;
        self.settings = serde_json::from_str(&text)
            .with_context(|| format!("parse settings {}", path.display()))?;
        Ok(())
    }

    pub fn load_snapshot(&self) -> anyhow::Result<FarmSnapshot> {
        let path = &self.snapshot_path;
        let text = fs::read_to_string(path)
            .with_context(|| format!("read farm snapshot {}", path.display()))?;
        FarmSnapshot::from_json(&text)
            .with_context(|| format!("load farm snapshot {}", path.display()))
    }
}

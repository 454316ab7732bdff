use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use ljobs_core::{
    catalog::Farm,
    error::CoreResult,
    report::{DashboardView, LabelAtomData, LabelView, NodeData, NodeView, ReportBuilder},
    settings::ReportSettings,
};
use ljobs_model::FarmSnapshot;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::{error::ApiError, handler::ApiHandler};

/// Serves reports over one farm snapshot.
///
/// Every call resolves the snapshot afresh with the settings current at that moment,
/// so concurrent requests never share resolver state.
pub struct SnapshotAdapter {
    snapshot: Arc<FarmSnapshot>,
    settings: RwLock<ReportSettings>,
    settings_path: Option<PathBuf>,
}

impl SnapshotAdapter {
    pub fn new(snapshot: Arc<FarmSnapshot>, settings: ReportSettings) -> Self {
        Self {
            snapshot,
            settings: RwLock::new(settings),
            settings_path: None,
        }
    }

    /// Parse the snapshot from a JSON document.
    pub fn from_json(json: &str, settings: ReportSettings) -> CoreResult<Self> {
        let snapshot = FarmSnapshot::from_json(json)?;
        Ok(Self::new(Arc::new(snapshot), settings))
    }

    /// Write settings updates to `path` as pretty JSON.
    pub fn with_settings_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_path = Some(path.into());
        self
    }

    pub fn snapshot(&self) -> &FarmSnapshot {
        &self.snapshot
    }

    async fn report<T>(&self, f: impl FnOnce(&ReportBuilder<'_>) -> T) -> T {
        let settings = *self.settings.read().await;
        let builder = ReportBuilder::new(Farm::from_snapshot(&self.snapshot), settings);
        f(&builder)
    }

    async fn persist(&self, settings: &ReportSettings) -> Result<(), ApiError> {
        let Some(path) = &self.settings_path else {
            return Ok(());
        };
        let json = serde_json::to_vec_pretty(settings)
            .map_err(|e| ApiError::Internal(format!("encode settings: {e}")))?;
        tokio::fs::write(path, json)
            .await
            .map_err(|e| ApiError::Internal(format!("write {}: {e}", path.display())))?;
        debug!(path = %path.display(), "settings persisted");
        Ok(())
    }
}

#[async_trait]
impl ApiHandler for SnapshotAdapter {
    async fn dashboard(&self) -> Result<DashboardView, ApiError> {
        Ok(self.report(|b| b.dashboard()).await)
    }

    async fn labels(&self) -> Result<Vec<LabelAtomData>, ApiError> {
        Ok(self.report(|b| b.labels_data()).await)
    }

    async fn label(&self, atom: &str) -> Result<LabelView, ApiError> {
        self.report(|b| b.label_report(atom))
            .await
            .map_err(ApiError::from)
    }

    async fn nodes(&self) -> Result<Vec<NodeData>, ApiError> {
        Ok(self.report(|b| b.nodes_data()).await)
    }

    async fn node(&self, name: &str) -> Result<NodeView, ApiError> {
        self.report(|b| b.node_report(name))
            .await
            .map_err(ApiError::from)
    }

    async fn settings(&self) -> Result<ReportSettings, ApiError> {
        Ok(*self.settings.read().await)
    }

    async fn update_settings(&self, settings: ReportSettings) -> Result<ReportSettings, ApiError> {
        let mut current = self.settings.write().await;
        self.persist(&settings).await?;
        *current = settings;
        info!(?settings, "report settings updated");
        Ok(settings)
    }
}

use async_trait::async_trait;
use ljobs_core::{
    report::{DashboardView, LabelAtomData, LabelView, NodeData, NodeView},
    settings::ReportSettings,
};

use crate::error::ApiError;

/// Report backend behind the HTTP routes.
///
/// [`SnapshotAdapter`](crate::SnapshotAdapter) serves a fixed farm snapshot; other
/// implementations can add their own snapshot source or access checks.
#[async_trait]
pub trait ApiHandler: Send + Sync + 'static {
    async fn dashboard(&self) -> Result<DashboardView, ApiError>;

    /// Per-atom aggregation, as shown on the dashboard.
    async fn labels(&self) -> Result<Vec<LabelAtomData>, ApiError>;

    async fn label(&self, atom: &str) -> Result<LabelView, ApiError>;

    /// Per-node aggregation, as shown on the dashboard.
    async fn nodes(&self) -> Result<Vec<NodeData>, ApiError>;

    /// Fails with [`ApiError::NotFound`] for an unknown node.
    async fn node(&self, name: &str) -> Result<NodeView, ApiError>;

    async fn settings(&self) -> Result<ReportSettings, ApiError>;

    /// Replace the settings and return what is now in effect.
    async fn update_settings(&self, settings: ReportSettings) -> Result<ReportSettings, ApiError>;
}

use serde::{Deserialize, Serialize};

/// Presentation toggles applied by the report builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReportSettings {
    /// List job names inside label and node views rather than counts only.
    pub detailed_view: bool,
    /// List orphaned jobs one by one on the dashboard.
    pub dashboard_orphaned_jobs_detailed_view: bool,
    /// Include the single-node section on the dashboard and in node views.
    pub show_single_node_jobs: bool,
    /// Include the list of jobs carrying no label on the dashboard.
    pub show_labelless_jobs: bool,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            detailed_view: true,
            dashboard_orphaned_jobs_detailed_view: true,
            show_single_node_jobs: true,
            show_labelless_jobs: true,
        }
    }
}

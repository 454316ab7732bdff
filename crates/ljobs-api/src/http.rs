use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use ljobs_core::{
    report::{DashboardView, LabelAtomData, LabelView, NodeData, NodeView},
    settings::ReportSettings,
};
use tracing::debug;

use crate::{error::ApiError, handler::ApiHandler};

/// HTTP API service builder.
pub struct HttpApi<H> {
    handler: Arc<H>,
}

impl<H> HttpApi<H>
where
    H: ApiHandler,
{
    pub fn new(handler: Arc<H>) -> Self {
        Self { handler }
    }

    /// Build the axum router.
    ///
    /// Routes:
    /// - GET /api/v1/dashboard
    /// - GET /api/v1/labels
    /// - GET /api/v1/labels/{atom}
    /// - GET /api/v1/nodes
    /// - GET /api/v1/nodes/{name}
    /// - GET, PUT /api/v1/settings
    pub fn router(self) -> Router {
        Router::new()
            .route("/api/v1/dashboard", get(dashboard::<H>))
            .route("/api/v1/labels", get(list_labels::<H>))
            .route("/api/v1/labels/{atom}", get(label_view::<H>))
            .route("/api/v1/nodes", get(list_nodes::<H>))
            .route("/api/v1/nodes/{name}", get(node_view::<H>))
            .route(
                "/api/v1/settings",
                get(get_settings::<H>).put(put_settings::<H>),
            )
            .with_state(self.handler)
    }
}

/// GET /api/v1/dashboard
async fn dashboard<H: ApiHandler>(
    State(handler): State<Arc<H>>,
) -> Result<Json<DashboardView>, ApiError> {
    Ok(Json(handler.dashboard().await?))
}

/// GET /api/v1/labels
async fn list_labels<H: ApiHandler>(
    State(handler): State<Arc<H>>,
) -> Result<Json<Vec<LabelAtomData>>, ApiError> {
    Ok(Json(handler.labels().await?))
}

/// GET /api/v1/labels/{atom}
async fn label_view<H: ApiHandler>(
    State(handler): State<Arc<H>>,
    Path(atom): Path<String>,
) -> Result<Json<LabelView>, ApiError> {
    if atom.trim().is_empty() {
        return Err(ApiError::InvalidRequest("label atom cannot be empty".into()));
    }
    Ok(Json(handler.label(&atom).await?))
}

/// GET /api/v1/nodes
async fn list_nodes<H: ApiHandler>(
    State(handler): State<Arc<H>>,
) -> Result<Json<Vec<NodeData>>, ApiError> {
    Ok(Json(handler.nodes().await?))
}

/// GET /api/v1/nodes/{name}
async fn node_view<H: ApiHandler>(
    State(handler): State<Arc<H>>,
    Path(name): Path<String>,
) -> Result<Json<NodeView>, ApiError> {
    Ok(Json(handler.node(&name).await?))
}

/// GET /api/v1/settings
async fn get_settings<H: ApiHandler>(
    State(handler): State<Arc<H>>,
) -> Result<Json<ReportSettings>, ApiError> {
    Ok(Json(handler.settings().await?))
}

/// PUT /api/v1/settings
async fn put_settings<H: ApiHandler>(
    State(handler): State<Arc<H>>,
    Json(settings): Json<ReportSettings>,
) -> Result<Json<ReportSettings>, ApiError> {
    debug!(?settings, "settings update requested");
    Ok(Json(handler.update_settings(settings).await?))
}

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::regions::handlers;
use crate::features::regions::services::RegionService;

/// Public region lookups
pub fn routes(service: Arc<RegionService>) -> Router {
    Router::new()
        .route("/api/regions/kecamatan", get(handlers::list_kecamatan))
        .route(
            "/api/regions/kecamatan/{name}/desa",
            get(handlers::list_desa_in_kecamatan),
        )
        .with_state(service)
}

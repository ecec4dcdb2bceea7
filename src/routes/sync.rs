//! Trigger endpoints

use std::collections::HashMap;

use axum::{
    Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::get,
};
use calmirror_core::SyncConfig;
use tracing::info;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(sync))
        .route("/sync", get(sync))
        .route("/health", get(health))
}

/// GET /sync - Mirror the source calendar into the target calendar
async fn sync(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<&'static str, AppError> {
    let Query(pairs) = query?;
    let config = SyncConfig::from_params(&first_values(pairs))?;

    info!(
        source = %config.source_calendar,
        target = %config.target_calendar,
        prefix = %config.event_prefix,
        filter = config.event_filter(),
        public_only = config.public_only,
        "Sync started"
    );

    let report = state.executor().run_with_retry(&config).await?;

    info!(
        created = report.created,
        updated = report.updated,
        deleted = report.deleted,
        unchanged = report.unchanged,
        "Sync finished"
    );

    Ok("DONE")
}

/// Collapse query pairs into a map, keeping the first value of a repeated name.
fn first_values(pairs: Vec<(String, String)>) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for (name, value) in pairs {
        params.entry(name).or_insert(value);
    }
    params
}

/// GET /health
async fn health() -> &'static str {
    "OK"
}

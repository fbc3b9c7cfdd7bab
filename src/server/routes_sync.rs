use crate::context::AppContext;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use quotesync_common::Error;

pub const FETCH_FAILED_BODY: &str = "Failed to fetch quotes data from the content source.";

/// Run a full sync and answer once every author has been processed.
///
/// Only two statuses leave this handler: 200 with a confirmation, or 500
/// with a plain-text reason.
pub async fn trigger_sync(
    State(ctx): State<AppContext>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    match ctx.run_sync().await {
        Ok(report) => Ok((
            StatusCode::OK,
            format!(
                "Quotes and images updated successfully ({} authors processed).",
                report.authors_processed
            ),
        )),
        Err(Error::Fetch(reason)) => {
            tracing::error!("Sync aborted, dataset fetch failed: {}", reason);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                FETCH_FAILED_BODY.to_string(),
            ))
        }
        Err(e) => {
            tracing::error!("Sync run failed: {}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, format!("Sync failed: {}", e)))
        }
    }
}

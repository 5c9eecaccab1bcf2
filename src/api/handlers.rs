use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
};

use super::AppState;
use crate::errors::AppError;
use crate::models::token;
use crate::store::ReportStore;

/// GET /aprobar/:token: redeem an approval token
pub async fn approve_report(
    State(state): State<Arc<AppState>>,
    Path(token_value): Path<String>,
) -> Result<String, AppError> {
    if !token::is_well_formed(&token_value) {
        tracing::warn!("approve_report: malformed token");
        return Err(AppError::MalformedToken);
    }

    // Tokens are issued as lowercase hex; some mail clients upper-case links.
    let token_value = token_value.to_ascii_lowercase();
    let redemption = state.workflow.redeem(&token_value).await?;

    Ok(if redemption.published {
        "Report approved and published".to_string()
    } else {
        "Report approved".to_string()
    })
}

/// GET /readyz: 503 until the store answers
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.workflow.reports().ping().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(e) => {
            tracing::warn!("readiness check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "store unavailable")
        }
    }
}

/// GET /metrics: Prometheus text format
pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        crate::metrics::encode_metrics(),
    )
}

//! REST API handlers for the collection reporting dashboard
//!
//! These handlers use the shared ReportingService. Filter selections
//! arrive as query parameters; absent or empty parameters impose no
//! restriction.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::aggregate::GroupBy;
use crate::error::ReportError;
use crate::filter::FilterSelection;

use super::service::ReportingService;

type ApiError = (StatusCode, Json<serde_json::Value>);

fn load_failed(err: ReportError) -> ApiError {
    (
        StatusCode::BAD_GATEWAY,
        Json(json!({ "error": err.to_string() })),
    )
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// GET /api/v1/report — the full render pass.
pub async fn get_report(
    State(service): State<Arc<ReportingService>>,
    Query(selection): Query<FilterSelection>,
) -> Result<impl IntoResponse, ApiError> {
    let report = service.report(&selection).await.map_err(load_failed)?;
    Ok(Json(report))
}

/// GET /api/v1/kpis — scalar KPIs plus zone coverage.
pub async fn get_kpis(
    State(service): State<Arc<ReportingService>>,
    Query(selection): Query<FilterSelection>,
) -> Result<impl IntoResponse, ApiError> {
    let report = service.report(&selection).await.map_err(load_failed)?;
    Ok(Json(json!({
        "kpis": report.kpis,
        "zones_covered": report.zone_coverage.count(),
        "zone_realization_pct": report.zone_realization_pct,
    })))
}

/// GET /api/v1/pivot/teams — team leader x date cross-tabulation.
pub async fn get_team_pivot(
    State(service): State<Arc<ReportingService>>,
    Query(selection): Query<FilterSelection>,
) -> Result<impl IntoResponse, ApiError> {
    let report = service.report(&selection).await.map_err(load_failed)?;
    Ok(Json(report.team_pivot))
}

/// GET /api/v1/rollup/:group — department, supervisor or team-leader.
pub async fn get_rollup(
    State(service): State<Arc<ReportingService>>,
    Path(group): Path<String>,
    Query(selection): Query<FilterSelection>,
) -> Result<impl IntoResponse, ApiError> {
    let group_by = match group.as_str() {
        "department" => GroupBy::Department,
        "supervisor" => GroupBy::Supervisor,
        "team-leader" => GroupBy::TeamLeader,
        _ => {
            return Err((
                StatusCode::NOT_FOUND,
                Json(json!({ "error": format!("unknown rollup group: {group}") })),
            ))
        }
    };
    let report = service.report(&selection).await.map_err(load_failed)?;
    let table = match group_by {
        GroupBy::Department => report.by_department,
        GroupBy::Supervisor => report.by_supervisor,
        GroupBy::TeamLeader => report.by_team_leader,
    };
    Ok(Json(table))
}

/// GET /api/v1/agents — per-agent totals, long form.
pub async fn get_agents(
    State(service): State<Arc<ReportingService>>,
    Query(selection): Query<FilterSelection>,
) -> Result<impl IntoResponse, ApiError> {
    let report = service.report(&selection).await.map_err(load_failed)?;
    Ok(Json(report.agent_totals))
}

/// GET /api/v1/agents/daily — per-agent daily trend.
pub async fn get_agent_daily(
    State(service): State<Arc<ReportingService>>,
    Query(selection): Query<FilterSelection>,
) -> Result<impl IntoResponse, ApiError> {
    let report = service.report(&selection).await.map_err(load_failed)?;
    Ok(Json(report.agent_daily))
}

/// POST /api/v1/refresh — invalidate the loader cache.
pub async fn post_refresh(State(service): State<Arc<ReportingService>>) -> impl IntoResponse {
    let generation = service.refresh();
    Json(json!({ "status": "refreshed", "generation": generation }))
}

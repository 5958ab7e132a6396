// src/handlers/dashboard.rs

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::{
    common::error::AppError,
    config::AppState,
    models::dashboard::{
        AlertsReport, ChangeDashboard, DashboardOverview, HealthReport, IncidentDashboard, MetricsParams,
        MetricsReport, UserDashboard,
    },
};

// GET /api/dashboard/overview
#[utoipa::path(
    get,
    path = "/api/dashboard/overview",
    tag = "Dashboard",
    responses((status = 200, description = "Cards do topo e contagens por área", body = DashboardOverview))
)]
pub async fn get_overview(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let overview = app_state.dashboard_service.overview().await?;
    tracing::info!("Visão geral do dashboard consultada");

    Ok(Json(json!({ "data": overview })))
}

// GET /api/dashboard/incidentes
#[utoipa::path(
    get,
    path = "/api/dashboard/incidentes",
    tag = "Dashboard",
    responses((status = 200, description = "Painel de incidentes", body = IncidentDashboard))
)]
pub async fn get_incidents_dashboard(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let dashboard = app_state.dashboard_service.incidents().await?;
    tracing::info!("Dashboard de incidentes consultado");

    Ok(Json(json!({ "data": dashboard })))
}

// GET /api/dashboard/changes
#[utoipa::path(
    get,
    path = "/api/dashboard/changes",
    tag = "Dashboard",
    responses((status = 200, description = "Painel de changes", body = ChangeDashboard))
)]
pub async fn get_changes_dashboard(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let dashboard = app_state.dashboard_service.changes().await?;
    tracing::info!("Dashboard de changes consultado");

    Ok(Json(json!({ "data": dashboard })))
}

// GET /api/dashboard/usuarios
#[utoipa::path(
    get,
    path = "/api/dashboard/usuarios",
    tag = "Dashboard",
    responses((status = 200, description = "Painel de usuários", body = UserDashboard))
)]
pub async fn get_users_dashboard(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let dashboard = app_state.dashboard_service.users().await?;
    tracing::info!("Dashboard de usuários consultado");

    Ok(Json(json!({ "data": dashboard })))
}

// GET /api/dashboard/alerts
#[utoipa::path(
    get,
    path = "/api/dashboard/alerts",
    tag = "Dashboard",
    responses((status = 200, description = "Alertas ativos", body = AlertsReport))
)]
pub async fn get_alerts(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let report = app_state.dashboard_service.alerts().await?;
    tracing::info!("Alertas consultados: {}", report.total_alerts);

    Ok(Json(json!({ "data": report })))
}

// GET /api/dashboard/metrics?type=all&range=today
#[utoipa::path(
    get,
    path = "/api/dashboard/metrics",
    tag = "Dashboard",
    params(MetricsParams),
    responses((status = 200, description = "Métricas por área", body = MetricsReport))
)]
pub async fn get_metrics(
    State(app_state): State<AppState>,
    params: Result<Query<MetricsParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params?;
    let metric_type = params.metric_type.as_deref().filter(|t| !t.is_empty()).unwrap_or("all");
    let time_range = params.range.as_deref().filter(|r| !r.is_empty()).unwrap_or("today");

    let report = app_state.dashboard_service.metrics(metric_type, time_range).await?;
    tracing::info!("Métricas consultadas: tipo={}, período={}", metric_type, time_range);

    Ok(Json(json!({ "data": report })))
}

// GET /api/dashboard/health
#[utoipa::path(
    get,
    path = "/api/dashboard/health",
    tag = "Dashboard",
    responses((status = 200, description = "Situação de cada área", body = HealthReport))
)]
pub async fn get_health(State(app_state): State<AppState>) -> impl IntoResponse {
    let report = app_state.dashboard_service.health().await;
    if report.status != "healthy" {
        tracing::warn!("Dashboard com serviços indisponíveis: {:?}", report.services);
    }

    Json(json!({ "data": report }))
}

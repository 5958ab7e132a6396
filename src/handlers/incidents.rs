// src/handlers/incidents.rs

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::{
    common::{
        error::AppError,
        pagination::{PageParams, Pagination},
        validation::parse_id,
    },
    config::AppState,
    models::incident::{
        AssignIncidentPayload, CreateIncidentPayload, Incident, IncidentFilterParams, IncidentStats,
        IncidentStatusPayload, UpdateIncidentPayload,
    },
};

// GET /api/incidentes
#[utoipa::path(
    get,
    path = "/api/incidentes",
    tag = "Incidentes",
    params(PageParams, IncidentFilterParams),
    responses(
        (status = 200, description = "Lista paginada de incidentes", body = [Incident]),
        (status = 400, description = "Parâmetros inválidos")
    )
)]
pub async fn list_incidents(
    State(app_state): State<AppState>,
    page: Result<Query<PageParams>, QueryRejection>,
    params: Result<Query<IncidentFilterParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(page) = page?;
    let Query(params) = params?;

    let pagination = Pagination::from(page);
    let filter = params.to_filter();

    let incidents = app_state.incident_service.list(&filter, pagination).await?;
    let total = app_state.incident_service.count(&filter).await?;

    tracing::info!("Listados {} incidentes com filtros: {:?}", incidents.len(), filter);

    Ok(Json(json!({
        "data": incidents,
        "pagination": pagination.info(total),
        "filters": params.echo(),
    })))
}

// POST /api/incidentes
#[utoipa::path(
    post,
    path = "/api/incidentes",
    tag = "Incidentes",
    request_body = CreateIncidentPayload,
    responses(
        (status = 201, description = "Incidente criado", body = Incident),
        (status = 400, description = "Dados inválidos ou número duplicado")
    )
)]
pub async fn create_incident(
    State(app_state): State<AppState>,
    payload: Result<Json<CreateIncidentPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;

    let incident = app_state.incident_service.create(payload).await?;
    tracing::info!("Incidente criado com sucesso: {}", incident.numero);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Incidente criado com sucesso",
            "data": incident,
        })),
    ))
}

// GET /api/incidentes/{id}
#[utoipa::path(
    get,
    path = "/api/incidentes/{id}",
    tag = "Incidentes",
    params(("id" = String, Path, description = "ID do incidente")),
    responses(
        (status = 200, description = "Incidente encontrado", body = Incident),
        (status = 400, description = "ID inválido"),
        (status = 404, description = "Incidente não encontrado")
    )
)]
pub async fn get_incident(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id, "incidente")?;

    let incident = app_state.incident_service.get(id).await?;
    tracing::info!("Incidente consultado: {}", incident.numero);

    Ok(Json(json!({ "data": incident })))
}

// PUT /api/incidentes/{id}
#[utoipa::path(
    put,
    path = "/api/incidentes/{id}",
    tag = "Incidentes",
    params(("id" = String, Path, description = "ID do incidente")),
    request_body = UpdateIncidentPayload,
    responses(
        (status = 200, description = "Incidente atualizado", body = Incident),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Incidente não encontrado")
    )
)]
pub async fn update_incident(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateIncidentPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id, "incidente")?;
    let Json(payload) = payload?;

    let incident = app_state.incident_service.update(id, payload).await?;
    tracing::info!("Incidente atualizado: {}", incident.numero);

    Ok(Json(json!({
        "message": "Incidente atualizado com sucesso",
        "data": incident,
    })))
}

// DELETE /api/incidentes/{id}
#[utoipa::path(
    delete,
    path = "/api/incidentes/{id}",
    tag = "Incidentes",
    params(("id" = String, Path, description = "ID do incidente")),
    responses(
        (status = 200, description = "Incidente removido"),
        (status = 404, description = "Incidente não encontrado")
    )
)]
pub async fn delete_incident(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id, "incidente")?;

    app_state.incident_service.delete(id).await?;
    tracing::info!("Incidente deletado: {}", id);

    Ok(Json(json!({ "message": "Incidente deletado com sucesso" })))
}

// PATCH /api/incidentes/{id}/status
#[utoipa::path(
    patch,
    path = "/api/incidentes/{id}/status",
    tag = "Incidentes",
    params(("id" = String, Path, description = "ID do incidente")),
    request_body = IncidentStatusPayload,
    responses(
        (status = 200, description = "Status atualizado", body = Incident),
        (status = 400, description = "Status ausente ou inválido"),
        (status = 404, description = "Incidente não encontrado")
    )
)]
pub async fn update_incident_status(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<IncidentStatusPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id, "incidente")?;
    let Json(payload) = payload?;

    let incident = app_state
        .incident_service
        .update_status(id, payload.status.as_deref())
        .await?;
    tracing::info!("Status do incidente {} atualizado para: {}", incident.numero, incident.status);

    Ok(Json(json!({
        "message": "Status do incidente atualizado com sucesso",
        "data": incident,
    })))
}

// PATCH /api/incidentes/{id}/assign
#[utoipa::path(
    patch,
    path = "/api/incidentes/{id}/assign",
    tag = "Incidentes",
    params(("id" = String, Path, description = "ID do incidente")),
    request_body = AssignIncidentPayload,
    responses(
        (status = 200, description = "Incidente atribuído", body = Incident),
        (status = 400, description = "Responsável ausente"),
        (status = 404, description = "Incidente não encontrado")
    )
)]
pub async fn assign_incident(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<AssignIncidentPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id, "incidente")?;
    let Json(payload) = payload?;

    let incident = app_state.incident_service.assign(id, payload).await?;
    tracing::info!(
        "Incidente {} atribuído para: {}",
        incident.numero,
        incident.atribuido.as_deref().unwrap_or_default()
    );

    Ok(Json(json!({
        "message": "Incidente atribuído com sucesso",
        "data": incident,
    })))
}

// GET /api/incidentes/stats/summary
#[utoipa::path(
    get,
    path = "/api/incidentes/stats/summary",
    tag = "Incidentes",
    responses((status = 200, description = "Contagens por fila, prioridade e status", body = IncidentStats))
)]
pub async fn incident_stats(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.incident_service.stats().await?;
    tracing::info!("Estatísticas de incidentes consultadas");

    Ok(Json(json!({ "data": stats })))
}

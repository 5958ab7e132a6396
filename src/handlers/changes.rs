// src/handlers/changes.rs

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
    models::change::{
        Change, ChangeFilterParams, ChangeStats, ChangeStatusPayload, CreateChangePayload, UpcomingParams,
        UpdateChangePayload,
    },
};

// GET /api/changes
#[utoipa::path(
    get,
    path = "/api/changes",
    tag = "Changes",
    params(PageParams, ChangeFilterParams),
    responses(
        (status = 200, description = "Lista paginada de changes", body = [Change]),
        (status = 400, description = "Parâmetros inválidos")
    )
)]
pub async fn list_changes(
    State(app_state): State<AppState>,
    page: Result<Query<PageParams>, QueryRejection>,
    params: Result<Query<ChangeFilterParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(page) = page?;
    let Query(params) = params?;

    let pagination = Pagination::from(page);
    let filter = params.to_filter();

    let changes = app_state.change_service.list(&filter, pagination).await?;
    let total = app_state.change_service.count(&filter).await?;

    tracing::info!("Listadas {} changes com filtros: {:?}", changes.len(), filter);

    Ok(Json(json!({
        "data": changes,
        "pagination": pagination.info(total),
        "filters": params.echo(),
    })))
}

// POST /api/changes
#[utoipa::path(
    post,
    path = "/api/changes",
    tag = "Changes",
    request_body = CreateChangePayload,
    responses(
        (status = 201, description = "Change criada", body = Change),
        (status = 400, description = "Dados inválidos ou número duplicado")
    )
)]
pub async fn create_change(
    State(app_state): State<AppState>,
    payload: Result<Json<CreateChangePayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;

    let change = app_state.change_service.create(payload).await?;
    tracing::info!("Change criada com sucesso: {}", change.numero);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Change criada com sucesso",
            "data": change,
        })),
    ))
}

// GET /api/changes/{id}
#[utoipa::path(
    get,
    path = "/api/changes/{id}",
    tag = "Changes",
    params(("id" = String, Path, description = "ID da change")),
    responses(
        (status = 200, description = "Change encontrada", body = Change),
        (status = 400, description = "ID inválido"),
        (status = 404, description = "Change não encontrada")
    )
)]
pub async fn get_change(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id, "change")?;

    let change = app_state.change_service.get(id).await?;
    tracing::info!("Change consultada: {}", change.numero);

    Ok(Json(json!({ "data": change })))
}

// PUT /api/changes/{id}
#[utoipa::path(
    put,
    path = "/api/changes/{id}",
    tag = "Changes",
    params(("id" = String, Path, description = "ID da change")),
    request_body = UpdateChangePayload,
    responses(
        (status = 200, description = "Change atualizada", body = Change),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Change não encontrada")
    )
)]
pub async fn update_change(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateChangePayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id, "change")?;
    let Json(payload) = payload?;

    let change = app_state.change_service.update(id, payload).await?;
    tracing::info!("Change atualizada: {}", change.numero);

    Ok(Json(json!({
        "message": "Change atualizada com sucesso",
        "data": change,
    })))
}

// DELETE /api/changes/{id}
#[utoipa::path(
    delete,
    path = "/api/changes/{id}",
    tag = "Changes",
    params(("id" = String, Path, description = "ID da change")),
    responses(
        (status = 200, description = "Change removida"),
        (status = 404, description = "Change não encontrada")
    )
)]
pub async fn delete_change(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id, "change")?;

    app_state.change_service.delete(id).await?;
    tracing::info!("Change deletada: {}", id);

    Ok(Json(json!({ "message": "Change deletada com sucesso" })))
}

// PATCH /api/changes/{id}/status
#[utoipa::path(
    patch,
    path = "/api/changes/{id}/status",
    tag = "Changes",
    params(("id" = String, Path, description = "ID da change")),
    request_body = ChangeStatusPayload,
    responses(
        (status = 200, description = "Status atualizado", body = Change),
        (status = 400, description = "Status ausente ou inválido"),
        (status = 404, description = "Change não encontrada")
    )
)]
pub async fn update_change_status(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ChangeStatusPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id, "change")?;
    let Json(payload) = payload?;

    let change = app_state
        .change_service
        .update_status(id, payload.status.as_deref())
        .await?;
    tracing::info!("Status da change {} atualizado para: {}", change.numero, change.status);

    Ok(Json(json!({
        "message": "Status da change atualizado com sucesso",
        "data": change,
    })))
}

// PATCH /api/changes/{id}/approve
#[utoipa::path(
    patch,
    path = "/api/changes/{id}/approve",
    tag = "Changes",
    params(("id" = String, Path, description = "ID da change")),
    responses(
        (status = 200, description = "Change aprovada", body = Change),
        (status = 404, description = "Change não encontrada")
    )
)]
pub async fn approve_change(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id, "change")?;

    let change = app_state.change_service.approve(id).await?;
    tracing::info!("Change aprovada: {}", change.numero);

    Ok(Json(json!({
        "message": "Change aprovada com sucesso",
        "data": change,
    })))
}

// PATCH /api/changes/{id}/start
#[utoipa::path(
    patch,
    path = "/api/changes/{id}/start",
    tag = "Changes",
    params(("id" = String, Path, description = "ID da change")),
    responses(
        (status = 200, description = "Change em execução", body = Change),
        (status = 404, description = "Change não encontrada")
    )
)]
pub async fn start_change(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id, "change")?;

    let change = app_state.change_service.start(id).await?;
    tracing::info!("Change iniciada: {}", change.numero);

    Ok(Json(json!({
        "message": "Change iniciada com sucesso",
        "data": change,
    })))
}

// PATCH /api/changes/{id}/complete
#[utoipa::path(
    patch,
    path = "/api/changes/{id}/complete",
    tag = "Changes",
    params(("id" = String, Path, description = "ID da change")),
    responses(
        (status = 200, description = "Change concluída", body = Change),
        (status = 404, description = "Change não encontrada")
    )
)]
pub async fn complete_change(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id, "change")?;

    let change = app_state.change_service.complete(id).await?;
    tracing::info!("Change concluída: {}", change.numero);

    Ok(Json(json!({
        "message": "Change concluída com sucesso",
        "data": change,
    })))
}

// GET /api/changes/upcoming?days=7
#[utoipa::path(
    get,
    path = "/api/changes/upcoming",
    tag = "Changes",
    params(UpcomingParams),
    responses((status = 200, description = "Changes aprovadas ou em execução nos próximos dias", body = [Change]))
)]
pub async fn upcoming_changes(
    State(app_state): State<AppState>,
    params: Result<Query<UpcomingParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params?;
    let days = params.days();

    let changes = app_state.change_service.upcoming(days).await?;
    tracing::info!("Consultadas {} changes programadas para os próximos {} dias", changes.len(), days);

    Ok(Json(json!({
        "data": changes,
        "days": days,
        "total": changes.len(),
    })))
}

// GET /api/changes/stats/summary
#[utoipa::path(
    get,
    path = "/api/changes/stats/summary",
    tag = "Changes",
    responses((status = 200, description = "Contagens por status", body = ChangeStats))
)]
pub async fn change_stats(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.change_service.stats().await?;
    tracing::info!("Estatísticas de changes consultadas");

    Ok(Json(json!({ "data": stats })))
}

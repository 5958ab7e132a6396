// src/handlers/users.rs

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
    middleware::auth::AuthenticatedUser,
    models::user::{
        ChangePasswordPayload, CreateUserPayload, LoginPayload, LoginResponse, UpdateUserPayload, User,
        UserFilterParams, UserStats,
    },
};

// GET /api/usuarios
#[utoipa::path(
    get,
    path = "/api/usuarios",
    tag = "Usuários",
    params(PageParams, UserFilterParams),
    responses(
        (status = 200, description = "Lista paginada de usuários", body = [User]),
        (status = 400, description = "Parâmetros inválidos")
    )
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    page: Result<Query<PageParams>, QueryRejection>,
    params: Result<Query<UserFilterParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(page) = page?;
    let Query(params) = params?;

    let pagination = Pagination::from(page);
    let filter = params.to_filter();

    let users = app_state.user_service.list(&filter, pagination).await?;
    let total = app_state.user_service.count(&filter).await?;

    tracing::info!("Listados {} usuários com filtros: {:?}", users.len(), filter);

    Ok(Json(json!({
        "data": users,
        "pagination": pagination.info(total),
        "filters": params.echo(),
    })))
}

// POST /api/usuarios
#[utoipa::path(
    post,
    path = "/api/usuarios",
    tag = "Usuários",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "Usuário criado", body = User),
        (status = 400, description = "Dados inválidos, username ou e-mail duplicado")
    )
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    payload: Result<Json<CreateUserPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;

    let user = app_state.user_service.create(payload).await?;
    tracing::info!("Usuário criado com sucesso: {}", user.username);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Usuário criado com sucesso",
            "data": user,
        })),
    ))
}

// GET /api/usuarios/{id}
#[utoipa::path(
    get,
    path = "/api/usuarios/{id}",
    tag = "Usuários",
    params(("id" = String, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Usuário encontrado", body = User),
        (status = 400, description = "ID inválido"),
        (status = 404, description = "Usuário não encontrado")
    )
)]
pub async fn get_user(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id, "usuário")?;

    let user = app_state.user_service.get(id).await?;
    tracing::info!("Usuário consultado: {}", user.username);

    Ok(Json(json!({ "data": user })))
}

// PUT /api/usuarios/{id}
#[utoipa::path(
    put,
    path = "/api/usuarios/{id}",
    tag = "Usuários",
    params(("id" = String, Path, description = "ID do usuário")),
    request_body = UpdateUserPayload,
    responses(
        (status = 200, description = "Usuário atualizado", body = User),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Usuário não encontrado")
    )
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id, "usuário")?;
    let Json(payload) = payload?;

    let user = app_state.user_service.update(id, payload).await?;
    tracing::info!("Usuário atualizado: {}", user.username);

    Ok(Json(json!({
        "message": "Usuário atualizado com sucesso",
        "data": user,
    })))
}

// DELETE /api/usuarios/{id}
#[utoipa::path(
    delete,
    path = "/api/usuarios/{id}",
    tag = "Usuários",
    params(("id" = String, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Usuário removido"),
        (status = 404, description = "Usuário não encontrado")
    )
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id, "usuário")?;

    app_state.user_service.delete(id).await?;
    tracing::info!("Usuário deletado: {}", id);

    Ok(Json(json!({ "message": "Usuário deletado com sucesso" })))
}

// PATCH /api/usuarios/{id}/activate
#[utoipa::path(
    patch,
    path = "/api/usuarios/{id}/activate",
    tag = "Usuários",
    params(("id" = String, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Usuário ativado", body = User),
        (status = 404, description = "Usuário não encontrado")
    )
)]
pub async fn activate_user(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id, "usuário")?;

    let user = app_state.user_service.activate(id).await?;
    tracing::info!("Usuário ativado: {}", user.username);

    Ok(Json(json!({
        "message": "Usuário ativado com sucesso",
        "data": user,
    })))
}

// PATCH /api/usuarios/{id}/deactivate
#[utoipa::path(
    patch,
    path = "/api/usuarios/{id}/deactivate",
    tag = "Usuários",
    params(("id" = String, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Usuário desativado", body = User),
        (status = 404, description = "Usuário não encontrado")
    )
)]
pub async fn deactivate_user(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id, "usuário")?;

    let user = app_state.user_service.deactivate(id).await?;
    tracing::info!("Usuário desativado: {}", user.username);

    Ok(Json(json!({
        "message": "Usuário desativado com sucesso",
        "data": user,
    })))
}

// PATCH /api/usuarios/{id}/change-password
#[utoipa::path(
    patch,
    path = "/api/usuarios/{id}/change-password",
    tag = "Usuários",
    params(("id" = String, Path, description = "ID do usuário")),
    request_body = ChangePasswordPayload,
    responses(
        (status = 200, description = "Senha alterada"),
        (status = 400, description = "Nova senha inválida"),
        (status = 401, description = "Senha atual incorreta"),
        (status = 404, description = "Usuário não encontrado")
    )
)]
pub async fn change_password(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ChangePasswordPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id, "usuário")?;
    let Json(payload) = payload?;

    app_state.user_service.change_password(id, payload).await?;
    tracing::info!("Senha alterada para o usuário: {}", id);

    Ok(Json(json!({ "message": "Senha alterada com sucesso" })))
}

// POST /api/usuarios/login
#[utoipa::path(
    post,
    path = "/api/usuarios/login",
    tag = "Usuários",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Login bem-sucedido", body = LoginResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    payload: Result<Json<LoginPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;

    let response = app_state.user_service.authenticate(payload).await?;
    tracing::info!("Login realizado: {}", response.usuario.username);

    Ok(Json(json!({
        "message": "Login realizado com sucesso",
        "data": response,
    })))
}

// GET /api/usuarios/profile
#[utoipa::path(
    get,
    path = "/api/usuarios/profile",
    tag = "Usuários",
    responses(
        (status = 200, description = "Usuário do token", body = User),
        (status = 401, description = "Token ausente ou inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_profile(AuthenticatedUser(user): AuthenticatedUser) -> Result<impl IntoResponse, AppError> {
    tracing::info!("Perfil consultado: {}", user.username);
    Ok(Json(json!({ "data": user })))
}

// GET /api/usuarios/stats/summary
#[utoipa::path(
    get,
    path = "/api/usuarios/stats/summary",
    tag = "Usuários",
    responses((status = 200, description = "Contagens de usuários", body = UserStats))
)]
pub async fn user_stats(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.user_service.stats().await?;
    tracing::info!("Estatísticas de usuários consultadas");

    Ok(Json(json!({ "data": stats })))
}

// GET /api/usuarios/groups
#[utoipa::path(
    get,
    path = "/api/usuarios/groups",
    tag = "Usuários",
    responses((status = 200, description = "Grupos disponíveis", body = [String]))
)]
pub async fn list_groups(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "data": app_state.user_service.groups() }))
}

// src/handlers/system.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use utoipa::OpenApi;

use crate::{config::AppState, docs::ApiDoc};

const AVAILABLE_ENDPOINTS: [&str; 4] = ["/api/incidentes", "/api/changes", "/api/usuarios", "/api/dashboard"];

// GET /
pub async fn root(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "message": format!("Bem-vindo ao {}", app_state.config.app_name),
        "version": env!("CARGO_PKG_VERSION"),
        "status": "online",
        "endpoints": {
            "incidentes": "/api/incidentes",
            "changes": "/api/changes",
            "usuarios": "/api/usuarios",
            "dashboard": "/api/dashboard",
            "health": "/health",
        },
        "documentation": "/api-docs/openapi.json",
    }))
}

// GET /health
pub async fn health(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": app_state.config.app_name,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// GET /api
pub async fn api_info(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "api_name": app_state.config.app_name,
        "version": env!("CARGO_PKG_VERSION"),
        "description": "API para gerenciamento de incidentes, changes e usuários",
        "endpoints": {
            "incidentes": {
                "list": "GET /api/incidentes",
                "create": "POST /api/incidentes",
                "get": "GET /api/incidentes/{id}",
                "update": "PUT /api/incidentes/{id}",
                "delete": "DELETE /api/incidentes/{id}",
                "stats": "GET /api/incidentes/stats/summary",
            },
            "changes": {
                "list": "GET /api/changes",
                "create": "POST /api/changes",
                "get": "GET /api/changes/{id}",
                "update": "PUT /api/changes/{id}",
                "delete": "DELETE /api/changes/{id}",
                "upcoming": "GET /api/changes/upcoming",
                "stats": "GET /api/changes/stats/summary",
            },
            "usuarios": {
                "list": "GET /api/usuarios",
                "create": "POST /api/usuarios",
                "get": "GET /api/usuarios/{id}",
                "update": "PUT /api/usuarios/{id}",
                "delete": "DELETE /api/usuarios/{id}",
                "login": "POST /api/usuarios/login",
                "profile": "GET /api/usuarios/profile",
                "stats": "GET /api/usuarios/stats/summary",
            },
            "dashboard": {
                "overview": "GET /api/dashboard/overview",
                "incidentes": "GET /api/dashboard/incidentes",
                "changes": "GET /api/dashboard/changes",
                "usuarios": "GET /api/dashboard/usuarios",
                "alerts": "GET /api/dashboard/alerts",
                "metrics": "GET /api/dashboard/metrics",
                "health": "GET /api/dashboard/health",
            },
        },
    }))
}

// GET /api-docs/openapi.json
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

// Rotas desconhecidas
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Endpoint não encontrado",
            "message": "O endpoint solicitado não existe",
            "type": "not_found",
            "available_endpoints": AVAILABLE_ENDPOINTS,
        })),
    )
}

// Método não suportado pela rota
pub async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({
            "error": "Método não permitido",
            "message": "O método HTTP não é permitido para este endpoint",
            "type": "method_not_allowed",
        })),
    )
}

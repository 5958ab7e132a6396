// src/routes.rs

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::{AppState, Config},
    handlers::{changes, dashboard, incidents, system, users},
    middleware::auth::auth_guard,
};

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Origem CORS ignorada: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

// Monta o router principal da aplicação
pub fn router(app_state: AppState) -> Router {
    let incident_routes = Router::new()
        .route("/", get(incidents::list_incidents).post(incidents::create_incident))
        .route("/stats/summary", get(incidents::incident_stats))
        .route(
            "/{id}",
            get(incidents::get_incident)
                .put(incidents::update_incident)
                .delete(incidents::delete_incident),
        )
        .route("/{id}/status", patch(incidents::update_incident_status))
        .route("/{id}/assign", patch(incidents::assign_incident));

    let change_routes = Router::new()
        .route("/", get(changes::list_changes).post(changes::create_change))
        .route("/upcoming", get(changes::upcoming_changes))
        .route("/stats/summary", get(changes::change_stats))
        .route(
            "/{id}",
            get(changes::get_change)
                .put(changes::update_change)
                .delete(changes::delete_change),
        )
        .route("/{id}/status", patch(changes::update_change_status))
        .route("/{id}/approve", patch(changes::approve_change))
        .route("/{id}/start", patch(changes::start_change))
        .route("/{id}/complete", patch(changes::complete_change));

    // Só o perfil exige token; o route_layer cobre apenas as rotas declaradas antes dele
    let user_routes = Router::new()
        .route("/profile", get(users::get_profile))
        .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard))
        .route("/", get(users::list_users).post(users::create_user))
        .route("/login", post(users::login))
        .route("/groups", get(users::list_groups))
        .route("/stats/summary", get(users::user_stats))
        .route(
            "/{id}",
            get(users::get_user).put(users::update_user).delete(users::delete_user),
        )
        .route("/{id}/activate", patch(users::activate_user))
        .route("/{id}/deactivate", patch(users::deactivate_user))
        .route("/{id}/change-password", patch(users::change_password));

    let dashboard_routes = Router::new()
        .route("/overview", get(dashboard::get_overview))
        .route("/incidentes", get(dashboard::get_incidents_dashboard))
        .route("/changes", get(dashboard::get_changes_dashboard))
        .route("/usuarios", get(dashboard::get_users_dashboard))
        .route("/alerts", get(dashboard::get_alerts))
        .route("/metrics", get(dashboard::get_metrics))
        .route("/health", get(dashboard::get_health));

    let cors = cors_layer(&app_state.config);

    Router::new()
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .route("/api", get(system::api_info))
        .route("/api-docs/openapi.json", get(system::openapi_json))
        .nest("/api/incidentes", incident_routes)
        .nest("/api/changes", change_routes)
        .nest("/api/usuarios", user_routes)
        .nest("/api/dashboard", dashboard_routes)
        .fallback(system::not_found)
        .method_not_allowed_fallback(system::method_not_allowed)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

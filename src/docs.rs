// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::common;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(title = "Sistema de Chamados API", description = "Incidentes, changes e usuários"),
    paths(
        // --- Incidentes ---
        handlers::incidents::list_incidents,
        handlers::incidents::create_incident,
        handlers::incidents::get_incident,
        handlers::incidents::update_incident,
        handlers::incidents::delete_incident,
        handlers::incidents::update_incident_status,
        handlers::incidents::assign_incident,
        handlers::incidents::incident_stats,

        // --- Changes ---
        handlers::changes::list_changes,
        handlers::changes::create_change,
        handlers::changes::get_change,
        handlers::changes::update_change,
        handlers::changes::delete_change,
        handlers::changes::update_change_status,
        handlers::changes::approve_change,
        handlers::changes::start_change,
        handlers::changes::complete_change,
        handlers::changes::upcoming_changes,
        handlers::changes::change_stats,

        // --- Usuários ---
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::users::get_user,
        handlers::users::update_user,
        handlers::users::delete_user,
        handlers::users::activate_user,
        handlers::users::deactivate_user,
        handlers::users::change_password,
        handlers::users::login,
        handlers::users::get_profile,
        handlers::users::user_stats,
        handlers::users::list_groups,

        // --- Dashboard ---
        handlers::dashboard::get_overview,
        handlers::dashboard::get_incidents_dashboard,
        handlers::dashboard::get_changes_dashboard,
        handlers::dashboard::get_users_dashboard,
        handlers::dashboard::get_alerts,
        handlers::dashboard::get_metrics,
        handlers::dashboard::get_health,
    ),
    components(
        schemas(
            common::pagination::PageInfo,

            // --- Enums ---
            models::enums::Prioridade,
            models::enums::IncidentStatus,
            models::enums::TipoTarefa,
            models::enums::ChangeTipo,
            models::enums::ChangeStatus,
            models::enums::Impacto,
            models::enums::UserGroup,

            // --- Incidentes ---
            models::incident::Incident,
            models::incident::CreateIncidentPayload,
            models::incident::UpdateIncidentPayload,
            models::incident::IncidentStatusPayload,
            models::incident::AssignIncidentPayload,
            models::incident::IncidentStats,

            // --- Changes ---
            models::change::Change,
            models::change::CreateChangePayload,
            models::change::UpdateChangePayload,
            models::change::ChangeStatusPayload,
            models::change::ChangeStats,

            // --- Usuários ---
            models::user::User,
            models::user::CreateUserPayload,
            models::user::UpdateUserPayload,
            models::user::LoginPayload,
            models::user::ChangePasswordPayload,
            models::user::LoginResponse,
            models::user::UserStats,

            // --- Dashboard ---
            models::dashboard::OverviewCounts,
            models::dashboard::DashboardOverview,
            models::dashboard::IncidentSummary,
            models::dashboard::IncidentDashboard,
            models::dashboard::ChangeSummary,
            models::dashboard::ChangeDashboard,
            models::dashboard::UserSummary,
            models::dashboard::UserDashboard,
            models::dashboard::Alert,
            models::dashboard::AlertsReport,
            models::dashboard::MetricsReport,
            models::dashboard::HealthReport,
        )
    ),
    tags(
        (name = "Incidentes", description = "Registro e acompanhamento de incidentes"),
        (name = "Changes", description = "Mudanças programadas e seu ciclo de aprovação"),
        (name = "Usuários", description = "Cadastro, login e perfil"),
        (name = "Dashboard", description = "Indicadores agregados e alertas")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

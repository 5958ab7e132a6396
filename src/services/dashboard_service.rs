// src/services/dashboard_service.rs
//
// Agregados prontos para o frontend, montados a partir das estatísticas de cada service.

use std::collections::BTreeMap;

use chrono::Utc;

use crate::{
    common::error::AppError,
    models::{
        dashboard::{
            percentage, Alert, AlertsReport, ChangeDashboard, ChangeSummary, DashboardOverview, HealthReport,
            IncidentDashboard, IncidentSummary, MetricsReport, OverviewCounts, UserDashboard, UserSummary,
        },
        enums::{IncidentStatus, Prioridade},
    },
    services::{change_service::ChangeService, incident_service::IncidentService, user_service::UserService},
};

// Limites que disparam alertas
const CRITICAL_INCIDENTS_THRESHOLD: i64 = 5;
const PENDING_CHANGES_THRESHOLD: i64 = 10;
const IN_PROGRESS_INCIDENTS_THRESHOLD: i64 = 20;

#[derive(Clone)]
pub struct DashboardService {
    incidents: IncidentService,
    changes: ChangeService,
    users: UserService,
}

impl DashboardService {
    pub fn new(incidents: IncidentService, changes: ChangeService, users: UserService) -> Self {
        Self { incidents, changes, users }
    }

    pub async fn overview(&self) -> Result<DashboardOverview, AppError> {
        let incidents = self.incidents.stats().await?;
        let changes = self.changes.stats().await?;
        let users = self.users.stats().await?;

        Ok(DashboardOverview {
            overview: OverviewCounts {
                total_incidents: incidents.total(),
                total_changes: changes.total_changes,
                total_users: users.total_usuarios,
                critical_incidents: incidents.prioridade(Prioridade::Critica),
                high_priority_incidents: incidents.prioridade(Prioridade::Alta),
            },
            incidents,
            changes,
            users,
        })
    }

    pub async fn incidents(&self) -> Result<IncidentDashboard, AppError> {
        let details = self.incidents.stats().await?;
        let total = details.total();

        Ok(IncidentDashboard {
            summary: IncidentSummary {
                total_incidents: total,
                critical_percentage: percentage(details.prioridade(Prioridade::Critica), total),
                high_percentage: percentage(details.prioridade(Prioridade::Alta), total),
                in_progress_percentage: percentage(details.por_status(IncidentStatus::EmAndamento), total),
            },
            details,
        })
    }

    pub async fn changes(&self) -> Result<ChangeDashboard, AppError> {
        let details = self.changes.stats().await?;
        let total = details.total_changes;

        Ok(ChangeDashboard {
            summary: ChangeSummary {
                total_changes: total,
                pending_percentage: percentage(details.changes_pendentes, total),
                approved_percentage: percentage(details.changes_aprovadas, total),
                in_execution_percentage: percentage(details.changes_execucao, total),
                completed_percentage: percentage(details.changes_concluidas, total),
            },
            details,
        })
    }

    pub async fn users(&self) -> Result<UserDashboard, AppError> {
        let details = self.users.stats().await?;

        Ok(UserDashboard {
            summary: UserSummary {
                total_users: details.total_usuarios,
                active_users: details.usuarios_ativos,
                active_percentage: percentage(details.usuarios_ativos, details.total_usuarios),
            },
            details,
        })
    }

    pub async fn alerts(&self) -> Result<AlertsReport, AppError> {
        let incidents = self.incidents.stats().await?;
        let changes = self.changes.stats().await?;

        let alerts = build_alerts(
            incidents.prioridade(Prioridade::Critica),
            changes.changes_pendentes,
            incidents.por_status(IncidentStatus::EmAndamento),
        );

        Ok(AlertsReport { total_alerts: alerts.len(), alerts })
    }

    /// `metric_type`: all, incidents, changes ou users. Qualquer outro valor não traz nenhuma área.
    pub async fn metrics(&self, metric_type: &str, time_range: &str) -> Result<MetricsReport, AppError> {
        let wants = |area: &str| metric_type == "all" || metric_type == area;

        let incidents = if wants("incidents") { Some(self.incidents.stats().await?) } else { None };
        let changes = if wants("changes") { Some(self.changes.stats().await?) } else { None };
        let users = if wants("users") { Some(self.users.stats().await?) } else { None };

        Ok(MetricsReport {
            metric_type: metric_type.to_string(),
            time_range: time_range.to_string(),
            incidents,
            changes,
            users,
        })
    }

    /// Consulta cada store; um store fora do ar deixa o sistema `degraded`.
    pub async fn health(&self) -> HealthReport {
        let mut services = BTreeMap::new();
        let checks = [
            ("incidents", self.incidents.ping().await),
            ("changes", self.changes.ping().await),
            ("users", self.users.ping().await),
        ];

        let mut healthy = true;
        for (name, result) in checks {
            let state = match result {
                Ok(()) => "operational",
                Err(e) => {
                    tracing::error!("Health check de {} falhou: {}", name, e);
                    healthy = false;
                    "unavailable"
                }
            };
            services.insert(name.to_string(), state.to_string());
        }
        let database = if healthy { "operational" } else { "unavailable" };
        services.insert("database".to_string(), database.to_string());

        HealthReport {
            status: if healthy { "healthy" } else { "degraded" }.to_string(),
            timestamp: Utc::now(),
            services,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

fn build_alerts(critical_incidents: i64, pending_changes: i64, in_progress_incidents: i64) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if critical_incidents > CRITICAL_INCIDENTS_THRESHOLD {
        alerts.push(Alert {
            kind: "critical".into(),
            message: format!("Alto número de incidentes críticos: {}", critical_incidents),
            category: "incident".into(),
            priority: "high".into(),
        });
    }
    if pending_changes > PENDING_CHANGES_THRESHOLD {
        alerts.push(Alert {
            kind: "warning".into(),
            message: format!("Muitas changes pendentes: {}", pending_changes),
            category: "change".into(),
            priority: "medium".into(),
        });
    }
    if in_progress_incidents > IN_PROGRESS_INCIDENTS_THRESHOLD {
        alerts.push(Alert {
            kind: "info".into(),
            message: format!("Muitos incidentes em andamento: {}", in_progress_incidents),
            category: "incident".into(),
            priority: "low".into(),
        });
    }

    alerts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alerts_fire_only_above_thresholds() {
        assert!(build_alerts(5, 10, 20).is_empty());

        let alerts = build_alerts(6, 11, 21);
        let kinds: Vec<&str> = alerts.iter().map(|a| a.kind.as_str()).collect();
        assert_eq!(kinds, ["critical", "warning", "info"]);
        assert_eq!(alerts[0].message, "Alto número de incidentes críticos: 6");
    }
}

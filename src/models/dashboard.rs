// src/models/dashboard.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::change::ChangeStats;
use crate::models::incident::IncidentStats;
use crate::models::user::UserStats;

/// Percentual com duas casas decimais; total zero dá 0.
pub fn percentage(part: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    ((part as f64 / total as f64) * 100.0 * 100.0).round() / 100.0
}

// 1. Visão geral (os cards do topo)
#[derive(Debug, Serialize, ToSchema)]
pub struct OverviewCounts {
    pub total_incidents: i64,
    pub total_changes: i64,
    pub total_users: i64,
    pub critical_incidents: i64,
    pub high_priority_incidents: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardOverview {
    pub overview: OverviewCounts,
    pub incidents: IncidentStats,
    pub changes: ChangeStats,
    pub users: UserStats,
}

// 2. Painéis por área: resumo percentual + contagens brutas
#[derive(Debug, Serialize, ToSchema)]
pub struct IncidentSummary {
    pub total_incidents: i64,
    pub critical_percentage: f64,
    pub high_percentage: f64,
    pub in_progress_percentage: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IncidentDashboard {
    pub summary: IncidentSummary,
    pub details: IncidentStats,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChangeSummary {
    pub total_changes: i64,
    pub pending_percentage: f64,
    pub approved_percentage: f64,
    pub in_execution_percentage: f64,
    pub completed_percentage: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChangeDashboard {
    pub summary: ChangeSummary,
    pub details: ChangeStats,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserSummary {
    pub total_users: i64,
    pub active_users: i64,
    pub active_percentage: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserDashboard {
    pub summary: UserSummary,
    pub details: UserStats,
}

// 3. Alertas
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Alert {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub category: String,
    pub priority: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AlertsReport {
    pub alerts: Vec<Alert>,
    pub total_alerts: usize,
}

// 4. Métricas sob demanda (?type=incidents&range=today)
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MetricsParams {
    /// all, incidents, changes, users (padrão: all)
    #[serde(rename = "type")]
    pub metric_type: Option<String>,
    /// Período informado pelo cliente, devolvido como veio (padrão: today)
    pub range: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MetricsReport {
    pub metric_type: String,
    pub time_range: String,
    pub incidents: Option<IncidentStats>,
    pub changes: Option<ChangeStats>,
    pub users: Option<UserStats>,
}

// 5. Saúde
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthReport {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub services: BTreeMap<String, String>,
    pub version: String,
}

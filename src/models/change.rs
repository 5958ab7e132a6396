// src/models/change.rs

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;
use crate::common::validation::{field_error, parse_canonical, required_text};
use crate::models::enums::{ChangeStatus, ChangeTipo, Impacto, Prioridade};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Change {
    pub id: Uuid,
    pub numero: String,
    pub titulo: String,
    pub descricao: String,
    pub tipo: ChangeTipo,
    pub prioridade: Prioridade,
    pub status: ChangeStatus,
    pub data_programada: Option<DateTime<Utc>>,
    pub grupo_responsavel: String,
    pub impacto: Impacto,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Aceita RFC 3339 (`2024-01-15T02:00:00Z`), data/hora sem fuso (tratada como UTC)
/// ou apenas a data (meia-noite UTC).
pub fn parse_data_programada(raw: &str) -> Result<DateTime<Utc>, AppError> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Some(naive) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(naive.and_utc());
    }

    Err(field_error(
        "data_programada",
        "Data programada inválida (use o formato ISO 8601, ex: 2024-01-15T02:00:00)",
    ))
}

// =============================================================================
//  PAYLOADS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateChangePayload {
    /// Opcional: se ausente ou vazio, o número é gerado (CHG-001...)
    pub numero: Option<String>,

    #[validate(length(min = 1, max = 200, message = "Título deve ter entre 1 e 200 caracteres"))]
    pub titulo: String,

    #[validate(length(min = 1, max = 2000, message = "Descrição deve ter entre 1 e 2000 caracteres"))]
    pub descricao: String,

    #[schema(example = "manutencao")]
    pub tipo: String,

    #[schema(example = "alta")]
    pub prioridade: String,

    /// Padrão: `pendente`
    pub status: Option<String>,

    #[schema(example = "2024-01-15T02:00:00")]
    pub data_programada: Option<String>,

    pub grupo_responsavel: String,

    #[schema(example = "medio")]
    pub impacto: String,
}

#[derive(Debug, Clone)]
pub struct NewChange {
    pub numero: String,
    pub titulo: String,
    pub descricao: String,
    pub tipo: ChangeTipo,
    pub prioridade: Prioridade,
    pub status: ChangeStatus,
    pub data_programada: Option<DateTime<Utc>>,
    pub grupo_responsavel: String,
    pub impacto: Impacto,
}

impl CreateChangePayload {
    pub fn into_new(self) -> Result<(Option<String>, NewChange), AppError> {
        self.validate()?;

        let tipo = parse_canonical("tipo", "Tipo", &self.tipo, ChangeTipo::DOMINIO)?;
        let prioridade = parse_canonical("prioridade", "Prioridade", &self.prioridade, Prioridade::DOMINIO)?;
        let status = match self.status.as_deref() {
            Some(s) => parse_canonical("status", "Status", s, ChangeStatus::DOMINIO)?,
            None => ChangeStatus::Pendente,
        };
        let impacto = parse_canonical("impacto", "Impacto", &self.impacto, Impacto::DOMINIO)?;
        let grupo_responsavel = required_text(
            "grupo_responsavel",
            &self.grupo_responsavel,
            "Grupo responsável é obrigatório",
        )?;
        let data_programada = self
            .data_programada
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .map(parse_data_programada)
            .transpose()?;

        let numero = self
            .numero
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        let change = NewChange {
            numero: String::new(),
            titulo: self.titulo,
            descricao: self.descricao,
            tipo,
            prioridade,
            status,
            data_programada,
            grupo_responsavel,
            impacto,
        };

        Ok((numero, change))
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateChangePayload {
    #[validate(length(min = 1, max = 200, message = "Título deve ter entre 1 e 200 caracteres"))]
    pub titulo: Option<String>,

    #[validate(length(min = 1, max = 2000, message = "Descrição deve ter entre 1 e 2000 caracteres"))]
    pub descricao: Option<String>,

    pub tipo: Option<String>,
    pub prioridade: Option<String>,
    pub status: Option<String>,
    pub data_programada: Option<String>,
    pub grupo_responsavel: Option<String>,
    pub impacto: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangePatch {
    pub titulo: Option<String>,
    pub descricao: Option<String>,
    pub tipo: Option<ChangeTipo>,
    pub prioridade: Option<Prioridade>,
    pub status: Option<ChangeStatus>,
    pub data_programada: Option<DateTime<Utc>>,
    pub grupo_responsavel: Option<String>,
    pub impacto: Option<Impacto>,
}

impl UpdateChangePayload {
    pub fn into_patch(self) -> Result<ChangePatch, AppError> {
        self.validate()?;

        Ok(ChangePatch {
            tipo: self
                .tipo
                .as_deref()
                .map(|t| parse_canonical("tipo", "Tipo", t, ChangeTipo::DOMINIO))
                .transpose()?,
            prioridade: self
                .prioridade
                .as_deref()
                .map(|p| parse_canonical("prioridade", "Prioridade", p, Prioridade::DOMINIO))
                .transpose()?,
            status: self
                .status
                .as_deref()
                .map(|s| parse_canonical("status", "Status", s, ChangeStatus::DOMINIO))
                .transpose()?,
            impacto: self
                .impacto
                .as_deref()
                .map(|i| parse_canonical("impacto", "Impacto", i, Impacto::DOMINIO))
                .transpose()?,
            data_programada: self
                .data_programada
                .as_deref()
                .map(parse_data_programada)
                .transpose()?,
            grupo_responsavel: self
                .grupo_responsavel
                .as_deref()
                .map(|g| required_text("grupo_responsavel", g, "Grupo responsável é obrigatório"))
                .transpose()?,
            titulo: self.titulo,
            descricao: self.descricao,
        })
    }
}

impl ChangePatch {
    pub fn is_empty(&self) -> bool {
        *self == ChangePatch::default()
    }

    pub fn status(status: ChangeStatus) -> Self {
        ChangePatch { status: Some(status), ..Default::default() }
    }

    pub fn apply_to(&self, change: &mut Change, now: DateTime<Utc>) {
        if let Some(v) = &self.titulo {
            change.titulo = v.clone();
        }
        if let Some(v) = &self.descricao {
            change.descricao = v.clone();
        }
        if let Some(v) = self.tipo {
            change.tipo = v;
        }
        if let Some(v) = self.prioridade {
            change.prioridade = v;
        }
        if let Some(v) = self.status {
            change.status = v;
        }
        if let Some(v) = self.data_programada {
            change.data_programada = Some(v);
        }
        if let Some(v) = &self.grupo_responsavel {
            change.grupo_responsavel = v.clone();
        }
        if let Some(v) = self.impacto {
            change.impacto = v;
        }
        change.updated_at = Some(now);
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangeStatusPayload {
    pub status: Option<String>,
}

// =============================================================================
//  FILTROS
// =============================================================================

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ChangeFilterParams {
    pub tipo: Option<String>,
    /// Crítico, Alto, Moderado (ou o valor canônico)
    pub prioridade: Option<String>,
    /// Pendente, Aprovada, Em execução, Concluída, Cancelada
    pub status: Option<String>,
    pub grupo_responsavel: Option<String>,
    /// Baixo, Médio, Alto, Crítico
    pub impacto: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeFilter {
    pub tipo: Option<ChangeTipo>,
    pub prioridade: Option<Prioridade>,
    pub status: Option<ChangeStatus>,
    pub grupo_responsavel: Option<String>,
    pub impacto: Option<Impacto>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl ChangeFilterParams {
    pub fn to_filter(&self) -> ChangeFilter {
        ChangeFilter {
            tipo: non_empty(&self.tipo).and_then(|t| t.parse().ok()),
            prioridade: non_empty(&self.prioridade).and_then(Prioridade::from_filter_label),
            status: non_empty(&self.status).and_then(ChangeStatus::from_filter_label),
            grupo_responsavel: non_empty(&self.grupo_responsavel).map(str::to_string),
            impacto: non_empty(&self.impacto).and_then(Impacto::from_filter_label),
        }
    }

    pub fn echo(&self) -> Map<String, Value> {
        [
            ("tipo", &self.tipo),
            ("prioridade", &self.prioridade),
            ("status", &self.status),
            ("grupo_responsavel", &self.grupo_responsavel),
            ("impacto", &self.impacto),
        ]
        .into_iter()
        .filter_map(|(k, v)| non_empty(v).map(|v| (k.to_string(), Value::String(v.to_string()))))
        .collect()
    }
}

impl ChangeFilter {
    pub fn matches(&self, change: &Change) -> bool {
        self.tipo.is_none_or(|t| change.tipo == t)
            && self.prioridade.is_none_or(|p| change.prioridade == p)
            && self.status.is_none_or(|s| change.status == s)
            && self
                .grupo_responsavel
                .as_ref()
                .is_none_or(|g| &change.grupo_responsavel == g)
            && self.impacto.is_none_or(|i| change.impacto == i)
    }

    pub fn by_status(status: ChangeStatus) -> Self {
        ChangeFilter { status: Some(status), ..Default::default() }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UpcomingParams {
    /// Janela em dias (1 a 30, padrão 7)
    pub days: Option<String>,
}

pub const DEFAULT_UPCOMING_DAYS: i64 = 7;
pub const MAX_UPCOMING_DAYS: i64 = 30;

impl UpcomingParams {
    pub fn days(&self) -> i64 {
        match self.days.as_deref().and_then(|d| d.trim().parse::<i64>().ok()) {
            Some(d) if (1..=MAX_UPCOMING_DAYS).contains(&d) => d,
            _ => DEFAULT_UPCOMING_DAYS,
        }
    }
}

// Status considerados na listagem de changes programadas
pub const UPCOMING_STATUSES: [ChangeStatus; 2] = [ChangeStatus::Aprovada, ChangeStatus::EmExecucao];

// =============================================================================
//  ESTATÍSTICAS
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct ChangeStats {
    pub changes_pendentes: i64,
    pub changes_aprovadas: i64,
    pub changes_execucao: i64,
    pub changes_concluidas: i64,
    pub changes_canceladas: i64,
    pub total_changes: i64,
}

// src/models/incident.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;
use crate::common::validation::{field_error, parse_canonical, required_text};
use crate::models::enums::{fila_from_label, IncidentStatus, Prioridade, TipoTarefa};

// Representa um incidente vindo do banco de dados
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Incident {
    pub id: Uuid,
    pub numero: String,
    pub titulo: String,
    pub descricao: String,
    pub prioridade: Prioridade,
    pub status: IncidentStatus,
    pub atribuido: Option<String>,
    pub tipo_tarefa: TipoTarefa,
    pub grupo_designado: String,
    pub local_problema: Option<String>,
    pub incidente_vendas: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

// =============================================================================
//  PAYLOADS
// =============================================================================

// Dados para criação de um incidente.
// Os campos enumerados chegam como texto e são normalizados em `into_new`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateIncidentPayload {
    /// Opcional: se ausente ou vazio, o número é gerado (INC-001, INC-002...)
    pub numero: Option<String>,

    #[validate(length(min = 1, max = 200, message = "Título deve ter entre 1 e 200 caracteres"))]
    pub titulo: String,

    #[validate(length(min = 1, max = 2000, message = "Descrição deve ter entre 1 e 2000 caracteres"))]
    pub descricao: String,

    #[schema(example = "alta")]
    pub prioridade: String,

    /// Padrão: `aberto`
    pub status: Option<String>,

    #[validate(length(max = 100, message = "Atribuído deve ter no máximo 100 caracteres"))]
    pub atribuido: Option<String>,

    #[schema(example = "suporte")]
    pub tipo_tarefa: String,

    pub grupo_designado: String,

    pub local_problema: Option<String>,

    #[serde(default)]
    pub incidente_vendas: bool,
}

/// Incidente validado e normalizado, pronto para o store.
/// `numero` é preenchido pelo service antes da inserção.
#[derive(Debug, Clone)]
pub struct NewIncident {
    pub numero: String,
    pub titulo: String,
    pub descricao: String,
    pub prioridade: Prioridade,
    pub status: IncidentStatus,
    pub atribuido: Option<String>,
    pub tipo_tarefa: TipoTarefa,
    pub grupo_designado: String,
    pub local_problema: Option<String>,
    pub incidente_vendas: bool,
}

impl CreateIncidentPayload {
    /// Valida o payload e devolve o número informado (se houver) junto do incidente normalizado.
    pub fn into_new(self) -> Result<(Option<String>, NewIncident), AppError> {
        self.validate()?;

        let prioridade = parse_canonical("prioridade", "Prioridade", &self.prioridade, Prioridade::DOMINIO)?;
        let status = match self.status.as_deref() {
            Some(s) => parse_canonical("status", "Status", s, IncidentStatus::DOMINIO)?,
            None => IncidentStatus::Aberto,
        };
        let tipo_tarefa =
            parse_canonical("tipo_tarefa", "Tipo de tarefa", &self.tipo_tarefa, TipoTarefa::DOMINIO)?;
        let grupo_designado =
            required_text("grupo_designado", &self.grupo_designado, "Grupo designado é obrigatório")?;

        let numero = self
            .numero
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        let incident = NewIncident {
            numero: String::new(),
            titulo: self.titulo,
            descricao: self.descricao,
            prioridade,
            status,
            atribuido: self.atribuido,
            tipo_tarefa,
            grupo_designado,
            local_problema: self.local_problema,
            incidente_vendas: self.incidente_vendas,
        };

        Ok((numero, incident))
    }
}

// Atualização parcial: campos ausentes (ou null) ficam como estão
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateIncidentPayload {
    #[validate(length(min = 1, max = 200, message = "Título deve ter entre 1 e 200 caracteres"))]
    pub titulo: Option<String>,

    #[validate(length(min = 1, max = 2000, message = "Descrição deve ter entre 1 e 2000 caracteres"))]
    pub descricao: Option<String>,

    pub prioridade: Option<String>,
    pub status: Option<String>,

    #[validate(length(max = 100, message = "Atribuído deve ter no máximo 100 caracteres"))]
    pub atribuido: Option<String>,

    pub tipo_tarefa: Option<String>,
    pub grupo_designado: Option<String>,
    pub local_problema: Option<String>,
    pub incidente_vendas: Option<bool>,
}

/// Conjunto de alterações já normalizado.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncidentPatch {
    pub titulo: Option<String>,
    pub descricao: Option<String>,
    pub prioridade: Option<Prioridade>,
    pub status: Option<IncidentStatus>,
    pub atribuido: Option<String>,
    pub tipo_tarefa: Option<TipoTarefa>,
    pub grupo_designado: Option<String>,
    pub local_problema: Option<String>,
    pub incidente_vendas: Option<bool>,
}

impl UpdateIncidentPayload {
    pub fn into_patch(self) -> Result<IncidentPatch, AppError> {
        self.validate()?;

        let prioridade = self
            .prioridade
            .as_deref()
            .map(|p| parse_canonical("prioridade", "Prioridade", p, Prioridade::DOMINIO))
            .transpose()?;
        let status = self
            .status
            .as_deref()
            .map(|s| parse_canonical("status", "Status", s, IncidentStatus::DOMINIO))
            .transpose()?;
        let tipo_tarefa = self
            .tipo_tarefa
            .as_deref()
            .map(|t| parse_canonical("tipo_tarefa", "Tipo de tarefa", t, TipoTarefa::DOMINIO))
            .transpose()?;
        let grupo_designado = self
            .grupo_designado
            .as_deref()
            .map(|g| required_text("grupo_designado", g, "Grupo designado é obrigatório"))
            .transpose()?;

        Ok(IncidentPatch {
            titulo: self.titulo,
            descricao: self.descricao,
            prioridade,
            status,
            atribuido: self.atribuido,
            tipo_tarefa,
            grupo_designado,
            local_problema: self.local_problema,
            incidente_vendas: self.incidente_vendas,
        })
    }
}

impl IncidentPatch {
    pub fn is_empty(&self) -> bool {
        *self == IncidentPatch::default()
    }

    pub fn status(status: IncidentStatus) -> Self {
        IncidentPatch { status: Some(status), ..Default::default() }
    }

    pub fn atribuido(atribuido: String) -> Self {
        IncidentPatch { atribuido: Some(atribuido), ..Default::default() }
    }

    /// Aplica as alterações em memória (usado pelo store em memória).
    pub fn apply_to(&self, incident: &mut Incident, now: DateTime<Utc>) {
        if let Some(v) = &self.titulo {
            incident.titulo = v.clone();
        }
        if let Some(v) = &self.descricao {
            incident.descricao = v.clone();
        }
        if let Some(v) = self.prioridade {
            incident.prioridade = v;
        }
        if let Some(v) = self.status {
            incident.status = v;
        }
        if let Some(v) = &self.atribuido {
            incident.atribuido = Some(v.clone());
        }
        if let Some(v) = self.tipo_tarefa {
            incident.tipo_tarefa = v;
        }
        if let Some(v) = &self.grupo_designado {
            incident.grupo_designado = v.clone();
        }
        if let Some(v) = &self.local_problema {
            incident.local_problema = Some(v.clone());
        }
        if let Some(v) = self.incidente_vendas {
            incident.incidente_vendas = v;
        }
        incident.updated_at = Some(now);
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct IncidentStatusPayload {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignIncidentPayload {
    pub atribuido: Option<String>,
}

impl AssignIncidentPayload {
    pub fn into_assignee(self) -> Result<String, AppError> {
        let atribuido = required_text(
            "atribuido",
            self.atribuido.as_deref().unwrap_or_default(),
            "Responsável é obrigatório",
        )?;
        if atribuido.chars().count() > 100 {
            return Err(field_error("atribuido", "Atribuído deve ter no máximo 100 caracteres"));
        }
        Ok(atribuido)
    }
}

// =============================================================================
//  FILTROS
// =============================================================================

// Filtros aceitos na listagem (?fila=P2K&prioridade=Crítico...)
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IncidentFilterParams {
    /// Fila: P2K, CRIVO, SG5_URA, ALARMES, TSK_VENDAS, SR, RIT
    pub fila: Option<String>,
    /// Crítico, Alto, Moderado (ou o valor canônico)
    pub prioridade: Option<String>,
    /// Em andamento, Em espera, TKS Remoto, Aberto (ou o valor canônico)
    pub status: Option<String>,
    pub grupo_designado: Option<String>,
    pub atribuido: Option<String>,
}

/// Filtro traduzido para valores canônicos. Valores desconhecidos são descartados.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncidentFilter {
    pub local_problema: Option<String>,
    pub prioridade: Option<Prioridade>,
    pub status: Option<IncidentStatus>,
    pub grupo_designado: Option<String>,
    pub atribuido: Option<String>,
    // Só usado pelas estatísticas
    pub incidente_vendas: Option<bool>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl IncidentFilterParams {
    pub fn to_filter(&self) -> IncidentFilter {
        IncidentFilter {
            local_problema: non_empty(&self.fila).and_then(fila_from_label).map(str::to_string),
            prioridade: non_empty(&self.prioridade).and_then(Prioridade::from_filter_label),
            status: non_empty(&self.status).and_then(IncidentStatus::from_filter_label),
            grupo_designado: non_empty(&self.grupo_designado).map(str::to_string),
            atribuido: non_empty(&self.atribuido).map(str::to_string),
            incidente_vendas: None,
        }
    }

    /// Os filtros como vieram na requisição, devolvidos na resposta da listagem.
    pub fn echo(&self) -> Map<String, Value> {
        [
            ("fila", &self.fila),
            ("prioridade", &self.prioridade),
            ("status", &self.status),
            ("grupo_designado", &self.grupo_designado),
            ("atribuido", &self.atribuido),
        ]
        .into_iter()
        .filter_map(|(k, v)| non_empty(v).map(|v| (k.to_string(), Value::String(v.to_string()))))
        .collect()
    }
}

impl IncidentFilter {
    pub fn matches(&self, incident: &Incident) -> bool {
        self.local_problema
            .as_ref()
            .is_none_or(|l| incident.local_problema.as_ref() == Some(l))
            && self.prioridade.is_none_or(|p| incident.prioridade == p)
            && self.status.is_none_or(|s| incident.status == s)
            && self
                .grupo_designado
                .as_ref()
                .is_none_or(|g| &incident.grupo_designado == g)
            && self
                .atribuido
                .as_ref()
                .is_none_or(|a| incident.atribuido.as_ref() == Some(a))
            && self.incidente_vendas.is_none_or(|v| incident.incidente_vendas == v)
    }

    pub fn vendas() -> Self {
        IncidentFilter { incidente_vendas: Some(true), ..Default::default() }
    }

    pub fn by_prioridade(prioridade: Prioridade) -> Self {
        IncidentFilter { prioridade: Some(prioridade), ..Default::default() }
    }

    pub fn by_status(status: IncidentStatus) -> Self {
        IncidentFilter { status: Some(status), ..Default::default() }
    }

    pub fn by_local(local: &str) -> Self {
        IncidentFilter { local_problema: Some(local.to_string()), ..Default::default() }
    }
}

// =============================================================================
//  ESTATÍSTICAS
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct IncidentStats {
    pub incidentes_vendas: i64,
    pub filas: BTreeMap<String, i64>,
    pub prioridades: BTreeMap<String, i64>,
    pub status: BTreeMap<String, i64>,
}

impl IncidentStats {
    pub fn total(&self) -> i64 {
        self.prioridades.values().sum()
    }

    pub fn prioridade(&self, p: Prioridade) -> i64 {
        self.prioridades.get(p.as_str()).copied().unwrap_or(0)
    }

    pub fn por_status(&self, s: IncidentStatus) -> i64 {
        self.status.get(s.as_str()).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> CreateIncidentPayload {
        CreateIncidentPayload {
            numero: None,
            titulo: "Sistema P2K fora do ar".into(),
            descricao: "Sistema principal de vendas não responde".into(),
            prioridade: "ALTA".into(),
            status: None,
            atribuido: None,
            tipo_tarefa: "Suporte".into(),
            grupo_designado: "Suporte Técnico".into(),
            local_problema: Some("fila_p2k".into()),
            incidente_vendas: true,
        }
    }

    #[test]
    fn create_payload_normalizes_enums() {
        let (numero, incident) = payload().into_new().unwrap();
        assert_eq!(numero, None);
        assert_eq!(incident.prioridade, Prioridade::Alta);
        assert_eq!(incident.status, IncidentStatus::Aberto);
        assert_eq!(incident.tipo_tarefa, TipoTarefa::Suporte);
    }

    #[test]
    fn blank_numero_means_generate() {
        let mut p = payload();
        p.numero = Some("   ".into());
        assert_eq!(p.into_new().unwrap().0, None);
    }

    #[test]
    fn rejects_out_of_domain_priority_and_empty_title() {
        let mut p = payload();
        p.prioridade = "urgente".into();
        assert!(matches!(p.into_new(), Err(AppError::ValidationError(_))));

        let mut p = payload();
        p.titulo = String::new();
        assert!(matches!(p.into_new(), Err(AppError::ValidationError(_))));
    }

    #[test]
    fn empty_update_is_detected() {
        let patch = UpdateIncidentPayload::default().into_patch().unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn unknown_filter_values_are_dropped() {
        let params = IncidentFilterParams {
            fila: Some("XPTO".into()),
            prioridade: Some("Crítico".into()),
            status: Some("Inexistente".into()),
            ..Default::default()
        };
        let filter = params.to_filter();
        assert_eq!(filter.local_problema, None);
        assert_eq!(filter.prioridade, Some(Prioridade::Critica));
        assert_eq!(filter.status, None);
        assert_eq!(params.echo().len(), 3);
    }

    #[test]
    fn assign_trims_and_requires_text() {
        let ok = AssignIncidentPayload { atribuido: Some("  Maria  ".into()) };
        assert_eq!(ok.into_assignee().unwrap(), "Maria");
        let empty = AssignIncidentPayload { atribuido: Some("  ".into()) };
        assert!(empty.into_assignee().is_err());
        let missing = AssignIncidentPayload { atribuido: None };
        assert!(missing.into_assignee().is_err());
    }
}

// src/services/incident_service.rs

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        numbering::{next_display_number, MAX_NUMERO_ATTEMPTS},
        pagination::Pagination,
        validation::{field_error, parse_canonical},
    },
    db::IncidentStore,
    models::{
        enums::{IncidentStatus, Prioridade, FILAS},
        incident::{
            AssignIncidentPayload, CreateIncidentPayload, Incident, IncidentFilter, IncidentPatch,
            IncidentStats, UpdateIncidentPayload,
        },
    },
};

const PREFIXO: &str = "INC";

#[derive(Clone)]
pub struct IncidentService {
    store: Arc<dyn IncidentStore>,
}

impl IncidentService {
    pub fn new(store: Arc<dyn IncidentStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, payload: CreateIncidentPayload) -> Result<Incident, AppError> {
        let (numero, mut incident) = payload.into_new()?;

        // Número informado pelo cliente: pré-checagem para uma mensagem amigável
        if let Some(numero) = numero {
            if self.store.find_by_numero(&numero).await?.is_some() {
                return Err(AppError::DuplicateKey { entity: "Incidente", field: "número", value: numero });
            }
            incident.numero = numero;
            return self.store.insert(incident, Utc::now()).await;
        }

        // Número gerado: o índice único decide, e uma colisão gera um novo número
        let mut attempt = 1;
        loop {
            let last = self.store.last_numero(PREFIXO).await?;
            incident.numero = next_display_number(PREFIXO, last.as_deref(), Utc::now());

            match self.store.insert(incident.clone(), Utc::now()).await {
                Err(AppError::DuplicateKey { field: "número", value, .. }) if attempt < MAX_NUMERO_ATTEMPTS => {
                    tracing::warn!("Número {} já usado, gerando outro (tentativa {})", value, attempt);
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    pub async fn get(&self, id: Uuid) -> Result<Incident, AppError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Incidente não encontrado"))
    }

    pub async fn list(&self, filter: &IncidentFilter, page: Pagination) -> Result<Vec<Incident>, AppError> {
        self.store.list(filter, page.limit(), page.offset()).await
    }

    pub async fn count(&self, filter: &IncidentFilter) -> Result<i64, AppError> {
        self.store.count(filter).await
    }

    pub async fn update(&self, id: Uuid, payload: UpdateIncidentPayload) -> Result<Incident, AppError> {
        let patch = payload.into_patch()?;
        if patch.is_empty() {
            return Err(AppError::invalid("Dados de atualização são obrigatórios"));
        }
        self.apply(id, patch).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.store.delete(id).await? {
            return Err(AppError::not_found("Incidente não encontrado"));
        }
        Ok(())
    }

    /// Troca o status sem checar o status atual.
    pub async fn update_status(&self, id: Uuid, status: Option<&str>) -> Result<Incident, AppError> {
        let status = status
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| field_error("status", "Status é obrigatório"))?;
        let status: IncidentStatus = parse_canonical("status", "Status", status, IncidentStatus::DOMINIO)?;

        self.apply(id, IncidentPatch::status(status)).await
    }

    pub async fn assign(&self, id: Uuid, payload: AssignIncidentPayload) -> Result<Incident, AppError> {
        let atribuido = payload.into_assignee()?;
        self.apply(id, IncidentPatch::atribuido(atribuido)).await
    }

    async fn apply(&self, id: Uuid, patch: IncidentPatch) -> Result<Incident, AppError> {
        self.store
            .update(id, &patch, Utc::now())
            .await?
            .ok_or_else(|| AppError::not_found("Incidente não encontrado"))
    }

    /// Contagens por fila, prioridade e status, além dos incidentes de vendas.
    pub async fn stats(&self) -> Result<IncidentStats, AppError> {
        let mut stats = IncidentStats {
            incidentes_vendas: self.store.count(&IncidentFilter::vendas()).await?,
            ..Default::default()
        };

        for (_, fila) in FILAS {
            let total = self.store.count(&IncidentFilter::by_local(fila)).await?;
            stats.filas.insert(fila.to_string(), total);
        }
        for prioridade in Prioridade::ALL {
            let total = self.store.count(&IncidentFilter::by_prioridade(prioridade)).await?;
            stats.prioridades.insert(prioridade.to_string(), total);
        }
        for status in IncidentStatus::ALL {
            let total = self.store.count(&IncidentFilter::by_status(status)).await?;
            stats.status.insert(status.to_string(), total);
        }

        Ok(stats)
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.store.ping().await
    }
}

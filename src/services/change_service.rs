// src/services/change_service.rs

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        numbering::{next_display_number, MAX_NUMERO_ATTEMPTS},
        pagination::Pagination,
        validation::{field_error, parse_canonical},
    },
    db::ChangeStore,
    models::{
        change::{
            Change, ChangeFilter, ChangePatch, ChangeStats, CreateChangePayload, UpdateChangePayload,
            UPCOMING_STATUSES,
        },
        enums::ChangeStatus,
    },
};

const PREFIXO: &str = "CHG";

#[derive(Clone)]
pub struct ChangeService {
    store: Arc<dyn ChangeStore>,
}

impl ChangeService {
    pub fn new(store: Arc<dyn ChangeStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, payload: CreateChangePayload) -> Result<Change, AppError> {
        let (numero, mut change) = payload.into_new()?;

        if let Some(numero) = numero {
            if self.store.find_by_numero(&numero).await?.is_some() {
                return Err(AppError::DuplicateKey { entity: "Change", field: "número", value: numero });
            }
            change.numero = numero;
            return self.store.insert(change, Utc::now()).await;
        }

        let mut attempt = 1;
        loop {
            let last = self.store.last_numero(PREFIXO).await?;
            change.numero = next_display_number(PREFIXO, last.as_deref(), Utc::now());

            match self.store.insert(change.clone(), Utc::now()).await {
                Err(AppError::DuplicateKey { field: "número", value, .. }) if attempt < MAX_NUMERO_ATTEMPTS => {
                    tracing::warn!("Número {} já usado, gerando outro (tentativa {})", value, attempt);
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    pub async fn get(&self, id: Uuid) -> Result<Change, AppError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Change não encontrada"))
    }

    pub async fn list(&self, filter: &ChangeFilter, page: Pagination) -> Result<Vec<Change>, AppError> {
        self.store.list(filter, page.limit(), page.offset()).await
    }

    pub async fn count(&self, filter: &ChangeFilter) -> Result<i64, AppError> {
        self.store.count(filter).await
    }

    pub async fn update(&self, id: Uuid, payload: UpdateChangePayload) -> Result<Change, AppError> {
        let patch = payload.into_patch()?;
        if patch.is_empty() {
            return Err(AppError::invalid("Dados de atualização são obrigatórios"));
        }
        self.apply(id, patch).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.store.delete(id).await? {
            return Err(AppError::not_found("Change não encontrada"));
        }
        Ok(())
    }

    pub async fn update_status(&self, id: Uuid, status: Option<&str>) -> Result<Change, AppError> {
        let status = status
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| field_error("status", "Status é obrigatório"))?;
        let status: ChangeStatus = parse_canonical("status", "Status", status, ChangeStatus::DOMINIO)?;

        self.set_status(id, status).await
    }

    // Atalhos de transição: sobrescrevem o status, qualquer que seja o atual
    pub async fn approve(&self, id: Uuid) -> Result<Change, AppError> {
        self.set_status(id, ChangeStatus::Aprovada).await
    }

    pub async fn start(&self, id: Uuid) -> Result<Change, AppError> {
        self.set_status(id, ChangeStatus::EmExecucao).await
    }

    pub async fn complete(&self, id: Uuid) -> Result<Change, AppError> {
        self.set_status(id, ChangeStatus::Concluida).await
    }

    async fn set_status(&self, id: Uuid, status: ChangeStatus) -> Result<Change, AppError> {
        self.apply(id, ChangePatch::status(status)).await
    }

    async fn apply(&self, id: Uuid, patch: ChangePatch) -> Result<Change, AppError> {
        self.store
            .update(id, &patch, Utc::now())
            .await?
            .ok_or_else(|| AppError::not_found("Change não encontrada"))
    }

    /// Changes aprovadas ou em execução programadas para os próximos `days` dias.
    pub async fn upcoming(&self, days: i64) -> Result<Vec<Change>, AppError> {
        let start = Utc::now();
        let end = start + Duration::days(days);
        self.store.scheduled_between(start, end, &UPCOMING_STATUSES).await
    }

    pub async fn stats(&self) -> Result<ChangeStats, AppError> {
        Ok(ChangeStats {
            changes_pendentes: self.count_status(ChangeStatus::Pendente).await?,
            changes_aprovadas: self.count_status(ChangeStatus::Aprovada).await?,
            changes_execucao: self.count_status(ChangeStatus::EmExecucao).await?,
            changes_concluidas: self.count_status(ChangeStatus::Concluida).await?,
            changes_canceladas: self.count_status(ChangeStatus::Cancelada).await?,
            total_changes: self.store.count(&ChangeFilter::default()).await?,
        })
    }

    async fn count_status(&self, status: ChangeStatus) -> Result<i64, AppError> {
        self.store.count(&ChangeFilter::by_status(status)).await
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.store.ping().await
    }
}

// src/db/store.rs
//
// Contratos de persistência, um por coleção. Os services só conhecem estes
// traits; o Postgres e o store em memória (testes) são as implementações.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::change::{Change, ChangeFilter, ChangePatch, NewChange};
use crate::models::enums::ChangeStatus;
use crate::models::incident::{Incident, IncidentFilter, IncidentPatch, NewIncident};
use crate::models::user::{NewUser, User, UserFilter, UserPatch};

#[async_trait]
pub trait IncidentStore: Send + Sync {
    /// Insere o incidente. Número repetido vira `AppError::DuplicateKey`.
    async fn insert(&self, incident: NewIncident, now: DateTime<Utc>) -> Result<Incident, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Incident>, AppError>;

    async fn find_by_numero(&self, numero: &str) -> Result<Option<Incident>, AppError>;

    /// Maior número no formato gerado (`PREFIXO-<dígitos>`), ordenado por tamanho e depois texto.
    /// Números livres informados pelo cliente não contam.
    async fn last_numero(&self, prefix: &str) -> Result<Option<String>, AppError>;

    /// Página ordenada por `created_at` decrescente.
    async fn list(&self, filter: &IncidentFilter, limit: i64, offset: i64) -> Result<Vec<Incident>, AppError>;

    async fn count(&self, filter: &IncidentFilter) -> Result<i64, AppError>;

    /// Aplica o patch e renova `updated_at`. `None` se o ID não existe.
    async fn update(&self, id: Uuid, patch: &IncidentPatch, now: DateTime<Utc>) -> Result<Option<Incident>, AppError>;

    /// `false` se o ID não existe.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[async_trait]
pub trait ChangeStore: Send + Sync {
    async fn insert(&self, change: NewChange, now: DateTime<Utc>) -> Result<Change, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Change>, AppError>;

    async fn find_by_numero(&self, numero: &str) -> Result<Option<Change>, AppError>;

    async fn last_numero(&self, prefix: &str) -> Result<Option<String>, AppError>;

    async fn list(&self, filter: &ChangeFilter, limit: i64, offset: i64) -> Result<Vec<Change>, AppError>;

    async fn count(&self, filter: &ChangeFilter) -> Result<i64, AppError>;

    /// Changes com `data_programada` em `[start, end]` e status em `statuses`, da mais próxima para a mais distante.
    async fn scheduled_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        statuses: &[ChangeStatus],
    ) -> Result<Vec<Change>, AppError>;

    async fn update(&self, id: Uuid, patch: &ChangePatch, now: DateTime<Utc>) -> Result<Option<Change>, AppError>;

    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Username ou e-mail repetido vira `AppError::DuplicateKey`.
    async fn insert(&self, user: NewUser, now: DateTime<Utc>) -> Result<User, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn list(&self, filter: &UserFilter, limit: i64, offset: i64) -> Result<Vec<User>, AppError>;

    async fn count(&self, filter: &UserFilter) -> Result<i64, AppError>;

    async fn update(&self, id: Uuid, patch: &UserPatch, now: DateTime<Utc>) -> Result<Option<User>, AppError>;

    /// Troca o hash da senha. `false` se o ID não existe.
    async fn set_password(&self, id: Uuid, password_hash: &str, now: DateTime<Utc>) -> Result<bool, AppError>;

    async fn touch_last_login(&self, id: Uuid, now: DateTime<Utc>) -> Result<(), AppError>;

    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

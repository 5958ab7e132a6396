// src/db/memory.rs
//
// Stores em memória: mesmas regras de unicidade e ordenação do Postgres.
// Usados pelos testes e para subir a API sem banco.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::common::numbering::{display_number_key, is_generated_number};
use crate::db::store::{ChangeStore, IncidentStore, UserStore};
use crate::models::change::{Change, ChangeFilter, ChangePatch, NewChange};
use crate::models::enums::ChangeStatus;
use crate::models::incident::{Incident, IncidentFilter, IncidentPatch, NewIncident};
use crate::models::user::{NewUser, User, UserFilter, UserPatch};

// Mais recentes primeiro; empates no created_at mantêm a ordem inversa de inserção
fn page<T: Clone>(
    rows: &[T],
    keep: impl Fn(&T) -> bool,
    created_at: impl Fn(&T) -> DateTime<Utc>,
    limit: i64,
    offset: i64,
) -> Vec<T> {
    let mut matching: Vec<&T> = rows.iter().rev().filter(|r| keep(r)).collect();
    matching.sort_by_key(|r| std::cmp::Reverse(created_at(r)));
    matching
        .into_iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .cloned()
        .collect()
}

// =============================================================================
//  INCIDENTES
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct InMemoryIncidentStore {
    rows: Arc<RwLock<Vec<Incident>>>,
}

impl InMemoryIncidentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IncidentStore for InMemoryIncidentStore {
    async fn insert(&self, incident: NewIncident, now: DateTime<Utc>) -> Result<Incident, AppError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|i| i.numero == incident.numero) {
            return Err(AppError::DuplicateKey {
                entity: "Incidente",
                field: "número",
                value: incident.numero,
            });
        }

        let created = Incident {
            id: Uuid::new_v4(),
            numero: incident.numero,
            titulo: incident.titulo,
            descricao: incident.descricao,
            prioridade: incident.prioridade,
            status: incident.status,
            atribuido: incident.atribuido,
            tipo_tarefa: incident.tipo_tarefa,
            grupo_designado: incident.grupo_designado,
            local_problema: incident.local_problema,
            incidente_vendas: incident.incidente_vendas,
            created_at: now,
            updated_at: None,
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Incident>, AppError> {
        Ok(self.rows.read().await.iter().find(|i| i.id == id).cloned())
    }

    async fn find_by_numero(&self, numero: &str) -> Result<Option<Incident>, AppError> {
        Ok(self.rows.read().await.iter().find(|i| i.numero == numero).cloned())
    }

    async fn last_numero(&self, prefix: &str) -> Result<Option<String>, AppError> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .map(|i| i.numero.as_str())
            .filter(|n| is_generated_number(prefix, n))
            .max_by_key(|n| display_number_key(*n))
            .map(str::to_string))
    }

    async fn list(&self, filter: &IncidentFilter, limit: i64, offset: i64) -> Result<Vec<Incident>, AppError> {
        let rows = self.rows.read().await;
        Ok(page(&rows, |i| filter.matches(i), |i| i.created_at, limit, offset))
    }

    async fn count(&self, filter: &IncidentFilter) -> Result<i64, AppError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().filter(|i| filter.matches(i)).count() as i64)
    }

    async fn update(&self, id: Uuid, patch: &IncidentPatch, now: DateTime<Utc>) -> Result<Option<Incident>, AppError> {
        let mut rows = self.rows.write().await;
        Ok(rows.iter_mut().find(|i| i.id == id).map(|incident| {
            patch.apply_to(incident, now);
            incident.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|i| i.id != id);
        Ok(rows.len() < before)
    }
}

// =============================================================================
//  CHANGES
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct InMemoryChangeStore {
    rows: Arc<RwLock<Vec<Change>>>,
}

impl InMemoryChangeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChangeStore for InMemoryChangeStore {
    async fn insert(&self, change: NewChange, now: DateTime<Utc>) -> Result<Change, AppError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|c| c.numero == change.numero) {
            return Err(AppError::DuplicateKey {
                entity: "Change",
                field: "número",
                value: change.numero,
            });
        }

        let created = Change {
            id: Uuid::new_v4(),
            numero: change.numero,
            titulo: change.titulo,
            descricao: change.descricao,
            tipo: change.tipo,
            prioridade: change.prioridade,
            status: change.status,
            data_programada: change.data_programada,
            grupo_responsavel: change.grupo_responsavel,
            impacto: change.impacto,
            created_at: now,
            updated_at: None,
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Change>, AppError> {
        Ok(self.rows.read().await.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_numero(&self, numero: &str) -> Result<Option<Change>, AppError> {
        Ok(self.rows.read().await.iter().find(|c| c.numero == numero).cloned())
    }

    async fn last_numero(&self, prefix: &str) -> Result<Option<String>, AppError> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .map(|c| c.numero.as_str())
            .filter(|n| is_generated_number(prefix, n))
            .max_by_key(|n| display_number_key(*n))
            .map(str::to_string))
    }

    async fn list(&self, filter: &ChangeFilter, limit: i64, offset: i64) -> Result<Vec<Change>, AppError> {
        let rows = self.rows.read().await;
        Ok(page(&rows, |c| filter.matches(c), |c| c.created_at, limit, offset))
    }

    async fn count(&self, filter: &ChangeFilter) -> Result<i64, AppError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().filter(|c| filter.matches(c)).count() as i64)
    }

    async fn scheduled_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        statuses: &[ChangeStatus],
    ) -> Result<Vec<Change>, AppError> {
        let rows = self.rows.read().await;
        let mut changes: Vec<Change> = rows
            .iter()
            .filter(|c| statuses.contains(&c.status))
            .filter(|c| c.data_programada.is_some_and(|d| d >= start && d <= end))
            .cloned()
            .collect();
        changes.sort_by_key(|c| c.data_programada);
        Ok(changes)
    }

    async fn update(&self, id: Uuid, patch: &ChangePatch, now: DateTime<Utc>) -> Result<Option<Change>, AppError> {
        let mut rows = self.rows.write().await;
        Ok(rows.iter_mut().find(|c| c.id == id).map(|change| {
            patch.apply_to(change, now);
            change.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|c| c.id != id);
        Ok(rows.len() < before)
    }
}

// =============================================================================
//  USUÁRIOS
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    rows: Arc<RwLock<Vec<User>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

// Mesmas chaves únicas do banco: username e email
fn check_unique(rows: &[User], except: Option<Uuid>, username: Option<&str>, email: Option<&str>) -> Result<(), AppError> {
    for user in rows.iter().filter(|u| Some(u.id) != except) {
        if let Some(username) = username.filter(|n| *n == user.username) {
            return Err(AppError::DuplicateKey {
                entity: "Usuário",
                field: "username",
                value: username.to_string(),
            });
        }
        if let Some(email) = email.filter(|e| *e == user.email) {
            return Err(AppError::DuplicateKey {
                entity: "Usuário",
                field: "email",
                value: email.to_string(),
            });
        }
    }
    Ok(())
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, user: NewUser, now: DateTime<Utc>) -> Result<User, AppError> {
        let mut rows = self.rows.write().await;
        check_unique(&rows, None, Some(&user.username), Some(&user.email))?;

        let created = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            nome_completo: user.nome_completo,
            grupo: user.grupo,
            ativo: user.ativo,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: None,
            last_login: None,
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.rows.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self.rows.read().await.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.rows.read().await.iter().find(|u| u.email == email).cloned())
    }

    async fn list(&self, filter: &UserFilter, limit: i64, offset: i64) -> Result<Vec<User>, AppError> {
        let rows = self.rows.read().await;
        Ok(page(&rows, |u| filter.matches(u), |u| u.created_at, limit, offset))
    }

    async fn count(&self, filter: &UserFilter) -> Result<i64, AppError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().filter(|u| filter.matches(u)).count() as i64)
    }

    async fn update(&self, id: Uuid, patch: &UserPatch, now: DateTime<Utc>) -> Result<Option<User>, AppError> {
        let mut rows = self.rows.write().await;
        if !rows.iter().any(|u| u.id == id) {
            return Ok(None);
        }
        check_unique(&rows, Some(id), patch.username.as_deref(), patch.email.as_deref())?;

        Ok(rows.iter_mut().find(|u| u.id == id).map(|user| {
            patch.apply_to(user, now);
            user.clone()
        }))
    }

    async fn set_password(&self, id: Uuid, password_hash: &str, now: DateTime<Utc>) -> Result<bool, AppError> {
        let mut rows = self.rows.write().await;
        Ok(rows
            .iter_mut()
            .find(|u| u.id == id)
            .map(|user| {
                user.password_hash = password_hash.to_string();
                user.updated_at = Some(now);
            })
            .is_some())
    }

    async fn touch_last_login(&self, id: Uuid, now: DateTime<Utc>) -> Result<(), AppError> {
        let mut rows = self.rows.write().await;
        if let Some(user) = rows.iter_mut().find(|u| u.id == id) {
            user.last_login = Some(now);
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|u| u.id != id);
        Ok(rows.len() < before)
    }
}

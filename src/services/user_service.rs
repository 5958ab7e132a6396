// src/services/user_service.rs

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, pagination::Pagination},
    db::UserStore,
    models::{
        enums::UserGroup,
        user::{
            ChangePasswordPayload, CreateUserPayload, LoginPayload, LoginResponse, UpdateUserPayload, User,
            UserFilter, UserPatch, UserStats,
        },
    },
    services::auth::AuthService,
};

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    auth: AuthService,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, auth: AuthService) -> Self {
        Self { store, auth }
    }

    pub async fn create(&self, payload: CreateUserPayload) -> Result<User, AppError> {
        let (mut user, password) = payload.into_new()?;

        self.ensure_unique(None, Some(&user.username), Some(&user.email)).await?;

        // A senha nunca é gravada em texto puro
        user.password_hash = self.auth.hash_password(&password).await?;
        self.store.insert(user, Utc::now()).await
    }

    pub async fn get(&self, id: Uuid) -> Result<User, AppError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Usuário não encontrado"))
    }

    pub async fn list(&self, filter: &UserFilter, page: Pagination) -> Result<Vec<User>, AppError> {
        self.store.list(filter, page.limit(), page.offset()).await
    }

    pub async fn count(&self, filter: &UserFilter) -> Result<i64, AppError> {
        self.store.count(filter).await
    }

    pub async fn update(&self, id: Uuid, payload: UpdateUserPayload) -> Result<User, AppError> {
        let patch = payload.into_patch()?;
        if patch.is_empty() {
            return Err(AppError::invalid("Dados de atualização são obrigatórios"));
        }

        // ID inexistente é 404 antes de qualquer conflito de unicidade
        self.get(id).await?;
        self.ensure_unique(Some(id), patch.username.as_deref(), patch.email.as_deref())
            .await?;
        self.apply(id, patch).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.store.delete(id).await? {
            return Err(AppError::not_found("Usuário não encontrado"));
        }
        Ok(())
    }

    pub async fn activate(&self, id: Uuid) -> Result<User, AppError> {
        self.apply(id, UserPatch::ativo(true)).await
    }

    pub async fn deactivate(&self, id: Uuid) -> Result<User, AppError> {
        self.apply(id, UserPatch::ativo(false)).await
    }

    pub async fn change_password(&self, id: Uuid, payload: ChangePasswordPayload) -> Result<(), AppError> {
        payload.validate()?;

        let user = self.get(id).await?;
        if !self.auth.verify_password(&payload.current_password, &user.password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }

        let password_hash = self.auth.hash_password(&payload.new_password).await?;
        if !self.store.set_password(id, &password_hash, Utc::now()).await? {
            return Err(AppError::not_found("Usuário não encontrado"));
        }
        Ok(())
    }

    /// Login por username (sem diferenciar maiúsculas). Usuário inexistente,
    /// inativo ou senha errada dão a mesma resposta.
    pub async fn authenticate(&self, payload: LoginPayload) -> Result<LoginResponse, AppError> {
        payload.validate()?;

        let username = payload.username.trim().to_lowercase();
        let mut user = self
            .store
            .find_by_username(&username)
            .await?
            .filter(|u| u.ativo)
            .ok_or(AppError::InvalidCredentials)?;

        if !self.auth.verify_password(&payload.password, &user.password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }

        let now = Utc::now();
        self.store.touch_last_login(user.id, now).await?;
        user.last_login = Some(now);

        let token = self.auth.create_token(user.id)?;
        Ok(LoginResponse { usuario: user, token, token_type: "Bearer".to_string() })
    }

    pub async fn stats(&self) -> Result<UserStats, AppError> {
        let mut stats = UserStats {
            total_usuarios: self.store.count(&UserFilter::default()).await?,
            usuarios_ativos: self.store.count(&UserFilter::by_ativo(true)).await?,
            usuarios_inativos: self.store.count(&UserFilter::by_ativo(false)).await?,
            ..Default::default()
        };

        for grupo in UserGroup::ALL {
            let total = self.store.count(&UserFilter::by_grupo(grupo)).await?;
            stats.usuarios_por_grupo.insert(grupo.to_string(), total);
        }

        Ok(stats)
    }

    pub fn groups(&self) -> Vec<&'static str> {
        UserGroup::ALL.iter().map(UserGroup::as_str).collect()
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.store.ping().await
    }

    async fn apply(&self, id: Uuid, patch: UserPatch) -> Result<User, AppError> {
        self.store
            .update(id, &patch, Utc::now())
            .await?
            .ok_or_else(|| AppError::not_found("Usuário não encontrado"))
    }

    // Pré-checagem amigável; o índice único do banco continua valendo
    async fn ensure_unique(&self, except: Option<Uuid>, username: Option<&str>, email: Option<&str>) -> Result<(), AppError> {
        if let Some(username) = username {
            if let Some(existing) = self.store.find_by_username(username).await? {
                if Some(existing.id) != except {
                    return Err(AppError::DuplicateKey {
                        entity: "Usuário",
                        field: "username",
                        value: username.to_string(),
                    });
                }
            }
        }
        if let Some(email) = email {
            if let Some(existing) = self.store.find_by_email(email).await? {
                if Some(existing.id) != except {
                    return Err(AppError::DuplicateKey {
                        entity: "Usuário",
                        field: "email",
                        value: email.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

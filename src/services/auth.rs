// src/services/auth.rs
//
// Senhas (bcrypt) e tokens de sessão (JWT).

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserStore,
    models::user::{Claims, User},
};

// Validade do token emitido no login
const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    jwt_secret: String,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, jwt_secret: String, bcrypt_cost: u32) -> Self {
        Self { users, jwt_secret, bcrypt_cost }
    }

    // O hashing é pesado: roda em um thread separado
    pub async fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let password_clone = password.to_owned();
        let cost = self.bcrypt_cost;
        let hashed_password = tokio::task::spawn_blocking(move || hash(&password_clone, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
        Ok(hashed_password)
    }

    pub async fn verify_password(&self, password: &str, password_hash: &str) -> Result<bool, AppError> {
        let password_clone = password.to_owned();
        let password_hash_clone = password_hash.to_owned();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        Ok(is_password_valid)
    }

    /// Decodifica o token e carrega o usuário. Usuário removido ou inativo não autentica.
    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.users
            .find_by_id(token_data.claims.sub)
            .await?
            .filter(|user| user.ativo)
            .ok_or(AppError::InvalidToken)
    }

    pub fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(TOKEN_TTL_DAYS);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryUserStore;

    // Custo mínimo aceito pelo bcrypt, para os testes não ficarem lentos
    const TEST_BCRYPT_COST: u32 = 4;

    fn service() -> AuthService {
        AuthService::new(Arc::new(InMemoryUserStore::new()), "segredo-de-teste".into(), TEST_BCRYPT_COST)
    }

    #[tokio::test]
    async fn hash_never_equals_the_password_and_verifies() {
        let auth = service();
        let hashed = auth.hash_password("segredo123").await.unwrap();
        assert_ne!(hashed, "segredo123");
        assert!(auth.verify_password("segredo123", &hashed).await.unwrap());
        assert!(!auth.verify_password("outra", &hashed).await.unwrap());
    }

    #[tokio::test]
    async fn token_for_unknown_user_is_rejected() {
        let auth = service();
        let token = auth.create_token(Uuid::new_v4()).unwrap();
        assert!(matches!(auth.validate_token(&token).await, Err(AppError::InvalidToken)));
        assert!(matches!(auth.validate_token("lixo").await, Err(AppError::InvalidToken)));
    }
}

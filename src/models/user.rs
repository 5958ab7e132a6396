// src/models/user.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;
use crate::common::validation::{field_error, parse_canonical};
use crate::models::enums::UserGroup;

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub nome_completo: String,
    pub grupo: UserGroup,
    pub ativo: bool,

    #[serde(skip)] // nunca sai na resposta
    pub password_hash: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
}

// Username: só letras e números (espaços inclusive são recusados), guardado em minúsculas
fn normalize_username(raw: &str) -> Result<String, AppError> {
    if raw.is_empty() || !raw.chars().all(char::is_alphanumeric) {
        return Err(field_error("username", "Username deve conter apenas letras e números"));
    }
    Ok(raw.to_lowercase())
}

fn parse_grupo(raw: &str) -> Result<UserGroup, AppError> {
    parse_canonical("grupo", "Grupo", raw, UserGroup::DOMINIO)
}

// =============================================================================
//  PAYLOADS
// =============================================================================

// Dados para criação de um novo usuário
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserPayload {
    #[validate(length(min = 3, max = 50, message = "Username deve ter entre 3 e 50 caracteres"))]
    pub username: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    #[validate(length(min = 1, max = 100, message = "Nome completo deve ter entre 1 e 100 caracteres"))]
    pub nome_completo: String,

    #[schema(example = "TI Sistemas")]
    pub grupo: String,

    /// Padrão: `true`
    pub ativo: Option<bool>,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

/// Usuário validado; a senha ainda em texto puro, o service gera o hash.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub nome_completo: String,
    pub grupo: UserGroup,
    pub ativo: bool,
    pub password_hash: String,
}

impl CreateUserPayload {
    /// Devolve o usuário normalizado e a senha que ainda precisa de hash.
    pub fn into_new(self) -> Result<(NewUser, String), AppError> {
        self.validate()?;

        let user = NewUser {
            username: normalize_username(&self.username)?,
            email: self.email.trim().to_string(),
            nome_completo: self.nome_completo,
            grupo: parse_grupo(&self.grupo)?,
            ativo: self.ativo.unwrap_or(true),
            password_hash: String::new(),
        };

        Ok((user, self.password))
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserPayload {
    #[validate(length(min = 3, max = 50, message = "Username deve ter entre 3 e 50 caracteres"))]
    pub username: Option<String>,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Nome completo deve ter entre 1 e 100 caracteres"))]
    pub nome_completo: Option<String>,

    pub grupo: Option<String>,
    pub ativo: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub nome_completo: Option<String>,
    pub grupo: Option<UserGroup>,
    pub ativo: Option<bool>,
}

impl UpdateUserPayload {
    pub fn into_patch(self) -> Result<UserPatch, AppError> {
        self.validate()?;

        Ok(UserPatch {
            username: self.username.as_deref().map(normalize_username).transpose()?,
            email: self.email.map(|e| e.trim().to_string()),
            nome_completo: self.nome_completo,
            grupo: self.grupo.as_deref().map(parse_grupo).transpose()?,
            ativo: self.ativo,
        })
    }
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        *self == UserPatch::default()
    }

    pub fn ativo(ativo: bool) -> Self {
        UserPatch { ativo: Some(ativo), ..Default::default() }
    }

    pub fn apply_to(&self, user: &mut User, now: DateTime<Utc>) {
        if let Some(v) = &self.username {
            user.username = v.clone();
        }
        if let Some(v) = &self.email {
            user.email = v.clone();
        }
        if let Some(v) = &self.nome_completo {
            user.nome_completo = v.clone();
        }
        if let Some(v) = self.grupo {
            user.grupo = v;
        }
        if let Some(v) = self.ativo {
            user.ativo = v;
        }
        user.updated_at = Some(now);
    }
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(length(min = 1, message = "Username é obrigatório"))]
    pub username: String,
    #[validate(length(min = 1, message = "Senha é obrigatória"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordPayload {
    #[validate(length(min = 1, message = "Senha atual é obrigatória"))]
    pub current_password: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub new_password: String,
}

// Resposta do login: o usuário e o token
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub usuario: User,
    pub token: String,
    pub token_type: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}

// =============================================================================
//  FILTROS
// =============================================================================

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserFilterParams {
    /// Grupo exato (ex: "TI Sistemas")
    pub grupo: Option<String>,
    /// true / false
    pub ativo: Option<String>,
    /// Trecho do nome completo (sem diferenciar maiúsculas)
    pub search: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFilter {
    pub grupo: Option<UserGroup>,
    pub ativo: Option<bool>,
    pub search: Option<String>,
    pub username: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl UserFilterParams {
    pub fn to_filter(&self) -> UserFilter {
        UserFilter {
            grupo: non_empty(&self.grupo).and_then(|g| g.parse().ok()),
            ativo: non_empty(&self.ativo).and_then(|a| match a.trim().to_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            }),
            search: non_empty(&self.search).map(str::to_string),
            username: non_empty(&self.username).map(|u| u.trim().to_lowercase()),
        }
    }

    pub fn echo(&self) -> Map<String, Value> {
        [
            ("grupo", &self.grupo),
            ("ativo", &self.ativo),
            ("search", &self.search),
            ("username", &self.username),
        ]
        .into_iter()
        .filter_map(|(k, v)| non_empty(v).map(|v| (k.to_string(), Value::String(v.to_string()))))
        .collect()
    }
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        self.grupo.is_none_or(|g| user.grupo == g)
            && self.ativo.is_none_or(|a| user.ativo == a)
            && self
                .search
                .as_ref()
                .is_none_or(|s| user.nome_completo.to_lowercase().contains(&s.to_lowercase()))
            && self.username.as_ref().is_none_or(|u| &user.username == u)
    }

    pub fn by_grupo(grupo: UserGroup) -> Self {
        UserFilter { grupo: Some(grupo), ..Default::default() }
    }

    pub fn by_ativo(ativo: bool) -> Self {
        UserFilter { ativo: Some(ativo), ..Default::default() }
    }
}

// =============================================================================
//  ESTATÍSTICAS
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct UserStats {
    pub total_usuarios: i64,
    pub usuarios_ativos: i64,
    pub usuarios_inativos: i64,
    pub usuarios_por_grupo: BTreeMap<String, i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> CreateUserPayload {
        CreateUserPayload {
            username: "JoaoSilva".into(),
            email: "joao@empresa.com".into(),
            nome_completo: "João Silva".into(),
            grupo: "TI Sistemas".into(),
            ativo: None,
            password: "segredo123".into(),
        }
    }

    #[test]
    fn username_is_lowercased_and_ativo_defaults_to_true() {
        let (user, password) = payload().into_new().unwrap();
        assert_eq!(user.username, "joaosilva");
        assert!(user.ativo);
        assert_eq!(password, "segredo123");
    }

    #[test]
    fn rejects_non_alphanumeric_username_and_bad_email() {
        let mut p = payload();
        p.username = "joao.silva".into();
        assert!(p.into_new().is_err());

        let mut p = payload();
        p.email = "sem-arroba".into();
        assert!(matches!(p.into_new(), Err(AppError::ValidationError(_))));
    }

    #[test]
    fn username_with_spaces_is_rejected() {
        for username in ["   ", " ab ", " joao", "joao silva"] {
            let mut p = payload();
            p.username = username.into();
            assert!(p.into_new().is_err(), "{:?} deveria ser recusado", username);
        }

        let patch = UpdateUserPayload { username: Some("     ".into()), ..Default::default() };
        assert!(patch.into_patch().is_err());
    }

    #[test]
    fn groups_are_case_sensitive() {
        let mut p = payload();
        p.grupo = "ti sistemas".into();
        assert!(p.into_new().is_err());
    }

    #[test]
    fn short_password_is_rejected() {
        let mut p = payload();
        p.password = "123".into();
        assert!(p.into_new().is_err());
    }

    #[test]
    fn filter_parses_ativo_and_ignores_garbage() {
        let params = UserFilterParams {
            ativo: Some("TRUE".into()),
            grupo: Some("Financeiro".into()),
            ..Default::default()
        };
        let filter = params.to_filter();
        assert_eq!(filter.ativo, Some(true));
        assert_eq!(filter.grupo, None);

        let params = UserFilterParams { ativo: Some("talvez".into()), ..Default::default() };
        assert_eq!(params.to_filter().ativo, None);
    }
}

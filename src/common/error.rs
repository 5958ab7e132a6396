use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Corpo/query malformados, ID inválido, atualização vazia...
    #[error("{0}")]
    InvalidInput(String),

    // Violação de unicidade (pré-checagem ou índice único do banco)
    #[error("{entity} com {field} {value} já existe")]
    DuplicateKey {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        AppError::InvalidInput(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidInput(_)
            | AppError::DuplicateKey { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// O corpo JSON inválido (ou ausente) vira erro de validação, com o mesmo envelope.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(format!("Corpo da requisição inválido: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidInput(format!("Parâmetros de consulta inválidos: {}", rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (error, message, kind) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                let mut summary = Vec::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| match &e.message {
                            Some(m) => m.to_string(),
                            None => format!("Valor inválido para o campo {}", field),
                        })
                        .collect();
                    summary.extend(messages.iter().cloned());
                    details.insert(field.to_string(), messages);
                }
                summary.sort();
                tracing::warn!("Erro de validação: {}", summary.join("; "));

                let body = Json(json!({
                    "error": "Erro de validação",
                    "message": summary.join("; "),
                    "type": "validation_error",
                    "details": details,
                }));
                return (status, body).into_response();
            }
            AppError::InvalidInput(message) => {
                tracing::warn!("Erro de validação: {}", message);
                ("Erro de validação", message, "validation_error")
            }
            e @ AppError::DuplicateKey { .. } => {
                tracing::warn!("Erro de valor: {}", e);
                ("Erro de valor", e.to_string(), "value_error")
            }
            AppError::NotFound(message) => {
                tracing::info!("Recurso não encontrado: {}", message);
                ("Recurso não encontrado", message, "not_found")
            }
            AppError::InvalidCredentials => (
                "Credenciais inválidas",
                "Usuário ou senha incorretos".to_string(),
                "unauthorized",
            ),
            AppError::InvalidToken => (
                "Não autorizado",
                "Token de autenticação inválido ou ausente".to_string(),
                "unauthorized",
            ),

            // Todos os outros erros viram 500. O detalhe vai para o log, nunca para o cliente.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    "Erro interno do servidor",
                    "Ocorreu um erro inesperado".to_string(),
                    "internal_error",
                )
            }
        };

        let body = Json(json!({
            "error": error,
            "message": message,
            "type": kind,
        }));
        (status, body).into_response()
    }
}

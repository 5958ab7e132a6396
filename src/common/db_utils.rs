// src/common/db_utils.rs

use crate::common::error::AppError;

/// Traduz a violação de um índice único do Postgres para `AppError::DuplicateKey`.
/// `value` é o valor que o chamador tentou gravar, usado só na mensagem.
pub(crate) fn map_unique_violation(e: sqlx::Error, value: impl FnOnce(&str) -> String) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            if let Some(constraint) = db_err.constraint() {
                let (entity, field) = match constraint {
                    "incidentes_numero_key" => ("Incidente", "número"),
                    "changes_numero_key" => ("Change", "número"),
                    "usuarios_username_key" => ("Usuário", "username"),
                    "usuarios_email_key" => ("Usuário", "email"),
                    // Fallback (caso adicione outras chaves únicas no futuro)
                    _ => return AppError::invalid(format!("Violação de unicidade: {}", constraint)),
                };
                return AppError::DuplicateKey { entity, field, value: value(field) };
            }
        }
    }
    AppError::DatabaseError(e)
}

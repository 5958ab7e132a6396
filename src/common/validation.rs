// src/common/validation.rs

use std::borrow::Cow;
use std::str::FromStr;

use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use crate::common::error::AppError;

/// Monta um `AppError::ValidationError` para um único campo.
pub fn field_error(field: &'static str, message: impl Into<Cow<'static, str>>) -> AppError {
    let mut error = ValidationError::new("invalid");
    error.message = Some(message.into());

    let mut errors = ValidationErrors::new();
    errors.add(field, error);
    AppError::ValidationError(errors)
}

/// Normaliza (trim + minúsculas) e converte um valor enumerado.
/// `dominio` é a lista de valores aceitos, usada na mensagem de erro.
pub fn parse_canonical<T: FromStr>(
    field: &'static str,
    label: &str,
    value: &str,
    dominio: &[&str],
) -> Result<T, AppError> {
    value.parse::<T>().map_err(|_| {
        field_error(
            field,
            format!("{} deve ser uma das seguintes: {}", label, dominio.join(", ")),
        )
    })
}

/// IDs chegam como texto no path; um ID malformado é erro de validação (400), não 404.
pub fn parse_id(raw: &str, entidade: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::invalid(format!("ID de {} inválido", entidade)))
}

/// Texto obrigatório: não pode ser vazio depois do trim.
pub fn required_text(field: &'static str, value: &str, message: &'static str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(field_error(field, message));
    }
    Ok(trimmed.to_string())
}

// src/common/numbering.rs
//
// Geração do número de exibição (INC-001, CHG-042...).

use chrono::{DateTime, Utc};

/// Quantas vezes o service tenta gerar um novo número quando o índice único
/// acusa colisão (duas criações simultâneas calcularam o mesmo número).
pub const MAX_NUMERO_ATTEMPTS: usize = 5;

/// Máximo de dígitos de um sufixo gerado; o sucessor sempre cabe em `u64`.
pub const MAX_SUFFIX_DIGITS: usize = 18;

/// Número no formato gerado (`PREFIXO-<dígitos>`). Só esses entram no cálculo do próximo:
/// números livres informados pelo cliente (`INC-LEGADO`, sufixos enormes) são ignorados.
pub fn is_generated_number(prefix: &str, numero: &str) -> bool {
    numero
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('-'))
        .is_some_and(|digits| {
            (1..=MAX_SUFFIX_DIGITS).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
        })
}

/// Padrão equivalente a `is_generated_number` para o operador `~` do Postgres.
pub fn generated_number_pattern(prefix: &str) -> String {
    format!("^{}-[0-9]{{1,{}}}$", prefix, MAX_SUFFIX_DIGITS)
}

/// Calcula o próximo número a partir do maior número existente.
///
/// - Sem registros: `PREFIXO-001`.
/// - Sufixo numérico após o último `-`: incrementa, com zero à esquerda (3 dígitos).
/// - Sufixo ilegível: cai para um número baseado no timestamp.
pub fn next_display_number(prefix: &str, last: Option<&str>, now: DateTime<Utc>) -> String {
    let Some(last) = last else {
        return format!("{}-{:03}", prefix, 1);
    };

    let suffix = last.rsplit('-').next().unwrap_or(last);

    match suffix.parse::<u64>().ok().and_then(|n| n.checked_add(1)) {
        Some(next) => format!("{}-{:03}", prefix, next),
        None => {
            tracing::warn!("Número '{}' ilegível, usando número baseado em timestamp", last);
            format!("{}-{}", prefix, now.timestamp())
        }
    }
}

/// Ordena números de exibição como o banco faz: primeiro pelo tamanho, depois lexicograficamente.
/// Assim `INC-1000` fica depois de `INC-999`.
pub fn display_number_key(numero: &str) -> (usize, &str) {
    (numero.len(), numero)
}

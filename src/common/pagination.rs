// src/common/pagination.rs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_PER_PAGE: i64 = 50;
pub const MAX_PER_PAGE: i64 = 100;

// Parâmetros de paginação (?page=2&per_page=20)
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Página (mínimo 1)
    pub page: Option<i64>,
    /// Itens por página (1..=100, padrão 50)
    pub per_page: Option<i64>,
}

/// Paginação já normalizada. Valores fora da faixa são ajustados em silêncio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
}

impl Pagination {
    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Self {
        let page = page.unwrap_or(1).max(1);
        let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);
        Self { page, per_page }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    pub fn info(&self, total: i64) -> PageInfo {
        PageInfo {
            page: self.page,
            per_page: self.per_page,
            total,
            pages: (total + self.per_page - 1) / self.per_page,
        }
    }
}

impl From<PageParams> for Pagination {
    fn from(params: PageParams) -> Self {
        Pagination::new(params.page, params.per_page)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PageInfo {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub pages: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_silently() {
        let p = Pagination::new(Some(0), Some(1000));
        assert_eq!(p, Pagination { page: 1, per_page: MAX_PER_PAGE });

        let p = Pagination::new(None, Some(-3));
        assert_eq!(p.per_page, 1);

        let p = Pagination::new(None, None);
        assert_eq!((p.page, p.per_page), (1, DEFAULT_PER_PAGE));
    }

    #[test]
    fn computes_offset_and_pages() {
        let p = Pagination::new(Some(3), Some(20));
        assert_eq!(p.offset(), 40);
        let info = p.info(41);
        assert_eq!(info.pages, 3);
        assert_eq!(p.info(0).pages, 0);
    }
}

// src/db/change_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::common::db_utils::map_unique_violation;
use crate::common::error::AppError;
use crate::common::numbering::generated_number_pattern;
use crate::db::store::ChangeStore;
use crate::models::change::{Change, ChangeFilter, ChangePatch, NewChange};
use crate::models::enums::ChangeStatus;

const COLUMNS: &str = "id, numero, titulo, descricao, tipo, prioridade, status, data_programada, \
     grupo_responsavel, impacto, created_at, updated_at";

#[derive(Clone)]
pub struct ChangeRepository {
    pool: PgPool,
}

impl ChangeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &ChangeFilter) {
    qb.push(" WHERE TRUE");
    if let Some(tipo) = filter.tipo {
        qb.push(" AND tipo = ").push_bind(tipo);
    }
    if let Some(prioridade) = filter.prioridade {
        qb.push(" AND prioridade = ").push_bind(prioridade);
    }
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status);
    }
    if let Some(grupo) = &filter.grupo_responsavel {
        qb.push(" AND grupo_responsavel = ").push_bind(grupo.clone());
    }
    if let Some(impacto) = filter.impacto {
        qb.push(" AND impacto = ").push_bind(impacto);
    }
}

#[async_trait]
impl ChangeStore for ChangeRepository {
    async fn insert(&self, change: NewChange, now: DateTime<Utc>) -> Result<Change, AppError> {
        let sql = format!(
            r#"
            INSERT INTO changes (
                id, numero, titulo, descricao, tipo, prioridade, status,
                data_programada, grupo_responsavel, impacto, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {COLUMNS}
            "#
        );

        sqlx::query_as::<_, Change>(&sql)
            .bind(Uuid::new_v4())
            .bind(&change.numero)
            .bind(&change.titulo)
            .bind(&change.descricao)
            .bind(change.tipo)
            .bind(change.prioridade)
            .bind(change.status)
            .bind(change.data_programada)
            .bind(&change.grupo_responsavel)
            .bind(change.impacto)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, |_| change.numero.clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Change>, AppError> {
        let change = sqlx::query_as::<_, Change>(&format!("SELECT {COLUMNS} FROM changes WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(change)
    }

    async fn find_by_numero(&self, numero: &str) -> Result<Option<Change>, AppError> {
        let change = sqlx::query_as::<_, Change>(&format!("SELECT {COLUMNS} FROM changes WHERE numero = $1"))
            .bind(numero)
            .fetch_optional(&self.pool)
            .await?;
        Ok(change)
    }

    async fn last_numero(&self, prefix: &str) -> Result<Option<String>, AppError> {
        // INC-1000 é maior que INC-999: ordena pelo tamanho antes do texto
        let numero = sqlx::query_scalar::<_, String>(
            "SELECT numero FROM changes WHERE numero ~ $1 ORDER BY length(numero) DESC, numero DESC LIMIT 1",
        )
        .bind(generated_number_pattern(prefix))
        .fetch_optional(&self.pool)
        .await?;
        Ok(numero)
    }

    async fn list(&self, filter: &ChangeFilter, limit: i64, offset: i64) -> Result<Vec<Change>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM changes"));
        push_filters(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let changes = qb.build_query_as::<Change>().fetch_all(&self.pool).await?;
        Ok(changes)
    }

    async fn count(&self, filter: &ChangeFilter) -> Result<i64, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM changes");
        push_filters(&mut qb, filter);

        let total = qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
        Ok(total)
    }

    async fn scheduled_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        statuses: &[ChangeStatus],
    ) -> Result<Vec<Change>, AppError> {
        if statuses.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM changes"));
        qb.push(" WHERE data_programada >= ")
            .push_bind(start)
            .push(" AND data_programada <= ")
            .push_bind(end)
            .push(" AND status IN (");
        let mut separated = qb.separated(", ");
        for status in statuses {
            separated.push_bind(*status);
        }
        separated.push_unseparated(")");
        qb.push(" ORDER BY data_programada ASC");

        let changes = qb.build_query_as::<Change>().fetch_all(&self.pool).await?;
        Ok(changes)
    }

    async fn update(&self, id: Uuid, patch: &ChangePatch, now: DateTime<Utc>) -> Result<Option<Change>, AppError> {
        let sql = format!(
            r#"
            UPDATE changes SET
                titulo            = COALESCE($2, titulo),
                descricao         = COALESCE($3, descricao),
                tipo              = COALESCE($4, tipo),
                prioridade        = COALESCE($5, prioridade),
                status            = COALESCE($6, status),
                data_programada   = COALESCE($7, data_programada),
                grupo_responsavel = COALESCE($8, grupo_responsavel),
                impacto           = COALESCE($9, impacto),
                updated_at        = $10
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        );

        let change = sqlx::query_as::<_, Change>(&sql)
            .bind(id)
            .bind(&patch.titulo)
            .bind(&patch.descricao)
            .bind(patch.tipo)
            .bind(patch.prioridade)
            .bind(patch.status)
            .bind(patch.data_programada)
            .bind(&patch.grupo_responsavel)
            .bind(patch.impacto)
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;
        Ok(change)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM changes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

// src/db/incident_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::common::db_utils::map_unique_violation;
use crate::common::error::AppError;
use crate::common::numbering::generated_number_pattern;
use crate::db::store::IncidentStore;
use crate::models::incident::{Incident, IncidentFilter, IncidentPatch, NewIncident};

const COLUMNS: &str = "id, numero, titulo, descricao, prioridade, status, atribuido, tipo_tarefa, \
     grupo_designado, local_problema, incidente_vendas, created_at, updated_at";

// O repositório de incidentes, responsável por todas as interações com a tabela 'incidentes'
#[derive(Clone)]
pub struct IncidentRepository {
    pool: PgPool,
}

impl IncidentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Monta o WHERE a partir do filtro já traduzido
fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &IncidentFilter) {
    qb.push(" WHERE TRUE");
    if let Some(local) = &filter.local_problema {
        qb.push(" AND local_problema = ").push_bind(local.clone());
    }
    if let Some(prioridade) = filter.prioridade {
        qb.push(" AND prioridade = ").push_bind(prioridade);
    }
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status);
    }
    if let Some(grupo) = &filter.grupo_designado {
        qb.push(" AND grupo_designado = ").push_bind(grupo.clone());
    }
    if let Some(atribuido) = &filter.atribuido {
        qb.push(" AND atribuido = ").push_bind(atribuido.clone());
    }
    if let Some(vendas) = filter.incidente_vendas {
        qb.push(" AND incidente_vendas = ").push_bind(vendas);
    }
}

#[async_trait]
impl IncidentStore for IncidentRepository {
    async fn insert(&self, incident: NewIncident, now: DateTime<Utc>) -> Result<Incident, AppError> {
        let sql = format!(
            r#"
            INSERT INTO incidentes (
                id, numero, titulo, descricao, prioridade, status, atribuido,
                tipo_tarefa, grupo_designado, local_problema, incidente_vendas, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {COLUMNS}
            "#
        );

        sqlx::query_as::<_, Incident>(&sql)
            .bind(Uuid::new_v4())
            .bind(&incident.numero)
            .bind(&incident.titulo)
            .bind(&incident.descricao)
            .bind(incident.prioridade)
            .bind(incident.status)
            .bind(&incident.atribuido)
            .bind(incident.tipo_tarefa)
            .bind(&incident.grupo_designado)
            .bind(&incident.local_problema)
            .bind(incident.incidente_vendas)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, |_| incident.numero.clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Incident>, AppError> {
        let incident = sqlx::query_as::<_, Incident>(&format!("SELECT {COLUMNS} FROM incidentes WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(incident)
    }

    async fn find_by_numero(&self, numero: &str) -> Result<Option<Incident>, AppError> {
        let incident =
            sqlx::query_as::<_, Incident>(&format!("SELECT {COLUMNS} FROM incidentes WHERE numero = $1"))
                .bind(numero)
                .fetch_optional(&self.pool)
                .await?;
        Ok(incident)
    }

    async fn last_numero(&self, prefix: &str) -> Result<Option<String>, AppError> {
        // INC-1000 é maior que INC-999: ordena pelo tamanho antes do texto
        let numero = sqlx::query_scalar::<_, String>(
            "SELECT numero FROM incidentes WHERE numero ~ $1 ORDER BY length(numero) DESC, numero DESC LIMIT 1",
        )
        .bind(generated_number_pattern(prefix))
        .fetch_optional(&self.pool)
        .await?;
        Ok(numero)
    }

    async fn list(&self, filter: &IncidentFilter, limit: i64, offset: i64) -> Result<Vec<Incident>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM incidentes"));
        push_filters(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let incidents = qb.build_query_as::<Incident>().fetch_all(&self.pool).await?;
        Ok(incidents)
    }

    async fn count(&self, filter: &IncidentFilter) -> Result<i64, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM incidentes");
        push_filters(&mut qb, filter);

        let total = qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
        Ok(total)
    }

    async fn update(&self, id: Uuid, patch: &IncidentPatch, now: DateTime<Utc>) -> Result<Option<Incident>, AppError> {
        let sql = format!(
            r#"
            UPDATE incidentes SET
                titulo           = COALESCE($2, titulo),
                descricao        = COALESCE($3, descricao),
                prioridade       = COALESCE($4, prioridade),
                status           = COALESCE($5, status),
                atribuido        = COALESCE($6, atribuido),
                tipo_tarefa      = COALESCE($7, tipo_tarefa),
                grupo_designado  = COALESCE($8, grupo_designado),
                local_problema   = COALESCE($9, local_problema),
                incidente_vendas = COALESCE($10, incidente_vendas),
                updated_at       = $11
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        );

        let incident = sqlx::query_as::<_, Incident>(&sql)
            .bind(id)
            .bind(&patch.titulo)
            .bind(&patch.descricao)
            .bind(patch.prioridade)
            .bind(patch.status)
            .bind(&patch.atribuido)
            .bind(patch.tipo_tarefa)
            .bind(&patch.grupo_designado)
            .bind(&patch.local_problema)
            .bind(patch.incidente_vendas)
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;
        Ok(incident)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM incidentes WHERE id = $1")
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

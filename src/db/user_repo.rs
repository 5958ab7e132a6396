// src/db/user_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::common::db_utils::map_unique_violation;
use crate::common::error::AppError;
use crate::db::store::UserStore;
use crate::models::user::{NewUser, User, UserFilter, UserPatch};

const COLUMNS: &str = "id, username, email, nome_completo, grupo, ativo, password_hash, \
     created_at, updated_at, last_login";

// O repositório de usuários, responsável por todas as interações com a tabela 'usuarios'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM usuarios WHERE {column} = $1"))
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &UserFilter) {
    qb.push(" WHERE TRUE");
    if let Some(grupo) = filter.grupo {
        qb.push(" AND grupo = ").push_bind(grupo);
    }
    if let Some(ativo) = filter.ativo {
        qb.push(" AND ativo = ").push_bind(ativo);
    }
    if let Some(search) = &filter.search {
        qb.push(" AND nome_completo ILIKE ")
            .push_bind(format!("%{}%", escape_like(search)));
    }
    if let Some(username) = &filter.username {
        qb.push(" AND username = ").push_bind(username.clone());
    }
}

// O termo de busca é texto literal, não padrão
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

#[async_trait]
impl UserStore for UserRepository {
    async fn insert(&self, user: NewUser, now: DateTime<Utc>) -> Result<User, AppError> {
        let sql = format!(
            r#"
            INSERT INTO usuarios (
                id, username, email, nome_completo, grupo, ativo, password_hash, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {COLUMNS}
            "#
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.nome_completo)
            .bind(user.grupo)
            .bind(user.ativo)
            .bind(&user.password_hash)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                map_unique_violation(e, |field| match field {
                    "email" => user.email.clone(),
                    _ => user.username.clone(),
                })
            })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM usuarios WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        self.find_one("username", username).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.find_one("email", email).await
    }

    async fn list(&self, filter: &UserFilter, limit: i64, offset: i64) -> Result<Vec<User>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM usuarios"));
        push_filters(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let users = qb.build_query_as::<User>().fetch_all(&self.pool).await?;
        Ok(users)
    }

    async fn count(&self, filter: &UserFilter) -> Result<i64, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM usuarios");
        push_filters(&mut qb, filter);

        let total = qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
        Ok(total)
    }

    async fn update(&self, id: Uuid, patch: &UserPatch, now: DateTime<Utc>) -> Result<Option<User>, AppError> {
        let sql = format!(
            r#"
            UPDATE usuarios SET
                username      = COALESCE($2, username),
                email         = COALESCE($3, email),
                nome_completo = COALESCE($4, nome_completo),
                grupo         = COALESCE($5, grupo),
                ativo         = COALESCE($6, ativo),
                updated_at    = $7
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(&patch.username)
            .bind(&patch.email)
            .bind(&patch.nome_completo)
            .bind(patch.grupo)
            .bind(patch.ativo)
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                map_unique_violation(e, |field| match field {
                    "email" => patch.email.clone().unwrap_or_default(),
                    _ => patch.username.clone().unwrap_or_default(),
                })
            })
    }

    async fn set_password(&self, id: Uuid, password_hash: &str, now: DateTime<Utc>) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE usuarios SET password_hash = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn touch_last_login(&self, id: Uuid, now: DateTime<Utc>) -> Result<(), AppError> {
        sqlx::query("UPDATE usuarios SET last_login = $2 WHERE id = $1")
            .bind(id)
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM usuarios WHERE id = $1")
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

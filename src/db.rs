pub mod change_repo;
pub mod incident_repo;
pub mod memory;
pub mod store;
pub mod user_repo;

pub use change_repo::ChangeRepository;
pub use incident_repo::IncidentRepository;
pub use memory::{InMemoryChangeStore, InMemoryIncidentStore, InMemoryUserStore};
pub use store::{ChangeStore, IncidentStore, UserStore};
pub use user_repo::UserRepository;

use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::Config;

// Conecta ao banco de dados, usando '?' para propagar erros
pub async fn connect(config: &Config) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_secs))
        .connect(&config.database_url)
        .await?;

    tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
    Ok(pool)
}

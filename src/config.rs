// src/config.rs

use std::{env, str::FromStr, sync::Arc};

use anyhow::Context;
use sqlx::PgPool;

use crate::{
    db::{
        ChangeRepository, ChangeStore, InMemoryChangeStore, InMemoryIncidentStore, InMemoryUserStore,
        IncidentRepository, IncidentStore, UserRepository, UserStore,
    },
    services::{
        auth::AuthService, change_service::ChangeService, dashboard_service::DashboardService,
        incident_service::IncidentService, user_service::UserService,
    },
};

// Configurações lidas do ambiente (.env opcional)
#[derive(Debug, Clone)]
pub struct Config {
    pub app_name: String,
    pub database_url: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub bcrypt_cost: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "Sistema de Chamados API".to_string(),
            database_url: String::new(),
            jwt_secret: String::new(),
            host: "0.0.0.0".to_string(),
            port: 5000,
            cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
            log_level: "info".to_string(),
            db_max_connections: 10,
            db_acquire_timeout_secs: 5,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

// Lê uma variável opcional, caindo no padrão quando ausente
fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Valor inválido para {}: {}", key, e)),
        _ => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Config::default();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let cors_origins = match env::var("CORS_ORIGINS") {
            Ok(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect(),
            Err(_) => defaults.cors_origins,
        };

        Ok(Self {
            app_name: env_or("APP_NAME", defaults.app_name)?,
            database_url,
            jwt_secret,
            host: env_or("HOST", defaults.host)?,
            port: env_or("PORT", defaults.port)?,
            cors_origins,
            log_level: env_or("LOG_LEVEL", defaults.log_level)?,
            db_max_connections: env_or("DB_MAX_CONNECTIONS", defaults.db_max_connections)?,
            db_acquire_timeout_secs: env_or("DB_ACQUIRE_TIMEOUT_SECS", defaults.db_acquire_timeout_secs)?,
            bcrypt_cost: env_or("BCRYPT_COST", defaults.bcrypt_cost)?,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth_service: AuthService,
    pub incident_service: IncidentService,
    pub change_service: ChangeService,
    pub user_service: UserService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    // --- Monta o gráfico de dependências ---
    pub fn with_stores(
        config: Config,
        incidents: Arc<dyn IncidentStore>,
        changes: Arc<dyn ChangeStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        let auth_service = AuthService::new(users.clone(), config.jwt_secret.clone(), config.bcrypt_cost);
        let incident_service = IncidentService::new(incidents);
        let change_service = ChangeService::new(changes);
        let user_service = UserService::new(users, auth_service.clone());
        let dashboard_service = DashboardService::new(
            incident_service.clone(),
            change_service.clone(),
            user_service.clone(),
        );

        Self {
            config: Arc::new(config),
            auth_service,
            incident_service,
            change_service,
            user_service,
            dashboard_service,
        }
    }

    pub fn from_pool(config: Config, pool: PgPool) -> Self {
        Self::with_stores(
            config,
            Arc::new(IncidentRepository::new(pool.clone())),
            Arc::new(ChangeRepository::new(pool.clone())),
            Arc::new(UserRepository::new(pool)),
        )
    }

    pub fn in_memory(config: Config) -> Self {
        Self::with_stores(
            config,
            Arc::new(InMemoryIncidentStore::new()),
            Arc::new(InMemoryChangeStore::new()),
            Arc::new(InMemoryUserStore::new()),
        )
    }
}

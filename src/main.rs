//src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use chamados::{config::{AppState, Config}, db, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // RUST_LOG tem precedência; sem ele vale o LOG_LEVEL da configuração
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    let pool = db::connect(&config).await?;

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!().run(&pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let addr = config.addr();
    let app_state = AppState::from_pool(config, pool);
    let app = routes::router(app_state);

    // Inicia o servidor
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Servidor encerrado");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Falha ao escutar o sinal de encerramento: {}", e);
    }
}

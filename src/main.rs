use tracing_subscriber::EnvFilter;

use catalog_api::config;
use catalog_api::database::context;
use catalog_api::routes::{app, AppState};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, CATALOG_JWT_KEY, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting Catalog API in {:?} mode", config.environment);

    let pool = match context::connect().await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to open database pool: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = context::run_migrations(&pool).await {
        tracing::error!("Failed to run migrations: {}", e);
        std::process::exit(1);
    }

    let app = app(AppState { pool });

    // Allow tests or deployments to override port via env
    let port = std::env::var("CATALOG_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Catalog API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

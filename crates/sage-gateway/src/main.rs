use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};

mod app;
mod http;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sage_gateway=info,tower_http=debug".into()),
        )
        .init();

    // load config: explicit path > SAGE_CONFIG env > ~/.sage/sage.toml
    let config_path = std::env::var("SAGE_CONFIG").ok();
    let config = sage_core::config::SageConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        warn!("Config load failed ({}), using defaults", e);
        sage_core::config::SageConfig::default()
    });

    // provider key: TOML first, GEMINI_API_KEY env as fallback — fatal if absent
    let api_key = match config
        .provider
        .api_key
        .clone()
        .or_else(|| std::env::var("GEMINI_API_KEY").ok())
    {
        Some(key) if !key.is_empty() => key,
        _ => {
            anyhow::bail!(
                "no provider API key: set provider.api_key in sage.toml or the GEMINI_API_KEY env var"
            );
        }
    };

    let bind = config.gateway.bind.clone();
    let port = config.gateway.port;

    // initialize SQLite database
    let db_path = &config.database.path;
    ensure_parent_dir(db_path);
    info!(path = %db_path, "opening SQLite database");

    let db = rusqlite::Connection::open(db_path)?;
    db.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    sage_store::db::init_db(&db)?;
    info!("database schema ready");

    let store = sage_store::SubjectStore::new(db);

    // resolve a usable model once, before serving — blocking sequential probes
    let provider = sage_agent::GeminiClient::new(api_key, Some(config.provider.base_url.clone()));
    let planner = match sage_agent::resolve_model(&provider).await {
        Ok(model) => {
            info!(model = %model, "model resolved");
            Some(sage_agent::PlanGenerator::new(Box::new(provider), model))
        }
        Err(e) => {
            // Subject CRUD stays available; /api/chat answers 503 until restart.
            error!(error = %e, "model resolution failed — plan generation disabled");
            None
        }
    };

    let state = Arc::new(app::AppState::new(config, store, planner));
    let router = app::build_router(state);

    let addr: SocketAddr = format!("{}:{}", bind, port).parse()?;
    info!("Sage gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

/// Ensure the parent directory for a file path exists.
fn ensure_parent_dir(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
}

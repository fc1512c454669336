use anyhow::Context;
use todo_api::{
    config::{Config, StoreBackend},
    domain::repository::TodoStore,
    http::routing,
    infrastructure::{memory_store::MemoryTodoStore, sqlite_store::{is_memory_url, SqliteTodoStore}},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;

    // kept outside the router so the pool can be closed after shutdown
    let mut sqlite = None;
    let router = match config.backend {
        StoreBackend::Sqlite => {
            prepare_sqlite_file(&config.database_url)?;
            let store = SqliteTodoStore::connect(&config.database_url).await?;
            store.init().await.context("failed to create todos table")?;
            tracing::info!(url = %config.database_url, "connected to sqlite");
            sqlite = Some(store.clone());
            routing::build_app(store, &config)?
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store, todos are lost on exit");
            routing::build_app(MemoryTodoStore::new(), &config)?
        }
    };

    let addr = config.listen_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await.with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(store) = sqlite {
        store.close().await;
    }
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal::ctrl_c;
    let _ = ctrl_c().await;
    tracing::info!("shutdown");
}

fn prepare_sqlite_file(database_url: &str) -> anyhow::Result<()> {
    if is_memory_url(database_url) { return Ok(()); }
    let Some(path) = database_url.strip_prefix("sqlite://").or_else(|| database_url.strip_prefix("sqlite:")) else {
        return Ok(());
    };
    // drop query parameters such as ?mode=rwc
    let path = path.split('?').next().unwrap_or(path);
    // On Windows, absolute paths may look like /C:/path; strip the leading slash
    let path = if cfg!(windows) && path.len() >= 3 && path.as_bytes()[0] == b'/' && path.as_bytes()[2] == b':' {
        &path[1..]
    } else {
        path
    };
    use std::{fs, fs::OpenOptions, path::Path};
    let p = Path::new(path);
    if let Some(parent) = p.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    if !p.exists() {
        OpenOptions::new().create(true).append(true).open(p).with_context(|| format!("failed to create {}", p.display()))?;
    }
    Ok(())
}

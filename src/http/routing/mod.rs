use anyhow::{Context, Result};
use axum::{routing::get, Router};
use http::{header, HeaderValue, Method};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    application::todo_service::TodoService,
    config::Config,
    domain::repository::TodoStore,
    http::routes::todos::{self, AppState},
};

pub fn app(router: Router, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(router)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub fn cors(origin: &str) -> Result<CorsLayer> {
    let origin = HeaderValue::from_str(origin).with_context(|| format!("invalid CORS origin `{origin}`"))?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::ACCEPT]))
}

/// Wires a store into the full application router.
pub fn build_app<S: TodoStore>(store: S, config: &Config) -> Result<Router> {
    let service = TodoService::with_deadline(store, config.request_timeout);
    Ok(app(todos::router(AppState { service }), cors(&config.cors_origin)?))
}

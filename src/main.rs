use tracing_subscriber::EnvFilter;

use sketchhub::{config, routes, state};

#[tokio::main]
async fn main() {
    // A missing .env file is fine; real deployments set the environment directly.
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sketchhub=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = config::Config::from_env().expect("invalid configuration");
    let port = config.port;
    tracing::info!(static_dir = %config.static_dir.display(), join_order = ?config.join_order, cache = ?config.cache_policy, "config loaded");

    let state = state::AppState::new(config);
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "sketchhub listening");
    axum::serve(listener, app).await.expect("server failed");
}

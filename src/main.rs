mod admin;
mod app;
mod auth;
mod config;
mod db;
mod errors;
#[cfg(test)]
mod memory;
mod posts;
mod state;
mod users;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "inkpost=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = state::AppState::init().await?;
    tracing::info!(
        session_ttl_minutes = app_state.config.jwt.ttl_minutes,
        "session lifetime configured"
    );

    let addr = app_state.config.bind_addr;
    app::serve(app::build_app(app_state), addr).await
}

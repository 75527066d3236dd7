mod ai;
mod app;
mod auth;
mod config;
mod db;
mod error;
mod pantry;
mod recipes;
mod scan;
mod state;
#[cfg(test)]
mod testing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "smartpantry=debug,axum=info,tower_http=info".to_string());
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

    if let Err(e) = db::migrate(&app_state.db).await {
        tracing::warn!(error = %e, "migration failed; continuing");
    }
    match auth::repo::purge_expired_revocations(&app_state.db).await {
        Ok(n) if n > 0 => tracing::info!(purged = n, "expired refresh token revocations removed"),
        Ok(_) => {}
        Err(e) => tracing::warn!(error = %e, "failed to purge revoked tokens"),
    }

    let app = app::build_app(app_state);
    app::serve(app).await
}

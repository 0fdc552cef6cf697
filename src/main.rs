use anyhow::{Context, Result};
use clap::Parser;
use covid_dashboard::{
    build_snapshot,
    config::{Cli, Config},
    fetch,
    server::{self, AppState},
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,covid_dashboard=info,tower_http=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) configuration ────────────────────────────────────────────
    let config = Config::load(Cli::parse()).context("loading configuration")?;
    info!(url = %config.url, table_id = %config.table_id, "source");

    let logo = match &config.logo_path {
        Some(path) => Some(
            tokio::fs::read(path)
                .await
                .with_context(|| format!("reading logo {}", path.display()))?,
        ),
        None => None,
    };

    // ─── 3) one full pipeline run; any failure here means no dashboard ─
    let client = fetch::build_client(&config)?;
    let snapshot = build_snapshot(&client, &config)
        .await
        .context("building initial dashboard snapshot")?;
    for w in &snapshot.warnings {
        info!(warning = %w, "snapshot built with data warning");
    }

    // ─── 4) serve ────────────────────────────────────────────────────
    let state = AppState::new(config, client, snapshot, logo)?;
    server::serve(state).await?;

    info!("shutdown");
    Ok(())
}

// src/server/mod.rs

pub mod handlers;
pub mod page;

use crate::config::Config;
use crate::error::Result;
use crate::snapshot::{build_snapshot, DashboardSnapshot};
use axum::{
    routing::{get, post},
    Router,
};
use handlebars::Handlebars;
use reqwest::Client;
use std::{sync::Arc, time::Duration};
use tokio::{
    net::TcpListener,
    sync::{Mutex, RwLock},
    time::{Interval, MissedTickBehavior},
};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// State shared across handlers. The snapshot itself is immutable; a
/// refresh builds a new one and swaps the pointer.
#[derive(Clone)]
pub struct AppState {
    snapshot: Arc<RwLock<Arc<DashboardSnapshot>>>,
    /// Held for a whole rebuild so the timer and manual refreshes never overlap.
    refresh_lock: Arc<Mutex<()>>,
    client: Client,
    config: Arc<Config>,
    logo: Option<Arc<Vec<u8>>>,
    templates: Arc<Handlebars<'static>>,
}

impl AppState {
    pub fn new(
        config: Config,
        client: Client,
        snapshot: DashboardSnapshot,
        logo: Option<Vec<u8>>,
    ) -> Result<Self> {
        Ok(Self {
            snapshot: Arc::new(RwLock::new(Arc::new(snapshot))),
            refresh_lock: Arc::new(Mutex::new(())),
            client,
            config: Arc::new(config),
            logo: logo.map(Arc::new),
            templates: Arc::new(page::registry()?),
        })
    }

    pub async fn current(&self) -> Arc<DashboardSnapshot> {
        self.snapshot.read().await.clone()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn logo(&self) -> Option<&[u8]> {
        self.logo.as_deref().map(Vec::as_slice)
    }

    pub fn templates(&self) -> &Handlebars<'static> {
        &self.templates
    }

    /// Run the whole pipeline again. On failure the previous snapshot stays.
    pub async fn refresh(&self) -> Result<Arc<DashboardSnapshot>> {
        let _running = self.refresh_lock.lock().await;
        let fresh = Arc::new(build_snapshot(&self.client, &self.config).await?);
        *self.snapshot.write().await = fresh.clone();
        info!(last_updated = %fresh.last_updated, "snapshot refreshed");
        Ok(fresh)
    }
}

/// Create the dashboard router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health_check))
        .route("/api/snapshot", get(handlers::get_snapshot))
        .route("/api/table", get(handlers::get_table))
        .route("/api/refresh", post(handlers::refresh))
        .route("/assets/logo.png", get(handlers::logo))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Interval for scheduled refreshes. A rebuild that overruns the period
/// pushes the next one back instead of firing a burst of catch-up ticks.
pub fn refresh_ticker(every: Duration) -> Interval {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

/// Rebuild the snapshot every `every`, starting one interval from now.
pub fn spawn_refresh(state: AppState, every: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = refresh_ticker(every);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(e) = state.refresh().await {
                error!(error = %e, "scheduled refresh failed; keeping previous snapshot");
            }
        }
    })
}

/// Bind, start the optional refresh timer, and serve until shutdown.
pub async fn serve(state: AppState) -> Result<()> {
    if let Some(every) = state.config.refresh_interval() {
        info!(every_secs = every.as_secs(), "scheduled refresh enabled");
        spawn_refresh(state.clone(), every);
    }

    let listener = TcpListener::bind(state.config.bind).await?;
    info!(addr = %listener.local_addr()?, "dashboard listening");
    axum::serve(listener, create_router(state)).await?;
    Ok(())
}

use std::sync::Arc;

use crate::{config::Config, events::EventBus};
use dexfeed_core::{
    cache::{CacheStore, MemoryStore, RedisStore, TokenCache},
    constants::TOKEN_CACHE_TTL,
    scheduler::{Scheduler, SchedulerConfig},
    tokens::{TokenService, TokenServiceTrait},
    watcher::{ChangeWatcher, WatcherConfig},
};
use dexfeed_market_data::{
    DexScreenerProvider, GeckoTerminalProvider, JupiterProvider, ProviderClient, RateLimiter,
    RetryingFetcher, SourceRegistry, TokenSource,
};
use tokio::task::JoinHandle;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Buffered updates per subscriber before it starts lagging.
const EVENT_BUS_CAPACITY: usize = 1024;

pub struct AppState {
    pub token_service: Arc<dyn TokenServiceTrait>,
    pub token_cache: TokenCache,
    pub scheduler: Arc<Scheduler>,
    pub event_bus: EventBus,
}

pub fn init_tracing() {
    let log_format = std::env::var("DEXFEED_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

async fn build_store(config: &Config) -> Arc<dyn CacheStore> {
    match &config.redis_url {
        Some(url) => match RedisStore::connect(url).await {
            Ok(store) => Arc::new(store),
            Err(e) => {
                tracing::warn!("Redis unavailable ({}), falling back to in-memory cache", e);
                Arc::new(MemoryStore::new())
            }
        },
        None => {
            tracing::info!("REDIS_URL not set, using in-memory cache");
            Arc::new(MemoryStore::new())
        }
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let store = build_store(config).await;
    let token_cache = TokenCache::new(store, TOKEN_CACHE_TTL);

    let rate_limiter = Arc::new(RateLimiter::new());
    let client = ProviderClient::new(Arc::new(RetryingFetcher::new()), rate_limiter.clone());

    let dexscreener = Arc::new(DexScreenerProvider::new(client.clone()));
    // Fan-out order: DexScreener, Jupiter, GeckoTerminal
    let sources: Vec<Arc<dyn TokenSource>> = vec![
        dexscreener.clone(),
        Arc::new(JupiterProvider::new(client.clone())),
        Arc::new(GeckoTerminalProvider::new(client)),
    ];
    let registry = Arc::new(SourceRegistry::new(sources, rate_limiter));
    tracing::info!(
        "Merge precedence: {}",
        registry.policy().precedence().join(" > ")
    );

    let token_service: Arc<dyn TokenServiceTrait> =
        Arc::new(TokenService::new(registry, token_cache.clone()));

    let scheduler = Arc::new(Scheduler::new(
        dexscreener,
        token_cache.clone(),
        SchedulerConfig::default(),
    ));

    Ok(Arc::new(AppState {
        token_service,
        token_cache,
        scheduler,
        event_bus: EventBus::new(EVENT_BUS_CAPACITY),
    }))
}

/// Start the scheduler jobs and the change watcher.
pub fn start_background_jobs(state: &Arc<AppState>) -> Vec<JoinHandle<()>> {
    let mut handles = state.scheduler.clone().spawn();

    let watcher = ChangeWatcher::new(
        state.token_cache.clone(),
        Arc::new(state.event_bus.clone()),
        WatcherConfig::default(),
    );
    handles.push(watcher.spawn());

    handles
}

//! Background jobs that keep hot cache entries warm.
//!
//! Each job runs once at startup and then on its own fixed interval. A
//! failed run is logged and the loop carries on; jobs never share state
//! beyond the cache itself, so they may overlap freely.

use log::{debug, info, warn};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use dexfeed_market_data::TokenDiscovery;

use super::scheduler_model::{SchedulerConfig, SchedulerJob};
use crate::cache::TokenCache;
use crate::errors::Result;

pub struct Scheduler {
    discovery: Arc<dyn TokenDiscovery>,
    cache: TokenCache,
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(
        discovery: Arc<dyn TokenDiscovery>,
        cache: TokenCache,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            discovery,
            cache,
            config,
        }
    }

    /// Start all three job loops. Dropping the handles leaves them running.
    pub fn spawn(self: Arc<Self>) -> Vec<JoinHandle<()>> {
        [
            SchedulerJob::UniverseRefresh,
            SchedulerJob::Prewarm,
            SchedulerJob::LiveSweep,
        ]
        .into_iter()
        .map(|job| self.clone().spawn_job(job))
        .collect()
    }

    fn spawn_job(self: Arc<Self>, job: SchedulerJob) -> JoinHandle<()> {
        let period = self.config.interval(job);
        tokio::spawn(async move {
            info!("Scheduler {} started ({:?} interval)", job.name(), period);

            // First tick completes immediately
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                self.run_job(job).await;
            }
        })
    }

    /// Run one job and log its outcome. Never fails.
    pub async fn run_job(&self, job: SchedulerJob) {
        let result = match job {
            SchedulerJob::UniverseRefresh => self.refresh_universe().await,
            SchedulerJob::Prewarm => self.prewarm().await,
            SchedulerJob::LiveSweep => self.live_sweep().await,
        };

        match result {
            Ok(count) => info!("Scheduler {} wrote {} tokens", job.name(), count),
            Err(e) => warn!("Scheduler {} failed: {}", job.name(), e),
        }
    }

    /// Replace the stored universe with the current discovery ranking.
    pub async fn refresh_universe(&self) -> Result<usize> {
        let records = self
            .discovery
            .discover_top_tokens(&self.config.discovery_query, self.config.universe_limit)
            .await?;

        if records.is_empty() {
            debug!("Discovery returned no tokens; clearing universe");
        }

        Ok(if self.cache.put_universe(&records).await {
            records.len()
        } else {
            0
        })
    }

    /// Cache the top tokens by liquidity with the standard TTL.
    pub async fn prewarm(&self) -> Result<usize> {
        self.write_top(self.config.prewarm_limit).await
    }

    /// Refresh the most active tokens ahead of their TTL.
    pub async fn live_sweep(&self) -> Result<usize> {
        self.write_top(self.config.live_limit).await
    }

    async fn write_top(&self, limit: usize) -> Result<usize> {
        let records = self
            .discovery
            .discover_top_tokens(&self.config.discovery_query, limit)
            .await?;

        let mut written = 0;
        for record in &records {
            if self.cache.put(record).await {
                written += 1;
            }
        }
        Ok(written)
    }
}

use std::time::Duration;

use crate::constants::{
    DISCOVERY_QUERY, LIVE_SWEEP_INTERVAL, LIVE_SWEEP_LIMIT, PREWARM_INTERVAL, PREWARM_LIMIT,
    UNIVERSE_LIMIT, UNIVERSE_REFRESH_INTERVAL,
};

/// The three background jobs that keep the cache warm.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerJob {
    UniverseRefresh,
    Prewarm,
    LiveSweep,
}

impl SchedulerJob {
    pub fn name(&self) -> &'static str {
        match self {
            Self::UniverseRefresh => "universe refresh",
            Self::Prewarm => "pre-warm",
            Self::LiveSweep => "live sweep",
        }
    }
}

/// Timer periods and batch sizes for the scheduler.
#[derive(Clone, Debug)]
pub struct SchedulerConfig {
    pub universe_interval: Duration,
    pub prewarm_interval: Duration,
    pub live_interval: Duration,
    pub universe_limit: usize,
    pub prewarm_limit: usize,
    pub live_limit: usize,
    pub discovery_query: String,
}

impl SchedulerConfig {
    pub fn interval(&self, job: SchedulerJob) -> Duration {
        match job {
            SchedulerJob::UniverseRefresh => self.universe_interval,
            SchedulerJob::Prewarm => self.prewarm_interval,
            SchedulerJob::LiveSweep => self.live_interval,
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            universe_interval: UNIVERSE_REFRESH_INTERVAL,
            prewarm_interval: PREWARM_INTERVAL,
            live_interval: LIVE_SWEEP_INTERVAL,
            universe_limit: UNIVERSE_LIMIT,
            prewarm_limit: PREWARM_LIMIT,
            live_limit: LIVE_SWEEP_LIMIT,
            discovery_query: DISCOVERY_QUERY.to_string(),
        }
    }
}

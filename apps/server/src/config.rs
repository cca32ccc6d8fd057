use std::{net::SocketAddr, time::Duration};

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:4000";
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

pub struct Config {
    pub listen_addr: SocketAddr,
    /// Shared store; `None` runs on the in-process memory store
    pub redis_url: Option<String>,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
}

impl Config {
    /// Read settings from the process environment. The binary loads `.env`
    /// before calling this.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let listen_addr = var("DEXFEED_LISTEN_ADDR")
            .and_then(|raw| match raw.parse::<SocketAddr>() {
                Ok(addr) => Some(addr),
                Err(_) => {
                    tracing::warn!(
                        "Invalid DEXFEED_LISTEN_ADDR {:?}, using {}",
                        raw,
                        DEFAULT_LISTEN_ADDR
                    );
                    None
                }
            })
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 4000)));

        let redis_url = var("REDIS_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let cors_allow = var("DEXFEED_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let timeout_ms: u64 = var("DEXFEED_REQUEST_TIMEOUT_MS")
            .and_then(|raw| match raw.parse() {
                Ok(ms) => Some(ms),
                Err(_) => {
                    tracing::warn!(
                        "Invalid DEXFEED_REQUEST_TIMEOUT_MS {:?}, using {}",
                        raw,
                        DEFAULT_TIMEOUT_MS
                    );
                    None
                }
            })
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        Self {
            listen_addr,
            redis_url,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
        }
    }
}

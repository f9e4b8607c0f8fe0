use std::env;
use std::time::Duration;
use std::num::NonZeroU32;
use governor::Quota;
use crate::rcon::connection::{ ConnectionParams, DEFAULT_CLIENT_NAME, DEFAULT_REPLY_TIMEOUT };
use crate::rcon::pacing::DEFAULT_CALL_DELAY;

#[derive(Clone)]
pub struct Config {
    pub bind_address: String,
    pub port: u16,

    // Game server RCON endpoint
    pub rcon_host: String,
    pub rcon_port: u16,
    pub rcon_password: Option<String>,
    pub rcon_client_name: String,
    pub rcon_timeout_secs: u64,

    // Background jobs
    pub stats_call_delay_ms: u64,
    pub status_interval_secs: u64,
    pub stats_sweep_interval_secs: u64,
    pub player_retention_secs: u64,

    // Rate limiting for routes that reach the game server
    pub rcon_route_period_secs: u64,
    pub rcon_route_burst_limit: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            rcon_host: "127.0.0.1".to_string(),
            rcon_port: 28016,
            rcon_password: None,
            rcon_client_name: DEFAULT_CLIENT_NAME.to_string(),
            rcon_timeout_secs: DEFAULT_REPLY_TIMEOUT.as_secs(),
            stats_call_delay_ms: DEFAULT_CALL_DELAY.as_millis() as u64,
            status_interval_secs: 3600,
            stats_sweep_interval_secs: 3600,
            player_retention_secs: 30 * 24 * 3600, // 30 days
            rcon_route_period_secs: 5,
            rcon_route_burst_limit: 10,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            port: env_or("PORT", defaults.port),

            rcon_host: env::var("RCON_HOST").unwrap_or(defaults.rcon_host),
            rcon_port: env_or("RCON_PORT", defaults.rcon_port),
            rcon_password: env::var("RCON_PASSWORD").ok().filter(|p| !p.is_empty()),
            rcon_client_name: env::var("RCON_CLIENT_NAME").unwrap_or(defaults.rcon_client_name),
            rcon_timeout_secs: env_or("RCON_TIMEOUT_SECS", defaults.rcon_timeout_secs),

            stats_call_delay_ms: env_or("STATS_CALL_DELAY_MS", defaults.stats_call_delay_ms),
            status_interval_secs: env_or("STATUS_INTERVAL_SECS", defaults.status_interval_secs),
            stats_sweep_interval_secs: env_or(
                "STATS_SWEEP_INTERVAL_SECS",
                defaults.stats_sweep_interval_secs
            ),
            player_retention_secs: env_or("PLAYER_RETENTION_SECS", defaults.player_retention_secs),

            rcon_route_period_secs: env_or("RCON_ROUTE_PERIOD_SECS", defaults.rcon_route_period_secs),
            rcon_route_burst_limit: env_or("RCON_ROUTE_BURST_LIMIT", defaults.rcon_route_burst_limit),
        }
    }

    pub fn bind(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Connection parameters for the game server, or `None` when no RCON password is configured.
    pub fn connection_params(&self) -> Option<ConnectionParams> {
        self.rcon_password.as_ref().map(|password| ConnectionParams {
            host: self.rcon_host.clone(),
            port: self.rcon_port,
            password: password.clone(),
            client_name: self.rcon_client_name.clone(),
        })
    }

    pub fn reply_timeout(&self) -> Duration {
        Duration::from_secs(self.rcon_timeout_secs)
    }

    pub fn stats_call_delay(&self) -> Duration {
        Duration::from_millis(self.stats_call_delay_ms)
    }

    pub fn status_interval(&self) -> Duration {
        Duration::from_secs(self.status_interval_secs.max(1))
    }

    pub fn stats_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.stats_sweep_interval_secs.max(1))
    }

    pub fn player_retention(&self) -> Duration {
        Duration::from_secs(self.player_retention_secs)
    }

    pub fn rcon_route_quota(&self) -> Quota {
        let period = Duration::from_secs(self.rcon_route_period_secs.max(1));
        let burst = NonZeroU32::new(self.rcon_route_burst_limit).unwrap_or(NonZeroU32::MIN);
        Quota::with_period(period)
            .unwrap_or_else(|| Quota::per_second(NonZeroU32::MIN))
            .allow_burst(burst)
    }
}

// src/scheduler.rs
use std::sync::Arc;
use std::time::Duration;
use log::{ error, info };
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{ interval, MissedTickBehavior };
use crate::config::Config;
use crate::rcon::client::RconClient;
use crate::rcon::pacing::PacingPolicy;
use crate::storage::memory::RconStorage;
use crate::sweep::run_statistics_sweep;

pub struct SchedulerHandles {
    status: JoinHandle<()>,
    statistics: JoinHandle<()>,
}

impl SchedulerHandles {
    pub fn abort(&self) {
        self.status.abort();
        self.statistics.abort();
    }
}

/// Starts the periodic status fetch and statistics sweep. Both skip the
/// immediate first tick. `sweep_lock` is shared with manual sweeps so only one
/// sweep queries the server at a time.
pub fn spawn_scheduler(
    client: RconClient,
    storage: Arc<RconStorage>,
    sweep_lock: Arc<Mutex<()>>,
    config: &Config
) -> SchedulerHandles {
    let status = tokio::spawn(status_loop(
        client.clone(),
        storage.clone(),
        config.status_interval(),
        config.player_retention()
    ));
    let statistics = tokio::spawn(statistics_loop(
        client,
        storage,
        sweep_lock,
        config.stats_sweep_interval(),
        PacingPolicy::new(config.stats_call_delay())
    ));
    SchedulerHandles { status, statistics }
}

async fn status_loop(client: RconClient, storage: Arc<RconStorage>, period: Duration, retention: Duration) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;

    loop {
        ticker.tick().await;
        match client.server_status().await {
            Ok(status) => {
                storage.record_status(&status);
                storage.cleanup_stale_players(retention);
                info!(
                    "[scheduler] Status from {}: {} players listed ({} reported)",
                    client.endpoint(),
                    status.player_list.len(),
                    status.players
                );
            }
            Err(e) => error!("[scheduler] Status fetch failed: {}", e),
        }
    }
}

async fn statistics_loop(
    client: RconClient,
    storage: Arc<RconStorage>,
    sweep_lock: Arc<Mutex<()>>,
    period: Duration,
    pacing: PacingPolicy
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let _guard = sweep_lock.lock().await;
        let ids = storage.known_player_ids();
        let report = run_statistics_sweep(&client, &storage, &ids, pacing).await;
        if report.is_failure() {
            error!(
                "[scheduler] Statistics sweep failed: {} ids, {} errors",
                report.total,
                report.errors.len()
            );
        }
    }
}

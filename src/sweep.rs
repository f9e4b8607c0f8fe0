// src/sweep.rs
use log::{ debug, error, info, warn };
use serde::Serialize;
use crate::rcon::client::RconClient;
use crate::rcon::pacing::PacingPolicy;
use crate::storage::memory::RconStorage;

#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepReport {
    pub total: usize,
    pub succeeded: usize,
    pub no_data: usize,
    pub errors: Vec<String>,
}

impl SweepReport {
    pub fn is_failure(&self) -> bool {
        self.total == 0 || self.succeeded == 0
    }
}

/// Queries statistics for every id in order, storing each result. One id
/// failing never stops the sweep.
pub async fn run_statistics_sweep(
    client: &RconClient,
    storage: &RconStorage,
    steam_ids: &[String],
    pacing: PacingPolicy
) -> SweepReport {
    let mut report = SweepReport { total: steam_ids.len(), ..SweepReport::default() };

    if steam_ids.is_empty() {
        warn!("Statistics sweep found no player ids");
        return report;
    }

    for (i, steam_id) in steam_ids.iter().enumerate() {
        if i > 0 {
            pacing.pause().await;
        }

        match client.player_statistics(steam_id).await {
            Ok(Some(stats)) => {
                storage.save_statistics(stats);
                report.succeeded += 1;
            }
            Ok(None) => {
                debug!("No statistics available for {}", steam_id);
                report.no_data += 1;
            }
            Err(e) if e.is_transport() => {
                error!("Statistics query failed for {}: {}", steam_id, e);
                report.errors.push(format!("{}: {}", steam_id, e));
            }
            Err(e) => {
                warn!("Unusable statistics reply for {}: {}", steam_id, e);
                report.errors.push(format!("{}: {}", steam_id, e));
            }
        }
    }

    info!(
        "Statistics sweep finished: {}/{} succeeded, {} without data, {} errors",
        report.succeeded,
        report.total,
        report.no_data,
        report.errors.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use crate::rcon::connection::test_server::{ spawn, Behavior };

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn failure_rules() {
        assert!(SweepReport::default().is_failure());
        assert!(SweepReport { total: 3, ..Default::default() }.is_failure());
        assert!(!SweepReport { total: 3, succeeded: 1, ..Default::default() }.is_failure());
    }

    #[tokio::test]
    async fn empty_id_list_is_a_failed_sweep() {
        let server = spawn(Behavior::Silent).await;
        let client = RconClient::new(server.params());
        let report = run_statistics_sweep(&client, &RconStorage::new(), &[], PacingPolicy::default()).await;
        assert_eq!(report.total, 0);
        assert!(report.is_failure());
    }

    #[tokio::test]
    async fn stores_every_successful_player() {
        let reply = serde_json::json!({ "Message": "{\"Kills\":7}", "Identifier": -1 }).to_string();
        let mut server = spawn(Behavior::Reply(reply)).await;
        let client = RconClient::new(server.params());
        let storage = RconStorage::new();

        let pacing = PacingPolicy::new(Duration::from_millis(1));
        let report = run_statistics_sweep(&client, &storage, &ids(&["1", "2"]), pacing).await;

        assert_eq!((report.total, report.succeeded, report.no_data), (2, 2, 0));
        assert!(!report.is_failure());
        assert_eq!(storage.statistics("2").unwrap().kills, 7);

        let first: serde_json::Value = serde_json::from_str(&server.commands.recv().await.unwrap()).unwrap();
        let second: serde_json::Value = serde_json::from_str(&server.commands.recv().await.unwrap()).unwrap();
        assert_eq!(first["Message"], "statistics.output 1");
        assert_eq!(second["Message"], "statistics.output 2");
    }

    #[tokio::test]
    async fn errors_are_collected_and_sweep_continues() {
        let server = spawn(Behavior::Silent).await;
        let client = RconClient::new(server.params()).with_timeout(Duration::from_millis(100));
        let storage = RconStorage::new();

        let pacing = PacingPolicy::new(Duration::ZERO);
        let report = run_statistics_sweep(&client, &storage, &ids(&["1", "2", "3"]), pacing).await;

        assert_eq!(report.total, 3);
        assert_eq!(report.errors.len(), 3);
        assert!(report.errors[0].starts_with("1: "));
        assert!(report.is_failure());
    }

    #[tokio::test]
    async fn no_data_is_not_an_error() {
        let reply = serde_json::json!({ "Message": "no stats" }).to_string();
        let server = spawn(Behavior::Reply(reply)).await;
        let client = RconClient::new(server.params());

        let pacing = PacingPolicy::new(Duration::ZERO);
        let report = run_statistics_sweep(&client, &RconStorage::new(), &ids(&["1"]), pacing).await;

        assert_eq!(report.no_data, 1);
        assert!(report.errors.is_empty());
        assert!(report.is_failure());
    }
}

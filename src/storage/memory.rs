// src/storage/memory.rs
use dashmap::DashMap;
use parking_lot::RwLock;
use serde::Serialize;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use crate::models::server::{PlayerSession, ServerStatus};
use crate::models::statistics::PlayerStatistics;

/// One sighting of a player in a status snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct SessionRecord {
    pub session: PlayerSession,
    pub seen_at: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct KnownPlayer {
    pub session: PlayerSession,
    pub first_seen: u64,
    pub last_seen: u64,
    pub seen_count: u32,
    // Oldest first; one entry per recorded snapshot the player appeared in.
    pub sessions: Vec<SessionRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub status: ServerStatus,
    pub captured_at: u64,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// In-memory store for status snapshots, seen players and their statistics.
#[derive(Default)]
pub struct RconStorage {
    latest_status: RwLock<Option<StatusSnapshot>>,
    players: DashMap<String, KnownPlayer>,
    statistics: DashMap<String, PlayerStatistics>,
}

impl RconStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_status(&self, status: &ServerStatus) {
        self.record_status_at(status, now_secs());
    }

    fn record_status_at(&self, status: &ServerStatus, now: u64) {
        for session in &status.player_list {
            let record = SessionRecord { session: session.clone(), seen_at: now };
            self.players
                .entry(session.id.clone())
                .and_modify(|known| {
                    known.session = session.clone();
                    known.last_seen = now;
                    known.seen_count += 1;
                    known.sessions.push(record.clone());
                })
                .or_insert_with(|| KnownPlayer {
                    session: session.clone(),
                    first_seen: now,
                    last_seen: now,
                    seen_count: 1,
                    sessions: vec![record.clone()],
                });
        }

        *self.latest_status.write() = Some(StatusSnapshot {
            status: status.clone(),
            captured_at: now,
        });
    }

    pub fn latest_status(&self) -> Option<StatusSnapshot> {
        self.latest_status.read().clone()
    }

    pub fn known_player_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.players.iter().map(|r| r.key().clone()).collect();
        ids.sort();
        ids
    }

    pub fn known_players(&self) -> Vec<KnownPlayer> {
        let mut players: Vec<KnownPlayer> = self.players.iter().map(|r| r.value().clone()).collect();
        players.sort_by(|a, b| a.session.id.cmp(&b.session.id));
        players
    }

    pub fn save_statistics(&self, stats: PlayerStatistics) {
        self.statistics.insert(stats.steam_id.clone(), stats);
    }

    pub fn statistics(&self, steam_id: &str) -> Option<PlayerStatistics> {
        self.statistics.get(steam_id).map(|r| r.value().clone())
    }

    pub fn cleanup_stale_players(&self, max_age: Duration) {
        self.cleanup_stale_players_at(max_age, now_secs());
    }

    fn cleanup_stale_players_at(&self, max_age: Duration, now: u64) {
        let max_age = max_age.as_secs();
        self.players.retain(|_, player| now.saturating_sub(player.last_seen) < max_age);
    }
}

// src/models/server.rs
use serde::{Deserialize, Serialize};

/// One row of the `status` player table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerSession {
    pub id: String,
    pub display_name: String,
    pub ping_ms: String,
    pub connected_duration: String,
    pub ip_address: String,
    // Mirrors `id`; the table has no separate owner column we read.
    pub owner_id: String,
}

impl PlayerSession {
    /// Renders the row back in the server's table grammar.
    pub fn to_table_line(&self) -> String {
        format!(
            "{} \"{}\" {} {} {} {}",
            self.id, self.display_name, self.ping_ms, self.connected_duration, self.ip_address, self.owner_id
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerStatus {
    pub hostname: String,
    pub version: String,
    pub map: String,
    pub players: i32,
    pub max_players: i32,
    pub queued: i32,
    pub joining: i32,
    pub player_list: Vec<PlayerSession>,
}

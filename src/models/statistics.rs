// src/models/statistics.rs
use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

/// Lifetime counters for one player, as reported by `statistics.output`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStatistics {
    pub steam_id: String,
    pub last_update_epoch: i64,

    pub joins: i32,
    pub leaves: i32,
    pub kills: i32,
    pub deaths: i32,
    pub suicides: i32,
    pub shots: i32,
    pub headshots: i32,
    pub experiments: i32,
    pub recoveries: i32,
    pub wounded_times: i32,
    pub crafted_items: i32,
    pub repaired_items: i32,
    pub lift_usages: i32,
    pub wheel_spins: i32,
    pub hammer_hits: i32,
    pub explosives_thrown: i32,
    pub weapon_reloads: i32,
    pub rockets_launched: i32,

    pub voice_bytes: i64,
    pub seconds_played: i64,

    pub names: Vec<String>,
    pub ips: Vec<String>,
    pub timestamps: Vec<i64>,

    pub gathered: BTreeMap<String, i32>,
    pub collectible_pickups: BTreeMap<String, i32>,
    pub plant_pickups: BTreeMap<String, i32>,
}

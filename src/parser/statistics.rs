// src/parser/statistics.rs
use std::collections::BTreeMap;
use std::time::{ SystemTime, UNIX_EPOCH };
use log::{ debug, warn };
use serde::de::DeserializeOwned;
use serde_json::{ Map, Value };
use crate::models::statistics::PlayerStatistics;

/// Lookup-or-default access over the statistics object. A missing key or a
/// value of the wrong type yields `T::default()`.
struct Fields<'a>(&'a Map<String, Value>);

impl Fields<'_> {
    fn get<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.0
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
            .unwrap_or_default()
    }

    /// Resource-name to count map. Entries that aren't an `i32` are skipped
    /// individually, the rest are kept.
    fn counts(&self, key: &str) -> BTreeMap<String, i32> {
        self.get::<BTreeMap<String, Value>>(key)
            .into_iter()
            .filter_map(|(name, count)| {
                let count = count.as_i64().and_then(|c| i32::try_from(c).ok())?;
                Some((name, count))
            })
            .collect()
    }
}

/// Slice from the first `{` to the last `}`, inclusive.
fn embedded_json(message: &str) -> Option<&str> {
    let start = message.find('{')?;
    let end = message.rfind('}')?;
    (start < end).then(|| &message[start..=end])
}

fn now_epoch_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Extracts a player's statistics from a `statistics.output` reply.
/// Returns `None` when the reply carries no JSON object or the object is malformed.
pub fn parse_player_statistics(steam_id: &str, message: &str) -> Option<PlayerStatistics> {
    let Some(json) = embedded_json(message) else {
        debug!("No statistics object in reply for {}", steam_id);
        return None;
    };

    let object = match serde_json::from_str::<Value>(json) {
        Ok(Value::Object(object)) => object,
        Ok(_) => {
            warn!("Statistics payload for {} is not an object", steam_id);
            return None;
        }
        Err(e) => {
            warn!("Malformed statistics payload for {}: {}", steam_id, e);
            return None;
        }
    };
    let fields = Fields(&object);

    Some(PlayerStatistics {
        steam_id: steam_id.to_string(),
        last_update_epoch: now_epoch_secs(),

        joins: fields.get("Joins"),
        leaves: fields.get("Leaves"),
        kills: fields.get("Kills"),
        deaths: fields.get("Deaths"),
        suicides: fields.get("Suicides"),
        shots: fields.get("Shots"),
        headshots: fields.get("Headshots"),
        experiments: fields.get("Experiments"),
        recoveries: fields.get("Recoveries"),
        wounded_times: fields.get("WoundedTimes"),
        crafted_items: fields.get("CraftedItems"),
        repaired_items: fields.get("RepairedItems"),
        lift_usages: fields.get("LiftUsages"),
        wheel_spins: fields.get("WheelSpins"),
        hammer_hits: fields.get("HammerHits"),
        explosives_thrown: fields.get("ExplosivesThrown"),
        weapon_reloads: fields.get("WeaponReloads"),
        rockets_launched: fields.get("RocketsLaunched"),

        voice_bytes: fields.get("VoiceBytes"),
        seconds_played: fields.get("SecondsPlayed"),

        names: fields.get("Names"),
        ips: fields.get("IPs"),
        timestamps: fields.get("TimeStamps"),

        gathered: fields.counts("Gathered"),
        collectible_pickups: fields.counts("CollectiblePickups"),
        plant_pickups: fields.counts("PlantPickups"),
    })
}

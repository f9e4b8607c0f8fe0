// src/parser/status.rs
use lazy_static::lazy_static;
use log::{ debug, warn };
use regex::Regex;
use crate::models::server::{ PlayerSession, ServerStatus };
use crate::rcon::envelope::decode_message;
use crate::rcon::error::RconError;

/// Fixed-width header the server prints above the player table.
pub const PLAYER_TABLE_HEADER: &str = "id                name";

const HOSTNAME_PREFIX: &str = "hostname:";
const VERSION_PREFIX: &str = "version :";
const MAP_PREFIX: &str = "map     :";
const PLAYERS_PREFIX: &str = "players :";

lazy_static! {
    static ref PLAYER_COUNTS: Regex =
        Regex::new(r"(\d+) \((\d+) max\) \((\d+) queued\) \((\d+) joining\)").unwrap();

    // id "name" ping connected address [owner] [trailing]
    static ref PLAYER_ROW: Regex =
        Regex::new(r#"^(\S+)\s+"([^"]+)"\s+(\d+)\s+(\S+)\s+(\S+)(?:\s+(\S+))?(?:\s+(\S+))?"#).unwrap();
}

/// Decodes a `status` reply frame and parses its console text.
pub fn parse_server_status(raw_frame: &str) -> Result<ServerStatus, RconError> {
    let message = decode_message(raw_frame)?;
    Ok(parse_status_text(&message))
}

/// Parses the console text of a `status` reply. Missing or malformed fields stay at zero values.
pub fn parse_status_text(message: &str) -> ServerStatus {
    let mut status = ServerStatus::default();

    for line in message.lines() {
        if let Some(value) = line.strip_prefix(HOSTNAME_PREFIX) {
            status.hostname = value.trim().to_string();
        } else if let Some(value) = line.strip_prefix(VERSION_PREFIX) {
            status.version = value.trim().to_string();
        } else if let Some(value) = line.strip_prefix(MAP_PREFIX) {
            status.map = value.trim().to_string();
        } else if let Some(value) = line.strip_prefix(PLAYERS_PREFIX) {
            match parse_player_counts(value.trim()) {
                Some((players, max, queued, joining)) => {
                    status.players = players;
                    status.max_players = max;
                    status.queued = queued;
                    status.joining = joining;
                }
                None => debug!("Unrecognised player count line: '{}'", line),
            }
        }
    }

    status.player_list = parse_players(extract_players_block(message));
    status
}

fn parse_player_counts(text: &str) -> Option<(i32, i32, i32, i32)> {
    let caps = PLAYER_COUNTS.captures(text)?;
    let group = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<i32>().ok());
    Some((group(1)?, group(2)?, group(3)?, group(4)?))
}

/// Everything from the player table header to the end of the message, or "" without a header.
pub fn extract_players_block(message: &str) -> &str {
    match message.find(PLAYER_TABLE_HEADER) {
        Some(start) => message[start..].trim(),
        None => {
            warn!("Player table header not found in status message");
            ""
        }
    }
}

pub fn parse_player_line(line: &str) -> Option<PlayerSession> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(PLAYER_TABLE_HEADER) {
        return None;
    }

    let caps = PLAYER_ROW.captures(line)?;
    let id = caps[1].to_string();
    Some(PlayerSession {
        owner_id: id.clone(),
        id,
        display_name: caps[2].to_string(),
        ping_ms: caps[3].to_string(),
        connected_duration: caps[4].to_string(),
        ip_address: caps[5].to_string(),
    })
}

/// Parses every row of a player table block, dropping rows that don't fit the grammar.
pub fn parse_players(block: &str) -> Vec<PlayerSession> {
    let mut dropped = 0usize;
    let players: Vec<PlayerSession> = block
        .lines()
        .filter(|line| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with(PLAYER_TABLE_HEADER)
        })
        .filter_map(|line| {
            let parsed = parse_player_line(line);
            if parsed.is_none() {
                dropped += 1;
                debug!("Failed to parse player line: '{}'", line.trim());
            }
            parsed
        })
        .collect();

    debug!("Parsed {} players ({} rows dropped)", players.len(), dropped);
    players
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SCENARIO_A: &str = r#"{"Message":"hostname: MyServer\nversion : 123\nmap     : Procedural\nplayers : 5 (100 max) (0 queued) (1 joining)\nid                name\n76561198000000001 \"Alice\" 42 1h2m 1.2.3.4:1234 connected","Identifier":-1,"Type":"Generic","Stacktrace":""}"#;

    #[test]
    fn parses_full_status_frame() {
        let status = parse_server_status(SCENARIO_A).unwrap();
        assert_eq!(status, ServerStatus {
            hostname: "MyServer".to_string(),
            version: "123".to_string(),
            map: "Procedural".to_string(),
            players: 5,
            max_players: 100,
            queued: 0,
            joining: 1,
            player_list: vec![PlayerSession {
                id: "76561198000000001".to_string(),
                display_name: "Alice".to_string(),
                ping_ms: "42".to_string(),
                connected_duration: "1h2m".to_string(),
                ip_address: "1.2.3.4:1234".to_string(),
                owner_id: "76561198000000001".to_string(),
            }],
        });
    }

    #[test]
    fn header_count_may_differ_from_rows() {
        let status = parse_server_status(SCENARIO_A).unwrap();
        assert_eq!(status.players, 5);
        assert_eq!(status.player_list.len(), 1);
    }

    #[test]
    fn undecodable_frame_is_an_error() {
        assert!(matches!(parse_server_status("hostname: raw text"), Err(RconError::Decode(_))));
    }

    #[test]
    fn missing_fields_stay_zero() {
        let status = parse_status_text("some banner\nnothing useful here");
        assert_eq!(status, ServerStatus::default());
    }

    #[test]
    fn malformed_player_counts_leave_all_counts_zero() {
        let status = parse_status_text("hostname: X\nplayers : 5 of 100");
        assert_eq!(status.hostname, "X");
        assert_eq!((status.players, status.max_players, status.queued, status.joining), (0, 0, 0, 0));
    }

    #[test]
    fn player_counts_match_captured_groups() {
        let status = parse_status_text("players : 12 (200 max) (3 queued) (4 joining)");
        assert_eq!((status.players, status.max_players, status.queued, status.joining), (12, 200, 3, 4));
    }

    #[test]
    fn oversized_count_degrades_to_zero() {
        let status = parse_status_text("players : 99999999999 (200 max) (3 queued) (4 joining)");
        assert_eq!(status.players, 0);
        assert_eq!(status.max_players, 0);
    }

    #[test]
    fn no_header_means_no_players() {
        let message = "hostname: X\n76561198000000001 \"Alice\" 42 1h2m 1.2.3.4:1234 connected";
        assert_eq!(extract_players_block(message), "");
        assert!(parse_status_text(message).player_list.is_empty());
    }

    #[test]
    fn name_may_contain_spaces() {
        let line = "76561198000000002 \"Bob the Builder\" 87 3m12s 10.0.0.2:5555 0 0";
        let player = parse_player_line(line).unwrap();
        assert_eq!(player.display_name, "Bob the Builder");
        assert_eq!(player.ping_ms, "87");
        assert_eq!(player.connected_duration, "3m12s");
        assert_eq!(player.ip_address, "10.0.0.2:5555");
        assert_eq!(player.owner_id, player.id);
    }

    #[test]
    fn bad_rows_are_dropped_not_fatal() {
        let block = "id                name                 ping connected addr\n\
                     76561198000000001 \"Alice\" 42 1h2m 1.2.3.4:1234 0 0\n\
                     garbage row without quotes\n\
                     76561198000000003 \"Carol\" notaping 5m 1.2.3.5:1 0 0\n\
                     \n\
                     76561198000000004 \"Dave\" 15 10s 1.2.3.6:2 0 0";
        let players = parse_players(block);
        let ids: Vec<&str> = players.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["76561198000000001", "76561198000000004"]);
    }

    #[test]
    fn reparsing_rendered_rows_is_stable() {
        let block = "id                name\n\
                     76561198000000001 \"Alice\" 42 1h2m 1.2.3.4:1234 0 0\n\
                     76561198000000002 \"Bob the Builder\" 87 3m12s 10.0.0.2:5555 0 0";
        let first = parse_players(block);
        let rendered: Vec<String> = first.iter().map(PlayerSession::to_table_line).collect();
        let second = parse_players(&rendered.join("\n"));
        assert_eq!(first, second);
    }
}

// src/rcon/client.rs
use std::time::Duration;
use log::{ debug, error };
use crate::models::server::ServerStatus;
use crate::models::statistics::PlayerStatistics;
use crate::parser::{ parse_player_statistics, parse_server_status };
use crate::rcon::connection::{ Connection, ConnectionParams, DEFAULT_REPLY_TIMEOUT };
use crate::rcon::envelope::{ decode_message, CommandRequest };
use crate::rcon::error::RconError;

pub const STATUS_COMMAND: &str = "status";

pub fn statistics_command(steam_id: &str) -> String {
    format!("statistics.output {}", steam_id)
}

/// Issues commands to one game server, one short-lived connection per command.
#[derive(Debug, Clone)]
pub struct RconClient {
    params: ConnectionParams,
    timeout: Duration,
}

impl RconClient {
    pub fn new(params: ConnectionParams) -> Self {
        Self { params, timeout: DEFAULT_REPLY_TIMEOUT }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> String {
        self.params.endpoint()
    }

    /// Sends `command` and returns the raw reply frame. The connection is
    /// closed on every path once it has been opened.
    pub async fn execute(&self, command: &str) -> Result<String, RconError> {
        let frame = CommandRequest::new(command, &self.params.client_name).to_frame()?;

        let mut connection = match tokio::time::timeout(self.timeout, Connection::open(&self.params)).await {
            Ok(opened) => opened?,
            Err(_) => {
                error!("Timed out connecting to RCON at {}", self.params.endpoint());
                return Err(RconError::Timeout(self.timeout));
            }
        };

        let result = connection.round_trip(&frame, self.timeout).await;
        connection.close().await;

        match &result {
            Ok(_) => debug!("RCON command '{}' completed on {}", command, connection.endpoint()),
            Err(e) => error!("RCON command '{}' failed on {}: {}", command, connection.endpoint(), e),
        }
        result
    }

    pub async fn fetch_status(&self) -> Result<String, RconError> {
        self.execute(STATUS_COMMAND).await
    }

    pub async fn fetch_player_statistics(&self, steam_id: &str) -> Result<String, RconError> {
        self.execute(&statistics_command(steam_id)).await
    }

    pub async fn server_status(&self) -> Result<ServerStatus, RconError> {
        let raw = self.fetch_status().await?;
        parse_server_status(&raw)
    }

    /// `Ok(None)` means the server has no statistics for `steam_id`.
    pub async fn player_statistics(&self, steam_id: &str) -> Result<Option<PlayerStatistics>, RconError> {
        let raw = self.fetch_player_statistics(steam_id).await?;
        let message = decode_message(&raw)?;
        Ok(parse_player_statistics(steam_id, &message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rcon::connection::test_server::{ spawn, wait_for_closes, Behavior };

    fn reply(message: &str) -> String {
        serde_json::json!({
            "Message": message,
            "Identifier": -1,
            "Type": "Generic",
            "Stacktrace": ""
        }).to_string()
    }

    #[test]
    fn command_strings() {
        assert_eq!(STATUS_COMMAND, "status");
        assert_eq!(statistics_command("76561198000000001"), "statistics.output 76561198000000001");
    }

    #[tokio::test]
    async fn status_round_trip_sends_envelope() {
        let message = "hostname: Test\nplayers : 1 (50 max) (0 queued) (0 joining)\n\
                       id                name\n76561198000000001 \"Alice\" 42 1h2m 1.2.3.4:1234 0 0";
        let mut server = spawn(Behavior::Reply(reply(message))).await;
        let client = RconClient::new(server.params());

        let status = client.server_status().await.unwrap();
        assert_eq!(status.hostname, "Test");
        assert_eq!(status.max_players, 50);
        assert_eq!(status.player_list.len(), 1);

        let sent: serde_json::Value = serde_json::from_str(&server.commands.recv().await.unwrap()).unwrap();
        assert_eq!(sent["Identifier"], -1);
        assert_eq!(sent["Message"], "status");
        assert_eq!(sent["Name"], "WebRcon");
        assert_eq!(wait_for_closes(&server, 1).await, 1);
    }

    #[tokio::test]
    async fn statistics_round_trip() {
        let server = spawn(Behavior::Reply(reply("{\"Kills\":10,\"Deaths\":2,\"Names\":[\"Alice\"]}"))).await;
        let client = RconClient::new(server.params());

        let stats = client.player_statistics("76561198000000001").await.unwrap().unwrap();
        assert_eq!(stats.kills, 10);
        assert_eq!(stats.deaths, 2);
        assert_eq!(stats.names, vec!["Alice"]);
        assert_eq!(stats.joins, 0);
    }

    #[tokio::test]
    async fn unknown_player_is_no_data() {
        let server = spawn(Behavior::Reply(reply("No statistics for 76561198000000009"))).await;
        let client = RconClient::new(server.params());

        assert!(client.player_statistics("76561198000000009").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unanswered_command_times_out_and_closes_once() {
        let server = spawn(Behavior::Silent).await;
        let client = RconClient::new(server.params()).with_timeout(Duration::from_millis(200));

        let err = client.fetch_status().await.unwrap_err();
        assert!(matches!(err, RconError::Timeout(_)));
        assert!(err.is_transport());
        assert_eq!(wait_for_closes(&server, 1).await, 1);
    }

    #[tokio::test]
    async fn undecodable_reply_is_decode_error() {
        let server = spawn(Behavior::Reply("not an envelope".to_string())).await;
        let client = RconClient::new(server.params());

        assert!(matches!(client.server_status().await, Err(RconError::Decode(_))));
        assert_eq!(wait_for_closes(&server, 1).await, 1);
    }
}

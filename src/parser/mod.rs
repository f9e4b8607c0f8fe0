pub mod statistics;
pub mod status;

pub use statistics::parse_player_statistics;
pub use status::parse_server_status;

// src/handlers/mod.rs
pub mod index;
pub mod players;
pub mod rcon;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index::index))
        .route("/rcon/players", web::get().to(rcon::get_players))
        .route("/rcon/server-info", web::get().to(rcon::get_server_info))
        .route("/rcon/save-players", web::post().to(rcon::save_players))
        .route("/rcon/server-info-and-save", web::post().to(rcon::server_info_and_save))
        .route("/rcon/debug", web::get().to(rcon::get_debug))
        .route("/rcon/statistics/sweep", web::post().to(rcon::run_sweep))
        .route("/rcon/statistics/{steam_id}", web::get().to(rcon::get_statistics))
        .route("/players", web::get().to(players::list_players))
        .route("/players/status", web::get().to(players::latest_status))
        .route("/players/{steam_id}/statistics", web::get().to(players::stored_statistics));
}

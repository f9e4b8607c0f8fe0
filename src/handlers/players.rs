// src/handlers/players.rs
use actix_web::{web, HttpResponse};
use crate::storage::memory::RconStorage;
use crate::utils::{validate_steam_id, RequestError};

pub async fn list_players(storage: web::Data<RconStorage>) -> HttpResponse {
    HttpResponse::Ok().json(storage.known_players())
}

pub async fn latest_status(storage: web::Data<RconStorage>) -> HttpResponse {
    match storage.latest_status() {
        Some(snapshot) => HttpResponse::Ok().json(snapshot),
        None => HttpResponse::NotFound().body("No status captured yet"),
    }
}

pub async fn stored_statistics(
    path: web::Path<String>,
    storage: web::Data<RconStorage>,
) -> Result<HttpResponse, RequestError> {
    let steam_id = path.into_inner();
    validate_steam_id(&steam_id)?;

    storage
        .statistics(&steam_id)
        .map(|stats| HttpResponse::Ok().json(stats))
        .ok_or(RequestError::StatisticsNotFound(steam_id))
}

// src/handlers/index.rs
use actix_web::{ web, HttpResponse };
use serde_json::json;
use crate::handlers::rcon::RconAccess;

pub async fn index(rcon: Option<web::Data<RconAccess>>) -> HttpResponse {
    let rcon_configured = rcon.map(|r| r.client.is_some()).unwrap_or(false);
    HttpResponse::Ok().json(json!({ "status": "ok", "rcon_configured": rcon_configured }))
}

// src/handlers/rcon.rs
use std::sync::Arc;
use actix_web::{web, HttpRequest, HttpResponse};
use log::{debug, info, warn};
use serde::Serialize;
use serde_json::json;
use tokio::sync::Mutex;
use crate::rcon::client::RconClient;
use crate::rcon::envelope::decode_message;
use crate::rcon::pacing::PacingPolicy;
use crate::storage::memory::RconStorage;
use crate::sweep::run_statistics_sweep;
use crate::utils::{check_rate_limit, validate_steam_id, IpRateLimiter, RequestError};

/// RCON access shared by the handlers; `client` is `None` without a configured password.
pub struct RconAccess {
    pub client: Option<RconClient>,
    pub pacing: PacingPolicy,
    /// Held for the duration of any statistics sweep, manual or scheduled.
    pub sweep_lock: Arc<Mutex<()>>,
}

impl RconAccess {
    fn client(&self) -> Result<&RconClient, RequestError> {
        self.client.as_ref().ok_or(RequestError::RconNotConfigured)
    }
}

#[derive(Debug, Serialize)]
pub struct RconDebugResponse {
    pub success: bool,
    pub raw_response: String,
    pub message: Option<String>,
    pub response_length: usize,
    pub response_lines: usize,
}

pub async fn get_players(
    req: HttpRequest,
    rcon: web::Data<RconAccess>,
    storage: web::Data<RconStorage>,
    rate_limiter: web::Data<IpRateLimiter>,
) -> Result<HttpResponse, RequestError> {
    check_rate_limit(&req, &rate_limiter)?;

    let status = rcon.client()?.server_status().await?;
    debug!("Returning {} online players", status.player_list.len());

    Ok(HttpResponse::Ok().json(status.player_list))
}

pub async fn get_server_info(
    req: HttpRequest,
    rcon: web::Data<RconAccess>,
    rate_limiter: web::Data<IpRateLimiter>,
) -> Result<HttpResponse, RequestError> {
    check_rate_limit(&req, &rate_limiter)?;

    let status = rcon.client()?.server_status().await?;

    Ok(HttpResponse::Ok().json(status))
}

/// Fetches the live status and records its players without returning the status.
pub async fn save_players(
    req: HttpRequest,
    rcon: web::Data<RconAccess>,
    storage: web::Data<RconStorage>,
    rate_limiter: web::Data<IpRateLimiter>,
) -> Result<HttpResponse, RequestError> {
    check_rate_limit(&req, &rate_limiter)?;

    let status = rcon.client()?.server_status().await?;
    storage.record_status(&status);
    info!("Saved {} players from live status", status.player_list.len());

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "saved": status.player_list.len(),
    })))
}

pub async fn server_info_and_save(
    req: HttpRequest,
    rcon: web::Data<RconAccess>,
    storage: web::Data<RconStorage>,
    rate_limiter: web::Data<IpRateLimiter>,
) -> Result<HttpResponse, RequestError> {
    check_rate_limit(&req, &rate_limiter)?;

    let status = rcon.client()?.server_status().await?;
    storage.record_status(&status);

    Ok(HttpResponse::Ok().json(status))
}

pub async fn get_debug(
    req: HttpRequest,
    rcon: web::Data<RconAccess>,
    rate_limiter: web::Data<IpRateLimiter>,
) -> Result<HttpResponse, RequestError> {
    check_rate_limit(&req, &rate_limiter)?;

    let raw = rcon.client()?.fetch_status().await?;
    let message = decode_message(&raw).ok();

    Ok(HttpResponse::Ok().json(RconDebugResponse {
        success: true,
        response_length: raw.len(),
        response_lines: raw.lines().count(),
        message,
        raw_response: raw,
    }))
}

pub async fn get_statistics(
    req: HttpRequest,
    path: web::Path<String>,
    rcon: web::Data<RconAccess>,
    storage: web::Data<RconStorage>,
    rate_limiter: web::Data<IpRateLimiter>,
) -> Result<HttpResponse, RequestError> {
    check_rate_limit(&req, &rate_limiter)?;

    let steam_id = path.into_inner();
    validate_steam_id(&steam_id)?;

    match rcon.client()?.player_statistics(&steam_id).await? {
        Some(stats) => {
            storage.save_statistics(stats.clone());
            Ok(HttpResponse::Ok().json(stats))
        }
        None => Err(RequestError::StatisticsNotFound(steam_id)),
    }
}

pub async fn run_sweep(
    req: HttpRequest,
    rcon: web::Data<RconAccess>,
    storage: web::Data<RconStorage>,
    rate_limiter: web::Data<IpRateLimiter>,
) -> Result<HttpResponse, RequestError> {
    check_rate_limit(&req, &rate_limiter)?;

    let client = rcon.client()?;
    let Ok(_guard) = rcon.sweep_lock.try_lock() else {
        warn!("Manual statistics sweep rejected, one is already running");
        return Err(RequestError::SweepInProgress);
    };
    let ids = storage.known_player_ids();
    info!("Manual statistics sweep over {} players", ids.len());

    let report = run_statistics_sweep(client, &storage, &ids, rcon.pacing).await;
    if report.is_failure() {
        Ok(HttpResponse::InternalServerError().json(report))
    } else {
        Ok(HttpResponse::Ok().json(report))
    }
}

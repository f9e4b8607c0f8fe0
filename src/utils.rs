// src/utils.rs
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use actix_web::http::StatusCode;
use governor::{RateLimiter, clock::DefaultClock};
use governor::state::keyed::DefaultKeyedStateStore;
use serde_json::json;
use std::net::IpAddr;
use std::fmt;
use log::error;
use crate::rcon::RconError;

pub type IpRateLimiter = RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>;

#[derive(Debug)]
pub enum RequestError {
    MissingPeerIP,
    RateLimitExceeded,
    RconNotConfigured,
    InvalidSteamId(String),
    StatisticsNotFound(String),
    SweepInProgress,
    Rcon(RconError),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPeerIP => write!(f, "Failed to extract client IP"),
            Self::RateLimitExceeded => write!(f, "Rate limit exceeded"),
            Self::RconNotConfigured => write!(f, "No RCON_PASSWORD configured"),
            Self::InvalidSteamId(id) => write!(f, "Invalid steam id: {}", id),
            Self::StatisticsNotFound(id) => write!(f, "No statistics for {}", id),
            Self::SweepInProgress => write!(f, "A statistics sweep is already running"),
            Self::Rcon(e) => write!(f, "{}", e),
        }
    }
}

impl From<RconError> for RequestError {
    fn from(e: RconError) -> Self {
        Self::Rcon(e)
    }
}

impl ResponseError for RequestError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            Self::RconNotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            Self::StatisticsNotFound(_) => StatusCode::NOT_FOUND,
            Self::SweepInProgress => StatusCode::CONFLICT,
            Self::Rcon(RconError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            Self::Rcon(_) => StatusCode::BAD_GATEWAY,
            Self::MissingPeerIP | Self::InvalidSteamId(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "error": self.to_string(),
        }))
    }
}

pub fn peer_ip(req: &HttpRequest) -> Result<IpAddr, RequestError> {
    req.peer_addr()
        .map(|addr| addr.ip())
        .ok_or(RequestError::MissingPeerIP)
}

pub fn check_rate_limit(req: &HttpRequest, limiter: &IpRateLimiter) -> Result<(), RequestError> {
    let ip = peer_ip(req)?;
    if limiter.check_key(&ip).is_err() {
        error!("Rate limit exceeded for RCON route for ip: {}", ip);
        return Err(RequestError::RateLimitExceeded);
    }
    Ok(())
}

/// Steam ids are passed into a console command, so only plain digits are accepted.
pub fn validate_steam_id(steam_id: &str) -> Result<(), RequestError> {
    if steam_id.is_empty() || steam_id.len() > 20 || !steam_id.chars().all(|c| c.is_ascii_digit()) {
        return Err(RequestError::InvalidSteamId(steam_id.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn steam_id_must_be_digits() {
        assert!(validate_steam_id("76561198000000001").is_ok());
        assert!(validate_steam_id("").is_err());
        assert!(validate_steam_id("7656 kick all").is_err());
        assert!(validate_steam_id("123456789012345678901").is_err());
    }

    #[test]
    fn status_codes() {
        assert_eq!(RequestError::RateLimitExceeded.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            RequestError::Rcon(RconError::Timeout(Duration::from_secs(30))).status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(RequestError::Rcon(RconError::ClosedBeforeResponse).status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(RequestError::StatisticsNotFound("1".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(RequestError::SweepInProgress.status_code(), StatusCode::CONFLICT);
    }
}

// src/main.rs
mod config;
mod handlers;
mod models;
mod parser;
mod rcon;
mod scheduler;
mod storage;
mod sweep;
mod utils;

use std::sync::Arc;
use actix_web::{ web, App, HttpServer };
use env_logger::Env;
use governor::RateLimiter;
use log::{ info, warn };
use tokio::sync::Mutex;
use crate::config::Config;
use crate::handlers::rcon::RconAccess;
use crate::rcon::RconClient;
use crate::rcon::pacing::PacingPolicy;
use crate::storage::memory::RconStorage;
use crate::utils::IpRateLimiter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env();
    let bind = config.bind();

    let storage = Arc::new(RconStorage::new());

    let client = config
        .connection_params()
        .map(|params| RconClient::new(params).with_timeout(config.reply_timeout()));

    let sweep_lock = Arc::new(Mutex::new(()));

    let scheduler = match &client {
        Some(client) => {
            info!("RCON target {}", client.endpoint());
            Some(scheduler::spawn_scheduler(client.clone(), storage.clone(), sweep_lock.clone(), &config))
        }
        None => {
            warn!("RCON_PASSWORD not set; RCON routes and scheduled jobs are disabled");
            None
        }
    };

    let rcon = web::Data::new(RconAccess {
        client,
        pacing: PacingPolicy::new(config.stats_call_delay()),
        sweep_lock,
    });
    let storage = web::Data::from(storage);
    let rcon_rate_limiter: web::Data<IpRateLimiter> = web::Data::new(
        RateLimiter::keyed(config.rcon_route_quota())
    );

    info!("Starting server on {}", bind);
    let result = HttpServer::new(move || {
        App::new()
            .app_data(rcon.clone())
            .app_data(storage.clone())
            .app_data(rcon_rate_limiter.clone())
            .configure(handlers::configure)
    })
        .bind(&bind)?
        .run().await;

    if let Some(scheduler) = scheduler {
        info!("Stopping scheduled jobs");
        scheduler.abort();
    }
    result
}

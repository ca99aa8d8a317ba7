// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, database, rate limiting and start HTTP server

mod auth;
mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod services;

use actix_web::{middleware::Logger, web, App, HttpServer};
use config::{Config, RateLimitBackend};
use dotenv::dotenv;
use services::{
    start_sweep_task, MemoryRateLimitStore, PgRateLimitStore, SharedRateLimitStore,
};
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            config.log_level.as_str()
        } else {
            "info,actix_web=info,sqlx=warn"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    if let Err(e) = config.validate() {
        log::error!("Configuration error: {}", e);
        std::process::exit(1);
    }
    errors::configure(&config);

    log::info!("Starting carelink-api...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Initialize database connection pool
    let pool = match config::init_db_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    // 5. Rate limit store shared by every worker
    let store: SharedRateLimitStore = match config.rate_limit_backend {
        RateLimitBackend::Memory => {
            log::info!(
                "Rate limiting in memory (max {} keys)",
                config.rate_limit_max_keys
            );
            Arc::new(MemoryRateLimitStore::new(config.rate_limit_max_keys))
        }
        RateLimitBackend::Postgres => {
            log::info!("Rate limiting in PostgreSQL (rate_limits table)");
            Arc::new(PgRateLimitStore::new(pool.clone()))
        }
    };
    start_sweep_task(store.clone(), config.rate_limit_sweep_interval);
    log::info!(
        "Started rate limit sweep task (interval: {}s)",
        config.rate_limit_sweep_interval
    );

    // 6. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let config_clone = config.clone();

    HttpServer::new(move || {
        App::new()
            // Application state (database pool, config, rate limit store)
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config_clone.clone()))
            .app_data(web::Data::new(store.clone()))
            .configure(handlers::extractor_config)
            // Middleware
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::auth_config)
            .configure(handlers::inquiries_config)
            .configure(handlers::leads_config)
            .configure(handlers::caregivers_config)
            .configure(handlers::marketplace_config)
    })
    .bind(&server_addr)?
    .run()
    .await
}

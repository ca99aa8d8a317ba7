// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components and the shared response envelope

pub mod auth;
pub mod caregivers;
pub mod health;
pub mod inquiries;
pub mod leads;
pub mod marketplace;

pub use auth::config as auth_config;
pub use caregivers::config as caregivers_config;
pub use health::config as health_config;
pub use inquiries::config as inquiries_config;
pub use leads::config as leads_config;
pub use marketplace::config as marketplace_config;

use crate::errors::ApiError;
use actix_web::{http::StatusCode, web, HttpResponse};
use serde::Serialize;
use serde_json::json;

/// `{ "success": true, "data": ... }` with the given status
pub fn success<T: Serialize>(status: StatusCode, data: T) -> HttpResponse {
    HttpResponse::build(status).json(json!({
        "success": true,
        "data": data
    }))
}

pub fn ok<T: Serialize>(data: T) -> HttpResponse {
    success(StatusCode::OK, data)
}

/// Success envelope carrying only a message
pub fn message(status: StatusCode, text: &str) -> HttpResponse {
    HttpResponse::build(status).json(json!({
        "success": true,
        "message": text
    }))
}

/// Malformed bodies, query strings and paths use the API error envelope
pub fn extractor_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _| ApiError::InvalidInput(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _| ApiError::InvalidInput(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _| ApiError::InvalidInput(err.to_string()).into()),
    );
}

#[cfg(test)]
pub mod test_support {
    use crate::config::{lazy_test_pool, Config};
    use crate::services::{MemoryRateLimitStore, SharedRateLimitStore};
    use actix_web::web;
    use sqlx::PgPool;
    use std::sync::Arc;

    /// Shared state for handler tests; the pool never reaches a database
    pub fn app_state() -> (
        web::Data<PgPool>,
        web::Data<Config>,
        web::Data<SharedRateLimitStore>,
    ) {
        let store: SharedRateLimitStore = Arc::new(MemoryRateLimitStore::new(1000));
        (
            web::Data::new(lazy_test_pool()),
            web::Data::new(Config::for_tests()),
            web::Data::new(store),
        )
    }
}

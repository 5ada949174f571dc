//! # API Route Configuration
//!
//! This module sets up all the HTTP routes for the API.

use actix_web::{http::Method, web};

use super::handlers;

/// Configure all API routes.
///
/// This function is called from main.rs to set up
/// all the endpoint routes.
///
/// ## Route Structure
///
/// ```text
/// /
/// ├── /health              GET - Health check
/// ├── /actions.json        GET, OPTIONS - Actions rules
/// └── /api/actions/vault
///     ├──                  GET, OPTIONS - Action descriptor
///     └──                  POST - Build vault transaction
/// ```
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Health check endpoint
        .route("/health", web::get().to(handlers::health_check))

        // Maps website paths to the action API
        .service(
            web::resource("/actions.json")
                .route(web::get().to(handlers::actions_json))
                .route(web::method(Method::OPTIONS).to(handlers::actions_json)),
        )

        // Vault action endpoint
        .service(
            web::resource("/api/actions/vault")
                // Descriptor; preflight requests get the same body
                .route(web::get().to(handlers::get_vault_actions))
                .route(web::method(Method::OPTIONS).to(handlers::get_vault_actions))

                // Build deposit / withdraw transaction
                .app_data(handlers::post_body_config())
                .route(web::post().to(handlers::post_vault_action)),
        );
}

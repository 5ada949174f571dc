//! # Vault Actions Backend Service
//!
//! This is the main entry point for the service that lets wallets deposit
//! SOL into and withdraw SOL from a Meteora dynamic vault through the
//! Solana Actions protocol. It provides:
//!
//! - An action descriptor wallets render as deposit/withdraw buttons
//! - A transaction endpoint returning unsigned vault transactions
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      BACKEND SERVICE                         │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │  HTTP API (Actix)                                      │  │
//! │  │  GET/OPTIONS /api/actions/vault   descriptor           │  │
//! │  │  POST        /api/actions/vault   build transaction    │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │                          │                                   │
//! │  ┌───────────────────────┴────────────────────────────────┐  │
//! │  │                   SERVICE LAYER                        │  │
//! │  │  action_params  token_registry  VaultClient  TxBuilder │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │                          │                                   │
//! │                   ┌──────┴──────┐                            │
//! │                   │   Solana    │                            │
//! │                   │   RPC       │                            │
//! │                   └─────────────┘                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! 1. Copy `.env.example` to `.env` and set `CHAINSTACK_ENDPOINT`
//! 2. Start the server: `cargo run`
//!
//! ## Environment Variables
//!
//! See `config` for all supported configuration.

use std::sync::Arc;
use actix_web::{web, App, HttpServer, middleware};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod actions;
mod api;
mod config;
mod models;
mod services;
mod solana;
mod utils;

use config::AppConfig;
use solana::{RpcConnector, SolanaConnector};

/// Application state shared across all handlers.
///
/// Holds no per-request data: handlers connect a fresh RPC client
/// through `rpc` on every transaction request.
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Creates the RPC handle for each request
    pub rpc: Arc<dyn RpcConnector>,
}

/// Main entry point for the backend service.
///
/// This function:
/// 1. Initializes logging
/// 2. Loads configuration from environment
/// 3. Launches the HTTP server
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // =========================================
    // STEP 1: Load .env and Initialize Logging
    // =========================================
    dotenvy::dotenv().ok(); // It's okay if .env doesn't exist

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    info!("🚀 Starting Vault Actions Backend Service");

    // =========================================
    // STEP 2: Load Configuration
    // =========================================
    let config = AppConfig::from_env()
        .expect("Failed to load configuration");

    info!("📋 Configuration loaded");
    info!("   Solana RPC: {}", config.rpc_endpoint);

    let app_state = Arc::new(AppState {
        config: config.clone(),
        rpc: Arc::new(SolanaConnector),
    });

    // =========================================
    // STEP 3: Start HTTP Server
    // =========================================
    let server_host = config.server_host.clone();
    let server_port = config.server_port;

    info!("🌐 Starting HTTP server on {}:{}", server_host, server_port);

    HttpServer::new(move || {
        App::new()
            // Attach shared application state
            .app_data(web::Data::new(app_state.clone()))

            // Action headers on every response, including actix's own errors
            .wrap(actions::default_headers())

            // Add logging middleware
            .wrap(middleware::Logger::default())

            // Configure API routes
            .configure(api::configure_routes)
    })
    .bind(format!("{}:{}", server_host, server_port))?
    .run()
    .await
}

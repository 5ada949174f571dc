//! # HTTP API Module
//!
//! This module defines the HTTP endpoints of the vault actions service.
//!
//! ## Endpoint Overview
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET, OPTIONS | `/api/actions/vault` | Action descriptor |
//! | POST | `/api/actions/vault?action=&amount=` | Build deposit/withdraw transaction |
//! | GET, OPTIONS | `/actions.json` | Actions path mapping |
//! | GET | `/health` | Health check |
//!
//! ## Request/Response Format
//!
//! All requests and responses use JSON in the Solana Actions shapes:
//!
//! ```json
//! // Success response (POST)
//! {
//!     "type": "transaction",
//!     "transaction": "base64...",
//!     "message": "Deposit 1 SOL"
//! }
//!
//! // Error response
//! {
//!     "message": "Human readable message"
//! }
//! ```

pub mod routes;
pub mod handlers;

pub use routes::configure_routes;

//! # Actions Protocol
//!
//! Response plumbing shared by every action endpoint:
//!
//! - the CORS header set browser-based wallets need to call us from any origin,
//!   attached by handlers and, for responses actix produces itself, by the
//!   [`default_headers`] middleware
//! - `create_post_response`, which turns a built transaction into the
//!   POST response body
//!
//! ## Transaction Encoding
//!
//! ```text
//! Transaction (unsigned, signature slots zeroed)
//!              ↓ bincode
//! wire bytes
//!              ↓ base64
//! ActionPostResponse.transaction
//! ```

use actix_web::{http::StatusCode, middleware::DefaultHeaders, HttpResponse};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Serialize;
use solana_sdk::transaction::Transaction;
use thiserror::Error;

use crate::models::ActionPostResponse;

/// Actions protocol version advertised in `X-Action-Version`.
pub const ACTION_VERSION: &str = "2.1.3";

/// CAIP-2 id of Solana mainnet, advertised in `X-Blockchain-Ids`.
pub const BLOCKCHAIN_ID: &str = "solana:5eykt4UsFv8P8NJdTREpY1vzqKqZKvdp";

/// Headers attached to every action response, success or error.
pub const ACTIONS_CORS_HEADERS: &[(&str, &str)] = &[
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET,POST,PUT,OPTIONS"),
    (
        "Access-Control-Allow-Headers",
        "Content-Type, Authorization, Content-Encoding, Accept-Encoding, X-Accept-Action-Version, X-Accept-Blockchain-Ids",
    ),
    ("Access-Control-Expose-Headers", "X-Action-Version, X-Blockchain-Ids"),
    ("Content-Type", "application/json"),
    ("X-Action-Version", ACTION_VERSION),
    ("X-Blockchain-Ids", BLOCKCHAIN_ID),
];

/// Errors building an action response.
#[derive(Debug, Error)]
pub enum ActionsError {
    /// The transaction carries no instructions.
    #[error("Transaction has no instructions")]
    EmptyTransaction,

    /// Failed to serialize the transaction.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// JSON response with the full action header set.
pub fn action_response<T: Serialize>(status: StatusCode, body: &T) -> HttpResponse {
    let mut builder = HttpResponse::build(status);
    for &(name, value) in ACTIONS_CORS_HEADERS {
        builder.insert_header((name, value));
    }
    builder.json(body)
}

/// Middleware adding the action header set to any response that lacks it,
/// such as extractor errors and unmatched routes.
pub fn default_headers() -> DefaultHeaders {
    ACTIONS_CORS_HEADERS
        .iter()
        .fold(DefaultHeaders::new(), |headers, &(name, value)| headers.add((name, value)))
}

/// Inputs to [`create_post_response`].
#[derive(Debug, Clone)]
pub struct CreatePostResponseFields {
    /// Unsigned transaction for the wallet to sign.
    pub transaction: Transaction,

    /// Human-readable description shown by the wallet.
    pub message: Option<String>,
}

/// Serialize a transaction into the POST response body.
///
/// The transaction is sent unsigned; missing signatures stay as zeroed
/// slots for the wallet to fill.
pub fn create_post_response(
    fields: CreatePostResponseFields,
) -> Result<ActionPostResponse, ActionsError> {
    let CreatePostResponseFields {
        transaction,
        message,
    } = fields;

    if transaction.message.instructions.is_empty() {
        return Err(ActionsError::EmptyTransaction);
    }

    let tx_bytes = bincode::serialize(&transaction)
        .map_err(|e| ActionsError::Serialization(e.to_string()))?;

    Ok(ActionPostResponse {
        kind: "transaction".to_string(),
        transaction: BASE64.encode(&tx_bytes),
        message,
    })
}

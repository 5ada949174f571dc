//! # Solana Client Module
//!
//! This module provides the RPC seam the action handlers talk to the
//! blockchain through.
//!
//! ## Responsibilities
//!
//! - Connect to Solana RPC
//! - Fetch the latest blockhash at a given commitment
//! - Fetch raw account data
//!
//! ## Connection Model
//!
//! ```text
//! 1. Handler receives a transaction request
//!              ↓
//! 2. RpcConnector::connect(endpoint) → fresh ChainRpc handle
//!              ↓
//! 3. Blocking RPC calls run on actix's blocking pool (web::block)
//!              ↓
//! 4. Handle is dropped with the request
//! ```
//!
//! Nothing is pooled or cached between requests.

use std::sync::Arc;

use solana_client::rpc_client::RpcClient;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    hash::Hash,
    pubkey::Pubkey,
};
use thiserror::Error;
use tracing::debug;

/// Errors returned by the chain RPC layer.
#[derive(Debug, Error)]
pub enum RpcError {
    /// Failed to fetch the latest blockhash.
    #[error("Failed to get blockhash: {0}")]
    Blockhash(String),

    /// Failed to fetch an account.
    #[error("Failed to fetch account {address}: {reason}")]
    Account { address: Pubkey, reason: String },
}

/// Blocking view of a Solana RPC node.
///
/// Implementations must be callable from actix's blocking thread pool,
/// hence `Send + Sync`.
pub trait ChainRpc: Send + Sync {
    /// Latest blockhash at the given commitment.
    fn get_latest_blockhash(&self, commitment: CommitmentConfig) -> Result<Hash, RpcError>;

    /// Raw data of the account at `address`.
    fn get_account_data(&self, address: &Pubkey) -> Result<Vec<u8>, RpcError>;
}

/// Creates a [`ChainRpc`] handle for an endpoint.
pub trait RpcConnector: Send + Sync {
    fn connect(&self, endpoint: &str) -> Arc<dyn ChainRpc>;
}

/// Solana RPC client wrapper.
///
/// ## Usage
///
/// ```rust,ignore
/// let rpc = SolanaRpc::new("https://api.mainnet-beta.solana.com");
/// let blockhash = rpc.get_latest_blockhash(CommitmentConfig::finalized())?;
/// ```
pub struct SolanaRpc {
    client: RpcClient,
}

impl SolanaRpc {
    /// Create a new client for `endpoint`.
    ///
    /// Reads default to `finalized` commitment.
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: RpcClient::new_with_commitment(
                endpoint.to_string(),
                CommitmentConfig::finalized(),
            ),
        }
    }
}

impl ChainRpc for SolanaRpc {
    fn get_latest_blockhash(&self, commitment: CommitmentConfig) -> Result<Hash, RpcError> {
        let (blockhash, last_valid_block_height) = self
            .client
            .get_latest_blockhash_with_commitment(commitment)
            .map_err(|e| RpcError::Blockhash(e.to_string()))?;

        debug!(
            "Got latest blockhash: {} (valid until block height {})",
            blockhash, last_valid_block_height
        );
        Ok(blockhash)
    }

    fn get_account_data(&self, address: &Pubkey) -> Result<Vec<u8>, RpcError> {
        self.client
            .get_account_data(address)
            .map_err(|e| RpcError::Account {
                address: *address,
                reason: e.to_string(),
            })
    }
}

/// Connector that hands out a new [`SolanaRpc`] on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolanaConnector;

impl RpcConnector for SolanaConnector {
    fn connect(&self, endpoint: &str) -> Arc<dyn ChainRpc> {
        Arc::new(SolanaRpc::new(endpoint))
    }
}

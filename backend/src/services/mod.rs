//! # Services Module
//!
//! This module contains the logic behind the vault action endpoint.
//!
//! ## Services Overview
//!
//! | Service | Responsibility |
//! |---------|---------------|
//! | `action_params` | Validating `action` / `amount` query parameters |
//! | `token_registry` | Static token metadata |
//! | `vault` | Loading the dynamic vault, building its instructions |
//! | `TransactionBuilder` | Wrapping an instruction in an unsigned transaction |
//!
//! ## Request Flow
//!
//! ```text
//! query string ──► action_params ──► (action, amount)
//!                                          │
//! token_registry ──► SOL TokenInfo         │
//!        │                                 │
//!        ▼                                 ▼
//!  VaultClient::create ──► deposit()/withdraw() instruction
//!                                          │
//!                                          ▼
//!                      TransactionBuilder (fee payer, blockhash)
//! ```

pub mod action_params;
pub mod token_registry;
pub mod transaction_builder;
pub mod vault;

pub use transaction_builder::TransactionBuilder;
pub use vault::VaultClient;

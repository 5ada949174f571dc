//! # Transaction Builder Service
//!
//! The TransactionBuilder wraps a vault instruction, together with the
//! token-account setup it depends on, in an unsigned transaction envelope.
//!
//! ## Transaction Structure
//!
//! ```text
//! Transaction
//! ├── Recent Blockhash (latest finalized, fetched per request)
//! ├── Fee Payer (the requesting account)
//! └── Instructions[]
//!     ├── Create user token ATA (idempotent)
//!     ├── Create user LP ATA (idempotent)
//!     ├── Transfer lamports + SyncNative   (SOL deposit only)
//!     ├── Vault deposit / withdraw         (exactly one)
//!     └── Close user WSOL ATA              (SOL vault only)
//! ```
//!
//! Closing the WSOL account returns its lamports to the owner as native SOL.
//!
//! ## Unsigned Transactions
//!
//! ```text
//! 1. Backend builds unsigned transaction
//!              ↓
//! 2. Wallet receives it (base64 encoded)
//!              ↓
//! 3. User signs with their wallet, which may refresh the blockhash
//!              ↓
//! 4. Wallet submits signed transaction to Solana
//! ```
//!
//! The blockhash is always populated even though wallets usually replace
//! it: some wallets refuse an unsigned transaction without one.

use std::sync::Arc;

use actix_web::web;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    instruction::Instruction,
    message::Message,
    pubkey::Pubkey,
    system_instruction,
    transaction::Transaction,
};
use spl_associated_token_account::instruction::create_associated_token_account_idempotent;
use tracing::{debug, info};

use crate::services::action_params::VaultAction;
use crate::services::vault::VaultClient;
use crate::solana::{ChainRpc, RpcError};

/// Errors that can occur when building transactions.
#[derive(Debug, thiserror::Error)]
pub enum TransactionBuilderError {
    /// Failed to get recent blockhash.
    #[error(transparent)]
    Blockhash(#[from] RpcError),

    /// The blocking RPC task could not run.
    #[error("Blocking task failed: {0}")]
    Blocking(String),

    /// A token program instruction could not be built.
    #[error("Instruction error: {0}")]
    Instruction(String),
}

/// The Transaction Builder service.
///
/// ## Usage
///
/// ```rust,ignore
/// let builder = TransactionBuilder::new(rpc);
/// let tx = builder
///     .build_vault_transaction(&vault, VaultAction::Deposit, &user, 1_500_000_000)
///     .await?;
/// ```
#[derive(Clone)]
pub struct TransactionBuilder {
    rpc: Arc<dyn ChainRpc>,
}

impl TransactionBuilder {
    pub fn new(rpc: Arc<dyn ChainRpc>) -> Self {
        Self { rpc }
    }

    /// Build an unsigned deposit or withdraw transaction.
    ///
    /// ## Arguments
    ///
    /// * `vault` - Loaded vault handle
    /// * `action` - Deposit or withdraw
    /// * `owner` - Requesting wallet; signer and fee payer
    /// * `amount` - Amount in base units
    pub async fn build_vault_transaction(
        &self,
        vault: &VaultClient,
        action: VaultAction,
        owner: &Pubkey,
        amount: u64,
    ) -> Result<Transaction, TransactionBuilderError> {
        info!(
            "Building {} transaction: {} base units for {} (vault {})",
            action,
            amount,
            owner,
            vault.address()
        );

        let instructions = vault_instructions(vault, action, owner, amount)?;

        let rpc = self.rpc.clone();
        let blockhash = web::block(move || rpc.get_latest_blockhash(CommitmentConfig::finalized()))
            .await
            .map_err(|e| TransactionBuilderError::Blocking(e.to_string()))??;

        let message = Message::new_with_blockhash(&instructions, Some(owner), &blockhash);
        let transaction = Transaction::new_unsigned(message);

        debug!(
            "Built {} tx with {} instructions, blockhash {}",
            action,
            instructions.len(),
            blockhash
        );

        Ok(transaction)
    }
}

/// Instruction sequence for one vault action.
///
/// Both associated token accounts are created idempotently so a fresh
/// wallet can deposit. For the SOL vault, a deposit first wraps `amount`
/// lamports into the owner's WSOL account, and every action ends by
/// closing that account to unwrap what is left.
fn vault_instructions(
    vault: &VaultClient,
    action: VaultAction,
    owner: &Pubkey,
    amount: u64,
) -> Result<Vec<Instruction>, TransactionBuilderError> {
    let token_program = spl_token::id();
    let user_token = vault.user_token_account(owner);

    let mut instructions = vec![
        create_associated_token_account_idempotent(owner, owner, vault.token_mint(), &token_program),
        create_associated_token_account_idempotent(owner, owner, vault.lp_mint(), &token_program),
    ];

    if vault.is_native() && action == VaultAction::Deposit {
        instructions.push(system_instruction::transfer(owner, &user_token, amount));
        instructions.push(
            spl_token::instruction::sync_native(&token_program, &user_token)
                .map_err(|e| TransactionBuilderError::Instruction(e.to_string()))?,
        );
    }

    instructions.push(match action {
        VaultAction::Deposit => vault.deposit(owner, amount),
        VaultAction::Withdraw => vault.withdraw(owner, amount),
    });

    if vault.is_native() {
        instructions.push(
            spl_token::instruction::close_account(&token_program, &user_token, owner, owner, &[])
                .map_err(|e| TransactionBuilderError::Instruction(e.to_string()))?,
        );
    }

    Ok(instructions)
}

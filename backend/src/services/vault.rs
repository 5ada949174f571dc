//! # Dynamic Vault Client
//!
//! Builds instructions for the Meteora dynamic (yield-bearing) vault
//! program.
//!
//! ## Accounts
//!
//! ```text
//! vault        PDA ["vault", token_mint, BASE_KEY]
//! token_vault  PDA ["token_vault", vault]        (holds the vault's tokens)
//! lp_mint      read from the vault account       (vault share token)
//! ```
//!
//! Deposit and withdraw take the same account list:
//!
//! ```text
//! 0. vault            (mut)
//! 1. token_vault      (mut)
//! 2. lp_mint          (mut)
//! 3. user_token       (mut)  owner's ATA for the vault's token mint
//! 4. user_lp          (mut)  owner's ATA for the LP mint
//! 5. user             (signer)
//! 6. token_program
//! ```

use std::str::FromStr;
use std::sync::Arc;

use actix_web::web;
use solana_sdk::{
    hash::hash,
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};
use tracing::{debug, info};

use crate::services::token_registry::TokenInfo;
use crate::solana::{ChainRpc, RpcError};

/// Dynamic vault program.
pub const VAULT_PROGRAM_ID: Pubkey = solana_sdk::pubkey!("24Uqj9JCLxUeoC3hGfh5W3s9FM9uCHDS2SG3LYwBpyTi");

/// Base key the canonical vault for each mint is derived from.
pub const VAULT_BASE_KEY: Pubkey = solana_sdk::pubkey!("HWzXGcGHy4tcpYfaRDCyLNzXqBTv3E6BttpCH2vJxArv");

/// Anchor discriminator for `deposit`: sha256("global:deposit")[..8]
const DEPOSIT_DISCRIMINATOR: [u8; 8] = [242, 35, 198, 137, 82, 225, 242, 182];

/// Anchor discriminator for `withdraw`: sha256("global:withdraw")[..8]
const WITHDRAW_DISCRIMINATOR: [u8; 8] = [183, 18, 70, 156, 148, 109, 161, 34];

/// Bytes of the vault account this client reads (discriminator through `lp_mint`).
const VAULT_STATE_LEN: usize = 147;

/// Errors that can occur when working with a vault.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// Token metadata carries an unparseable mint.
    #[error("Invalid token mint: {0}")]
    InvalidMint(String),

    /// Vault account data is too short or has the wrong discriminator.
    #[error("Invalid vault account data: {0}")]
    InvalidAccountData(String),

    /// The vault at the derived address is for a different mint.
    #[error("Vault mint mismatch: expected {expected}, found {found}")]
    MintMismatch { expected: Pubkey, found: Pubkey },

    #[error(transparent)]
    Rpc(#[from] RpcError),

    /// The blocking RPC task could not run.
    #[error("Blocking task failed: {0}")]
    Blocking(String),
}

/// Decoded prefix of the on-chain vault account.
///
/// ## Account Structure (Anchor)
///
/// ```text
/// Offset | Size | Field
/// -------|------|------
/// 0      | 8    | Anchor discriminator
/// 8      | 1    | enabled
/// 9      | 1    | vault_bump
/// 10     | 1    | token_vault_bump
/// 11     | 8    | total_amount
/// 19     | 32   | token_vault
/// 51     | 32   | fee_vault
/// 83     | 32   | token_mint
/// 115    | 32   | lp_mint
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultState {
    pub enabled: bool,
    pub total_amount: u64,
    pub token_vault: Pubkey,
    pub fee_vault: Pubkey,
    pub token_mint: Pubkey,
    pub lp_mint: Pubkey,
}

impl VaultState {
    /// Anchor account discriminator: sha256("account:Vault")[..8]
    pub fn discriminator() -> [u8; 8] {
        let digest = hash(b"account:Vault").to_bytes();
        let mut discriminator = [0u8; 8];
        discriminator.copy_from_slice(&digest[..8]);
        discriminator
    }

    /// Decode raw vault account data.
    pub fn decode(data: &[u8]) -> Result<Self, VaultError> {
        if data.len() < VAULT_STATE_LEN {
            return Err(VaultError::InvalidAccountData(format!(
                "expected at least {} bytes, got {}",
                VAULT_STATE_LEN,
                data.len()
            )));
        }

        if data[..8] != Self::discriminator() {
            return Err(VaultError::InvalidAccountData(
                "account discriminator does not match Vault".to_string(),
            ));
        }

        let total_amount = u64::from_le_bytes(
            data[11..19]
                .try_into()
                .map_err(|_| VaultError::InvalidAccountData("total_amount".to_string()))?,
        );

        Ok(Self {
            enabled: data[8] == 1,
            total_amount,
            token_vault: read_pubkey(data, 19)?,
            fee_vault: read_pubkey(data, 51)?,
            token_mint: read_pubkey(data, 83)?,
            lp_mint: read_pubkey(data, 115)?,
        })
    }
}

fn read_pubkey(data: &[u8], offset: usize) -> Result<Pubkey, VaultError> {
    Pubkey::try_from(&data[offset..offset + 32])
        .map_err(|_| VaultError::InvalidAccountData(format!("pubkey at offset {}", offset)))
}

/// Vault address for a token mint.
pub fn find_vault_address(token_mint: &Pubkey) -> Pubkey {
    let (vault, _bump) = Pubkey::find_program_address(
        &[b"vault", token_mint.as_ref(), VAULT_BASE_KEY.as_ref()],
        &VAULT_PROGRAM_ID,
    );
    vault
}

/// Handle to one vault, loaded from chain.
///
/// ## Usage
///
/// ```rust,ignore
/// let vault = VaultClient::create(rpc, &sol_token_info).await?;
/// let ix = vault.deposit(&user, 1_500_000_000);
/// ```
#[derive(Debug, Clone)]
pub struct VaultClient {
    address: Pubkey,
    state: VaultState,
}

impl VaultClient {
    /// Load the vault for `token` from chain.
    pub async fn create(rpc: Arc<dyn ChainRpc>, token: &TokenInfo) -> Result<Self, VaultError> {
        let token_mint = Pubkey::from_str(&token.address)
            .map_err(|_| VaultError::InvalidMint(token.address.clone()))?;
        let address = find_vault_address(&token_mint);

        debug!("Loading {} vault at {}", token.symbol, address);

        let data = web::block(move || rpc.get_account_data(&address))
            .await
            .map_err(|e| VaultError::Blocking(e.to_string()))??;

        let state = VaultState::decode(&data)?;
        if state.token_mint != token_mint {
            return Err(VaultError::MintMismatch {
                expected: token_mint,
                found: state.token_mint,
            });
        }

        info!(
            "Loaded {} vault {} (enabled: {}, total: {})",
            token.symbol, address, state.enabled, state.total_amount
        );
        debug!(
            "Vault accounts: token_vault={} fee_vault={} lp_mint={}",
            state.token_vault, state.fee_vault, state.lp_mint
        );

        Ok(Self::from_state(address, state))
    }

    pub fn from_state(address: Pubkey, state: VaultState) -> Self {
        Self { address, state }
    }

    pub fn address(&self) -> &Pubkey {
        &self.address
    }

    #[cfg(test)]
    pub fn state(&self) -> &VaultState {
        &self.state
    }

    pub fn token_mint(&self) -> &Pubkey {
        &self.state.token_mint
    }

    pub fn lp_mint(&self) -> &Pubkey {
        &self.state.lp_mint
    }

    /// Whether the vault holds wrapped SOL.
    pub fn is_native(&self) -> bool {
        self.state.token_mint == spl_token::native_mint::id()
    }

    /// Owner's associated token account for the vault's token mint.
    pub fn user_token_account(&self, owner: &Pubkey) -> Pubkey {
        spl_associated_token_account::get_associated_token_address(owner, &self.state.token_mint)
    }

    /// Owner's associated token account for the LP mint.
    pub fn user_lp_account(&self, owner: &Pubkey) -> Pubkey {
        spl_associated_token_account::get_associated_token_address(owner, &self.state.lp_mint)
    }

    /// Deposit `token_amount` base units of the vault's token.
    ///
    /// No minimum LP amount is enforced.
    pub fn deposit(&self, owner: &Pubkey, token_amount: u64) -> Instruction {
        Instruction {
            program_id: VAULT_PROGRAM_ID,
            accounts: self.user_accounts(owner),
            data: build_instruction_data(DEPOSIT_DISCRIMINATOR, token_amount, 0),
        }
    }

    /// Withdraw by burning `unmint_amount` LP base units.
    ///
    /// No minimum output amount is enforced.
    pub fn withdraw(&self, owner: &Pubkey, unmint_amount: u64) -> Instruction {
        Instruction {
            program_id: VAULT_PROGRAM_ID,
            accounts: self.user_accounts(owner),
            data: build_instruction_data(WITHDRAW_DISCRIMINATOR, unmint_amount, 0),
        }
    }

    fn user_accounts(&self, owner: &Pubkey) -> Vec<AccountMeta> {
        let user_token = self.user_token_account(owner);
        let user_lp = self.user_lp_account(owner);

        vec![
            AccountMeta::new(self.address, false),            // vault
            AccountMeta::new(self.state.token_vault, false),  // token_vault
            AccountMeta::new(self.state.lp_mint, false),      // lp_mint
            AccountMeta::new(user_token, false),              // user_token
            AccountMeta::new(user_lp, false),                 // user_lp
            AccountMeta::new_readonly(*owner, true),          // user (signer)
            AccountMeta::new_readonly(spl_token::id(), false), // token_program
        ]
    }
}

/// Discriminator followed by two little-endian u64 arguments.
fn build_instruction_data(discriminator: [u8; 8], amount: u64, minimum: u64) -> Vec<u8> {
    let mut data = discriminator.to_vec();
    data.extend_from_slice(&amount.to_le_bytes());
    data.extend_from_slice(&minimum.to_le_bytes());
    data
}

#[cfg(test)]
impl VaultState {
    /// Raw account bytes for this state, padded like the real account.
    pub(crate) fn to_account_data(&self) -> Vec<u8> {
        let mut data = Self::discriminator().to_vec();
        data.push(self.enabled as u8);
        data.extend_from_slice(&[255, 254]);
        data.extend_from_slice(&self.total_amount.to_le_bytes());
        data.extend_from_slice(self.token_vault.as_ref());
        data.extend_from_slice(self.fee_vault.as_ref());
        data.extend_from_slice(self.token_mint.as_ref());
        data.extend_from_slice(self.lp_mint.as_ref());
        // strategies, base, admin, operator, locked profit tracker
        data.resize(data.len() + 32 * 33 + 24, 0);
        data
    }

    pub(crate) fn sample_for(token_mint: Pubkey) -> Self {
        let vault = find_vault_address(&token_mint);
        let (token_vault, _bump) =
            Pubkey::find_program_address(&[b"token_vault", vault.as_ref()], &VAULT_PROGRAM_ID);
        Self {
            enabled: true,
            total_amount: 42_000_000_000,
            token_vault,
            fee_vault: Pubkey::new_unique(),
            token_mint,
            lp_mint: Pubkey::new_unique(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::token_registry;
    use solana_sdk::commitment_config::CommitmentConfig;
    use solana_sdk::hash::Hash;

    struct AccountRpc(Result<Vec<u8>, String>);

    impl ChainRpc for AccountRpc {
        fn get_latest_blockhash(&self, _: CommitmentConfig) -> Result<Hash, RpcError> {
            Ok(Hash::default())
        }

        fn get_account_data(&self, address: &Pubkey) -> Result<Vec<u8>, RpcError> {
            self.0.clone().map_err(|reason| RpcError::Account {
                address: *address,
                reason,
            })
        }
    }

    fn sol() -> TokenInfo {
        token_registry::find_by_symbol("SOL").unwrap()
    }

    #[test]
    fn test_discriminators_match_anchor() {
        assert_eq!(hash(b"global:deposit").to_bytes()[..8], DEPOSIT_DISCRIMINATOR);
        assert_eq!(hash(b"global:withdraw").to_bytes()[..8], WITHDRAW_DISCRIMINATOR);
    }

    #[test]
    fn test_decode_state() {
        let state = VaultState::sample_for(spl_token::native_mint::id());
        let decoded = VaultState::decode(&state.to_account_data()).unwrap();
        assert_eq!(decoded, state);
    }

    #[test]
    fn test_decode_rejects_short_data() {
        let data = VaultState::sample_for(Pubkey::new_unique()).to_account_data();
        assert!(matches!(
            VaultState::decode(&data[..100]),
            Err(VaultError::InvalidAccountData(_))
        ));
    }

    #[test]
    fn test_decode_rejects_wrong_discriminator() {
        let mut data = VaultState::sample_for(Pubkey::new_unique()).to_account_data();
        data[0] ^= 0xff;
        assert!(matches!(
            VaultState::decode(&data),
            Err(VaultError::InvalidAccountData(_))
        ));
    }

    #[test]
    fn test_deposit_instruction() {
        let mint = spl_token::native_mint::id();
        let state = VaultState::sample_for(mint);
        let vault = VaultClient::from_state(find_vault_address(&mint), state.clone());
        let owner = Pubkey::new_unique();

        let ix = vault.deposit(&owner, 1_500_000_000);

        assert_eq!(ix.program_id, VAULT_PROGRAM_ID);
        assert_eq!(ix.data[..8], DEPOSIT_DISCRIMINATOR);
        assert_eq!(ix.data[8..16], 1_500_000_000u64.to_le_bytes());
        assert_eq!(ix.data[16..24], 0u64.to_le_bytes());

        assert_eq!(ix.accounts.len(), 7);
        assert_eq!(ix.accounts[0].pubkey, *vault.address());
        assert_eq!(ix.accounts[1].pubkey, state.token_vault);
        assert_eq!(ix.accounts[2].pubkey, state.lp_mint);
        assert_eq!(
            ix.accounts[3].pubkey,
            spl_associated_token_account::get_associated_token_address(&owner, &mint)
        );
        assert_eq!(
            ix.accounts[4].pubkey,
            spl_associated_token_account::get_associated_token_address(&owner, &state.lp_mint)
        );
        assert_eq!(ix.accounts[5].pubkey, owner);
        assert!(ix.accounts[5].is_signer);
        assert_eq!(ix.accounts[6].pubkey, spl_token::id());
    }

    #[test]
    fn test_withdraw_instruction() {
        let mint = spl_token::native_mint::id();
        let vault = VaultClient::from_state(find_vault_address(&mint), VaultState::sample_for(mint));
        let owner = Pubkey::new_unique();

        let ix = vault.withdraw(&owner, 2_000_000_000);

        assert_eq!(ix.data[..8], WITHDRAW_DISCRIMINATOR);
        assert_eq!(ix.data[8..16], 2_000_000_000u64.to_le_bytes());
        assert_eq!(ix.accounts.iter().filter(|meta| meta.is_signer).count(), 1);
    }

    #[test]
    fn test_native_vault_accounts() {
        let mint = spl_token::native_mint::id();
        let state = VaultState::sample_for(mint);
        let vault = VaultClient::from_state(find_vault_address(&mint), state.clone());
        let owner = Pubkey::new_unique();

        assert!(vault.is_native());
        assert_eq!(vault.lp_mint(), &state.lp_mint);
        assert_eq!(
            vault.user_token_account(&owner),
            spl_associated_token_account::get_associated_token_address(&owner, &mint)
        );

        let other = Pubkey::new_unique();
        let token_vault = VaultClient::from_state(find_vault_address(&other), VaultState::sample_for(other));
        assert!(!token_vault.is_native());
        assert_eq!(token_vault.token_mint(), &other);
    }

    #[actix_web::test]
    async fn test_create_loads_vault() {
        let mint = spl_token::native_mint::id();
        let state = VaultState::sample_for(mint);
        let rpc = Arc::new(AccountRpc(Ok(state.to_account_data())));

        let vault = VaultClient::create(rpc, &sol()).await.unwrap();

        assert_eq!(*vault.address(), find_vault_address(&mint));
        assert_eq!(vault.state(), &state);
    }

    #[actix_web::test]
    async fn test_create_rejects_other_mint() {
        let state = VaultState::sample_for(Pubkey::new_unique());
        let rpc = Arc::new(AccountRpc(Ok(state.to_account_data())));

        let err = VaultClient::create(rpc, &sol()).await.unwrap_err();
        assert!(matches!(err, VaultError::MintMismatch { .. }));
    }

    #[actix_web::test]
    async fn test_create_propagates_rpc_failure() {
        let rpc = Arc::new(AccountRpc(Err("AccountNotFound".to_string())));

        let err = VaultClient::create(rpc, &sol()).await.unwrap_err();
        assert!(matches!(err, VaultError::Rpc(RpcError::Account { .. })));
    }
}

//! # Token Registry
//!
//! Static token metadata for the tokens the service knows about.
//! Entries follow the Solana token-list format (camelCase, `logoURI`).

use serde::{Deserialize, Serialize};

/// Mainnet-beta chain id in the token-list format.
pub const MAINNET_CHAIN_ID: u64 = 101;

/// Symbol of the network's native asset.
pub const NATIVE_SYMBOL: &str = "SOL";

/// Metadata for one token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    /// Token-list chain id (101 = mainnet-beta).
    pub chain_id: u64,

    /// Mint address (base58).
    pub address: String,

    pub symbol: String,

    pub name: String,

    /// Number of base-unit decimals.
    pub decimals: u8,

    #[serde(rename = "logoURI")]
    pub logo_uri: Option<String>,
}

struct StaticToken {
    address: &'static str,
    symbol: &'static str,
    name: &'static str,
    decimals: u8,
    logo_uri: &'static str,
}

const STATIC_TOKENS: &[StaticToken] = &[
    StaticToken {
        address: "So11111111111111111111111111111111111111112",
        symbol: "SOL",
        name: "Wrapped SOL",
        decimals: 9,
        logo_uri: "https://raw.githubusercontent.com/solana-labs/token-list/main/assets/mainnet/So11111111111111111111111111111111111111112/logo.png",
    },
    StaticToken {
        address: "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
        symbol: "USDC",
        name: "USD Coin",
        decimals: 6,
        logo_uri: "https://raw.githubusercontent.com/solana-labs/token-list/main/assets/mainnet/EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v/logo.png",
    },
    StaticToken {
        address: "Es9vMFrzaCERmJfrF4H2FYD4KCoNkY11McCe8BenwNYB",
        symbol: "USDT",
        name: "USDT",
        decimals: 6,
        logo_uri: "https://raw.githubusercontent.com/solana-labs/token-list/main/assets/mainnet/Es9vMFrzaCERmJfrF4H2FYD4KCoNkY11McCe8BenwNYB/logo.svg",
    },
];

/// Resolve the full static token list.
///
/// Returns a fresh list on every call.
pub fn resolve() -> Vec<TokenInfo> {
    STATIC_TOKENS
        .iter()
        .map(|token| TokenInfo {
            chain_id: MAINNET_CHAIN_ID,
            address: token.address.to_string(),
            symbol: token.symbol.to_string(),
            name: token.name.to_string(),
            decimals: token.decimals,
            logo_uri: Some(token.logo_uri.to_string()),
        })
        .collect()
}

/// First token in the registry with the given symbol.
pub fn find_by_symbol(symbol: &str) -> Option<TokenInfo> {
    resolve().into_iter().find(|token| token.symbol == symbol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use solana_sdk::pubkey::Pubkey;

    #[test]
    fn test_native_token_resolves() {
        let sol = find_by_symbol(NATIVE_SYMBOL).expect("SOL is registered");
        assert_eq!(sol.decimals, 9);
        assert_eq!(
            Pubkey::from_str(&sol.address).unwrap(),
            spl_token::native_mint::id()
        );
    }

    #[test]
    fn test_all_addresses_are_valid() {
        for token in resolve() {
            assert!(Pubkey::from_str(&token.address).is_ok(), "{}", token.symbol);
            assert_eq!(token.chain_id, MAINNET_CHAIN_ID);
        }
    }

    #[test]
    fn test_unknown_symbol() {
        assert!(find_by_symbol("NOPE").is_none());
    }

    #[test]
    fn test_token_list_json_shape() {
        let sol = find_by_symbol("SOL").unwrap();
        let json = serde_json::to_value(&sol).unwrap();
        assert_eq!(json["chainId"], 101);
        assert_eq!(json["decimals"], 9);
        assert!(json["logoURI"].is_string());
    }
}

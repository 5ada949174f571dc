//! # Action Parameters
//!
//! Validation of the `action` and `amount` query parameters of a
//! transaction request. Independent of the HTTP layer: it only needs the
//! raw query string.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

/// Vault operation requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultAction {
    Deposit,
    Withdraw,
}

impl VaultAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            VaultAction::Deposit => "deposit",
            VaultAction::Withdraw => "withdraw",
        }
    }

    /// Capitalized verb used in labels and messages.
    pub fn verb(&self) -> &'static str {
        match self {
            VaultAction::Deposit => "Deposit",
            VaultAction::Withdraw => "Withdraw",
        }
    }
}

impl fmt::Display for VaultAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VaultAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(VaultAction::Deposit),
            "withdraw" => Ok(VaultAction::Withdraw),
            _ => Err(()),
        }
    }
}

/// Validated query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionParams {
    pub action: VaultAction,

    /// Human-readable amount, always > 0.
    pub amount: Decimal,
}

pub const MISSING_PARAMS: &str = "Missing action or amount parameter";
pub const INVALID_ACTION: &str = "Invalid action parameter";

/// Message for an amount rejected for `action`.
pub fn invalid_amount(action: VaultAction) -> String {
    format!("Invalid amount for {}", action)
}

/// Validate `action` and `amount` from a raw query string.
///
/// Rules, in order:
/// 1. both present and non-empty
/// 2. `action` is `deposit` or `withdraw`
/// 3. `amount` is a decimal number greater than zero
///
/// Returns the caller-facing error message on failure.
pub fn validate_query_params(query: &str) -> Result<ActionParams, String> {
    let pairs: Vec<(String, String)> =
        serde_urlencoded::from_str(query).map_err(|_| MISSING_PARAMS.to_string())?;

    let action = first_value(&pairs, "action");
    let amount = first_value(&pairs, "amount");

    let (action, amount) = match (action, amount) {
        (Some(action), Some(amount)) => (action, amount),
        _ => return Err(MISSING_PARAMS.to_string()),
    };

    let action = VaultAction::from_str(action).map_err(|_| INVALID_ACTION.to_string())?;

    let amount = parse_amount(amount)
        .filter(|amount| *amount > Decimal::ZERO)
        .ok_or_else(|| invalid_amount(action))?;

    Ok(ActionParams { action, amount })
}

/// First non-empty value for `key`, the way `URLSearchParams.get` reads it.
fn first_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .filter(|v| !v.is_empty())
}

fn parse_amount(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    // `Decimal` also accepts `_` digit separators.
    if !raw
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E'))
    {
        return None;
    }
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_missing_params() {
        for query in ["", "action=deposit", "amount=1", "foo=bar", "action=&amount=1", "action=deposit&amount="] {
            assert_eq!(
                validate_query_params(query).unwrap_err(),
                "Missing action or amount parameter",
                "query: {:?}",
                query
            );
        }
    }

    #[test]
    fn test_invalid_action() {
        for query in ["action=stake&amount=1", "action=Deposit&amount=1", "action=deposit%20&amount=1"] {
            assert_eq!(
                validate_query_params(query).unwrap_err(),
                "Invalid action parameter",
                "query: {:?}",
                query
            );
        }
    }

    #[test]
    fn test_invalid_amount() {
        for amount in ["abc", "-5", "0", "0.0", "NaN", "inf", "Infinity", "1_000", "1_0.5"] {
            let query = format!("action=withdraw&amount={}", amount);
            assert_eq!(
                validate_query_params(&query).unwrap_err(),
                "Invalid amount for withdraw",
                "amount: {:?}",
                amount
            );
        }

        assert_eq!(
            validate_query_params("action=deposit&amount=abc").unwrap_err(),
            "Invalid amount for deposit"
        );
    }

    #[test]
    fn test_valid_params() {
        let params = validate_query_params("action=deposit&amount=1.5").unwrap();
        assert_eq!(params.action, VaultAction::Deposit);
        assert_eq!(params.amount, dec("1.5"));

        let params = validate_query_params("amount=2&action=withdraw").unwrap();
        assert_eq!(params.action, VaultAction::Withdraw);
        assert_eq!(params.amount, dec("2"));
    }

    #[test]
    fn test_scientific_amount() {
        let params = validate_query_params("action=deposit&amount=1e-3").unwrap();
        assert_eq!(params.amount, dec("0.001"));
    }

    #[test]
    fn test_first_occurrence_wins() {
        let params = validate_query_params("action=withdraw&action=stake&amount=3&amount=-1").unwrap();
        assert_eq!(params.action, VaultAction::Withdraw);
        assert_eq!(params.amount, dec("3"));
    }

    #[test]
    fn test_action_round_trips_through_str() {
        for action in [VaultAction::Deposit, VaultAction::Withdraw] {
            assert_eq!(VaultAction::from_str(action.as_str()), Ok(action));
        }
        assert_eq!(VaultAction::Withdraw.verb(), "Withdraw");
    }
}

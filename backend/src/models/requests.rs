//! # API Request Models
//!
//! Structures for incoming request bodies.

use serde::{Deserialize, Serialize};

/// Body of an Actions POST request.
///
/// ## Example JSON
///
/// ```json
/// {
///     "account": "7xKt9Fj2abc123..."
/// }
/// ```
///
/// Other fields a wallet sends along (`data`, `type`, ...) are ignored.
/// `account` stays optional here so a missing account is reported the same
/// way as a malformed one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionPostRequest {
    /// The wallet public key (base58) that will sign and pay.
    pub account: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignores_unknown_fields() {
        let body: ActionPostRequest = serde_json::from_str(
            r#"{"account":"11111111111111111111111111111111","type":"transaction","data":{"amount":"1"}}"#,
        )
        .unwrap();
        assert_eq!(body.account.as_deref(), Some("11111111111111111111111111111111"));
    }

    #[test]
    fn test_account_may_be_absent() {
        let body: ActionPostRequest = serde_json::from_str("{}").unwrap();
        assert!(body.account.is_none());
    }
}

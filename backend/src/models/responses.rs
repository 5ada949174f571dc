//! # API Response Models
//!
//! Structures for outgoing response bodies. The action shapes follow the
//! Solana Actions protocol so wallets can render and invoke them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Descriptor returned by `GET /api/actions/vault`.
///
/// ## Example Response
///
/// ```json
/// {
///     "type": "action",
///     "icon": "https://example.com/chainstack_square.png",
///     "title": "Meteora Dynamic Vault Actions",
///     "description": "Manage your SOL Vault liquidity",
///     "label": "Meteora",
///     "links": {
///         "actions": [
///             {
///                 "type": "transaction",
///                 "label": "Deposit SOL",
///                 "href": "/api/actions/vault?action=deposit&amount={amount}",
///                 "parameters": [{ "name": "amount", "label": "Amount" }]
///             }
///         ]
///     }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionGetResponse {
    #[serde(rename = "type")]
    pub kind: String,

    /// Absolute URL of the action icon.
    pub icon: String,

    pub title: String,

    pub description: String,

    /// Default button label.
    pub label: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<ActionLinks>,
}

/// Related actions a client can invoke.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionLinks {
    pub actions: Vec<LinkedAction>,
}

/// One invocable action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedAction {
    #[serde(rename = "type")]
    pub kind: String,

    pub label: String,

    /// Href template; `{name}` placeholders are filled from `parameters`.
    pub href: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ActionParameter>,
}

/// A user-supplied value an href template needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionParameter {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

/// Successful `POST /api/actions/vault` response.
///
/// ## Example Response
///
/// ```json
/// {
///     "type": "transaction",
///     "transaction": "AQAAAAAAAAAAAAAA...",
///     "message": "Deposit 1.5 SOL"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionPostResponse {
    #[serde(rename = "type")]
    pub kind: String,

    /// Base64-encoded serialized transaction.
    pub transaction: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Error body for every failed action request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionErrorResponse {
    pub message: String,
}

impl ActionErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `actions.json` mapping of website paths to action API paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionsJson {
    pub rules: Vec<ActionRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRule {
    pub path_pattern: String,
    pub api_path: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// "healthy"
    pub status: String,

    /// Backend version.
    pub version: String,

    /// Current server time.
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_response_omits_missing_message() {
        let response = ActionPostResponse {
            kind: "transaction".to_string(),
            transaction: "AQ==".to_string(),
            message: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["type"], "transaction");
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_rule_is_camel_case() {
        let rules = ActionsJson {
            rules: vec![ActionRule {
                path_pattern: "/vault".to_string(),
                api_path: "/api/actions/vault".to_string(),
            }],
        };
        let json = serde_json::to_value(&rules).unwrap();
        assert_eq!(json["rules"][0]["pathPattern"], "/vault");
        assert_eq!(json["rules"][0]["apiPath"], "/api/actions/vault");
    }
}

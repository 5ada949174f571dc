//! # API Request Handlers
//!
//! This module contains the handler functions for each endpoint.
//! The transaction handler:
//! 1. Extracts request data
//! 2. Validates input
//! 3. Calls the vault and transaction services
//! 4. Returns an Actions-formatted response
//!
//! ## Error Handling
//!
//! Input errors come back verbatim with status 400:
//!
//! ```json
//! { "message": "Invalid account provided" }
//! ```
//!
//! Everything else is logged and collapsed into one status 500 body so no
//! RPC or vault detail reaches the caller:
//!
//! ```json
//! { "message": "Unknown error occurred" }
//! ```
//!
//! Every response carries the Actions CORS headers.

use std::str::FromStr;
use std::sync::Arc;

use actix_web::{error::InternalError, http::StatusCode, web, HttpRequest, HttpResponse};
use chrono::Utc;
use solana_sdk::pubkey::Pubkey;
use tracing::{error, info, warn};

use crate::actions::{action_response, create_post_response, ActionsError, CreatePostResponseFields};
use crate::models::{
    ActionErrorResponse,
    ActionGetResponse,
    ActionLinks,
    ActionParameter,
    ActionPostRequest,
    ActionPostResponse,
    ActionRule,
    ActionsJson,
    HealthResponse,
    LinkedAction,
};
use crate::services::action_params::{self, ActionParams, VaultAction};
use crate::services::token_registry::{self, NATIVE_SYMBOL};
use crate::services::transaction_builder::TransactionBuilderError;
use crate::services::vault::VaultError;
use crate::services::{TransactionBuilder, VaultClient};
use crate::utils::{self, ScalingError};
use crate::AppState;

/// Icon served alongside the action, relative to the request origin.
const ICON_PATH: &str = "/chainstack_square.png";

/// Largest POST body accepted; a request only carries an account key.
const MAX_BODY_BYTES: usize = 16 * 1024;

const INVALID_ACCOUNT: &str = "Invalid account provided";
const UNKNOWN_ERROR: &str = "Unknown error occurred";

/// Failures after input validation.
#[derive(Debug, thiserror::Error)]
enum PostActionError {
    #[error("{0} is missing from the token registry")]
    UnknownToken(&'static str),

    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error(transparent)]
    Amount(#[from] ScalingError),

    #[error(transparent)]
    Transaction(#[from] TransactionBuilderError),

    #[error(transparent)]
    Response(#[from] ActionsError),
}

/// Vault action descriptor.
///
/// Describes the deposit and withdraw actions so a wallet can render them.
///
/// ## Endpoint
///
/// `GET /api/actions/vault` (also `OPTIONS`)
///
/// ## Example
///
/// ```bash
/// curl http://127.0.0.1:8080/api/actions/vault
/// ```
pub async fn get_vault_actions(req: HttpRequest) -> HttpResponse {
    let origin = {
        let info = req.connection_info();
        format!("{}://{}", info.scheme(), info.host())
    };
    let path = req.path();

    let linked_action = |action: VaultAction| LinkedAction {
        kind: "transaction".to_string(),
        label: format!("{} {}", action.verb(), NATIVE_SYMBOL),
        href: format!("{}?action={}&amount={{amount}}", path, action),
        parameters: vec![ActionParameter {
            name: "amount".to_string(),
            label: Some("Amount".to_string()),
            required: None,
        }],
    };

    let payload = ActionGetResponse {
        kind: "action".to_string(),
        icon: format!("{}{}", origin, ICON_PATH),
        title: "Meteora Dynamic Vault Actions".to_string(),
        description: "Manage your SOL Vault liquidity".to_string(),
        label: "Meteora".to_string(),
        disabled: None,
        links: Some(ActionLinks {
            actions: vec![
                linked_action(VaultAction::Deposit),
                linked_action(VaultAction::Withdraw),
            ],
        }),
    };

    action_response(StatusCode::OK, &payload)
}

/// Build a vault transaction.
///
/// ## Endpoint
///
/// `POST /api/actions/vault?action={deposit|withdraw}&amount={amount}`
///
/// ## Example
///
/// ```bash
/// curl -X POST "http://127.0.0.1:8080/api/actions/vault?action=deposit&amount=1.5" \
///   -H "Content-Type: application/json" \
///   -d '{ "account": "YOUR_WALLET_ADDRESS" }'
/// ```
///
/// ## Response
///
/// ```json
/// {
///     "type": "transaction",
///     "transaction": "base64_encoded_transaction...",
///     "message": "Deposit 1.5 SOL"
/// }
/// ```
///
/// ## Errors
///
/// - 400 `Invalid account provided`
/// - 400 `Missing action or amount parameter`
/// - 400 `Invalid action parameter`
/// - 400 `Invalid amount for {action}`
/// - 500 `Unknown error occurred`
pub async fn post_vault_action(
    state: web::Data<Arc<AppState>>,
    req: HttpRequest,
    body: web::Json<ActionPostRequest>,
) -> HttpResponse {
    let request = body.into_inner();

    let account = match request.account.as_deref().map(Pubkey::from_str) {
        Some(Ok(account)) => account,
        _ => return error_response(StatusCode::BAD_REQUEST, INVALID_ACCOUNT),
    };

    let params = match action_params::validate_query_params(req.query_string()) {
        Ok(params) => params,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, &message),
    };

    info!("Vault {} request: {} {} for {}", params.action, params.amount, NATIVE_SYMBOL, account);

    match build_action_payload(&state, &account, &params).await {
        Ok(payload) => action_response(StatusCode::OK, &payload),
        Err(PostActionError::Amount(e)) => {
            warn!("Rejected {} amount {}: {}", params.action, params.amount, e);
            error_response(
                StatusCode::BAD_REQUEST,
                &action_params::invalid_amount(params.action),
            )
        }
        Err(e) => {
            error!("Vault {} for {} failed: {}", params.action, account, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, UNKNOWN_ERROR)
        }
    }
}

/// Body extractor settings for [`post_vault_action`].
///
/// Any body that cannot be read as JSON, including one over
/// `MAX_BODY_BYTES`, gets the masked 500. The content type is not checked.
pub fn post_body_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(MAX_BODY_BYTES)
        .content_type_required(false)
        .error_handler(|err, _req| {
            error!("Unreadable action request body: {}", err);
            let response = error_response(StatusCode::INTERNAL_SERVER_ERROR, UNKNOWN_ERROR);
            InternalError::from_response(err, response).into()
        })
}

/// Steps after validation: token lookup, vault load, scaling,
/// instruction, envelope, response body.
async fn build_action_payload(
    state: &AppState,
    account: &Pubkey,
    params: &ActionParams,
) -> Result<ActionPostResponse, PostActionError> {
    let token = token_registry::find_by_symbol(NATIVE_SYMBOL)
        .ok_or(PostActionError::UnknownToken(NATIVE_SYMBOL))?;

    let rpc = state.rpc.connect(&state.config.rpc_endpoint);
    let vault = VaultClient::create(rpc.clone(), &token).await?;

    let amount = utils::to_base_units(params.amount, token.decimals)?;

    let transaction = TransactionBuilder::new(rpc)
        .build_vault_transaction(&vault, params.action, account, amount)
        .await?;

    let payload = create_post_response(CreatePostResponseFields {
        transaction,
        message: Some(format!(
            "{} {} {}",
            params.action.verb(),
            params.amount.normalize(),
            token.symbol
        )),
    })?;

    Ok(payload)
}

/// `actions.json` rules mapping the website path to the action API.
///
/// ## Endpoint
///
/// `GET /actions.json` (also `OPTIONS`)
pub async fn actions_json() -> HttpResponse {
    let rules = ActionsJson {
        rules: vec![ActionRule {
            path_pattern: "/vault".to_string(),
            api_path: "/api/actions/vault".to_string(),
        }],
    };

    action_response(StatusCode::OK, &rules)
}

/// Health check endpoint.
///
/// Does not touch the RPC endpoint.
///
/// ## Endpoint
///
/// `GET /health`
pub async fn health_check() -> HttpResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    };

    action_response(StatusCode::OK, &response)
}

fn error_response(status: StatusCode, message: &str) -> HttpResponse {
    action_response(status, &ActionErrorResponse::new(message))
}

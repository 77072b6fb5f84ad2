// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction endpoints: normalized history, sending transfers, and
//! confirmation checks.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    chain::{PaymentTransaction, TransactionReceipt},
    error::ApiError,
    scanner::ScanQuery,
    state::AppState,
};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Query parameters for the transaction list.
#[derive(Debug, Deserialize, IntoParams)]
pub struct TransactionListQuery {
    /// Explorer page to fetch (1-based).
    #[param(default = 1)]
    pub page: Option<u64>,
    /// Include token transfers whose contract is not configured.
    #[param(default = false)]
    pub allow_unknown_currencies: Option<bool>,
    /// Comma-separated currency symbols to include.
    pub currencies: Option<String>,
}

/// Transaction list response.
#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionListResponse {
    pub chain: String,
    pub address: String,
    pub transactions: Vec<PaymentTransaction>,
}

/// Request to send a value transfer.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SendTransactionRequest {
    /// Sender private key (hex, with or without 0x prefix).
    pub private_key: String,
    /// Recipient address (0x + 40 hex chars).
    pub to: String,
    /// Amount in the chain's display unit (e.g. "1.5").
    pub value: String,
    /// Currency symbol; the chain's native currency when omitted.
    pub currency: Option<String>,
}

/// Confirmation status of a transaction.
#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionStatusResponse {
    pub tx_hash: String,
    /// True once the transaction has more confirmations than the chain
    /// requires.
    pub confirmed: bool,
}

// =============================================================================
// Handlers
// =============================================================================

/// Normalized transaction history for an address.
///
/// Merges one explorer page of native and token transfers into a single
/// timestamp-ordered sequence.
#[utoipa::path(
    get,
    path = "/v1/transactions/{address}",
    tag = "Transactions",
    params(
        ("address" = String, Path, description = "Account address (0x + 40 hex chars)"),
        TransactionListQuery
    ),
    responses(
        (status = 200, description = "Transactions retrieved", body = TransactionListResponse),
        (status = 501, description = "No explorer integration for this chain"),
        (status = 502, description = "Explorer failed or returned malformed data")
    )
)]
pub async fn list_transactions(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(query): Query<TransactionListQuery>,
) -> Result<Json<TransactionListResponse>, ApiError> {
    let scan = ScanQuery {
        currencies: query.currencies.as_deref().map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        }),
        allow_unknown_currencies: query.allow_unknown_currencies.unwrap_or(false),
        page: query.page.unwrap_or(1),
    };

    let transactions = state.client.get_transactions(&address, &scan).await?;

    Ok(Json(TransactionListResponse {
        chain: state.client.config().name.clone(),
        address,
        transactions,
    }))
}

/// Sign and broadcast a value transfer.
///
/// Not idempotent: on a 502 naming a transaction hash, query that hash
/// instead of resubmitting.
#[utoipa::path(
    post,
    path = "/v1/transactions/send",
    tag = "Transactions",
    request_body = SendTransactionRequest,
    responses(
        (status = 200, description = "Transaction broadcast", body = TransactionReceipt),
        (status = 400, description = "Malformed key, address or amount"),
        (status = 422, description = "Currency is not configured on this chain"),
        (status = 502, description = "Broadcast outcome unknown"),
        (status = 503, description = "Node provider unavailable")
    )
)]
pub async fn send_transaction(
    State(state): State<AppState>,
    Json(request): Json<SendTransactionRequest>,
) -> Result<Json<TransactionReceipt>, ApiError> {
    let receipt = state
        .client
        .send_transaction(
            &request.private_key,
            &request.to,
            &request.value,
            request.currency.as_deref(),
        )
        .await?;
    Ok(Json(receipt))
}

/// Check whether a transaction has reached the chain's required
/// confirmation count.
#[utoipa::path(
    get,
    path = "/v1/transactions/{tx_hash}/status",
    tag = "Transactions",
    params(
        ("tx_hash" = String, Path, description = "Transaction hash")
    ),
    responses(
        (status = 200, description = "Status retrieved", body = TransactionStatusResponse),
        (status = 400, description = "Malformed transaction hash"),
        (status = 503, description = "Node provider unavailable")
    )
)]
pub async fn transaction_status(
    State(state): State<AppState>,
    Path(tx_hash): Path<String>,
) -> Result<Json<TransactionStatusResponse>, ApiError> {
    let confirmed = state.client.is_transaction_confirmed(&tx_hash).await?;
    Ok(Json(TransactionStatusResponse { tx_hash, confirmed }))
}

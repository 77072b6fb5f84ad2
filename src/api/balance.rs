// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Balance query endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::ApiError, state::AppState};

/// Balance response.
#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceResponse {
    /// Chain the balance was read from.
    pub chain: String,
    /// Queried address.
    pub address: String,
    /// Currency the balance is denominated in.
    pub currency: String,
    /// Human-scaled decimal amount.
    pub balance: String,
}

/// Get the native-currency balance of an address.
#[utoipa::path(
    get,
    path = "/v1/balance/{address}",
    tag = "Balance",
    params(
        ("address" = String, Path, description = "Account address (0x + 40 hex chars)")
    ),
    responses(
        (status = 200, description = "Balance retrieved successfully", body = BalanceResponse),
        (status = 400, description = "Malformed address"),
        (status = 503, description = "Node provider unavailable")
    )
)]
pub async fn native_balance(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let balance = state.client.get_balance(&address, None).await?;
    let config = state.client.config();

    Ok(Json(BalanceResponse {
        chain: config.name.clone(),
        currency: config.native_currency.clone(),
        address,
        balance,
    }))
}

/// Get the balance of an address in a configured currency.
///
/// The currency must be the chain's native symbol or an entry in its
/// known-currency table.
#[utoipa::path(
    get,
    path = "/v1/balance/{address}/{currency}",
    tag = "Balance",
    params(
        ("address" = String, Path, description = "Account address (0x + 40 hex chars)"),
        ("currency" = String, Path, description = "Currency symbol, e.g. BUSD")
    ),
    responses(
        (status = 200, description = "Balance retrieved successfully", body = BalanceResponse),
        (status = 400, description = "Malformed address"),
        (status = 422, description = "Currency is not configured on this chain"),
        (status = 503, description = "Node provider unavailable")
    )
)]
pub async fn currency_balance(
    State(state): State<AppState>,
    Path((address, currency)): Path<(String, String)>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let balance = state.client.get_balance(&address, Some(&currency)).await?;

    Ok(Json(BalanceResponse {
        chain: state.client.config().name.clone(),
        address,
        currency,
        balance,
    }))
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account creation and import endpoints.
//!
//! Both operations are purely local key derivations; the private key
//! only ever appears in the response and is never stored.

use axum::{extract::State, Json};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{chain::Account, error::ApiError, state::AppState};

/// Request to import an existing private key.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ImportAccountRequest {
    /// Hex-encoded private key, with or without 0x prefix.
    pub private_key: String,
}

/// Generate a fresh keypair.
#[utoipa::path(
    post,
    path = "/v1/accounts",
    tag = "Accounts",
    responses(
        (status = 200, description = "Account created", body = Account)
    )
)]
pub async fn create_account(State(state): State<AppState>) -> Result<Json<Account>, ApiError> {
    Ok(Json(state.client.create_account()?))
}

/// Derive the account for a supplied private key.
#[utoipa::path(
    post,
    path = "/v1/accounts/import",
    tag = "Accounts",
    request_body = ImportAccountRequest,
    responses(
        (status = 200, description = "Account derived from key", body = Account),
        (status = 400, description = "Malformed private key")
    )
)]
pub async fn import_account(
    State(state): State<AppState>,
    Json(request): Json<ImportAccountRequest>,
) -> Result<Json<Account>, ApiError> {
    Ok(Json(state.client.import_account(&request.private_key)?))
}

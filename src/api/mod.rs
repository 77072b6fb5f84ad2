// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    chain::{Account, Direction, PaymentTransaction, TransactionReceipt},
    state::AppState,
};

pub mod accounts;
pub mod balance;
pub mod health;
pub mod transactions;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/balance/{address}", get(balance::native_balance))
        .route(
            "/balance/{address}/{currency}",
            get(balance::currency_balance),
        )
        .route("/accounts", post(accounts::create_account))
        .route("/accounts/import", post(accounts::import_account))
        .route(
            "/transactions/{address}",
            get(transactions::list_transactions),
        )
        .route("/transactions/send", post(transactions::send_transaction))
        .route(
            "/transactions/{tx_hash}/status",
            get(transactions::transaction_status),
        );

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/v1", v1_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::readiness,
        balance::native_balance,
        balance::currency_balance,
        accounts::create_account,
        accounts::import_account,
        transactions::list_transactions,
        transactions::send_transaction,
        transactions::transaction_status
    ),
    components(
        schemas(
            Account,
            Direction,
            PaymentTransaction,
            TransactionReceipt,
            balance::BalanceResponse,
            accounts::ImportAccountRequest,
            transactions::TransactionListResponse,
            transactions::SendTransactionRequest,
            transactions::TransactionStatusResponse,
            health::HealthResponse,
            health::ReadyResponse
        )
    ),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Balance", description = "Native and token balance queries"),
        (name = "Accounts", description = "Keypair creation and import"),
        (name = "Transactions", description = "History, transfers and confirmation checks")
    )
)]
struct ApiDoc;

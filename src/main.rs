// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{env, net::SocketAddr};

use tracing_subscriber::EnvFilter;

use multichain_wallet_server::{
    api::router,
    chain::{ChainClient, ChainRegistry},
    config,
    state::AppState,
};

#[tokio::main]
async fn main() {
    init_tracing();

    // Resolve the chain this instance serves, with environment overrides
    // for the node endpoint and explorer key.
    let registry = ChainRegistry::builtin();
    let chain_name = config::env_or_default(config::CHAIN_ENV, config::DEFAULT_CHAIN);
    let mut chain_config = registry
        .lookup(&chain_name)
        .unwrap_or_else(|| panic!("chain `{chain_name}` is not in the registry"))
        .clone();

    if let Ok(rpc_url) = env::var(config::CHAIN_RPC_URL_ENV) {
        chain_config.rpc_url = rpc_url;
    }
    if let Ok(api_key) = env::var(config::EXPLORER_API_KEY_ENV) {
        chain_config.explorer_api_key = Some(api_key);
    }

    let mut client = ChainClient::new(chain_config);
    client
        .init()
        .await
        .expect("failed to connect to chain provider");

    let state = AppState::new(client);
    let app = router(state);

    let host = config::env_or_default(config::HOST_ENV, config::DEFAULT_HOST);
    let port: u16 = config::env_or_default(config::PORT_ENV, &config::DEFAULT_PORT.to_string())
        .parse()
        .unwrap_or(config::DEFAULT_PORT);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("failed to parse bind address");

    tracing::info!(%addr, chain = %chain_name, "wallet server listening (docs at /docs)");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listener");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server failed");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    if config::env_or_default(config::LOG_FORMAT_ENV, "pretty") == "json" {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to install shutdown handler");
    }
}

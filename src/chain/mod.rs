// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Multi-chain client abstraction.
//!
//! This module provides:
//! - A registry of chain configurations (node endpoint, native currency,
//!   known token currencies, confirmation policy, explorer integration)
//! - Currency resolution between symbols, contracts and the native coin
//! - The [`ChainClient`] façade for balances, accounts, transfers,
//!   confirmation checks and normalized transaction history

pub mod client;
pub mod currency;
pub mod erc20;
pub mod registry;
pub mod types;
pub mod units;

pub use client::{ChainClient, ChainError};
pub use registry::ChainRegistry;
pub use types::{
    Account, BackendKind, ChainConfig, CurrencyInfo, Direction, PaymentTransaction,
    TokenStandard, TransactionReceipt,
};

/// Look a chain up in the registry and return a connected client for it.
///
/// Backend selection happens here, once, from the closed set of backend
/// kinds; the returned client is already initialized.
pub async fn connect(registry: &ChainRegistry, chain: &str) -> Result<ChainClient, ChainError> {
    let config = registry
        .lookup(chain)
        .ok_or_else(|| ChainError::UnknownChain {
            chain: chain.to_string(),
        })?;

    let mut client = ChainClient::new(config.clone());
    client.init().await?;
    Ok(client)
}

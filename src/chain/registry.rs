// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Catalog of chain configurations.
//!
//! The registry is an explicit value built at startup and handed to
//! [`crate::chain::connect`]; there is no process-wide table. Tests inject
//! their own registry with whatever chains they need.

use std::collections::HashMap;

use super::types::{BackendKind, ChainConfig, CurrencyInfo, TokenStandard};

/// Mapping from chain identifier to its configuration.
#[derive(Debug, Clone, Default)]
pub struct ChainRegistry {
    chains: HashMap<String, ChainConfig>,
}

impl ChainRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The chains this build ships with: BSC mainnet and testnet.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.insert(bsc());
        registry.insert(bsc_testnet());
        registry
    }

    /// Register a chain, keyed by its `name`. Replaces any previous entry.
    pub fn insert(&mut self, config: ChainConfig) {
        self.chains.insert(config.name.clone(), config);
    }

    pub fn lookup(&self, chain: &str) -> Option<&ChainConfig> {
        self.chains.get(chain)
    }

    /// Registered chain identifiers, for diagnostics.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.chains.keys().map(String::as_str)
    }
}

fn bsc() -> ChainConfig {
    ChainConfig {
        name: "BSC".into(),
        chain_id: 56,
        backend: BackendKind::Evm,
        rpc_url: "https://bsc-dataseed1.binance.org:443".into(),
        native_currency: "BNB".into(),
        native_decimals: 18,
        required_confirmations: 24,
        known_currencies: HashMap::from([
            (
                "BUSD".into(),
                CurrencyInfo {
                    contract_address: "0x55d398326f99059ff775485246999027b3197955".into(),
                    standard: TokenStandard::Erc20,
                },
            ),
            (
                "USDC".into(),
                CurrencyInfo {
                    contract_address: "0x8ac76a51cc950d9822d68b83fe1ad97b32cd580d".into(),
                    standard: TokenStandard::Erc20,
                },
            ),
        ]),
        explorer_api_url: Some("https://api.bscscan.com/api".into()),
        explorer_api_key: None,
    }
}

fn bsc_testnet() -> ChainConfig {
    ChainConfig {
        name: "BSC-TESTNET".into(),
        chain_id: 97,
        backend: BackendKind::Evm,
        rpc_url: "https://data-seed-prebsc-1-s1.binance.org:8545".into(),
        native_currency: "BNB".into(),
        native_decimals: 18,
        required_confirmations: 10,
        known_currencies: HashMap::from([(
            "BUSD".into(),
            CurrencyInfo {
                contract_address: "0xed24fc36d5ee211ea25a80239fb8c4cfd80f12ee".into(),
                standard: TokenStandard::Erc20,
            },
        )]),
        // No explorer integration on the testnet; history queries fail
        // with NoScannerConfigured there.
        explorer_api_url: None,
        explorer_api_key: None,
    }
}

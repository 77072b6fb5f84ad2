// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Chain configuration and the unified transaction types.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Closed set of token standards with an implemented contract path.
///
/// Matches over this enum are exhaustive on purpose: adding a standard
/// without wiring its balance/transfer handlers must fail compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum TokenStandard {
    #[serde(rename = "ERC20")]
    Erc20,
}

impl fmt::Display for TokenStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenStandard::Erc20 => write!(f, "ERC20"),
        }
    }
}

/// Closed set of chain backend families.
///
/// Selected once at construction by [`crate::chain::connect`]; never
/// re-dispatched per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// EVM-style chains (Ethereum, BSC and friends) over JSON-RPC.
    Evm,
}

/// A currency the chain configuration knows by symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyInfo {
    /// Token contract address (0x-prefixed hex).
    pub contract_address: String,
    /// Standard the contract implements.
    pub standard: TokenStandard,
}

/// Static configuration for one chain.
///
/// Constructed once (from the registry or by hand), owned by the
/// [`crate::chain::ChainClient`] and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    /// Chain identifier, e.g. "BSC" or "BSC-TESTNET".
    pub name: String,
    /// Numeric chain id used when signing transactions.
    pub chain_id: u64,
    /// Backend family serving this chain.
    pub backend: BackendKind,
    /// Node RPC endpoint.
    pub rpc_url: String,
    /// Native currency symbol, e.g. "BNB".
    pub native_currency: String,
    /// Decimal count of the native currency's base unit.
    pub native_decimals: u8,
    /// Blocks on top of the inclusion block before a transaction counts
    /// as confirmed.
    pub required_confirmations: u64,
    /// Currencies addressable by symbol, keyed by symbol.
    pub known_currencies: HashMap<String, CurrencyInfo>,
    /// Etherscan-style explorer API base; `None` means transaction
    /// history is unavailable for this chain.
    pub explorer_api_url: Option<String>,
    /// API key passed to the explorer, if any.
    pub explorer_api_key: Option<String>,
}

impl ChainConfig {
    /// Whether a transaction scanner can be built for this chain.
    pub fn has_scanner(&self) -> bool {
        self.explorer_api_url.is_some()
    }
}

/// Transfer direction relative to the queried address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
}

/// One normalized transfer, native or token, as returned by the scanner.
///
/// Numeric fields arrive from the explorer as decimal strings and are
/// parsed during normalization; `value` stays a base-unit decimal string
/// so no precision is lost, with `token_decimal` carrying the scale for
/// display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTransaction {
    pub block_number: u64,
    pub block_hash: String,
    pub hash: String,
    /// Inclusion time as reported by the explorer (epoch-based).
    pub time_stamp: u64,
    pub from: String,
    pub to: String,
    /// Known symbol, the chain's native symbol, or a synthesized
    /// `"<symbol> - <name> : <contract>"` label for admitted unknown
    /// tokens.
    pub currency: String,
    /// Transferred amount in base units, as a decimal string.
    pub value: String,
    /// Decimal count for scaling `value` to a display amount.
    pub token_decimal: u8,
    pub gas: u64,
    pub gas_price: u128,
    pub gas_used: u64,
    /// Blocks mined after the inclusion block; 0 while unmined.
    pub confirmations: u64,
    #[serde(rename = "type")]
    pub direction: Direction,
}

/// A keypair held by the caller.
///
/// The private key is only ever present transiently (account creation and
/// import responses); nothing in this service stores it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Account {
    /// 0x-prefixed address derived from the key.
    pub address: String,
    /// Hex-encoded private key, when the account was just created or
    /// imported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
}

/// Outcome of a broadcast transfer.
///
/// `block_number`, `gas_used` and `success` are populated when the
/// transaction was seen mined before the receipt wait timed out; a bare
/// hash still identifies a broadcast that the network accepted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TransactionReceipt {
    pub tx_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_used: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_serializes_as_type_field() {
        let tx = PaymentTransaction {
            block_number: 1,
            block_hash: "0xbb".into(),
            hash: "0xaa".into(),
            time_stamp: 1_650_000_000,
            from: "0x1".into(),
            to: "0x2".into(),
            currency: "BNB".into(),
            value: "1000".into(),
            token_decimal: 18,
            gas: 21000,
            gas_price: 5_000_000_000,
            gas_used: 21000,
            confirmations: 3,
            direction: Direction::In,
        };

        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["type"], "in");
        assert_eq!(json["timeStamp"], 1_650_000_000u64);
        assert_eq!(json["tokenDecimal"], 18);
    }

    #[test]
    fn token_standard_round_trips_as_upstream_label() {
        let json = serde_json::to_string(&TokenStandard::Erc20).unwrap();
        assert_eq!(json, r#""ERC20""#);
        assert_eq!(TokenStandard::Erc20.to_string(), "ERC20");
    }
}

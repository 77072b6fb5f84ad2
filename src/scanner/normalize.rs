// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Normalization of raw explorer records into [`PaymentTransaction`].
//!
//! Pure functions, one per record kind. A numeric field that does not
//! parse fails the record with `MalformedRecord`; the scanner treats
//! that as terminal for the batch rather than skipping silently.

use crate::chain::client::ChainError;
use crate::chain::currency;
use crate::chain::types::{ChainConfig, Direction, PaymentTransaction};

use super::{Erc20Transaction, NormalTransaction};

/// Normalize a native transfer record.
pub(crate) fn native(
    config: &ChainConfig,
    address: &str,
    raw: &NormalTransaction,
) -> Result<PaymentTransaction, ChainError> {
    Ok(PaymentTransaction {
        block_number: parse_u64("blockNumber", &raw.block_number)?,
        block_hash: raw.block_hash.clone(),
        hash: raw.hash.clone(),
        time_stamp: parse_u64("timeStamp", &raw.time_stamp)?,
        from: raw.from.clone(),
        to: raw.to.clone(),
        currency: config.native_currency.clone(),
        value: raw.value.clone(),
        token_decimal: config.native_decimals,
        gas: parse_u64("gas", &raw.gas)?,
        gas_price: parse_u128("gasPrice", &raw.gas_price)?,
        gas_used: parse_u64("gasUsed", &raw.gas_used)?,
        confirmations: parse_u64("confirmations", &raw.confirmations)?,
        direction: direction(&raw.from, address),
    })
}

/// Normalize a token transfer record.
///
/// A contract registered in the known-currency table wins over whatever
/// symbol the explorer reports; unregistered contracts get a synthesized
/// label so the value stays traceable. Token amounts keep the chain's
/// native decimal count.
pub(crate) fn token(
    config: &ChainConfig,
    address: &str,
    raw: &Erc20Transaction,
) -> Result<PaymentTransaction, ChainError> {
    let currency = match currency::resolve_for_record(config, &raw.contract_address) {
        Some(symbol) => symbol.to_string(),
        None => format!(
            "{} - {} : {}",
            raw.token_symbol, raw.token_name, raw.contract_address
        ),
    };

    Ok(PaymentTransaction {
        block_number: parse_u64("blockNumber", &raw.block_number)?,
        block_hash: raw.block_hash.clone(),
        hash: raw.hash.clone(),
        time_stamp: parse_u64("timeStamp", &raw.time_stamp)?,
        from: raw.from.clone(),
        to: raw.to.clone(),
        currency,
        value: raw.value.clone(),
        token_decimal: config.native_decimals,
        gas: parse_u64("gas", &raw.gas)?,
        gas_price: parse_u128("gasPrice", &raw.gas_price)?,
        gas_used: parse_u64("gasUsed", &raw.gas_used)?,
        confirmations: parse_u64("confirmations", &raw.confirmations)?,
        direction: direction(&raw.from, address),
    })
}

/// Outgoing when the sender is the queried address, incoming otherwise.
/// Addresses compare as lower-case hex.
fn direction(from: &str, queried: &str) -> Direction {
    if from.eq_ignore_ascii_case(queried) {
        Direction::Out
    } else {
        Direction::In
    }
}

fn parse_u64(field: &str, value: &str) -> Result<u64, ChainError> {
    value.parse().map_err(|_| malformed(field, value))
}

fn parse_u128(field: &str, value: &str) -> Result<u128, ChainError> {
    value.parse().map_err(|_| malformed(field, value))
}

fn malformed(field: &str, value: &str) -> ChainError {
    ChainError::MalformedRecord {
        message: format!("field `{field}` is not numeric: `{value}`"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::types::{BackendKind, CurrencyInfo, TokenStandard};
    use serde_json::json;
    use std::collections::HashMap;

    const ADDRESS: &str = "0x46352775fc66f526d8d41040da7308ce94e77149";
    const BUSD_CONTRACT: &str = "0xed24fc36d5ee211ea25a80239fb8c4cfd80f12ee";

    fn config() -> ChainConfig {
        ChainConfig {
            name: "BSC-TESTNET".into(),
            chain_id: 97,
            backend: BackendKind::Evm,
            rpc_url: "http://localhost:8545".into(),
            native_currency: "BNB".into(),
            native_decimals: 18,
            required_confirmations: 10,
            known_currencies: HashMap::from([(
                "BUSD".into(),
                CurrencyInfo {
                    contract_address: BUSD_CONTRACT.into(),
                    standard: TokenStandard::Erc20,
                },
            )]),
            explorer_api_url: None,
            explorer_api_key: None,
        }
    }

    fn native_raw(from: &str) -> NormalTransaction {
        serde_json::from_value(json!({
            "blockNumber": "123",
            "timeStamp": "1650000000",
            "hash": "0xabc",
            "blockHash": "0xdef",
            "from": from,
            "to": ADDRESS,
            "value": "1000000000000000000",
            "gas": "21000",
            "gasPrice": "5000000000",
            "gasUsed": "21000",
            "confirmations": "42"
        }))
        .unwrap()
    }

    fn token_raw(contract: &str) -> Erc20Transaction {
        serde_json::from_value(json!({
            "blockNumber": "124",
            "timeStamp": "1650000100",
            "hash": "0x123",
            "blockHash": "0x456",
            "from": ADDRESS,
            "contractAddress": contract,
            "to": "0x6c19ee30a50fd8f64ddcbb4bdd313a13a23f4f00",
            "value": "5000000",
            "tokenName": "Binance USD",
            "tokenSymbol": "BSC-USD",
            "gas": "60000",
            "gasPrice": "5000000000",
            "gasUsed": "51000",
            "confirmations": "41"
        }))
        .unwrap()
    }

    #[test]
    fn native_record_fields_are_parsed() {
        let cfg = config();
        let tx = native(&cfg, ADDRESS, &native_raw("0x6c19ee30a50fd8f64ddcbb4bdd313a13a23f4f00"))
            .unwrap();

        assert_eq!(tx.block_number, 123);
        assert_eq!(tx.time_stamp, 1_650_000_000);
        assert_eq!(tx.currency, "BNB");
        assert_eq!(tx.token_decimal, 18);
        assert_eq!(tx.gas_price, 5_000_000_000);
        assert_eq!(tx.direction, Direction::In);
    }

    #[test]
    fn direction_compares_addresses_case_insensitively() {
        let cfg = config();
        let tx = native(&cfg, ADDRESS, &native_raw(&ADDRESS.to_uppercase().replace("0X", "0x")))
            .unwrap();
        assert_eq!(tx.direction, Direction::Out);
    }

    #[test]
    fn known_contract_overrides_the_upstream_symbol() {
        let cfg = config();
        let tx = token(&cfg, ADDRESS, &token_raw(BUSD_CONTRACT)).unwrap();
        // Registry symbol, not the explorer's "BSC-USD".
        assert_eq!(tx.currency, "BUSD");
        assert_eq!(tx.direction, Direction::Out);
    }

    #[test]
    fn unknown_contract_synthesizes_a_traceable_label() {
        let cfg = config();
        let stray = "0x000000000000000000000000000000000000beef";
        let tx = token(&cfg, ADDRESS, &token_raw(stray)).unwrap();
        assert_eq!(tx.currency, format!("BSC-USD - Binance USD : {stray}"));
    }

    #[test]
    fn malformed_numerics_are_rejected() {
        let cfg = config();
        let mut raw = native_raw("0x6c19ee30a50fd8f64ddcbb4bdd313a13a23f4f00");
        raw.gas_price = "five".into();

        let err = native(&cfg, ADDRESS, &raw).unwrap_err();
        match err {
            ChainError::MalformedRecord { message } => assert!(message.contains("gasPrice")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

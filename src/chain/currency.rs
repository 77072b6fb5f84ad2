// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Currency resolution against a chain's known-currency table.
//!
//! Two directions: a caller-supplied symbol resolves to the native
//! currency or a token contract (`resolve_for_query`), and a contract
//! address seen in an explorer record resolves back to a registered
//! symbol (`resolve_for_record`).
//!
//! Contract addresses are compared case-insensitively; upstream data is
//! usually lower-case hex but nothing here assumes it.

use super::client::ChainError;
use super::types::{ChainConfig, CurrencyInfo};

/// What a currency symbol resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved<'a> {
    /// The chain's native currency.
    Native,
    /// A token with a registered contract.
    Token(&'a CurrencyInfo),
}

/// Resolve a currency symbol for a balance or transfer request.
///
/// The native symbol wins over a same-named registry entry; anything not
/// native and not registered is an [`ChainError::UnknownCurrency`].
pub fn resolve_for_query<'a>(
    config: &'a ChainConfig,
    currency: &str,
) -> Result<Resolved<'a>, ChainError> {
    if currency == config.native_currency {
        return Ok(Resolved::Native);
    }
    match config.known_currencies.get(currency) {
        Some(info) => Ok(Resolved::Token(info)),
        None => Err(ChainError::UnknownCurrency {
            chain: config.name.clone(),
            currency: currency.to_string(),
        }),
    }
}

/// Resolve a token contract address back to a registered symbol.
///
/// Matches on contract address only, never on the upstream token name or
/// symbol. Returns `None` for contracts the configuration does not know.
pub fn resolve_for_record<'a>(
    config: &'a ChainConfig,
    contract_address: &str,
) -> Option<&'a str> {
    config
        .known_currencies
        .iter()
        .find(|(_, info)| info.contract_address.eq_ignore_ascii_case(contract_address))
        .map(|(symbol, _)| symbol.as_str())
}

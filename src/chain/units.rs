// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Conversions between human-readable decimal amounts and integer base
//! units (wei and token equivalents).

use alloy::primitives::U256;

use super::client::ChainError;

/// Parse a decimal amount string into base units.
///
/// Accepts an optional fractional part; more fractional digits than the
/// currency carries is an error rather than a silent truncation.
pub fn to_base_units(amount: &str, decimals: u8) -> Result<U256, ChainError> {
    let (whole, frac) = match amount.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (amount, ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return Err(invalid_amount(amount, "empty amount"));
    }
    if frac.len() > decimals as usize {
        return Err(invalid_amount(
            amount,
            &format!("more than {decimals} decimal places"),
        ));
    }

    let whole = if whole.is_empty() { "0" } else { whole };
    let whole = U256::from_str_radix(whole, 10)
        .map_err(|_| invalid_amount(amount, "whole part is not a decimal number"))?;

    // Right-pad the fractional digits out to the full decimal count.
    let frac_scaled = if frac.is_empty() {
        U256::ZERO
    } else {
        let digits = U256::from_str_radix(frac, 10)
            .map_err(|_| invalid_amount(amount, "fractional part is not a decimal number"))?;
        digits * pow10(decimals as usize - frac.len())
    };

    whole
        .checked_mul(pow10(decimals as usize))
        .and_then(|scaled| scaled.checked_add(frac_scaled))
        .ok_or_else(|| invalid_amount(amount, "amount overflows"))
}

/// Render a base-unit amount as a decimal string scaled by `decimals`.
///
/// Trailing fractional zeros are trimmed; whole amounts render without a
/// decimal point.
pub fn from_base_units(amount: U256, decimals: u8) -> String {
    if amount.is_zero() {
        return "0".to_string();
    }

    let divisor = pow10(decimals as usize);
    let whole = amount / divisor;
    let remainder = amount % divisor;

    if remainder.is_zero() {
        return whole.to_string();
    }

    let frac = format!("{remainder:0>width$}", width = decimals as usize);
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{frac}")
    }
}

fn pow10(exp: usize) -> U256 {
    U256::from(10u64).pow(U256::from(exp))
}

fn invalid_amount(amount: &str, reason: &str) -> ChainError {
    ChainError::InvalidAmount {
        message: format!("`{amount}`: {reason}"),
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! ERC-20 contract surface used by the EVM backend.
//!
//! Only the two functions the wallet exercises are declared: read-only
//! `balanceOf` and the `transfer` call encoded into outgoing token
//! transactions.

use std::str::FromStr;

use alloy::{
    primitives::{Address, U256},
    providers::Provider,
    sol,
    sol_types::SolCall,
};

use super::client::ChainError;

sol! {
    #[sol(rpc)]
    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
        event Transfer(address indexed from, address indexed to, uint256 value);
    }
}

/// Query the token balance an address holds at a contract.
pub async fn balance_of<P: Provider + Clone>(
    provider: &P,
    contract_address: &str,
    holder: &str,
) -> Result<U256, ChainError> {
    let contract_addr = parse_address(contract_address)?;
    let holder_addr = parse_address(holder)?;

    let contract = IERC20::new(contract_addr, provider.clone());
    contract
        .balanceOf(holder_addr)
        .call()
        .await
        .map_err(|e| ChainError::Rpc {
            message: format!("balanceOf call failed: {e}"),
        })
}

/// ABI-encode a `transfer(to, amount)` call for inclusion as transaction
/// input data.
pub fn encode_transfer(to: Address, amount: U256) -> Vec<u8> {
    IERC20::transferCall { to, amount }.abi_encode()
}

/// Parse a 0x-prefixed hex address, mapping failures to the wallet error
/// taxonomy.
pub fn parse_address(address: &str) -> Result<Address, ChainError> {
    Address::from_str(address).map_err(|e| ChainError::InvalidAddress {
        message: format!("`{address}`: {e}"),
    })
}

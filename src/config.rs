// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration Constants
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `CHAIN` | Registry key of the chain to serve | `BSC` |
//! | `CHAIN_RPC_URL` | Node RPC endpoint override | chain default |
//! | `EXPLORER_API_KEY` | API key for the block explorer | unset |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;

/// Registry key of the chain this instance serves.
pub const CHAIN_ENV: &str = "CHAIN";

/// Override for the chain's node RPC endpoint.
pub const CHAIN_RPC_URL_ENV: &str = "CHAIN_RPC_URL";

/// API key forwarded to the block explorer, when it requires one.
pub const EXPLORER_API_KEY_ENV: &str = "EXPLORER_API_KEY";

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// `json` for structured output, anything else for human-readable.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_CHAIN: &str = "BSC";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

pub fn env_or_default(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

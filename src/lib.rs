// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Multichain Wallet - Chain-Agnostic Wallet Service
//!
//! This crate provides balance queries, account creation, value
//! transfers and a normalized transaction history over a set of
//! configured chains, hiding the differences between native currencies
//! and token standards behind one client contract.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `chain` - Chain registry, currency resolution and the client façade
//! - `scanner` - Explorer-backed transaction history normalization

pub mod api;
pub mod chain;
pub mod config;
pub mod error;
pub mod scanner;
pub mod state;

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::chain::ChainClient;

/// Shared application state: the connected chain client.
///
/// The client is read-only after initialization, so a plain `Arc` is
/// enough — no lock.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<ChainClient>,
}

impl AppState {
    pub fn new(client: ChainClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

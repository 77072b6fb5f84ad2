// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::chain::ChainError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }
}

impl From<ChainError> for ApiError {
    fn from(err: ChainError) -> Self {
        let status = match &err {
            // Caller mistakes.
            ChainError::InvalidKey { .. }
            | ChainError::InvalidAddress { .. }
            | ChainError::InvalidAmount { .. } => StatusCode::BAD_REQUEST,
            ChainError::UnknownCurrency { .. } | ChainError::UnknownChain { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            // Recognized but unimplemented paths.
            ChainError::UnsupportedStandard { .. } | ChainError::NoScannerConfigured { .. } => {
                StatusCode::NOT_IMPLEMENTED
            }
            // Our side of the node connection.
            ChainError::NotInitialized
            | ChainError::ConnectionError { .. }
            | ChainError::Rpc { .. } => StatusCode::SERVICE_UNAVAILABLE,
            // Upstream misbehaved, or left us in an unknown state.
            ChainError::MalformedRecord { .. }
            | ChainError::UpstreamError { .. }
            | ChainError::IndeterminateOutcome { .. } => StatusCode::BAD_GATEWAY,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

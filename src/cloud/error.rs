// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of gcp-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Message used when a failure carries no human-readable text.
pub const GENERIC_ERROR_MESSAGE: &str = "An unknown error occurred";

/// Failure of a single cloud call.
#[derive(Debug, thiserror::Error)]
pub enum CloudError {
    #[error("{service} API returned HTTP {status}: {message}")]
    Api { service: &'static str, status: u16, message: String },
    #[error("{kind} `{name}` not found")]
    NotFound { kind: &'static str, name: String },
    #[error("failed to obtain Google Cloud credentials: {0}")]
    Auth(String),
    #[error("request to {service} failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected {service} response: {message}")]
    Decode { service: &'static str, message: String },
    #[error("{0}")]
    Other(String),
}

impl CloudError {
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound { kind, name: name.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Api { status: 404, .. })
    }

    /// Human-readable message for a tool result, never empty.
    pub fn user_message(&self) -> String {
        let message = match self {
            Self::Other(message) => message.trim().to_owned(),
            Self::Api { message, .. } if message.trim().is_empty() => String::new(),
            other => other.to_string(),
        };
        if message.is_empty() {
            GENERIC_ERROR_MESSAGE.to_owned()
        } else {
            message
        }
    }
}

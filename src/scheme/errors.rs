// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

#[derive(thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("Unsupported scheme: {0}")]
    UnsupportedScheme(String),
    #[error("Signing material mismatch: {0}")]
    SigningMaterial(String),
    #[error("Key error: {0}")]
    Key(String),
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::UnsupportedScheme(e) | Error::SigningMaterial(e) | Error::Key(e) => {
                write!(f, "{}", e)
            }
        }
    }
}

// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

#[derive(thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("Syntax error: {0}")]
    Syntax(String),
    #[error("Shape mismatch: {0}")]
    Shape(String),
    #[error("Missing claim: {0}")]
    MissingClaim(String),
    #[error("Claim type mismatch: {0}")]
    TypeMismatch(String),
    #[error("I/O error: {0}")]
    Io(String),
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Syntax(e)
            | Error::Shape(e)
            | Error::MissingClaim(e)
            | Error::TypeMismatch(e)
            | Error::Io(e) => {
                write!(f, "{}", e)
            }
        }
    }
}

// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

#[derive(thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("did not receive an attestation result (looked for: result, attestation_result, jwt)")]
    MissingResult,
    #[error("Authentication failed: {0}")]
    Authentication(String),
    #[error("Key error: {0}")]
    Key(String),
    #[error("Syntax error: {0}")]
    Syntax(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("expected exactly one submodule, found {0}")]
    Cardinality(usize),
    #[error("result has no submods")]
    MissingSubmods,
    #[error("submodule {0} does not exist in the result")]
    MissingSubmod(String),
    #[error("{submod}: ear.status is \"{actual}\", expected \"{expected}\"")]
    StatusMismatch {
        submod: String,
        expected: String,
        actual: String,
    },
    #[error("{submod}: mismatch for claim \"{claim}\": got {actual}, expected {expected}")]
    TrustVectorMismatch {
        submod: String,
        claim: String,
        expected: String,
        actual: String,
    },
    #[error("{submod}: claim \"{claim}\" is returned but missing from the expected result")]
    IncompleteFixture { submod: String, claim: String },
    #[error("{submod}: {field} differs from the expected value")]
    FieldMismatch { submod: String, field: String },
    #[error("{submod}: {field} is expected but absent")]
    MissingField { submod: String, field: String },
    #[error("{submod}: claim \"{claim}\" has unexpected value {value}")]
    UnexpectedTrustValue {
        submod: String,
        claim: String,
        value: i64,
    },
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

#[derive(thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("Syntax error: {0}")]
    Syntax(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("policy ctime {ctime} is not within {window}s before {now}")]
    Stale {
        ctime: String,
        now: String,
        window: i64,
    },
    #[error("policy active is {actual}, expected {expected}")]
    ActiveMismatch { expected: bool, actual: bool },
    #[error("policy name is \"{actual}\", expected \"{expected}\"")]
    NameMismatch { expected: String, actual: String },
    #[error("policy type is \"{0}\", expected \"opa\"")]
    TypeMismatch(String),
    #[error("policy rules differ from {0}")]
    RulesMismatch(String),
    #[error("{actual} active policies, expected {expected}")]
    ActiveCount { expected: usize, actual: usize },
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

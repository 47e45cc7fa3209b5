// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

#[derive(thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("could not {action}; failed to run {tool}: {msg}")]
    Spawn {
        tool: String,
        action: String,
        msg: String,
    },
    #[error("could not {action}; {tool} returned {status}")]
    Failed {
        tool: String,
        action: String,
        status: String,
    },
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

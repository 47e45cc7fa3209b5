// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use crate::tool;

#[derive(thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("store reset aborted: {0}")]
    Reset(#[from] tool::Error),
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Reset(e) => {
                write!(f, "{}", e)
            }
        }
    }
}

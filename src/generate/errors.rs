// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use crate::{claims, scheme, tool};

#[derive(thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Scheme(#[from] scheme::Error),
    #[error(transparent)]
    Claims(#[from] claims::Error),
    #[error(transparent)]
    Tool(#[from] tool::Error),
    #[error("Missing CoMID: {0}")]
    MissingComid(String),
    #[error("Missing artifact: {0}")]
    MissingArtifact(String),
    #[error("Syntax error: {0}")]
    Syntax(String),
    #[error("I/O error: {0}")]
    Io(String),
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use super::{create_dir, discard};
use crate::claims::ClaimsDocument;
use crate::config::ArtifactLayout;
use crate::scheme::Scheme;
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;

/// Materialises the expected attestation result of a scenario whose nonce
/// was handed out by the service
#[derive(Clone, Debug)]
pub struct ExpectedResults {
    layout: ArtifactLayout,
}

impl ExpectedResults {
    pub fn new(layout: &ArtifactLayout) -> Self {
        Self {
            layout: layout.clone(),
        }
    }

    /// Copy the `{scheme}.{label}` result fixture to
    /// `expected/{scheme}.{label}.server-nonce.json`, echoing `wire_nonce`
    /// (as received, not re-encoded) in the annotated evidence of the
    /// nonce-bearing submodule
    pub fn from_response(
        &self,
        scheme: Scheme,
        label: &str,
        wire_nonce: Option<&str>,
    ) -> Result<PathBuf, Error> {
        let template = self.layout.result_template(scheme, label);
        let mut doc = ClaimsDocument::load(&template)?;

        let fragment = wire_nonce.and_then(|n| scheme.expected_nonce_claims(n));

        if let Some(Value::Object(m)) = fragment {
            doc.merge(&m)?;
        }

        let output = self.layout.expected_output(scheme, label);

        create_dir(&self.layout.expected_dir())?;
        discard(&output)?;
        doc.write(&output)?;

        info!(path = %output.display(), "expected result written");

        Ok(output)
    }
}

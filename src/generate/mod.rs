// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

//! Test-vector generation.
//!
//! [`ArtifactGenerator`] turns claims templates into signed evidence tokens
//! and endorsement templates into (optionally signed) CoRIM bundles, by
//! driving the external builders through an [`IToolRunner`].  It also
//! materialises the expected attestation results of nonce-bound scenarios.
//!
//! Every output lands under the configured generated-artifacts tree; nothing
//! here touches the service's own stores.

pub use self::endorsements::EndorsementArtifact;
pub use self::errors::Error;
pub use self::evidence::{corrupt_signature, EvidenceArtifact, EvidenceOptions};
pub use self::expected::ExpectedResults;

mod endorsements;
mod errors;
mod evidence;
mod expected;

use crate::config::{ArtifactLayout, Config, Signer, Tools};
use crate::tool::IToolRunner;
use std::fs;
use std::io;
use std::path::Path;
use tracing::warn;

/// Scheme-dispatching builder of evidence, endorsements and expected results
pub struct ArtifactGenerator<R: IToolRunner> {
    tools: Tools,
    signer: Signer,
    layout: ArtifactLayout,
    runner: R,
}

impl<R: IToolRunner> ArtifactGenerator<R> {
    pub fn new(config: &Config, runner: R) -> Self {
        Self {
            tools: config.tools.clone(),
            signer: config.signer(),
            layout: config.layout(),
            runner,
        }
    }

    pub fn layout(&self) -> &ArtifactLayout {
        &self.layout
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }
}

fn create_dir(dir: &Path) -> Result<(), Error> {
    fs::create_dir_all(dir).map_err(|e| Error::Io(format!("{}: {e}", dir.display())))
}

/// Remove a file if it is there
fn discard(path: &Path) -> Result<(), Error> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => {
            warn!(path = %path.display(), "could not remove: {e}");
            Err(Error::Io(format!("{}: {e}", path.display())))
        }
    }
}

// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

//! Run configuration: where templates live, where generated artifacts go,
//! which external programs to call and how CoRIMs get signed.

pub use self::errors::Error;
pub use self::layout::ArtifactLayout;

mod errors;
mod layout;

use jsonwebtoken::Algorithm;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Program names (or paths) of the external collaborators
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Tools {
    /// CoMID/CoRIM builder and signer
    pub cocli: String,
    /// PSA/CCA evidence builder
    pub evcli: String,
    /// EnactTrust token generator
    #[serde(rename = "gen-enacttrust-token")]
    pub enacttrust: String,
    /// Endorsement store administration
    #[serde(rename = "corim-store")]
    pub corim_store: String,
    /// Used to wipe the policy key-value store
    pub sqlite3: String,
}

impl Default for Tools {
    fn default() -> Self {
        Self {
            cocli: "cocli".to_string(),
            evcli: "evcli".to_string(),
            enacttrust: "gen-enacttrust-token".to_string(),
            corim_store: "corim-store".to_string(),
            sqlite3: "sqlite3".to_string(),
        }
    }
}

/// Identity and key material used when signing CoRIMs.  Relative key and
/// certificate paths are taken from the data directory.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Signer {
    pub name: String,
    pub uri: String,
    pub id: String,
    /// End-entity signing key (JWK)
    pub key: PathBuf,
    /// End-entity certificate (DER)
    pub cert: PathBuf,
    /// Intermediate CA certificate (DER)
    pub intermediates: PathBuf,
}

impl Default for Signer {
    fn default() -> Self {
        let certs = Path::new("keys/certs");

        Self {
            name: "Veraison Test Signer".to_string(),
            uri: "https://veraison.example/test-signer".to_string(),
            id: "Veraison Test Signer".to_string(),
            key: certs.join("endEntity.jwk"),
            cert: certs.join("endEntity.der"),
            intermediates: certs.join("intermediateCA.der"),
        }
    }
}

impl Signer {
    fn rooted_at(&self, dir: &Path) -> Self {
        Self {
            key: dir.join(&self.key),
            cert: dir.join(&self.cert),
            intermediates: dir.join(&self.intermediates),
            ..self.clone()
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the generated artifacts tree
    #[serde(rename = "generated-dir")]
    pub generated_dir: PathBuf,
    /// Root of the claims, keys, endorsements and results templates
    #[serde(rename = "data-dir")]
    pub data_dir: PathBuf,
    pub tools: Tools,
    /// SQLite database backing the policy store
    #[serde(rename = "policy-store")]
    pub policy_store: PathBuf,
    pub signer: Signer,
    /// Signature algorithm of attestation results
    #[serde(rename = "result-alg")]
    pub result_alg: Algorithm,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generated_dir: PathBuf::from("__generated__"),
            data_dir: PathBuf::from("data"),
            tools: Tools::default(),
            policy_store: PathBuf::from("/opt/veraison/stores/vts/po-store.sql"),
            signer: Signer::default(),
            result_alg: Algorithm::ES256,
        }
    }
}

impl Config {
    /// Parse a configuration from JSON; omitted fields keep their defaults
    pub fn load_json(j: &str) -> Result<Self, Error> {
        serde_json::from_str(j).map_err(|e| Error::Syntax(e.to_string()))
    }

    pub fn load_file(path: &Path) -> Result<Self, Error> {
        let j = fs::read_to_string(path).map_err(|e| Error::Io(format!("{}: {e}", path.display())))?;

        Self::load_json(&j)
    }

    /// The artifact layout rooted at this configuration's directories
    pub fn layout(&self) -> ArtifactLayout {
        ArtifactLayout::new(&self.data_dir, &self.generated_dir)
    }

    /// The CoRIM signer with its key material resolved against `data_dir`
    pub fn signer(&self) -> Signer {
        self.signer.rooted_at(&self.data_dir)
    }
}

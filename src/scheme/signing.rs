// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use super::Scheme;
use jsonwebtoken::jwk::{AlgorithmParameters, Jwk};
use openssl::pkey::PKey;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const JWK_EXT: &str = "jwk";
const PEM_EXT: &str = "pem";

/// Names of the key(s) signing a piece of evidence, as they appear in test
/// variables: either a single key name or an `[iak, rak]` pair
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum KeyRef {
    Single(String),
    Pair(String, String),
}

impl KeyRef {
    /// Parse the command line form: `iak` or `iak,rak`
    pub fn parse(s: &str) -> Self {
        match s.split_once(',') {
            Some((iak, rak)) => KeyRef::Pair(iak.trim().to_string(), rak.trim().to_string()),
            None => KeyRef::Single(s.trim().to_string()),
        }
    }
}

/// Key material used to sign evidence.  It is only ever read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SigningMaterial {
    /// A JWK-encoded attester identity key (PSA)
    Jwk(PathBuf),
    /// A JWK-encoded platform attestation key plus a realm attestation key (CCA)
    JwkPair { iak: PathBuf, rak: PathBuf },
    /// A PEM-encoded attestation key (EnactTrust)
    Pem(PathBuf),
}

impl SigningMaterial {
    /// Resolve key names against the key directory, according to the key
    /// roles and formats `scheme` expects
    pub fn resolve(scheme: Scheme, key_dir: &Path, keys: &KeyRef) -> Result<Self, Error> {
        let path = |name: &str, ext: &str| key_dir.join(format!("{name}.{ext}"));

        match (scheme, keys) {
            (Scheme::Psa, KeyRef::Single(iak)) => Ok(SigningMaterial::Jwk(path(iak, JWK_EXT))),
            (Scheme::Cca, KeyRef::Pair(iak, rak)) => Ok(SigningMaterial::JwkPair {
                iak: path(iak, JWK_EXT),
                rak: path(rak, JWK_EXT),
            }),
            (Scheme::EnactTrust, KeyRef::Single(key)) => {
                Ok(SigningMaterial::Pem(path(key, PEM_EXT)))
            }
            (s, k) => Err(Error::SigningMaterial(format!(
                "scheme {s} cannot be signed with {k:?}"
            ))),
        }
    }

    /// Check that every key file exists and parses in the expected format
    pub fn validate(&self) -> Result<(), Error> {
        match self {
            SigningMaterial::Jwk(p) => load_ec_jwk(p).map(|_| ()),
            SigningMaterial::JwkPair { iak, rak } => {
                load_ec_jwk(iak)?;
                load_ec_jwk(rak)?;
                Ok(())
            }
            SigningMaterial::Pem(p) => {
                let pem = fs::read(p).map_err(|e| Error::Key(format!("{}: {e}", p.display())))?;

                PKey::private_key_from_pem(&pem)
                    .map_err(|e| Error::Key(format!("{}: {e}", p.display())))?;

                Ok(())
            }
        }
    }
}

fn load_ec_jwk(p: &Path) -> Result<Jwk, Error> {
    let j = fs::read_to_string(p).map_err(|e| Error::Key(format!("{}: {e}", p.display())))?;

    let jwk: Jwk =
        serde_json::from_str(&j).map_err(|e| Error::Key(format!("{}: {e}", p.display())))?;

    match jwk.algorithm {
        AlgorithmParameters::EllipticCurve(_) => Ok(jwk),
        a => Err(Error::Key(format!(
            "{}: expecting an EC key, got {a:?}",
            p.display()
        ))),
    }
}

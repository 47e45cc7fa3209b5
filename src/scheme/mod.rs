// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

//! Attestation schemes known to the test-vector pipeline.
//!
//! A [`Scheme`] decides the shape of the claims template, where the
//! challenge nonce is injected, which key material signs the evidence and
//! which sub-appraisal of the returned EAR echoes the nonce back.  Adding a
//! scheme means adding a variant here; every dispatch site matches on the
//! enum exhaustively.

pub use self::errors::Error;
pub use self::signing::{KeyRef, SigningMaterial};

mod errors;
mod signing;

use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

const PSA_NONCE: &str = "psa-nonce";
const CCA_REALM_DELEGATED_TOKEN: &str = "cca-realm-delegated-token";
const CCA_REALM_CHALLENGE: &str = "cca-realm-challenge";

const PSA_SUBMOD: &str = "PSA_IOT";
const CCA_REALM_SUBMOD: &str = "CCA_REALM";

/// Identity of an attestation method
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// Arm Platform Security Architecture, single IAK
    Psa,
    /// Arm Confidential Compute Architecture, platform IAK + realm RAK
    Cca,
    /// EnactTrust TPM-based attestation, PEM key
    EnactTrust,
}

impl Scheme {
    /// All supported schemes
    pub const ALL: [Scheme; 3] = [Scheme::Psa, Scheme::Cca, Scheme::EnactTrust];

    /// The tag used in template and artifact file names
    pub fn name(&self) -> &'static str {
        match self {
            Scheme::Psa => "psa",
            Scheme::Cca => "cca",
            Scheme::EnactTrust => "enacttrust",
        }
    }

    /// The claims fragment carrying `nonce` (already in claim encoding), or
    /// `None` if the scheme has no nonce placement
    pub fn nonce_claims(&self, nonce: &str) -> Option<Value> {
        match self {
            Scheme::Psa => Some(json!({ PSA_NONCE: nonce })),
            Scheme::Cca => Some(json!({
                CCA_REALM_DELEGATED_TOKEN: { CCA_REALM_CHALLENGE: nonce }
            })),
            Scheme::EnactTrust => None,
        }
    }

    /// The top-level envelope key the nonce lives under, for schemes that
    /// nest the challenge inside a sub-object.  When the template lacks it,
    /// the whole envelope may be introduced.
    pub fn nonce_envelope(&self) -> Option<&'static str> {
        match self {
            Scheme::Cca => Some(CCA_REALM_DELEGATED_TOKEN),
            Scheme::Psa | Scheme::EnactTrust => None,
        }
    }

    /// The expected-result fragment echoing the wire nonce in the annotated
    /// evidence of the nonce-bearing submodule
    pub fn expected_nonce_claims(&self, wire_nonce: &str) -> Option<Value> {
        let (submod, key) = match self {
            Scheme::Psa => (PSA_SUBMOD, PSA_NONCE),
            Scheme::Cca => (CCA_REALM_SUBMOD, CCA_REALM_CHALLENGE),
            Scheme::EnactTrust => return None,
        };

        Some(json!({
            submod: { "ear.veraison.annotated-evidence": { key: wire_nonce } }
        }))
    }

    /// Whether the scheme's evidence is a CBOR envelope
    pub fn is_cbor(&self) -> bool {
        matches!(self, Scheme::Psa | Scheme::Cca)
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scheme::ALL
            .into_iter()
            .find(|scheme| scheme.name() == s)
            .ok_or_else(|| Error::UnsupportedScheme(s.to_string()))
    }
}

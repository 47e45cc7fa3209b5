// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use ::ear::TrustTier;
use serde_json::{Map, Value};

pub const SUBMODS: &str = "submods";
pub const STATUS: &str = "ear.status";
pub const TRUST_VECTOR: &str = "ear.trustworthiness-vector";
pub const ANNOTATED_EVIDENCE: &str = "ear.veraison.annotated-evidence";
pub const POLICY_CLAIMS: &str = "ear.veraison.policy-claims";
pub const POLICY_ID: &str = "ear.appraisal-policy-id";

const PROFILE: &str = "eat_profile";

/// A decoded attestation result claim-set
#[derive(Clone, Debug, PartialEq)]
pub struct Ear {
    claims: Map<String, Value>,
}

impl Ear {
    pub fn from_value(v: Value) -> Result<Self, Error> {
        match v {
            Value::Object(claims) => Ok(Self { claims }),
            _ => Err(Error::Syntax("EAR claims MUST be a JSON object".to_string())),
        }
    }

    pub fn claims(&self) -> &Map<String, Value> {
        &self.claims
    }

    pub fn profile(&self) -> Option<&str> {
        self.claims.get(PROFILE).and_then(Value::as_str)
    }

    /// The per-component appraisals, keyed by submodule name
    pub fn submods(&self) -> Result<&Map<String, Value>, Error> {
        match self.claims.get(SUBMODS) {
            Some(Value::Object(m)) => Ok(m),
            Some(_) => Err(Error::Syntax(format!("{SUBMODS} MUST be a JSON object"))),
            None => Err(Error::MissingSubmods),
        }
    }

    pub fn submod(&self, name: &str) -> Result<Appraisal<'_>, Error> {
        let v = self
            .submods()?
            .get(name)
            .ok_or_else(|| Error::MissingSubmod(name.to_string()))?;

        Appraisal::from_value(name, v)
    }

    /// The one appraisal this result carries, with the name of its
    /// submodule.  A flat claim-set (no `submods`) is a single appraisal
    /// with an empty name.
    pub fn single_appraisal(&self) -> Result<(&str, Appraisal<'_>), Error> {
        if !self.claims.contains_key(SUBMODS) {
            return Ok(("", Appraisal::new(&self.claims)));
        }

        let submods = self.submods()?;

        let mut it = submods.iter();
        match (it.next(), it.next()) {
            (Some((name, v)), None) => Ok((name.as_str(), Appraisal::from_value(name, v)?)),
            _ => Err(Error::Cardinality(submods.len())),
        }
    }
}

/// Read-only view of one appraisal within an [`Ear`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Appraisal<'a> {
    claims: &'a Map<String, Value>,
}

impl<'a> Appraisal<'a> {
    pub fn new(claims: &'a Map<String, Value>) -> Self {
        Self { claims }
    }

    pub(crate) fn from_value(submod: &str, v: &'a Value) -> Result<Self, Error> {
        v.as_object()
            .map(Self::new)
            .ok_or_else(|| Error::Syntax(format!("submodule {submod} MUST be a JSON object")))
    }

    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.claims.get(name)
    }

    pub fn status(&self) -> Option<&'a str> {
        self.get(STATUS).and_then(Value::as_str)
    }

    pub fn tier(&self) -> Result<TrustTier, Error> {
        let v = self
            .get(STATUS)
            .ok_or_else(|| Error::Syntax(format!("{STATUS} missing")))?;

        serde_json::from_value(v.clone()).map_err(|e| Error::Syntax(format!("{STATUS}: {e}")))
    }

    pub fn trust_vector(&self) -> Option<&'a Map<String, Value>> {
        self.get(TRUST_VECTOR).and_then(Value::as_object)
    }

    pub fn annotated_evidence(&self) -> Option<&'a Value> {
        self.get(ANNOTATED_EVIDENCE)
    }

    pub fn policy_claims(&self) -> Option<&'a Value> {
        self.get(POLICY_CLAIMS)
    }

    pub fn policy_id(&self) -> Option<&'a str> {
        self.get(POLICY_ID).and_then(Value::as_str)
    }
}

// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

const SW_COMPONENTS: &str = "psa-software-components";
const MEASUREMENT_VALUE: &str = "measurement-value";

/// A claims-set as read from a template: claim names mapped to (possibly
/// nested) JSON values
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClaimsDocument {
    claims: Map<String, Value>,
}

impl ClaimsDocument {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn from_json(j: &str) -> Result<Self, Error> {
        match serde_json::from_str(j).map_err(|e| Error::Syntax(e.to_string()))? {
            Value::Object(claims) => Ok(Self { claims }),
            _ => Err(Error::TypeMismatch(
                "claims template MUST be a JSON object".to_string(),
            )),
        }
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let j =
            fs::read_to_string(path).map_err(|e| Error::Io(format!("{}: {e}", path.display())))?;

        Self::from_json(&j).map_err(|e| match e {
            Error::Syntax(m) => Error::Syntax(format!("{}: {m}", path.display())),
            other => other,
        })
    }

    pub fn write(&self, path: &Path) -> Result<(), Error> {
        let j = serde_json::to_string(&self.claims).map_err(|e| Error::Syntax(e.to_string()))?;

        fs::write(path, j).map_err(|e| Error::Io(format!("{}: {e}", path.display())))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.claims.contains_key(name)
    }

    pub fn claims(&self) -> &Map<String, Value> {
        &self.claims
    }

    /// Insert a claim, replacing whatever was there
    pub fn insert(&mut self, name: &str, value: Value) {
        self.claims.insert(name.to_string(), value);
    }

    /// Merge `other` into the document.  Only keys already present (and not
    /// null) are overwritten; objects are merged key by key.  An object
    /// meeting a non-object at the same position is a shape error.
    pub fn merge(&mut self, other: &Map<String, Value>) -> Result<(), Error> {
        merge_map(&mut self.claims, other)
    }

    /// Alter the first character of the measurement of the `index`-th PSA
    /// software component so that it no longer matches any reference value
    pub fn tamper_measurement(&mut self, index: usize) -> Result<(), Error> {
        let swc = self
            .claims
            .get_mut(SW_COMPONENTS)
            .ok_or_else(|| Error::MissingClaim(SW_COMPONENTS.to_string()))?
            .as_array_mut()
            .ok_or_else(|| Error::TypeMismatch(format!("{SW_COMPONENTS} MUST be an array")))?
            .get_mut(index)
            .ok_or_else(|| Error::MissingClaim(format!("{SW_COMPONENTS}[{index}]")))?;

        let mval = swc
            .get_mut(MEASUREMENT_VALUE)
            .ok_or_else(|| Error::MissingClaim(format!("{SW_COMPONENTS}[{index}].{MEASUREMENT_VALUE}")))?;

        let tampered = match mval.as_str() {
            Some(s) if !s.is_empty() => {
                let mut chars = s.chars();
                let first = chars.next().unwrap_or('H');
                let replacement = if first == 'H' { 'A' } else { 'H' };

                format!("{replacement}{}", chars.as_str())
            }
            _ => {
                return Err(Error::TypeMismatch(format!(
                    "{MEASUREMENT_VALUE} MUST be a non-empty string"
                )))
            }
        };

        *mval = Value::String(tampered);

        Ok(())
    }
}

fn merge_map(base: &mut Map<String, Value>, other: &Map<String, Value>) -> Result<(), Error> {
    for (k, ov) in other.iter() {
        let bv = match base.get_mut(k) {
            None | Some(Value::Null) => continue, // nothing to update
            Some(bv) => bv,
        };

        match (bv, ov) {
            (Value::Object(bm), Value::Object(om)) => merge_map(bm, om)?,
            (bv, ov) if bv.is_object() || ov.is_object() => {
                return Err(Error::Shape(format!(
                    "value mismatch for \"{k}\": only one is an object ({bv}, {ov})"
                )))
            }
            (bv, ov) => *bv = ov.clone(),
        }
    }

    Ok(())
}

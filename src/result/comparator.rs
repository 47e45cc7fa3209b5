// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::ear::{
    Appraisal, Ear, ANNOTATED_EVIDENCE, POLICY_CLAIMS, POLICY_ID, STATUS, TRUST_VECTOR,
};
use super::errors::Error;
use ::ear::claim;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Trust claim values that go with an "affirming" status
pub const AFFIRMING_CLAIMS: [i8; 3] = [
    claim::NO_CLAIM,
    claim::TRUSTWORTHY_INSTANCE, // == APPROVED_CONFIG
    claim::APPROVED_BOOT,
];

/// Appraisal fields compared only when the expected result has them
const OPTIONAL_FIELDS: [&str; 2] = [ANNOTATED_EVIDENCE, POLICY_CLAIMS];

/// Load an expected result: submodule names mapped to expected appraisals
pub fn load_expected(path: &Path) -> Result<Map<String, Value>, Error> {
    let j = fs::read_to_string(path).map_err(|e| Error::Io(format!("{}: {e}", path.display())))?;

    match serde_json::from_str(&j).map_err(|e| Error::Syntax(format!("{}: {e}", path.display())))? {
        Value::Object(m) => Ok(m),
        _ => Err(Error::Syntax(format!(
            "{}: expected result MUST be a JSON object",
            path.display()
        ))),
    }
}

/// Check the submodules of `ear` against an expected result
pub fn compare_ear(ear: &Ear, expected: &Map<String, Value>) -> Result<(), Error> {
    compare(ear.submods()?, expected)
}

/// Check `actual` submodules against `expected`.  Every expected submodule
/// must be present; submodules only in `actual` are ignored.
pub fn compare(actual: &Map<String, Value>, expected: &Map<String, Value>) -> Result<(), Error> {
    for (name, ev) in expected {
        let av = actual
            .get(name)
            .ok_or_else(|| Error::MissingSubmod(name.clone()))?;

        debug!(submod = %name, "evaluating");

        compare_appraisal(
            name,
            Appraisal::from_value(name, av)?,
            Appraisal::from_value(name, ev)?,
        )?;
    }

    Ok(())
}

/// Check one appraisal against its expected counterpart
pub fn compare_appraisal(
    submod: &str,
    actual: Appraisal<'_>,
    expected: Appraisal<'_>,
) -> Result<(), Error> {
    let es = expected
        .get(STATUS)
        .ok_or_else(|| Error::Syntax(format!("{submod}: expected result lacks {STATUS}")))?;
    let status = actual.get(STATUS).ok_or_else(|| missing(submod, STATUS))?;

    if status != es {
        return Err(Error::StatusMismatch {
            submod: submod.to_string(),
            expected: text(es),
            actual: text(status),
        });
    }

    if let Some(ev) = expected.get(POLICY_ID) {
        check_field(submod, POLICY_ID, actual.get(POLICY_ID), ev)?;
    }

    compare_trust_vectors(submod, actual, expected)?;

    for field in OPTIONAL_FIELDS {
        if let Some(ev) = expected.get(field) {
            check_field(submod, field, actual.get(field), ev)?;
        }
    }

    Ok(())
}

/// Walk the dimensions the verifier returned; each must be specified by the
/// expected result with the same value.  Dimensions only in the expected
/// vector are not checked.
fn compare_trust_vectors(
    submod: &str,
    actual: Appraisal<'_>,
    expected: Appraisal<'_>,
) -> Result<(), Error> {
    let atv = actual
        .trust_vector()
        .ok_or_else(|| missing(submod, TRUST_VECTOR))?;
    let etv = expected.trust_vector();

    for (claim, av) in atv {
        let ev = etv
            .and_then(|m| m.get(claim))
            .ok_or_else(|| Error::IncompleteFixture {
                submod: submod.to_string(),
                claim: claim.clone(),
            })?;

        if ev != av {
            return Err(Error::TrustVectorMismatch {
                submod: submod.to_string(),
                claim: claim.clone(),
                expected: ev.to_string(),
                actual: av.to_string(),
            });
        }
    }

    Ok(())
}

/// Check that every trust claim of `appraisal` is one of `allowed`
pub fn check_trust_values(
    submod: &str,
    appraisal: Appraisal<'_>,
    allowed: &[i8],
) -> Result<(), Error> {
    let tv = appraisal
        .trust_vector()
        .ok_or_else(|| missing(submod, TRUST_VECTOR))?;

    for (claim, v) in tv {
        let value = v.as_i64().ok_or_else(|| {
            Error::Syntax(format!("{submod}: trust claim {claim} MUST be an integer"))
        })?;

        if !allowed.iter().any(|a| i64::from(*a) == value) {
            return Err(Error::UnexpectedTrustValue {
                submod: submod.to_string(),
                claim: claim.clone(),
                value,
            });
        }
    }

    Ok(())
}

fn check_field(submod: &str, field: &str, actual: Option<&Value>, expected: &Value) -> Result<(), Error> {
    match actual {
        None => Err(missing(submod, field)),
        Some(a) if a != expected => Err(Error::FieldMismatch {
            submod: submod.to_string(),
            field: field.to_string(),
        }),
        Some(_) => Ok(()),
    }
}

fn missing(submod: &str, field: &str) -> Error {
    Error::MissingField {
        submod: submod.to_string(),
        field: field.to_string(),
    }
}

fn text(v: &Value) -> String {
    v.as_str().map_or_else(|| v.to_string(), str::to_string)
}

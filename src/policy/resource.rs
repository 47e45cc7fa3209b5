// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// A policy resource as returned by the management API
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Policy {
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(deserialize_with = "de_ctime")]
    pub ctime: DateTime<Utc>,
    pub active: bool,
    pub name: String,
    #[serde(rename = "type")]
    pub policy_type: String,
    pub rules: String,
}

impl Policy {
    pub fn from_json(j: &str) -> Result<Self, Error> {
        serde_json::from_str(j).map_err(|e| Error::Syntax(e.to_string()))
    }

    /// Parse a JSON array of policies
    pub fn list_from_json(j: &str) -> Result<Vec<Self>, Error> {
        serde_json::from_str(j).map_err(|e| Error::Syntax(e.to_string()))
    }
}

/// Parse an ISO-8601 timestamp.  Timestamps without an offset are taken to
/// be UTC.
pub fn parse_ctime(s: &str) -> Result<DateTime<Utc>, Error> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| Error::Syntax(format!("ctime {s}: {e}")))
}

fn de_ctime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;

    parse_ctime(&s).map_err(serde::de::Error::custom)
}

// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::base64;
use super::ear::Ear;
use super::errors::Error;
use crate::config::ArtifactLayout;
use crate::scheme::Scheme;
use jsonwebtoken::{self as jwt, errors::ErrorKind, jwk::Jwk, Algorithm, DecodingKey, Validation};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Where successive service versions have put the result token, in order of
/// preference
const RESULT_FIELDS: [&str; 3] = ["result", "attestation_result", "jwt"];
const BODY_FIELD: &str = "body";
const NONCE_FIELD: &str = "nonce";

const JWK_PRIVATE_PARAM: &str = "d";

/// The part of a challenge-response session reply this crate cares about
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionResponse {
    /// Compact-serialised result token
    pub token: String,
    /// The session nonce, as sent on the wire
    pub nonce: Option<String>,
}

impl SessionResponse {
    /// Normalise any of the known response shapes: an object carrying the
    /// token in one of the result fields, an object whose `body` is the
    /// token, or the bare token itself
    pub fn from_value(v: &Value) -> Result<Self, Error> {
        match v {
            Value::String(s) if is_compact_token(s) => Ok(Self {
                token: s.clone(),
                nonce: None,
            }),
            Value::Object(m) => {
                let found = RESULT_FIELDS
                    .iter()
                    .find_map(|f| m.get(*f).filter(|v| !v.is_null()).map(|v| (f, v)));

                let token = match found {
                    Some((_, Value::String(s))) => s.clone(),
                    Some((f, _)) => return Err(Error::Syntax(format!("{f} MUST be a string"))),
                    None => m
                        .get(BODY_FIELD)
                        .and_then(Value::as_str)
                        .filter(|s| is_compact_token(s))
                        .map(str::to_string)
                        .ok_or(Error::MissingResult)?,
                };

                Ok(Self {
                    token,
                    nonce: m.get(NONCE_FIELD).and_then(Value::as_str).map(str::to_string),
                })
            }
            _ => Err(Error::MissingResult),
        }
    }

    /// Normalise a raw HTTP response body
    pub fn from_body(body: &str) -> Result<Self, Error> {
        match serde_json::from_str::<Value>(body) {
            Ok(v) => Self::from_value(&v),
            Err(_) if is_compact_token(body.trim()) => Ok(Self {
                token: body.trim().to_string(),
                nonce: None,
            }),
            Err(e) => Err(Error::Syntax(e.to_string())),
        }
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let body =
            fs::read_to_string(path).map_err(|e| Error::Io(format!("{}: {e}", path.display())))?;

        Self::from_body(&body)
    }
}

fn is_compact_token(s: &str) -> bool {
    s.matches('.').count() == 2
}

/// Public key that attestation results are checked against
#[derive(Clone)]
pub struct VerificationKey {
    alg: Algorithm,
    key: DecodingKey,
}

impl VerificationKey {
    /// Build from a JWK.  Private parameters, if any, are dropped.
    pub fn from_jwk(j: &str, alg: Algorithm) -> Result<Self, Error> {
        let mut v: Value = serde_json::from_str(j).map_err(|e| Error::Key(e.to_string()))?;

        if let Some(m) = v.as_object_mut() {
            m.remove(JWK_PRIVATE_PARAM);
        }

        let jwk: Jwk = serde_json::from_value(v).map_err(|e| Error::Key(e.to_string()))?;
        let key = DecodingKey::from_jwk(&jwk).map_err(|e| Error::Key(e.to_string()))?;

        Ok(Self { alg, key })
    }

    pub fn load(path: &Path, alg: Algorithm) -> Result<Self, Error> {
        let j = fs::read_to_string(path).map_err(|e| Error::Io(format!("{}: {e}", path.display())))?;

        Self::from_jwk(&j, alg)
    }

    pub fn alg(&self) -> Algorithm {
        self.alg
    }
}

/// Extracts attestation results from session responses
#[derive(Clone, Debug)]
pub struct ResultDecoder {
    layout: ArtifactLayout,
}

impl ResultDecoder {
    pub fn new(layout: &ArtifactLayout) -> Self {
        Self {
            layout: layout.clone(),
        }
    }

    /// Authenticate the result token and decode its claims
    pub fn decode(&self, response: &SessionResponse, key: &VerificationKey) -> Result<Ear, Error> {
        let mut validation = Validation::new(key.alg);
        // an EAR carries no "exp"
        validation.set_required_spec_claims::<&str>(&[]);

        let data = jwt::decode::<Value>(&response.token, &key.key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidToken
                | ErrorKind::Base64(_)
                | ErrorKind::Json(_)
                | ErrorKind::Utf8(_) => Error::Syntax(e.to_string()),
                _ => Error::Authentication(e.to_string()),
            }
        })?;

        debug!(alg = ?key.alg, "result signature verified");

        Ear::from_value(data.claims)
    }

    /// Decode the result token's claims without checking its signature
    pub fn decode_raw(&self, response: &SessionResponse) -> Result<Ear, Error> {
        let parts: Vec<&str> = response.token.split('.').collect();

        let payload = match parts.as_slice() {
            [_, payload, _] => base64::decode_str(payload)?,
            _ => return Err(Error::Syntax("not a compact JWS".to_string())),
        };

        let claims = serde_json::from_slice(&payload).map_err(|e| Error::Syntax(e.to_string()))?;

        Ear::from_value(claims)
    }

    /// Keep a copy of the result of scenario `{scheme}.{label}`: the token
    /// as received and its (unauthenticated) claims, pretty-printed
    pub fn save(
        &self,
        response: &SessionResponse,
        scheme: Scheme,
        label: &str,
    ) -> Result<(PathBuf, PathBuf), Error> {
        let dir = self.layout.results_dir();
        fs::create_dir_all(&dir).map_err(|e| Error::Io(format!("{}: {e}", dir.display())))?;

        let (jwt_out, json_out) = self.layout.result_outputs(scheme, label);

        fs::write(&jwt_out, &response.token)
            .map_err(|e| Error::Io(format!("{}: {e}", jwt_out.display())))?;

        let ear = self.decode_raw(response)?;
        let j = serde_json::to_string_pretty(ear.claims()).map_err(|e| Error::Syntax(e.to_string()))?;

        fs::write(&json_out, j).map_err(|e| Error::Io(format!("{}: {e}", json_out.display())))?;

        info!(path = %json_out.display(), "result saved");

        Ok((jwt_out, json_out))
    }
}

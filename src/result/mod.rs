// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

//! Attestation result handling.
//!
//! A session response is first normalised into a [`SessionResponse`], whose
//! EAR token [`ResultDecoder`] either authenticates against a
//! [`VerificationKey`] or decodes as-is for inspection.  The resulting
//! [`Ear`] is then checked against an expected fixture with [`compare`].
//!
//! # Example
//!
//! ```no_run
//! use veraison_integ::config::Config;
//! use veraison_integ::result::{compare_ear, load_expected, ResultDecoder, SessionResponse, VerificationKey};
//! use std::path::Path;
//!
//! let config = Config::default();
//! let decoder = ResultDecoder::new(&config.layout());
//!
//! let response = SessionResponse::load(Path::new("response.json")).unwrap();
//! let key = VerificationKey::load(Path::new("data/keys/verifier.jwk"), config.result_alg).unwrap();
//!
//! let ear = decoder.decode(&response, &key).unwrap();
//! let expected = load_expected(Path::new("__generated__/expected/psa.good.server-nonce.json")).unwrap();
//!
//! compare_ear(&ear, &expected).unwrap();
//! ```

pub use self::comparator::{
    check_trust_values, compare, compare_appraisal, compare_ear, load_expected, AFFIRMING_CLAIMS,
};
pub use self::decoder::{ResultDecoder, SessionResponse, VerificationKey};
pub use self::ear::{Appraisal, Ear};
pub use self::errors::Error;

mod base64;
mod comparator;
mod decoder;
mod ear;
mod errors;

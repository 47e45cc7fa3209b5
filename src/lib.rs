// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

//! Test-vector generation and attestation result verification for Veraison
//! integration tests.
//!
//! The crate covers the two halves of an end-to-end attestation scenario
//! that are not the service itself:
//! * Building the inputs: claims templates bound to a session nonce, signed
//!   PSA, CCA and EnactTrust evidence, and (optionally signed) CoRIM
//!   endorsements.  Encoding and signing are left to the usual external
//!   tools (`evcli`, `cocli`, `gen-enacttrust-token`).
//! * Checking the outputs: authenticating the Entity Attestation Result
//!   ([EAR]) the verifier returns and comparing its per-submodule appraisals
//!   with an expected result, and checking policy resources.
//!
//! All generated files go to a per-run tree described by
//! [`config::ArtifactLayout`].
//!
//! [EAR]: https://datatracker.ietf.org/doc/draft-fv-rats-ear/

pub mod claims;
pub mod config;
pub mod generate;
pub mod policy;
pub mod result;
pub mod scheme;
pub mod store;
pub mod tool;

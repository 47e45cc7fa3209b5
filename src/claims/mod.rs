// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

//! Claims templates and nonce binding.
//!
//! The service hands out nonces in base64url; claims templates carry them in
//! standard base64.  [`ClaimsPreparer`] loads a scheme template, translates
//! the nonce with [`decode_wire_nonce`] and merges it where the scheme keeps
//! its challenge.

pub use self::document::ClaimsDocument;
pub use self::errors::Error;
pub use self::nonce::decode_wire_nonce;
pub use self::preparer::{inject_nonce, ClaimsPreparer};

mod document;
mod errors;
mod nonce;
mod preparer;

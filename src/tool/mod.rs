// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

//! The boundary to external command line tools.
//!
//! CBOR encoding, CoRIM assembly and evidence signing all happen in external
//! binaries (`cocli`, `evcli`, `gen-enacttrust-token`, ...).  Everything that
//! shells out goes through [`IToolRunner`], so a non-zero exit always
//! surfaces as an [`Error`] naming the tool and the logical action.

pub use self::errors::Error;
pub use self::runner::{IToolRunner, Invocation, ProcessToolRunner};

mod errors;
mod runner;

#[cfg(test)]
pub(crate) mod mock;

// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

//! Wiping of the service's persistent stores between scenarios.

pub use self::errors::Error;
pub use self::resetter::StoreResetter;

mod errors;
mod resetter;

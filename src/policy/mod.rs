// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

//! Checks on policy resources returned by the service's management API.

pub use self::checker::{
    check_policy, check_policy_at, check_policy_list, check_policy_list_at, POLICY_TYPE,
};
pub use self::errors::Error;
pub use self::resource::{parse_ctime, Policy};

mod checker;
mod errors;
mod resource;

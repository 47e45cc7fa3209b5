// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use crate::config::Config;
use crate::tool::{IToolRunner, Invocation};
use std::path::PathBuf;
use tracing::info;

const CLEAR_KVSTORE: &str = "delete from kvstore";

/// Clears the endorsement store and the policy store so that no scenario
/// sees state left behind by another
pub struct StoreResetter<R: IToolRunner> {
    corim_store: String,
    sqlite3: String,
    policy_store: PathBuf,
    runner: R,
}

impl<R: IToolRunner> StoreResetter<R> {
    pub fn new(config: &Config, runner: R) -> Self {
        Self {
            corim_store: config.tools.corim_store.clone(),
            sqlite3: config.tools.sqlite3.clone(),
            policy_store: config.policy_store.clone(),
            runner,
        }
    }

    /// Clear both stores.  A failure of either is fatal; the policy store is
    /// not touched if the endorsement store could not be cleared.
    pub fn reset(&self) -> Result<(), Error> {
        let corim = Invocation::new(&self.corim_store).arg("db").arg("clear");
        self.runner.run(&corim, "clear CoRIM store")?;

        let policy = Invocation::new(&self.sqlite3)
            .arg(self.policy_store.display().to_string())
            .arg(CLEAR_KVSTORE);
        self.runner.run(&policy, "clear policy store")?;

        info!("stores cleared");

        Ok(())
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }
}

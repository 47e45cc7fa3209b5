// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use std::fmt;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info, warn};

/// A command line for one of the external builders, signers or cleaners
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
}

impl Invocation {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, a: impl Into<String>) -> Self {
        self.args.push(a.into());
        self
    }

    /// Append a `--name=value` flag
    pub fn flag(self, name: &str, value: impl fmt::Display) -> Self {
        self.arg(format!("--{name}={value}"))
    }

    /// Append a `--name=<path>` flag
    pub fn path_flag(self, name: &str, value: &Path) -> Self {
        self.flag(name, value.display())
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Value of the first `--name=value` flag, if any
    pub fn flag_value(&self, name: &str) -> Option<&str> {
        let prefix = format!("--{name}=");

        self.args.iter().find_map(|a| a.strip_prefix(prefix.as_str()))
    }

    /// Values of every `--name=value` flag, in order
    pub fn flag_values(&self, name: &str) -> Vec<&str> {
        let prefix = format!("--{name}=");

        self.args
            .iter()
            .filter_map(|a| a.strip_prefix(prefix.as_str()))
            .collect()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;

        for a in &self.args {
            write!(f, " {a}")?;
        }

        Ok(())
    }
}

/// Interface to whatever runs external tools on behalf of the pipeline
pub trait IToolRunner {
    /// Run `invocation` to completion.  `action` names the logical step and
    /// is used to report failures.
    fn run(&self, invocation: &Invocation, action: &str) -> Result<(), Error>;
}

/// Runs tools as blocking child processes.  There is no timeout: a hung tool
/// stalls the caller until the surrounding harness kills it.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessToolRunner;

impl ProcessToolRunner {
    pub fn new() -> Self {
        Self
    }
}

impl IToolRunner for ProcessToolRunner {
    fn run(&self, invocation: &Invocation, action: &str) -> Result<(), Error> {
        info!(command = %invocation, "{action}");

        let output = Command::new(invocation.program())
            .args(invocation.args())
            .output()
            .map_err(|e| Error::Spawn {
                tool: invocation.program().to_string(),
                action: action.to_string(),
                msg: e.to_string(),
            })?;

        debug!(stdout = %String::from_utf8_lossy(&output.stdout));
        debug!(stderr = %String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            let status = match output.status.code() {
                Some(c) => c.to_string(),
                None => "no exit status".to_string(),
            };

            warn!(tool = invocation.program(), %status, "could not {action}");

            return Err(Error::Failed {
                tool: invocation.program().to_string(),
                action: action.to_string(),
                status,
            });
        }

        Ok(())
    }
}

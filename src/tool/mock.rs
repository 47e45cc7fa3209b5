// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use super::runner::{IToolRunner, Invocation};
use ciborium::Value;
use std::cell::RefCell;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Records invocations and fakes the outputs of cocli, evcli and
/// gen-enacttrust-token so that generation can be exercised without them
#[derive(Default)]
pub struct MockToolRunner {
    calls: RefCell<Vec<(Invocation, String)>>,
    fail_action: Option<String>,
    fail_late: bool,
    skip_outputs: HashSet<String>,
}

impl MockToolRunner {
    pub fn new() -> Self {
        Default::default()
    }

    /// Make the invocation for `action` exit non-zero
    pub fn failing(action: &str) -> Self {
        Self {
            fail_action: Some(action.to_string()),
            ..Default::default()
        }
    }

    /// Like `failing`, but only after the outputs have been written
    pub fn failing_after_output(action: &str) -> Self {
        Self {
            fail_action: Some(action.to_string()),
            fail_late: true,
            ..Default::default()
        }
    }

    /// Succeed on CoMID generation but do not produce the output for the
    /// template with the given file stem
    pub fn skipping(stem: &str) -> Self {
        Self {
            skip_outputs: HashSet::from([stem.to_string()]),
            ..Default::default()
        }
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.calls.borrow().iter().map(|(i, _)| i.clone()).collect()
    }

    pub fn actions(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(_, a)| a.clone()).collect()
    }

    fn fake_outputs(&self, i: &Invocation) -> Result<(), String> {
        let sub: Vec<&str> = i.args().iter().take(2).map(String::as_str).collect();

        match (i.program(), sub.as_slice()) {
            ("cocli", ["comid", "create"]) => {
                let dir = PathBuf::from(i.flag_value("output-dir").ok_or("no --output-dir")?);

                for t in i.flag_values("template") {
                    let name = stem(Path::new(t));
                    if self.skip_outputs.contains(&name) {
                        continue;
                    }
                    write(&dir.join(format!("{name}.cbor")), b"comid")?;
                }
            }
            ("cocli", ["corim", "create"]) => {
                for c in i.flag_values("comid") {
                    if !Path::new(c).exists() {
                        return Err(format!("{c} not found"));
                    }
                }
                write(Path::new(i.flag_value("output").ok_or("no --output")?), b"corim")?;
            }
            ("cocli", ["corim", "sign"]) => {
                let src = i.flag_value("file").ok_or("no --file")?;
                let mut signed = fs::read(src).map_err(|e| e.to_string())?;
                signed.extend_from_slice(b"+signed");
                write(Path::new(i.flag_value("output").ok_or("no --output")?), &signed)?;
            }
            ("evcli", [scheme, "create"]) => {
                let token = i.flag_value("token").ok_or("no --token")?;
                write(Path::new(token), &fake_token(scheme))?;
            }
            ("gen-enacttrust-token", _) => {
                let out = i
                    .args()
                    .iter()
                    .skip_while(|a| a.as_str() != "-out")
                    .nth(1)
                    .ok_or("no -out")?;
                write(Path::new(out), b"enacttrust-token")?;
            }
            _ => {}
        }

        Ok(())
    }
}

impl IToolRunner for MockToolRunner {
    fn run(&self, invocation: &Invocation, action: &str) -> Result<(), Error> {
        self.calls
            .borrow_mut()
            .push((invocation.clone(), action.to_string()));

        let failed = |status: &str| Error::Failed {
            tool: invocation.program().to_string(),
            action: action.to_string(),
            status: status.to_string(),
        };

        let fail = self.fail_action.as_deref() == Some(action);

        if fail && !self.fail_late {
            return Err(failed("1"));
        }

        self.fake_outputs(invocation).map_err(|_| failed("1"))?;

        if fail {
            return Err(failed("1"));
        }

        Ok(())
    }
}

fn stem(p: &Path) -> String {
    p.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn write(p: &Path, content: &[u8]) -> Result<(), String> {
    fs::write(p, content).map_err(|e| format!("{}: {e}", p.display()))
}

/// A tagged COSE_Sign1 whose signature is `[0xaa; 8]`
pub fn fake_sign1() -> Value {
    Value::Tag(
        18,
        Box::new(Value::Array(vec![
            Value::Bytes(vec![0xa1, 0x01, 0x26]),
            Value::Map(vec![]),
            Value::Bytes(b"claims".to_vec()),
            Value::Bytes(vec![0xaa; 8]),
        ])),
    )
}

fn fake_token(scheme: &str) -> Vec<u8> {
    let mut buf = Vec::new();

    let token = if scheme == "cca" {
        let mut platform = Vec::new();
        let mut realm = Vec::new();
        let _ = ciborium::ser::into_writer(&fake_sign1(), &mut platform);
        let _ = ciborium::ser::into_writer(&fake_sign1(), &mut realm);

        Value::Tag(
            399,
            Box::new(Value::Map(vec![
                (Value::Integer(44234.into()), Value::Bytes(platform)),
                (Value::Integer(44241.into()), Value::Bytes(realm)),
            ])),
        )
    } else {
        fake_sign1()
    };

    let _ = ciborium::ser::into_writer(&token, &mut buf);

    buf
}

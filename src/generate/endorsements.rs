// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use super::{create_dir, discard, ArtifactGenerator};
use crate::scheme::Scheme;
use crate::tool::{IToolRunner, Invocation};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const CBOR_EXT: &str = "cbor";

/// An endorsement bundle (CoRIM) on disk
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndorsementArtifact {
    pub path: PathBuf,
    pub signed: bool,
}

#[derive(Serialize)]
struct SignerMeta<'a> {
    signer: SignerEntity<'a>,
}

#[derive(Serialize)]
struct SignerEntity<'a> {
    name: &'a str,
    uri: &'a str,
    id: &'a str,
}

impl<R: IToolRunner> ArtifactGenerator<R> {
    /// Build every CoMID template, assemble them into a CoRIM using
    /// `corim_template` and, if `sign` is set, sign the result.  Only the
    /// final bundle is left at `output`; on any failure nothing is.
    pub fn generate_endorsements(
        &self,
        corim_template: &Path,
        comid_templates: &[PathBuf],
        output: &Path,
        sign: bool,
    ) -> Result<EndorsementArtifact, Error> {
        let staging = match output.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => self.layout.endorsements_dir(),
        };
        create_dir(&staging)?;
        discard(output)?;

        let comids = self.generate_comids(comid_templates, &staging)?;

        let unsigned = if sign {
            output.with_extension(format!("unsigned.{CBOR_EXT}"))
        } else {
            output.to_path_buf()
        };

        let mut corim = Invocation::new(&self.tools.cocli)
            .arg("corim")
            .arg("create")
            .path_flag("template", corim_template);
        for c in &comids {
            corim = corim.path_flag("comid", c);
        }
        corim = corim.path_flag("output", &unsigned);

        if let Err(e) = self.runner.run(&corim, "generate CoRIM") {
            discard(&unsigned)?;
            return Err(e.into());
        }

        if !unsigned.exists() {
            return Err(Error::MissingArtifact(unsigned.display().to_string()));
        }

        if sign {
            self.sign_corim(&unsigned, output)?;
        }

        info!(path = %output.display(), signed = sign, "endorsements generated");

        Ok(EndorsementArtifact {
            path: output.to_path_buf(),
            signed: sign,
        })
    }

    /// Generate `corim-{scheme}-{tag}.cbor` from `parts`: the CoRIM template
    /// name followed by the names of its CoMID templates
    pub fn scheme_endorsements(
        &self,
        scheme: Scheme,
        tag: &str,
        parts: &[String],
        sign: bool,
    ) -> Result<EndorsementArtifact, Error> {
        let (corim, comids) = parts
            .split_first()
            .ok_or_else(|| Error::Syntax(format!("no CoRIM template given for {tag}")))?;

        let corim_template = self.layout.corim_template(scheme, corim);
        let comid_templates: Vec<PathBuf> = comids
            .iter()
            .map(|c| self.layout.comid_template(scheme, c))
            .collect();

        self.generate_endorsements(
            &corim_template,
            &comid_templates,
            &self.layout.endorsements_output(scheme, tag),
            sign,
        )
    }

    /// Generate the platform (reference values + trust anchors) and realm
    /// (reference values) CoRIMs of an end-to-end CCA scenario
    pub fn cca_end_to_end_endorsements(
        &self,
        name: &str,
        sign: bool,
    ) -> Result<Vec<EndorsementArtifact>, Error> {
        let tiers: [(&str, &[&str]); 2] = [("platform", &["refval", "ta"]), ("realm", &["refval"])];

        let mut artifacts = Vec::with_capacity(tiers.len());

        for (tier, comids) in tiers {
            let tag = format!("{tier}-{name}");
            let parts: Vec<String> = std::iter::once(tag.clone())
                .chain(comids.iter().map(|c| c.to_string()))
                .collect();

            artifacts.push(self.scheme_endorsements(Scheme::Cca, &tag, &parts, sign)?);
        }

        Ok(artifacts)
    }

    fn generate_comids(&self, templates: &[PathBuf], staging: &Path) -> Result<Vec<PathBuf>, Error> {
        if templates.is_empty() {
            return Ok(Vec::new());
        }

        let outputs = comid_outputs(templates, staging);

        for o in &outputs {
            discard(o)?;
        }

        let mut i = Invocation::new(&self.tools.cocli)
            .arg("comid")
            .arg("create")
            .path_flag("output-dir", staging);
        for t in templates {
            i = i.path_flag("template", t);
        }

        self.runner.run(&i, "generate CoMID(s)")?;

        for o in &outputs {
            if !o.exists() {
                return Err(Error::MissingComid(o.display().to_string()));
            }
        }

        debug!(count = outputs.len(), "CoMIDs generated");

        Ok(outputs)
    }

    fn sign_corim(&self, unsigned: &Path, output: &Path) -> Result<(), Error> {
        let meta = output.with_extension("meta.json");
        let signed = output.with_extension(format!("signed.{CBOR_EXT}"));

        let m = SignerMeta {
            signer: SignerEntity {
                name: &self.signer.name,
                uri: &self.signer.uri,
                id: &self.signer.id,
            },
        };
        let j = serde_json::to_string_pretty(&m).map_err(|e| Error::Syntax(e.to_string()))?;
        fs::write(&meta, j).map_err(|e| Error::Io(format!("{}: {e}", meta.display())))?;

        let i = Invocation::new(&self.tools.cocli)
            .arg("corim")
            .arg("sign")
            .path_flag("file", unsigned)
            .path_flag("key", &self.signer.key)
            .path_flag("cert", &self.signer.cert)
            .path_flag("intermediates", &self.signer.intermediates)
            .path_flag("meta", &meta)
            .path_flag("output", &signed);

        let r = self.runner.run(&i, "sign CoRIM");

        if let Err(e) = r {
            for p in [meta.as_path(), unsigned, signed.as_path()] {
                let _ = discard(p);
            }
            return Err(e.into());
        }

        discard(&meta)?;
        discard(unsigned)?;

        if !signed.exists() {
            return Err(Error::MissingArtifact(signed.display().to_string()));
        }

        fs::rename(&signed, output).map_err(|e| Error::Io(format!("{}: {e}", output.display())))
    }
}

/// Where the CoMID builder puts the output for each template: the
/// template's base name with a `.cbor` extension, inside `staging`
fn comid_outputs(templates: &[PathBuf], staging: &Path) -> Vec<PathBuf> {
    templates
        .iter()
        .filter_map(|t| t.file_stem())
        .map(|stem| staging.join(stem).with_extension(CBOR_EXT))
        .collect()
}

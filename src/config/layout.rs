// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use crate::scheme::Scheme;
use std::path::{Path, PathBuf};

const SERVER_NONCE_SUFFIX: &str = "server-nonce";

/// Input templates and generated outputs of a test run.
///
/// Scenarios running side by side stay out of each other's way as long as
/// they use distinct `(scheme, label, server-nonce)` triples; nothing here
/// takes a lock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactLayout {
    data: PathBuf,
    generated: PathBuf,
}

impl ArtifactLayout {
    pub fn new(data: &Path, generated: &Path) -> Self {
        Self {
            data: data.to_path_buf(),
            generated: generated.to_path_buf(),
        }
    }

    /// `{scheme}.{label}`, with a `.server-nonce` suffix for artifacts bound
    /// to a nonce handed out by the service
    pub fn artifact_name(scheme: Scheme, label: &str, server_nonce: bool) -> String {
        if server_nonce {
            format!("{scheme}.{label}.{SERVER_NONCE_SUFFIX}")
        } else {
            format!("{scheme}.{label}")
        }
    }

    pub fn generated_dir(&self) -> &Path {
        &self.generated
    }

    pub fn endorsements_dir(&self) -> PathBuf {
        self.generated.join("endorsements")
    }

    pub fn claims_dir(&self) -> PathBuf {
        self.generated.join("claims")
    }

    pub fn evidence_dir(&self) -> PathBuf {
        self.generated.join("evidence")
    }

    pub fn expected_dir(&self) -> PathBuf {
        self.generated.join("expected")
    }

    pub fn results_dir(&self) -> PathBuf {
        self.generated.join("results")
    }

    pub fn key_dir(&self) -> PathBuf {
        self.data.join("keys")
    }

    pub fn claims_template(&self, scheme: Scheme, label: &str) -> PathBuf {
        self.data
            .join("claims")
            .join(format!("{scheme}.{label}.json"))
    }

    pub fn corim_template(&self, scheme: Scheme, name: &str) -> PathBuf {
        self.data
            .join("endorsements")
            .join(format!("corim-{scheme}-{name}.json"))
    }

    pub fn comid_template(&self, scheme: Scheme, name: &str) -> PathBuf {
        self.data
            .join("endorsements")
            .join(format!("comid-{scheme}-{name}.json"))
    }

    pub fn result_template(&self, scheme: Scheme, label: &str) -> PathBuf {
        self.data
            .join("results")
            .join(format!("{scheme}.{label}.json"))
    }

    pub fn claims_output(&self, name: &str) -> PathBuf {
        self.claims_dir().join(format!("{name}.json"))
    }

    pub fn evidence_output(&self, name: &str) -> PathBuf {
        self.evidence_dir().join(format!("{name}.cbor"))
    }

    pub fn endorsements_output(&self, scheme: Scheme, tag: &str) -> PathBuf {
        self.endorsements_dir()
            .join(format!("corim-{scheme}-{tag}.cbor"))
    }

    pub fn expected_output(&self, scheme: Scheme, label: &str) -> PathBuf {
        self.expected_dir().join(format!(
            "{}.json",
            Self::artifact_name(scheme, label, true)
        ))
    }

    pub fn result_outputs(&self, scheme: Scheme, label: &str) -> (PathBuf, PathBuf) {
        let dir = self.results_dir();

        (
            dir.join(format!("{scheme}.{label}.jwt")),
            dir.join(format!("{scheme}.{label}.json")),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_names() {
        assert_eq!(
            ArtifactLayout::artifact_name(Scheme::Psa, "good", false),
            "psa.good"
        );
        assert_eq!(
            ArtifactLayout::artifact_name(Scheme::Cca, "good", true),
            "cca.good.server-nonce"
        );
    }

    #[test]
    fn paths() {
        let l = ArtifactLayout::new(Path::new("data"), Path::new("__generated__"));

        assert_eq!(
            l.claims_template(Scheme::Psa, "good"),
            PathBuf::from("data/claims/psa.good.json")
        );
        assert_eq!(
            l.corim_template(Scheme::Cca, "full"),
            PathBuf::from("data/endorsements/corim-cca-full.json")
        );
        assert_eq!(
            l.comid_template(Scheme::Cca, "refval"),
            PathBuf::from("data/endorsements/comid-cca-refval.json")
        );
        assert_eq!(
            l.evidence_output("enacttrust.badnode"),
            PathBuf::from("__generated__/evidence/enacttrust.badnode.cbor")
        );
        assert_eq!(
            l.endorsements_output(Scheme::Psa, "full"),
            PathBuf::from("__generated__/endorsements/corim-psa-full.cbor")
        );
        assert_eq!(
            l.expected_output(Scheme::Psa, "good"),
            PathBuf::from("__generated__/expected/psa.good.server-nonce.json")
        );
        assert_eq!(
            l.result_outputs(Scheme::Psa, "good").0,
            PathBuf::from("__generated__/results/psa.good.jwt")
        );
    }
}

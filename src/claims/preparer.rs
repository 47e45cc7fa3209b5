// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::document::ClaimsDocument;
use super::errors::Error;
use super::nonce::decode_wire_nonce;
use crate::config::ArtifactLayout;
use crate::scheme::Scheme;
use serde_json::Value;
use tracing::debug;

/// Materialises scheme claims templates, binding them to a challenge nonce
/// where the scheme has somewhere to put one
#[derive(Clone, Debug)]
pub struct ClaimsPreparer {
    layout: ArtifactLayout,
}

impl ClaimsPreparer {
    pub fn new(layout: &ArtifactLayout) -> Self {
        Self {
            layout: layout.clone(),
        }
    }

    /// Load the `{scheme}.{label}` template and inject `raw_nonce` (in wire
    /// encoding) if one is supplied.  Without a nonce the template is
    /// returned as-is, which is how nonce-freshness failures get exercised.
    pub fn prepare(
        &self,
        scheme: Scheme,
        label: &str,
        raw_nonce: Option<&str>,
    ) -> Result<ClaimsDocument, Error> {
        let template = self.layout.claims_template(scheme, label);
        let mut doc = ClaimsDocument::load(&template)?;

        if let Some(wire) = raw_nonce {
            inject_nonce(&mut doc, scheme, wire)?;
        }

        Ok(doc)
    }
}

/// Inject a wire-encoded nonce into `doc` following the placement rule of
/// `scheme`
pub fn inject_nonce(doc: &mut ClaimsDocument, scheme: Scheme, wire: &str) -> Result<(), Error> {
    let nonce = decode_wire_nonce(wire);

    let fragment = match scheme.nonce_claims(&nonce) {
        Some(Value::Object(m)) => m,
        Some(_) | None => {
            debug!(%scheme, "no nonce placement, leaving claims untouched");
            return Ok(());
        }
    };

    if let Some(envelope) = scheme.nonce_envelope() {
        if !doc.contains(envelope) {
            if let Some(v) = fragment.get(envelope) {
                debug!(%scheme, envelope, "introducing nonce envelope");
                doc.insert(envelope, v.clone());
                return Ok(());
            }
        }
    }

    doc.merge(&fragment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const TEST_WIRE_NONCE: &str = "n-_nonce";

    fn layout_with(templates: &[(&str, &str)]) -> (TempDir, ArtifactLayout) {
        let tmp = TempDir::new().unwrap();
        let data = tmp.path().join("data");
        fs::create_dir_all(data.join("claims")).unwrap();

        for (name, content) in templates {
            fs::write(data.join("claims").join(name), content).unwrap();
        }

        let layout = ArtifactLayout::new(&data, &tmp.path().join("gen"));
        (tmp, layout)
    }

    #[test]
    fn psa_nonce_injected() {
        let (_tmp, layout) =
            layout_with(&[("psa.good.json", r#"{"psa-nonce": "old", "psa-client-id": 1}"#)]);

        let d = ClaimsPreparer::new(&layout)
            .prepare(Scheme::Psa, "good", Some(TEST_WIRE_NONCE))
            .unwrap();

        assert_eq!(d.get("psa-nonce").unwrap(), "n+/nonce");
        assert_eq!(d.get("psa-client-id").unwrap(), 1);
    }

    #[test]
    fn psa_template_without_nonce_claim() {
        let (_tmp, layout) = layout_with(&[("psa.nononce.json", r#"{"psa-client-id": 1}"#)]);

        let d = ClaimsPreparer::new(&layout)
            .prepare(Scheme::Psa, "nononce", Some(TEST_WIRE_NONCE))
            .unwrap();

        assert!(!d.contains("psa-nonce"));
    }

    #[test]
    fn cca_existing_envelope_merged() {
        let (_tmp, layout) = layout_with(&[(
            "cca.good.json",
            r#"{
                "cca-platform-token": {"cca-platform-challenge": "c"},
                "cca-realm-delegated-token": {"cca-realm-challenge": "old", "cca-realm-initial-measurement": "rim"}
            }"#,
        )]);

        let d = ClaimsPreparer::new(&layout)
            .prepare(Scheme::Cca, "good", Some(TEST_WIRE_NONCE))
            .unwrap();

        assert_eq!(
            d.get("cca-realm-delegated-token").unwrap(),
            &json!({"cca-realm-challenge": "n+/nonce", "cca-realm-initial-measurement": "rim"})
        );
        assert_eq!(
            d.get("cca-platform-token").unwrap(),
            &json!({"cca-platform-challenge": "c"})
        );
    }

    #[test]
    fn cca_missing_envelope_introduced() {
        let (_tmp, layout) = layout_with(&[(
            "cca.bare.json",
            r#"{"cca-platform-token": {"cca-platform-challenge": "c"}}"#,
        )]);

        let d = ClaimsPreparer::new(&layout)
            .prepare(Scheme::Cca, "bare", Some(TEST_WIRE_NONCE))
            .unwrap();

        assert_eq!(
            d.get("cca-realm-delegated-token").unwrap(),
            &json!({"cca-realm-challenge": "n+/nonce"})
        );
    }

    #[test]
    fn cca_envelope_shape_mismatch() {
        let (_tmp, layout) =
            layout_with(&[("cca.bad.json", r#"{"cca-realm-delegated-token": "oops"}"#)]);

        let r = ClaimsPreparer::new(&layout).prepare(Scheme::Cca, "bad", Some(TEST_WIRE_NONCE));

        assert!(matches!(r, Err(Error::Shape(_))));
    }

    #[test]
    fn no_nonce_returns_template() {
        let t = r#"{"psa-nonce": "old"}"#;
        let (_tmp, layout) = layout_with(&[("psa.good.json", t)]);

        let d = ClaimsPreparer::new(&layout)
            .prepare(Scheme::Psa, "good", None)
            .unwrap();

        assert_eq!(d, ClaimsDocument::from_json(t).unwrap());
    }

    #[test]
    fn enacttrust_untouched() {
        let t = r#"{"node-id": "7df7714e-aa04-4638-bcbf-434b1dd720f1"}"#;
        let (_tmp, layout) = layout_with(&[("enacttrust.good.json", t)]);

        let d = ClaimsPreparer::new(&layout)
            .prepare(Scheme::EnactTrust, "good", Some(TEST_WIRE_NONCE))
            .unwrap();

        assert_eq!(d, ClaimsDocument::from_json(t).unwrap());
    }

    #[test]
    fn missing_template() {
        let layout = ArtifactLayout::new(Path::new("/nonexistent"), Path::new("/nonexistent"));

        let r = ClaimsPreparer::new(&layout).prepare(Scheme::Psa, "good", None);

        assert!(matches!(r, Err(Error::Io(_))));
    }
}

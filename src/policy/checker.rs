// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use super::resource::Policy;
use chrono::{DateTime, Duration, Utc};
use std::fs;
use std::path::Path;
use tracing::debug;

/// The only policy engine the service is deployed with
pub const POLICY_TYPE: &str = "opa";

const FRESHNESS_WINDOW_SECS: i64 = 60;

/// Check a freshly created or activated policy.  `active`, `name` and
/// `rules_file` are only checked when given.
pub fn check_policy(
    policy: &Policy,
    active: Option<bool>,
    name: Option<&str>,
    rules_file: Option<&Path>,
) -> Result<(), Error> {
    check_policy_at(policy, active, name, rules_file, Utc::now())
}

/// [`check_policy`] with an explicit notion of "now"
pub fn check_policy_at(
    policy: &Policy,
    active: Option<bool>,
    name: Option<&str>,
    rules_file: Option<&Path>,
    now: DateTime<Utc>,
) -> Result<(), Error> {
    check_fresh(policy.ctime, now)?;

    if let Some(expected) = active {
        if policy.active != expected {
            return Err(Error::ActiveMismatch {
                expected,
                actual: policy.active,
            });
        }
    }

    if let Some(expected) = name.filter(|n| !n.is_empty()) {
        if policy.name != expected {
            return Err(Error::NameMismatch {
                expected: expected.to_string(),
                actual: policy.name.clone(),
            });
        }
    }

    if policy.policy_type != POLICY_TYPE {
        return Err(Error::TypeMismatch(policy.policy_type.clone()));
    }

    if let Some(path) = rules_file {
        let rules = fs::read_to_string(path)
            .map_err(|e| Error::Io(format!("{}: {e}", path.display())))?;

        if policy.rules != rules {
            return Err(Error::RulesMismatch(path.display().to_string()));
        }
    }

    debug!(name = %policy.name, "policy checks out");

    Ok(())
}

/// Check that all `policies` are fresh and that exactly one (`have_active`)
/// or none of them is active
pub fn check_policy_list(policies: &[Policy], have_active: bool) -> Result<(), Error> {
    check_policy_list_at(policies, have_active, Utc::now())
}

pub fn check_policy_list_at(
    policies: &[Policy],
    have_active: bool,
    now: DateTime<Utc>,
) -> Result<(), Error> {
    for p in policies {
        check_fresh(p.ctime, now)?;
    }

    let actual = policies.iter().filter(|p| p.active).count();
    let expected = usize::from(have_active);

    if actual != expected {
        return Err(Error::ActiveCount { expected, actual });
    }

    Ok(())
}

/// `now - window < ctime < now`
fn check_fresh(ctime: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), Error> {
    let window = Duration::seconds(FRESHNESS_WINDOW_SECS);

    if ctime < now && ctime > now - window {
        Ok(())
    } else {
        Err(Error::Stale {
            ctime: ctime.to_rfc3339(),
            now: now.to_rfc3339(),
            window: FRESHNESS_WINDOW_SECS,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    const RULES: &str = "package policy\n\nexecutables = APPROVED_RT {\n\tinput.x == 1\n}\n";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
    }

    fn policy(age_secs: i64, active: bool) -> Policy {
        Policy {
            uuid: None,
            ctime: now() - Duration::seconds(age_secs),
            active,
            name: "psa-policy".to_string(),
            policy_type: POLICY_TYPE.to_string(),
            rules: RULES.to_string(),
        }
    }

    #[test]
    fn fresh_policy() {
        let tmp = TempDir::new().unwrap();
        let rules = tmp.path().join("psa.rego");
        fs::write(&rules, RULES).unwrap();

        check_policy_at(
            &policy(5, true),
            Some(true),
            Some("psa-policy"),
            Some(rules.as_path()),
            now(),
        )
        .unwrap();

        // nothing but freshness and type
        check_policy_at(&policy(59, false), None, None, None, now()).unwrap();
        check_policy_at(&policy(5, false), None, Some(""), None, now()).unwrap();
    }

    #[test]
    fn stale_policy() {
        let e = check_policy_at(&policy(61, true), Some(true), None, None, now()).unwrap_err();

        assert!(matches!(e, Error::Stale { window: 60, .. }));
    }

    #[test]
    fn window_is_strict() {
        assert!(matches!(
            check_policy_at(&policy(60, true), None, None, None, now()),
            Err(Error::Stale { .. })
        ));
        assert!(matches!(
            check_policy_at(&policy(0, true), None, None, None, now()),
            Err(Error::Stale { .. })
        ));
        assert!(matches!(
            check_policy_at(&policy(-5, true), None, None, None, now()),
            Err(Error::Stale { .. })
        ));
    }

    #[test]
    fn mismatches() {
        assert_eq!(
            check_policy_at(&policy(5, false), Some(true), None, None, now()).unwrap_err(),
            Error::ActiveMismatch {
                expected: true,
                actual: false
            }
        );

        assert_eq!(
            check_policy_at(&policy(5, true), None, Some("cca-policy"), None, now()).unwrap_err(),
            Error::NameMismatch {
                expected: "cca-policy".to_string(),
                actual: "psa-policy".to_string(),
            }
        );

        let mut p = policy(5, true);
        p.policy_type = "cedar".to_string();
        assert_eq!(
            check_policy_at(&p, None, None, None, now()).unwrap_err(),
            Error::TypeMismatch("cedar".to_string())
        );

        let tmp = TempDir::new().unwrap();
        let rules = tmp.path().join("other.rego");
        fs::write(&rules, "package other\n").unwrap();
        assert!(matches!(
            check_policy_at(&policy(5, true), None, None, Some(rules.as_path()), now()),
            Err(Error::RulesMismatch(_))
        ));

        assert!(matches!(
            check_policy_at(
                &policy(5, true),
                None,
                None,
                Some(tmp.path().join("missing.rego").as_path()),
                now()
            ),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn one_active() {
        let list = [policy(3, false), policy(2, true), policy(1, false)];

        check_policy_list_at(&list, true, now()).unwrap();
        assert_eq!(
            check_policy_list_at(&list, false, now()).unwrap_err(),
            Error::ActiveCount {
                expected: 0,
                actual: 1
            }
        );
    }

    #[test]
    fn none_active() {
        let list = [policy(3, false), policy(2, false)];

        check_policy_list_at(&list, false, now()).unwrap();
        assert!(matches!(
            check_policy_list_at(&list, true, now()),
            Err(Error::ActiveCount { .. })
        ));

        check_policy_list_at(&[], false, now()).unwrap();
    }

    #[test]
    fn two_active() {
        let list = [policy(3, true), policy(2, true)];

        assert_eq!(
            check_policy_list_at(&list, true, now()).unwrap_err(),
            Error::ActiveCount {
                expected: 1,
                actual: 2
            }
        );
    }

    #[test]
    fn stale_entry_in_list() {
        let list = [policy(3, true), policy(120, false)];

        assert!(matches!(
            check_policy_list_at(&list, true, now()),
            Err(Error::Stale { .. })
        ));
    }
}

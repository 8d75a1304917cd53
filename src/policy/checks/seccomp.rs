//! Seccomp profile checks.

use crate::config::Level;
use crate::policy::extract::{
    all_containers, containers_phrase, is_windows, join_quote, pod_security_context,
};
use crate::policy::{Check, Verdict};
use k8s_openapi::api::core::v1::{PodSpec, SeccompProfile};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeSet;

const UNCONFINED: &str = "Unconfined";

fn profile_type(profile: Option<&SeccompProfile>) -> Option<&str> {
    profile.map(|p| p.type_.as_str())
}

fn is_confined(type_: &str) -> bool {
    type_ == "RuntimeDefault" || type_ == "Localhost"
}

/// Pods and containers must not explicitly disable seccomp.
pub struct BaselineSeccompCheck;

impl Check for BaselineSeccompCheck {
    fn id(&self) -> &'static str {
        "seccompProfile_baseline"
    }

    fn level(&self) -> Level {
        Level::Baseline
    }

    fn evaluate(&self, _metadata: &ObjectMeta, spec: &PodSpec) -> Verdict {
        let pod_unconfined = profile_type(
            pod_security_context(spec).and_then(|sc| sc.seccomp_profile.as_ref()),
        ) == Some(UNCONFINED);

        let names: Vec<&str> = all_containers(spec)
            .into_iter()
            .filter(|c| {
                profile_type(c.security_context.and_then(|sc| sc.seccomp_profile.as_ref()))
                    == Some(UNCONFINED)
            })
            .map(|c| c.name)
            .collect();

        let mut setters = Vec::new();
        if pod_unconfined {
            setters.push("pod".to_string());
        }
        if !names.is_empty() {
            setters.push(containers_phrase(&names));
        }

        if setters.is_empty() {
            return Verdict::Allowed;
        }

        Verdict::forbidden(
            "seccompProfile",
            format!(
                "{} must not set securityContext.seccompProfile.type to {:?}",
                setters.join(" and "),
                UNCONFINED
            ),
        )
    }
}

/// Pods must run with the RuntimeDefault or a Localhost seccomp profile,
/// set at pod level or on every container.
pub struct RestrictedSeccompCheck;

impl Check for RestrictedSeccompCheck {
    fn id(&self) -> &'static str {
        "seccompProfile_restricted"
    }

    fn level(&self) -> Level {
        Level::Restricted
    }

    fn overrides(&self) -> &'static [&'static str] {
        &["seccompProfile_baseline"]
    }

    fn evaluate(&self, _metadata: &ObjectMeta, spec: &PodSpec) -> Verdict {
        if is_windows(spec) {
            return Verdict::Allowed;
        }

        let mut bad_setters = Vec::new();
        let mut bad_values = BTreeSet::new();

        let pod_type =
            profile_type(pod_security_context(spec).and_then(|sc| sc.seccomp_profile.as_ref()));
        let pod_confined = match pod_type {
            Some(t) if is_confined(t) => true,
            Some(t) => {
                bad_setters.push("pod".to_string());
                bad_values.insert(t);
                false
            }
            None => false,
        };

        let mut explicit = Vec::new();
        let mut implicit = Vec::new();
        for container in all_containers(spec) {
            let container_type = profile_type(
                container
                    .security_context
                    .and_then(|sc| sc.seccomp_profile.as_ref()),
            );
            match container_type {
                Some(t) if is_confined(t) => {}
                Some(t) => {
                    explicit.push(container.name);
                    bad_values.insert(t);
                }
                None if !pod_confined => implicit.push(container.name),
                None => {}
            }
        }
        if !explicit.is_empty() {
            bad_setters.push(containers_phrase(&explicit));
        }

        let mut details = Vec::new();
        if !bad_setters.is_empty() {
            details.push(format!(
                "{} must not set securityContext.seccompProfile.type to {}",
                bad_setters.join(" and "),
                join_quote(&bad_values)
            ));
        }
        if !implicit.is_empty() {
            details.push(format!(
                "pod or {} must set securityContext.seccompProfile.type to \"RuntimeDefault\" or \"Localhost\"",
                containers_phrase(&implicit)
            ));
        }

        if details.is_empty() {
            Verdict::Allowed
        } else {
            Verdict::forbidden("seccompProfile", details.join("; "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::checks::testing::{container, pod_with};
    use k8s_openapi::api::core::v1::{PodSecurityContext, SecurityContext};

    fn seccomp(type_: &str) -> Option<SeccompProfile> {
        Some(SeccompProfile {
            type_: type_.to_string(),
            ..Default::default()
        })
    }

    fn container_seccomp(type_: &str) -> Option<SecurityContext> {
        Some(SecurityContext {
            seccomp_profile: seccomp(type_),
            ..Default::default()
        })
    }

    fn pod_seccomp(spec: &mut PodSpec, type_: &str) {
        spec.security_context = Some(PodSecurityContext {
            seccomp_profile: seccomp(type_),
            ..Default::default()
        });
    }

    #[test]
    fn test_baseline_rejects_unconfined() {
        let mut spec = pod_with(vec![
            container("app", container_seccomp("Unconfined")),
            container("sidecar", None),
        ]);
        pod_seccomp(&mut spec, "Unconfined");

        assert_eq!(
            BaselineSeccompCheck.evaluate(&ObjectMeta::default(), &spec),
            Verdict::forbidden(
                "seccompProfile",
                "pod and container \"app\" must not set securityContext.seccompProfile.type to \"Unconfined\""
            )
        );
    }

    #[test]
    fn test_baseline_allows_unset() {
        let spec = pod_with(vec![container("app", None)]);
        assert_eq!(
            BaselineSeccompCheck.evaluate(&ObjectMeta::default(), &spec),
            Verdict::Allowed
        );
    }

    #[test]
    fn test_restricted_pod_level_profile_covers_containers() {
        let mut spec = pod_with(vec![container("app", None), container("sidecar", None)]);
        pod_seccomp(&mut spec, "RuntimeDefault");
        assert_eq!(
            RestrictedSeccompCheck.evaluate(&ObjectMeta::default(), &spec),
            Verdict::Allowed
        );
    }

    #[test]
    fn test_restricted_requires_profile() {
        let spec = pod_with(vec![
            container("app", container_seccomp("Localhost")),
            container("sidecar", None),
        ]);
        assert_eq!(
            RestrictedSeccompCheck.evaluate(&ObjectMeta::default(), &spec),
            Verdict::forbidden(
                "seccompProfile",
                "pod or container \"sidecar\" must set securityContext.seccompProfile.type to \"RuntimeDefault\" or \"Localhost\""
            )
        );
    }

    #[test]
    fn test_restricted_rejects_unconfined_container() {
        let mut spec = pod_with(vec![container("app", container_seccomp("Unconfined"))]);
        pod_seccomp(&mut spec, "RuntimeDefault");
        assert_eq!(
            RestrictedSeccompCheck.evaluate(&ObjectMeta::default(), &spec),
            Verdict::forbidden(
                "seccompProfile",
                "container \"app\" must not set securityContext.seccompProfile.type to \"Unconfined\""
            )
        );
    }

    #[test]
    fn test_restricted_unconfined_pod_does_not_cover_containers() {
        let mut spec = pod_with(vec![container("app", None)]);
        pod_seccomp(&mut spec, "Unconfined");
        assert_eq!(
            RestrictedSeccompCheck.evaluate(&ObjectMeta::default(), &spec),
            Verdict::forbidden(
                "seccompProfile",
                "pod must not set securityContext.seccompProfile.type to \"Unconfined\"; \
                 pod or container \"app\" must set securityContext.seccompProfile.type to \"RuntimeDefault\" or \"Localhost\""
            )
        );
    }
}

//! /proc mount type.

use crate::config::Level;
use crate::policy::extract::{all_containers, containers_phrase, join_quote};
use crate::policy::{Check, Verdict};
use k8s_openapi::api::core::v1::PodSpec;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeSet;

/// Containers must use the default (masked) /proc mount.
pub struct ProcMountCheck;

impl Check for ProcMountCheck {
    fn id(&self) -> &'static str {
        "procMount"
    }

    fn level(&self) -> Level {
        Level::Baseline
    }

    fn evaluate(&self, _metadata: &ObjectMeta, spec: &PodSpec) -> Verdict {
        let mut names = Vec::new();
        let mut values = BTreeSet::new();

        for container in all_containers(spec) {
            let proc_mount = container
                .security_context
                .and_then(|sc| sc.proc_mount.as_deref())
                .filter(|m| *m != "Default");
            if let Some(mount) = proc_mount {
                names.push(container.name);
                values.insert(mount);
            }
        }

        if names.is_empty() {
            return Verdict::Allowed;
        }

        Verdict::forbidden(
            "procMount",
            format!(
                "{} must not set securityContext.procMount to {}",
                containers_phrase(&names),
                join_quote(&values)
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::checks::testing::{container, pod_with};
    use k8s_openapi::api::core::v1::SecurityContext;

    fn proc_mount(value: &str) -> Option<SecurityContext> {
        Some(SecurityContext {
            proc_mount: Some(value.to_string()),
            ..Default::default()
        })
    }

    #[test]
    fn test_unmasked_detected() {
        let spec = pod_with(vec![
            container("builder", proc_mount("Unmasked")),
            container("app", proc_mount("Default")),
        ]);
        assert_eq!(
            ProcMountCheck.evaluate(&ObjectMeta::default(), &spec),
            Verdict::forbidden(
                "procMount",
                "container \"builder\" must not set securityContext.procMount to \"Unmasked\""
            )
        );
    }

    #[test]
    fn test_empty_value_detected() {
        let spec = pod_with(vec![container("app", proc_mount(""))]);
        assert_eq!(
            ProcMountCheck.evaluate(&ObjectMeta::default(), &spec),
            Verdict::forbidden(
                "procMount",
                "container \"app\" must not set securityContext.procMount to \"\""
            )
        );
    }

    #[test]
    fn test_unset_ok() {
        let spec = pod_with(vec![container("app", None)]);
        assert_eq!(
            ProcMountCheck.evaluate(&ObjectMeta::default(), &spec),
            Verdict::Allowed
        );
    }
}

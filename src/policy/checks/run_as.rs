//! Non-root user checks.

use crate::config::Level;
use crate::policy::extract::{all_containers, containers_phrase, pod_security_context};
use crate::policy::{Check, Verdict};
use k8s_openapi::api::core::v1::PodSpec;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

/// Containers must run with runAsNonRoot=true, set at pod level or on every
/// container, and must never set it to false.
pub struct RunAsNonRootCheck;

impl Check for RunAsNonRootCheck {
    fn id(&self) -> &'static str {
        "runAsNonRoot"
    }

    fn level(&self) -> Level {
        Level::Restricted
    }

    fn evaluate(&self, _metadata: &ObjectMeta, spec: &PodSpec) -> Verdict {
        let pod_value = pod_security_context(spec).and_then(|sc| sc.run_as_non_root);

        let mut explicit = Vec::new();
        let mut implicit = Vec::new();
        for container in all_containers(spec) {
            match container.security_context.and_then(|sc| sc.run_as_non_root) {
                Some(true) => {}
                Some(false) => explicit.push(container.name),
                None if pod_value != Some(true) => implicit.push(container.name),
                None => {}
            }
        }

        let mut setters = Vec::new();
        if pod_value == Some(false) {
            setters.push("pod".to_string());
        }
        if !explicit.is_empty() {
            setters.push(containers_phrase(&explicit));
        }

        let mut details = Vec::new();
        if !setters.is_empty() {
            details.push(format!(
                "{} must not set securityContext.runAsNonRoot=false",
                setters.join(" and ")
            ));
        }
        if !implicit.is_empty() {
            details.push(format!(
                "pod or {} must set securityContext.runAsNonRoot=true",
                containers_phrase(&implicit)
            ));
        }

        if details.is_empty() {
            Verdict::Allowed
        } else {
            Verdict::forbidden("runAsNonRoot != true", details.join("; "))
        }
    }
}

/// Pods and containers must not run as UID 0.
pub struct RunAsUserCheck;

impl Check for RunAsUserCheck {
    fn id(&self) -> &'static str {
        "runAsUser"
    }

    fn level(&self) -> Level {
        Level::Restricted
    }

    fn evaluate(&self, _metadata: &ObjectMeta, spec: &PodSpec) -> Verdict {
        let pod_root = pod_security_context(spec).and_then(|sc| sc.run_as_user) == Some(0);
        let names: Vec<&str> = all_containers(spec)
            .into_iter()
            .filter(|c| c.security_context.and_then(|sc| sc.run_as_user) == Some(0))
            .map(|c| c.name)
            .collect();

        let mut setters = Vec::new();
        if pod_root {
            setters.push("pod".to_string());
        }
        if !names.is_empty() {
            setters.push(containers_phrase(&names));
        }

        if setters.is_empty() {
            return Verdict::Allowed;
        }

        Verdict::forbidden(
            "runAsUser=0",
            format!("{} must not set runAsUser=0", setters.join(" and ")),
        )
    }
}

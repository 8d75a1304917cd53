//! Privileged container detection.

use crate::config::Level;
use crate::policy::extract::{all_containers, containers_phrase};
use crate::policy::{Check, Verdict};
use k8s_openapi::api::core::v1::PodSpec;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

/// Containers must not run in privileged mode.
pub struct PrivilegedCheck;

impl Check for PrivilegedCheck {
    fn id(&self) -> &'static str {
        "privileged"
    }

    fn level(&self) -> Level {
        Level::Baseline
    }

    fn evaluate(&self, _metadata: &ObjectMeta, spec: &PodSpec) -> Verdict {
        let privileged: Vec<&str> = all_containers(spec)
            .into_iter()
            .filter(|c| c.security_context.and_then(|sc| sc.privileged) == Some(true))
            .map(|c| c.name)
            .collect();

        if privileged.is_empty() {
            return Verdict::Allowed;
        }

        Verdict::forbidden(
            "privileged",
            format!(
                "{} must not set securityContext.privileged=true",
                containers_phrase(&privileged)
            ),
        )
    }
}

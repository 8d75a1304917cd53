//! Privilege escalation.

use crate::config::Level;
use crate::policy::extract::{all_containers, containers_phrase, is_windows};
use crate::policy::{Check, Verdict};
use k8s_openapi::api::core::v1::PodSpec;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

/// Containers must explicitly set allowPrivilegeEscalation=false.
pub struct AllowPrivilegeEscalationCheck;

impl Check for AllowPrivilegeEscalationCheck {
    fn id(&self) -> &'static str {
        "allowPrivilegeEscalation"
    }

    fn level(&self) -> Level {
        Level::Restricted
    }

    fn evaluate(&self, _metadata: &ObjectMeta, spec: &PodSpec) -> Verdict {
        if is_windows(spec) {
            return Verdict::Allowed;
        }

        let names: Vec<&str> = all_containers(spec)
            .into_iter()
            .filter(|c| c.security_context.and_then(|sc| sc.allow_privilege_escalation) != Some(false))
            .map(|c| c.name)
            .collect();

        if names.is_empty() {
            return Verdict::Allowed;
        }

        Verdict::forbidden(
            "allowPrivilegeEscalation != false",
            format!(
                "{} must set securityContext.allowPrivilegeEscalation=false",
                containers_phrase(&names)
            ),
        )
    }
}

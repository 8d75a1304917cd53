//! SELinux options.

use crate::config::Level;
use crate::policy::extract::{all_containers, containers_phrase, pod_security_context};
use crate::policy::{Check, Verdict};
use k8s_openapi::api::core::v1::{PodSpec, SELinuxOptions};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeSet;

/// SELinux types container runtimes assign to ordinary containers.
const ALLOWED_TYPES: &[&str] = &[
    "",
    "container_t",
    "container_init_t",
    "container_kvm_t",
    "container_engine_t",
];

/// Collect the forbidden settings in `options`. Returns whether any were found.
fn forbidden_options(options: Option<&SELinuxOptions>, found: &mut BTreeSet<String>) -> bool {
    let Some(options) = options else {
        return false;
    };

    let mut bad = false;
    if let Some(type_) = options.type_.as_deref()
        && !ALLOWED_TYPES.contains(&type_)
    {
        found.insert(format!("type {:?}", type_));
        bad = true;
    }
    if let Some(user) = options.user.as_deref().filter(|u| !u.is_empty()) {
        found.insert(format!("user {:?}", user));
        bad = true;
    }
    if let Some(role) = options.role.as_deref().filter(|r| !r.is_empty()) {
        found.insert(format!("role {:?}", role));
        bad = true;
    }
    bad
}

/// Pods may only use standard SELinux types and must not set a user or role.
pub struct SeLinuxOptionsCheck;

impl Check for SeLinuxOptionsCheck {
    fn id(&self) -> &'static str {
        "seLinuxOptions"
    }

    fn level(&self) -> Level {
        Level::Baseline
    }

    fn evaluate(&self, _metadata: &ObjectMeta, spec: &PodSpec) -> Verdict {
        let mut found = BTreeSet::new();

        let pod_bad = forbidden_options(
            pod_security_context(spec).and_then(|sc| sc.se_linux_options.as_ref()),
            &mut found,
        );

        let mut names = Vec::new();
        for container in all_containers(spec) {
            let options = container
                .security_context
                .and_then(|sc| sc.se_linux_options.as_ref());
            if forbidden_options(options, &mut found) {
                names.push(container.name);
            }
        }

        let mut setters = Vec::new();
        if pod_bad {
            setters.push("pod".to_string());
        }
        if !names.is_empty() {
            setters.push(containers_phrase(&names));
        }

        if setters.is_empty() {
            return Verdict::Allowed;
        }

        Verdict::forbidden(
            "seLinuxOptions",
            format!(
                "{} set forbidden securityContext.seLinuxOptions: {}",
                setters.join(" and "),
                found.into_iter().collect::<Vec<_>>().join("; ")
            ),
        )
    }
}

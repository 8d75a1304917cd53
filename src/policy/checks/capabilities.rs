//! Linux capability checks.

use crate::config::Level;
use crate::policy::extract::{ContainerRef, all_containers, containers_phrase, is_windows, join_quote};
use crate::policy::{Check, Verdict};
use k8s_openapi::api::core::v1::PodSpec;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeSet;

/// Capabilities container runtimes grant by default.
const DEFAULT_CAPABILITIES: &[&str] = &[
    "AUDIT_WRITE",
    "CHOWN",
    "DAC_OVERRIDE",
    "FOWNER",
    "FSETID",
    "KILL",
    "MKNOD",
    "NET_BIND_SERVICE",
    "SETFCAP",
    "SETGID",
    "SETPCAP",
    "SETUID",
    "SYS_CHROOT",
];

/// The only capability restricted pods may add.
const RESTRICTED_ADDABLE: &[&str] = &["NET_BIND_SERVICE"];

fn added<'a>(container: &ContainerRef<'a>) -> &'a [String] {
    container
        .security_context
        .and_then(|sc| sc.capabilities.as_ref())
        .and_then(|caps| caps.add.as_deref())
        .unwrap_or_default()
}

fn drops_all(container: &ContainerRef<'_>) -> bool {
    container
        .security_context
        .and_then(|sc| sc.capabilities.as_ref())
        .and_then(|caps| caps.drop.as_ref())
        .is_some_and(|drop| drop.iter().any(|c| c == "ALL"))
}

/// Containers adding capabilities outside `allowed`, and the offending capabilities.
fn forbidden_additions<'a>(
    containers: &[ContainerRef<'a>],
    allowed: &[&str],
) -> (Vec<&'a str>, BTreeSet<&'a str>) {
    let mut names = Vec::new();
    let mut capabilities = BTreeSet::new();

    for container in containers {
        let mut bad = false;
        for cap in added(container) {
            if !allowed.contains(&cap.as_str()) {
                bad = true;
                capabilities.insert(cap.as_str());
            }
        }
        if bad {
            names.push(container.name);
        }
    }

    (names, capabilities)
}

fn additions_detail(names: &[&str], capabilities: &BTreeSet<&str>) -> String {
    format!(
        "{} must not include {} in securityContext.capabilities.add",
        containers_phrase(names),
        join_quote(capabilities)
    )
}

/// Containers may only add capabilities from the runtime's default set.
pub struct BaselineCapabilitiesCheck;

impl Check for BaselineCapabilitiesCheck {
    fn id(&self) -> &'static str {
        "capabilities_baseline"
    }

    fn level(&self) -> Level {
        Level::Baseline
    }

    fn evaluate(&self, _metadata: &ObjectMeta, spec: &PodSpec) -> Verdict {
        let containers = all_containers(spec);
        let (names, capabilities) = forbidden_additions(&containers, DEFAULT_CAPABILITIES);

        if names.is_empty() {
            Verdict::Allowed
        } else {
            Verdict::forbidden(
                "non-default capabilities",
                additions_detail(&names, &capabilities),
            )
        }
    }
}

/// Containers must drop ALL capabilities and may only add NET_BIND_SERVICE.
pub struct RestrictedCapabilitiesCheck;

impl Check for RestrictedCapabilitiesCheck {
    fn id(&self) -> &'static str {
        "capabilities_restricted"
    }

    fn level(&self) -> Level {
        Level::Restricted
    }

    fn overrides(&self) -> &'static [&'static str] {
        &["capabilities_baseline"]
    }

    fn evaluate(&self, _metadata: &ObjectMeta, spec: &PodSpec) -> Verdict {
        if is_windows(spec) {
            return Verdict::Allowed;
        }

        let containers = all_containers(spec);
        let missing_drop: Vec<&str> = containers
            .iter()
            .filter(|c| !drops_all(c))
            .map(|c| c.name)
            .collect();
        let (names, capabilities) = forbidden_additions(&containers, RESTRICTED_ADDABLE);

        let mut details = Vec::new();
        if !missing_drop.is_empty() {
            details.push(format!(
                "{} must set securityContext.capabilities.drop=[\"ALL\"]",
                containers_phrase(&missing_drop)
            ));
        }
        if !names.is_empty() {
            details.push(additions_detail(&names, &capabilities));
        }

        if details.is_empty() {
            Verdict::Allowed
        } else {
            Verdict::forbidden("unrestricted capabilities", details.join("; "))
        }
    }
}

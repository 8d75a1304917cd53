//! AppArmor profile checks, covering both the security context field and the
//! legacy per-container annotations.

use crate::config::Level;
use crate::policy::extract::{all_containers, containers_phrase, pod_security_context};
use crate::policy::{Check, Verdict};
use k8s_openapi::api::core::v1::{AppArmorProfile, PodSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

const ANNOTATION_PREFIX: &str = "container.apparmor.security.beta.kubernetes.io/";

fn forbidden_annotation_value(value: &str) -> bool {
    value != "runtime/default" && !value.starts_with("localhost/")
}

/// The profile type, when it is anything other than RuntimeDefault or Localhost.
fn forbidden_profile(profile: Option<&AppArmorProfile>) -> Option<&str> {
    profile
        .map(|p| p.type_.as_str())
        .filter(|t| *t != "RuntimeDefault" && *t != "Localhost")
}

/// Pods must not override the default AppArmor profile with an unconfined or
/// unknown one.
pub struct AppArmorProfileCheck;

impl Check for AppArmorProfileCheck {
    fn id(&self) -> &'static str {
        "appArmorProfile"
    }

    fn level(&self) -> Level {
        Level::Baseline
    }

    fn evaluate(&self, metadata: &ObjectMeta, spec: &PodSpec) -> Verdict {
        let mut details = Vec::new();

        let annotations: Vec<String> = metadata
            .annotations
            .iter()
            .flatten()
            .filter(|(key, value)| {
                key.starts_with(ANNOTATION_PREFIX) && forbidden_annotation_value(value)
            })
            .map(|(key, value)| format!("{}={:?}", key, value))
            .collect();
        if !annotations.is_empty() {
            details.push(format!("forbidden annotations {}", annotations.join(", ")));
        }

        if let Some(type_) =
            forbidden_profile(pod_security_context(spec).and_then(|sc| sc.app_armor_profile.as_ref()))
        {
            details.push(format!(
                "pod must not set securityContext.appArmorProfile.type to {:?}",
                type_
            ));
        }

        let mut names = Vec::new();
        let mut types = Vec::new();
        for container in all_containers(spec) {
            let profile = container
                .security_context
                .and_then(|sc| sc.app_armor_profile.as_ref());
            if let Some(type_) = forbidden_profile(profile) {
                names.push(container.name);
                if !types.contains(&type_) {
                    types.push(type_);
                }
            }
        }
        if !names.is_empty() {
            details.push(format!(
                "{} must not set securityContext.appArmorProfile.type to {}",
                containers_phrase(&names),
                types
                    .iter()
                    .map(|t| format!("{:?}", t))
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }

        if details.is_empty() {
            Verdict::Allowed
        } else {
            Verdict::forbidden("forbidden AppArmor profiles", details.join("; "))
        }
    }
}

//! Windows HostProcess containers.

use crate::config::Level;
use crate::policy::extract::{all_containers, containers_phrase, pod_security_context};
use crate::policy::{Check, Verdict};
use k8s_openapi::api::core::v1::{PodSpec, WindowsSecurityContextOptions};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

fn host_process(options: Option<&WindowsSecurityContextOptions>) -> bool {
    options.and_then(|o| o.host_process) == Some(true)
}

/// Pods must not run Windows HostProcess containers.
pub struct HostProcessCheck;

impl Check for HostProcessCheck {
    fn id(&self) -> &'static str {
        "windowsHostProcess"
    }

    fn level(&self) -> Level {
        Level::Baseline
    }

    fn evaluate(&self, _metadata: &ObjectMeta, spec: &PodSpec) -> Verdict {
        let pod_level = host_process(
            pod_security_context(spec).and_then(|sc| sc.windows_options.as_ref()),
        );
        let names: Vec<&str> = all_containers(spec)
            .into_iter()
            .filter(|c| host_process(c.security_context.and_then(|sc| sc.windows_options.as_ref())))
            .map(|c| c.name)
            .collect();

        let mut setters = Vec::new();
        if pod_level {
            setters.push("pod".to_string());
        }
        if !names.is_empty() {
            setters.push(containers_phrase(&names));
        }

        if setters.is_empty() {
            return Verdict::Allowed;
        }

        Verdict::forbidden(
            "hostProcess",
            format!(
                "{} must not set securityContext.windowsOptions.hostProcess=true",
                setters.join(" and ")
            ),
        )
    }
}

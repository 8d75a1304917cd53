//! Host network/PID/IPC namespace sharing.

use crate::config::Level;
use crate::policy::{Check, Verdict};
use k8s_openapi::api::core::v1::PodSpec;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

/// Pods must not share the host's network, PID or IPC namespace.
pub struct HostNamespacesCheck;

impl Check for HostNamespacesCheck {
    fn id(&self) -> &'static str {
        "hostNamespaces"
    }

    fn level(&self) -> Level {
        Level::Baseline
    }

    fn evaluate(&self, _metadata: &ObjectMeta, spec: &PodSpec) -> Verdict {
        let mut forbidden = Vec::new();

        if spec.host_network == Some(true) {
            forbidden.push("hostNetwork=true");
        }
        if spec.host_pid == Some(true) {
            forbidden.push("hostPID=true");
        }
        if spec.host_ipc == Some(true) {
            forbidden.push("hostIPC=true");
        }

        if forbidden.is_empty() {
            Verdict::Allowed
        } else {
            Verdict::forbidden("host namespaces", forbidden.join(", "))
        }
    }
}

//! Namespaced sysctls.

use crate::config::Level;
use crate::policy::extract::pod_security_context;
use crate::policy::{Check, Verdict};
use k8s_openapi::api::core::v1::PodSpec;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

/// Sysctls that are isolated per pod and safe to set.
const SAFE_SYSCTLS: &[&str] = &[
    "kernel.shm_rmid_forced",
    "net.ipv4.ip_local_port_range",
    "net.ipv4.ip_local_reserved_ports",
    "net.ipv4.ip_unprivileged_port_start",
    "net.ipv4.ping_group_range",
    "net.ipv4.tcp_fin_timeout",
    "net.ipv4.tcp_keepalive_intvl",
    "net.ipv4.tcp_keepalive_probes",
    "net.ipv4.tcp_keepalive_time",
    "net.ipv4.tcp_rmem",
    "net.ipv4.tcp_syncookies",
    "net.ipv4.tcp_wmem",
];

/// Pods may only set sysctls from the safe set.
pub struct SysctlsCheck;

impl Check for SysctlsCheck {
    fn id(&self) -> &'static str {
        "sysctls"
    }

    fn level(&self) -> Level {
        Level::Baseline
    }

    fn evaluate(&self, _metadata: &ObjectMeta, spec: &PodSpec) -> Verdict {
        let forbidden: Vec<&str> = pod_security_context(spec)
            .and_then(|sc| sc.sysctls.as_deref())
            .unwrap_or_default()
            .iter()
            .map(|s| s.name.as_str())
            .filter(|name| !SAFE_SYSCTLS.contains(name))
            .collect();

        if forbidden.is_empty() {
            Verdict::Allowed
        } else {
            Verdict::forbidden("forbidden sysctls", forbidden.join(", "))
        }
    }
}

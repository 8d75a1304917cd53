//! Host port binding.

use crate::config::Level;
use crate::policy::extract::{all_containers, containers_phrase, pluralize};
use crate::policy::{Check, Verdict};
use k8s_openapi::api::core::v1::PodSpec;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

/// Containers must not bind host ports.
pub struct HostPortsCheck;

impl Check for HostPortsCheck {
    fn id(&self) -> &'static str {
        "hostPorts"
    }

    fn level(&self) -> Level {
        Level::Baseline
    }

    fn evaluate(&self, _metadata: &ObjectMeta, spec: &PodSpec) -> Verdict {
        let mut names = Vec::new();
        let mut ports = Vec::new();

        for container in all_containers(spec) {
            let mut uses_host_port = false;
            for port in container.ports {
                if let Some(host_port) = port.host_port.filter(|p| *p != 0) {
                    uses_host_port = true;
                    if !ports.contains(&host_port) {
                        ports.push(host_port);
                    }
                }
            }
            if uses_host_port {
                names.push(container.name);
            }
        }

        if names.is_empty() {
            return Verdict::Allowed;
        }

        let port_list = ports
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        Verdict::forbidden(
            "hostPort",
            format!(
                "{} {} {} {}",
                containers_phrase(&names),
                pluralize("uses", "use", names.len()),
                pluralize("hostPort", "hostPorts", ports.len()),
                port_list
            ),
        )
    }
}

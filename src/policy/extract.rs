//! Pod spec extraction and detail formatting helpers shared by the checks.

use k8s_openapi::api::core::v1::{
    Container, ContainerPort, EphemeralContainer, PodSecurityContext, PodSpec, SecurityContext,
};

/// The fields checks need from any kind of container.
#[derive(Debug, Clone, Copy)]
pub struct ContainerRef<'a> {
    pub name: &'a str,
    pub security_context: Option<&'a SecurityContext>,
    pub ports: &'a [ContainerPort],
}

impl<'a> From<&'a Container> for ContainerRef<'a> {
    fn from(c: &'a Container) -> Self {
        Self {
            name: &c.name,
            security_context: c.security_context.as_ref(),
            ports: c.ports.as_deref().unwrap_or_default(),
        }
    }
}

impl<'a> From<&'a EphemeralContainer> for ContainerRef<'a> {
    fn from(c: &'a EphemeralContainer) -> Self {
        Self {
            name: &c.name,
            security_context: c.security_context.as_ref(),
            ports: c.ports.as_deref().unwrap_or_default(),
        }
    }
}

/// All containers of a pod: init containers, containers, then ephemeral containers.
pub fn all_containers(spec: &PodSpec) -> Vec<ContainerRef<'_>> {
    let init = spec.init_containers.iter().flatten().map(ContainerRef::from);
    let regular = spec.containers.iter().map(ContainerRef::from);
    let ephemeral = spec
        .ephemeral_containers
        .iter()
        .flatten()
        .map(ContainerRef::from);

    init.chain(regular).chain(ephemeral).collect()
}

/// Pod-level security context, if set.
pub fn pod_security_context(spec: &PodSpec) -> Option<&PodSecurityContext> {
    spec.security_context.as_ref()
}

/// Whether the pod declares the Windows OS. Linux-only controls skip these pods.
pub fn is_windows(spec: &PodSpec) -> bool {
    spec.os.as_ref().is_some_and(|os| os.name == "windows")
}

/// Pick the singular or plural word for `count` items.
pub fn pluralize<'a>(singular: &'a str, plural: &'a str, count: usize) -> &'a str {
    if count == 1 { singular } else { plural }
}

/// Quote and comma-join items: `"a", "b"`.
pub fn join_quote<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|s| format!("{:?}", s.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `container "a"` or `containers "a", "b"`.
pub fn containers_phrase(names: &[&str]) -> String {
    format!(
        "{} {}",
        pluralize("container", "containers", names.len()),
        join_quote(names)
    )
}

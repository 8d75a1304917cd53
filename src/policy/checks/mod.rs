//! Built-in Pod Security Standards checks (latest revision).

pub mod apparmor;
pub mod capabilities;
pub mod host_namespaces;
pub mod host_ports;
pub mod host_process;
pub mod privilege_escalation;
pub mod privileged;
pub mod proc_mount;
pub mod run_as;
pub mod seccomp;
pub mod selinux;
pub mod sysctls;
pub mod volumes;

use crate::policy::Check;

/// Every built-in check, baseline and restricted.
pub fn default_checks() -> Vec<Box<dyn Check>> {
    vec![
        // Baseline
        Box::new(apparmor::AppArmorProfileCheck),
        Box::new(capabilities::BaselineCapabilitiesCheck),
        Box::new(host_namespaces::HostNamespacesCheck),
        Box::new(volumes::HostPathVolumesCheck),
        Box::new(host_ports::HostPortsCheck),
        Box::new(host_process::HostProcessCheck),
        Box::new(privileged::PrivilegedCheck),
        Box::new(proc_mount::ProcMountCheck),
        Box::new(selinux::SeLinuxOptionsCheck),
        Box::new(seccomp::BaselineSeccompCheck),
        Box::new(sysctls::SysctlsCheck),
        // Restricted
        Box::new(privilege_escalation::AllowPrivilegeEscalationCheck),
        Box::new(capabilities::RestrictedCapabilitiesCheck),
        Box::new(volumes::RestrictedVolumesCheck),
        Box::new(run_as::RunAsNonRootCheck),
        Box::new(run_as::RunAsUserCheck),
        Box::new(seccomp::RestrictedSeccompCheck),
    ]
}

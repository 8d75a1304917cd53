//! Volume type checks.

use crate::config::Level;
use crate::policy::extract::{join_quote, pluralize};
use crate::policy::{Check, Verdict};
use k8s_openapi::api::core::v1::{PodSpec, Volume};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeSet;

/// Volume sources restricted pods may use.
const ALLOWED_VOLUME_TYPES: &[&str] = &[
    "configMap",
    "csi",
    "downwardAPI",
    "emptyDir",
    "ephemeral",
    "persistentVolumeClaim",
    "projected",
    "secret",
];

fn volumes(spec: &PodSpec) -> &[Volume] {
    spec.volumes.as_deref().unwrap_or_default()
}

/// The wire names of the sources set on a volume (e.g. "hostPath").
fn volume_types(volume: &Volume) -> Vec<String> {
    match serde_json::to_value(volume) {
        Ok(serde_json::Value::Object(fields)) => fields
            .into_iter()
            .filter(|(key, value)| key != "name" && !value.is_null())
            .map(|(key, _)| key)
            .collect(),
        _ => Vec::new(),
    }
}

/// Pods must not mount host paths.
pub struct HostPathVolumesCheck;

impl Check for HostPathVolumesCheck {
    fn id(&self) -> &'static str {
        "hostPathVolumes"
    }

    fn level(&self) -> Level {
        Level::Baseline
    }

    fn evaluate(&self, _metadata: &ObjectMeta, spec: &PodSpec) -> Verdict {
        let host_paths: Vec<&str> = volumes(spec)
            .iter()
            .filter(|v| v.host_path.is_some())
            .map(|v| v.name.as_str())
            .collect();

        if host_paths.is_empty() {
            return Verdict::Allowed;
        }

        Verdict::forbidden(
            "hostPath volumes",
            format!(
                "{} {}",
                pluralize("volume", "volumes", host_paths.len()),
                join_quote(&host_paths)
            ),
        )
    }
}

/// Pods may only use the volume types in [`ALLOWED_VOLUME_TYPES`].
pub struct RestrictedVolumesCheck;

impl Check for RestrictedVolumesCheck {
    fn id(&self) -> &'static str {
        "restrictedVolumes"
    }

    fn level(&self) -> Level {
        Level::Restricted
    }

    fn overrides(&self) -> &'static [&'static str] {
        &["hostPathVolumes"]
    }

    fn evaluate(&self, _metadata: &ObjectMeta, spec: &PodSpec) -> Verdict {
        let mut names = Vec::new();
        let mut types = BTreeSet::new();

        for volume in volumes(spec) {
            let restricted: Vec<String> = volume_types(volume)
                .into_iter()
                .filter(|t| !ALLOWED_VOLUME_TYPES.contains(&t.as_str()))
                .collect();
            if !restricted.is_empty() {
                names.push(volume.name.as_str());
                types.extend(restricted);
            }
        }

        if names.is_empty() {
            return Verdict::Allowed;
        }

        Verdict::forbidden(
            "restricted volume types",
            format!(
                "{} {} {} {} {}",
                pluralize("volume", "volumes", names.len()),
                join_quote(&names),
                pluralize("uses", "use", names.len()),
                pluralize(
                    "restricted volume type",
                    "restricted volume types",
                    types.len()
                ),
                join_quote(&types)
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::{
        DownwardAPIVolumeSource, EmptyDirVolumeSource, HostPathVolumeSource, NFSVolumeSource,
    };

    fn host_path(name: &str, path: &str) -> Volume {
        Volume {
            name: name.to_string(),
            host_path: Some(HostPathVolumeSource {
                path: path.to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn empty_dir(name: &str) -> Volume {
        Volume {
            name: name.to_string(),
            empty_dir: Some(EmptyDirVolumeSource::default()),
            ..Default::default()
        }
    }

    fn spec_with(volumes: Vec<Volume>) -> PodSpec {
        PodSpec {
            volumes: Some(volumes),
            ..Default::default()
        }
    }

    #[test]
    fn test_volume_types_use_wire_names() {
        let volume = Volume {
            name: "podinfo".to_string(),
            downward_api: Some(DownwardAPIVolumeSource::default()),
            ..Default::default()
        };
        assert_eq!(volume_types(&volume), vec!["downwardAPI".to_string()]);
    }

    #[test]
    fn test_host_path_detected() {
        let spec = spec_with(vec![host_path("docker-sock", "/var/run/docker.sock"), empty_dir("tmp")]);
        assert_eq!(
            HostPathVolumesCheck.evaluate(&ObjectMeta::default(), &spec),
            Verdict::forbidden("hostPath volumes", "volume \"docker-sock\"")
        );
    }

    #[test]
    fn test_no_volumes_ok() {
        assert_eq!(
            HostPathVolumesCheck.evaluate(&ObjectMeta::default(), &PodSpec::default()),
            Verdict::Allowed
        );
        assert_eq!(
            RestrictedVolumesCheck.evaluate(&ObjectMeta::default(), &PodSpec::default()),
            Verdict::Allowed
        );
    }

    #[test]
    fn test_restricted_volume_types() {
        let nfs = Volume {
            name: "shared".to_string(),
            nfs: Some(NFSVolumeSource {
                server: "nfs.local".to_string(),
                path: "/exports".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        let spec = spec_with(vec![host_path("logs", "/var/log"), empty_dir("tmp"), nfs]);

        assert_eq!(
            RestrictedVolumesCheck.evaluate(&ObjectMeta::default(), &spec),
            Verdict::forbidden(
                "restricted volume types",
                "volumes \"logs\", \"shared\" use restricted volume types \"hostPath\", \"nfs\""
            )
        );
    }

    #[test]
    fn test_allowed_volume_types_pass() {
        let spec = spec_with(vec![empty_dir("cache"), empty_dir("tmp")]);
        assert_eq!(
            RestrictedVolumesCheck.evaluate(&ObjectMeta::default(), &spec),
            Verdict::Allowed
        );
    }
}

//! End-to-end scans against in-memory pod listers.

use k8s_openapi::api::core::v1::{Container, Pod, PodSpec, SecurityContext};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use psa_checker::cluster::{NamespaceScope, PodLister};
use psa_checker::config::{Level, OutputFormat, RunConfig};
use psa_checker::error::{EXIT_OK, EXIT_VIOLATIONS};
use psa_checker::policy::{Check, Evaluator, Verdict};
use psa_checker::{CheckerError, Result, scan};
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

fn pod(namespace: &str, name: &str, spec: PodSpec) -> Pod {
    Pod {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        spec: Some(spec),
        ..Default::default()
    }
}

fn app_spec() -> PodSpec {
    PodSpec {
        containers: vec![Container {
            name: "app".to_string(),
            image: Some("registry.local/app:2.4.1".to_string()),
            ..Default::default()
        }],
        ..Default::default()
    }
}

fn host_network_spec() -> PodSpec {
    PodSpec {
        host_network: Some(true),
        ..app_spec()
    }
}

fn config(level: Level, namespace: Option<&str>) -> RunConfig {
    RunConfig {
        level,
        context: None,
        namespace: namespace.map(str::to_string),
        format: OutputFormat::Text,
    }
}

/// Returns a fixed pod list and records each requested scope.
struct FixedLister {
    pods: Vec<Pod>,
    scopes: Mutex<Vec<NamespaceScope>>,
}

impl FixedLister {
    fn new(pods: Vec<Pod>) -> Self {
        Self {
            pods,
            scopes: Mutex::new(Vec::new()),
        }
    }
}

impl PodLister for FixedLister {
    async fn list(&self, scope: &NamespaceScope) -> Result<Vec<Pod>> {
        self.scopes.lock().unwrap().push(scope.clone());
        Ok(self.pods.clone())
    }
}

struct UnreachableCluster;

impl PodLister for UnreachableCluster {
    async fn list(&self, _scope: &NamespaceScope) -> Result<Vec<Pod>> {
        Err(CheckerError::Retrieval(
            "error trying to connect: tcp connect error: Connection refused".to_string(),
        ))
    }
}

/// Forbids host networking with a fixed message.
struct NoHostNetwork;

impl Check for NoHostNetwork {
    fn id(&self) -> &'static str {
        "noHostNetwork"
    }

    fn level(&self) -> Level {
        Level::Baseline
    }

    fn evaluate(&self, _metadata: &ObjectMeta, spec: &PodSpec) -> Verdict {
        if spec.host_network == Some(true) {
            Verdict::forbidden("host namespaces", "hostNetwork is forbidden")
        } else {
            Verdict::Allowed
        }
    }
}

async fn run_scan(
    config: &RunConfig,
    lister: &impl PodLister,
    evaluator: &Evaluator,
) -> (Result<psa_checker::RunOutcome>, String) {
    let mut out = Vec::new();
    let result = scan(config, lister, evaluator, &CancellationToken::new(), &mut out).await;
    (result, String::from_utf8(out).unwrap())
}

#[tokio::test]
async fn test_no_pods_no_output() {
    let evaluator = Evaluator::with_default_checks().unwrap();
    let lister = FixedLister::new(Vec::new());

    let (result, output) = run_scan(&config(Level::Restricted, None), &lister, &evaluator).await;
    let outcome = result.unwrap();

    assert!(output.is_empty());
    assert_eq!(outcome.exit_code(), EXIT_OK);
}

#[tokio::test]
async fn test_only_violating_pod_is_reported() {
    let evaluator = Evaluator::new(vec![Box::new(NoHostNetwork)]).unwrap();
    let lister = FixedLister::new(vec![
        pod("web", "pod-a", app_spec()),
        pod("infra", "pod-b", host_network_spec()),
    ]);

    let (result, output) = run_scan(&config(Level::Baseline, None), &lister, &evaluator).await;
    let outcome = result.unwrap();

    assert_eq!(
        output,
        "Pod infra/pod-b is not allowed to run in baseline: hostNetwork is forbidden\n"
    );
    assert_eq!(outcome.pods_scanned, 2);
    assert_eq!(outcome.exit_code(), EXIT_VIOLATIONS);
}

#[tokio::test]
async fn test_default_checks_end_to_end() {
    let evaluator = Evaluator::with_default_checks().unwrap();
    let lister = FixedLister::new(vec![
        pod("web", "pod-a", app_spec()),
        pod("infra", "pod-b", host_network_spec()),
    ]);

    let (result, output) = run_scan(&config(Level::Baseline, None), &lister, &evaluator).await;

    assert_eq!(
        output,
        "Pod infra/pod-b is not allowed to run in baseline: hostNetwork=true\n"
    );
    assert_eq!(result.unwrap().exit_code(), EXIT_VIOLATIONS);
}

#[tokio::test]
async fn test_namespace_selector_sets_scope() {
    let evaluator = Evaluator::with_default_checks().unwrap();
    let lister = FixedLister::new(Vec::new());

    run_scan(&config(Level::Baseline, None), &lister, &evaluator)
        .await
        .0
        .unwrap();
    run_scan(&config(Level::Baseline, Some("payments")), &lister, &evaluator)
        .await
        .0
        .unwrap();

    assert_eq!(
        *lister.scopes.lock().unwrap(),
        vec![
            NamespaceScope::All,
            NamespaceScope::Namespace("payments".to_string())
        ]
    );
}

#[tokio::test]
async fn test_list_failure_produces_no_report() {
    let evaluator = Evaluator::with_default_checks().unwrap();

    let (result, output) =
        run_scan(&config(Level::Baseline, None), &UnreachableCluster, &evaluator).await;
    let err = result.unwrap_err();

    assert!(output.is_empty());
    assert!(matches!(err, CheckerError::Retrieval(_)));
    assert_ne!(err.exit_code(), EXIT_OK);
    assert_ne!(err.exit_code(), EXIT_VIOLATIONS);
}

#[tokio::test]
async fn test_interrupt_before_listing_produces_no_report() {
    let evaluator = Evaluator::with_default_checks().unwrap();
    let lister = FixedLister::new(vec![pod("infra", "pod-b", host_network_spec())]);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let mut out = Vec::new();
    let err = scan(
        &config(Level::Baseline, None),
        &lister,
        &evaluator,
        &cancel,
        &mut out,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, CheckerError::Cancelled));
    assert!(out.is_empty());
    assert!(lister.scopes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_restricted_violations_for_privileged_pod() {
    let evaluator = Evaluator::with_default_checks().unwrap();
    let spec = PodSpec {
        containers: vec![Container {
            name: "shell".to_string(),
            security_context: Some(SecurityContext {
                privileged: Some(true),
                run_as_user: Some(0),
                ..Default::default()
            }),
            ..Default::default()
        }],
        ..Default::default()
    };
    let lister = FixedLister::new(vec![pod("debug", "toolbox", spec)]);

    let (result, output) = run_scan(&config(Level::Restricted, None), &lister, &evaluator).await;
    let outcome = result.unwrap();
    let lines: Vec<&str> = output.lines().collect();

    // allowPrivilegeEscalation, capabilities, privileged, runAsNonRoot, runAsUser, seccomp
    assert_eq!(outcome.violations, 6);
    assert_eq!(lines.len(), 6);
    assert!(lines.contains(
        &"Pod debug/toolbox is not allowed to run in restricted: container \"shell\" must not set runAsUser=0"
    ));
    assert!(lines.contains(
        &"Pod debug/toolbox is not allowed to run in restricted: container \"shell\" must not set securityContext.privileged=true"
    ));
}

//! Pod Lister.

use crate::error::{CheckerError, Result};
use k8s_openapi::api::core::v1::Pod;
use kube::Client;
use kube::api::{Api, ListParams};
use std::fmt;
use tokio_util::sync::CancellationToken;

/// Which namespaces a list request covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceScope {
    All,
    Namespace(String),
}

impl NamespaceScope {
    /// Build a scope from a namespace selector. Empty or absent selects all namespaces.
    pub fn from_selector(namespace: Option<&str>) -> Self {
        match namespace {
            Some(ns) if !ns.is_empty() => Self::Namespace(ns.to_string()),
            _ => Self::All,
        }
    }
}

impl fmt::Display for NamespaceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all namespaces"),
            Self::Namespace(ns) => write!(f, "namespace {}", ns),
        }
    }
}

/// Something that can list the pods of a cluster.
pub trait PodLister {
    /// Issue a single list request for the pods in `scope`.
    fn list(&self, scope: &NamespaceScope) -> impl Future<Output = Result<Vec<Pod>>> + Send;
}

/// Lists pods through the Kubernetes API.
#[derive(Clone)]
pub struct KubePodLister {
    client: Client,
}

impl KubePodLister {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl PodLister for KubePodLister {
    async fn list(&self, scope: &NamespaceScope) -> Result<Vec<Pod>> {
        let pods: Api<Pod> = match scope {
            NamespaceScope::Namespace(ns) => Api::namespaced(self.client.clone(), ns),
            NamespaceScope::All => Api::all(self.client.clone()),
        };

        let pod_list = pods
            .list(&ListParams::default())
            .await
            .map_err(|e| CheckerError::Retrieval(e.to_string()))?;

        Ok(pod_list.items)
    }
}

/// List pods, aborting if `cancel` fires before the request completes.
///
/// Failures are not retried.
pub async fn list_pods<L: PodLister>(
    lister: &L,
    scope: &NamespaceScope,
    cancel: &CancellationToken,
) -> Result<Vec<Pod>> {
    if cancel.is_cancelled() {
        return Err(CheckerError::Cancelled);
    }

    log::debug!("Listing pods in {}", scope);
    let pods = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(CheckerError::Cancelled),
        result = lister.list(scope) => result?,
    };
    log::debug!("Received {} pod(s)", pods.len());

    Ok(pods)
}

//! Cluster access: session construction and pod listing.
//!
//! Connection parameters come from a [`KubeconfigSource`], which the caller
//! injects. [`AmbientKubeconfig`] is the production source: it follows the
//! usual kubeconfig loading rules (`KUBECONFIG`, `~/.kube/config`, in-cluster
//! service account) with an optional context override.
//!
//! # Example
//!
//! ```rust,ignore
//! use psa_checker::cluster::{AmbientKubeconfig, KubePodLister, NamespaceScope, connect};
//!
//! let client = connect(&AmbientKubeconfig::default(), Some("kind-dev")).await?;
//! let lister = KubePodLister::new(client);
//! ```

pub mod pods;

pub use pods::{KubePodLister, NamespaceScope, PodLister, list_pods};

use crate::error::{CheckerError, Result};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use std::path::PathBuf;

/// A provider of cluster connection parameters.
pub trait KubeconfigSource {
    /// Resolve connection parameters, optionally for a named context.
    fn load(&self, context: Option<&str>) -> impl Future<Output = Result<Config>> + Send;
}

/// Kubeconfig resolved from the environment.
#[derive(Debug, Clone, Default)]
pub struct AmbientKubeconfig {
    /// Read this kubeconfig file instead of following the loading rules.
    pub path: Option<PathBuf>,
}

impl AmbientKubeconfig {
    /// Use a specific kubeconfig file.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }
}

fn context_options(context: Option<&str>) -> KubeConfigOptions {
    KubeConfigOptions {
        context: context.map(str::to_string),
        ..Default::default()
    }
}

impl KubeconfigSource for AmbientKubeconfig {
    async fn load(&self, context: Option<&str>) -> Result<Config> {
        let connection_error = |e: &dyn std::fmt::Display| CheckerError::Connection(e.to_string());

        if let Some(path) = &self.path {
            let kubeconfig = Kubeconfig::read_from(path).map_err(|e| connection_error(&e))?;
            return Config::from_custom_kubeconfig(kubeconfig, &context_options(context))
                .await
                .map_err(|e| connection_error(&e));
        }

        match context {
            Some(_) => Config::from_kubeconfig(&context_options(context))
                .await
                .map_err(|e| connection_error(&e)),
            None => Config::infer().await.map_err(|e| connection_error(&e)),
        }
    }
}

/// Build a cluster client from the source's connection parameters.
///
/// An empty context name is treated the same as no override.
pub async fn connect<S: KubeconfigSource>(source: &S, context: Option<&str>) -> Result<Client> {
    let context = context.filter(|c| !c.is_empty());
    log::debug!(
        "Resolving kubeconfig (context: {})",
        context.unwrap_or("<current>")
    );

    let config = source.load(context).await?;
    log::debug!("Connecting to {}", config.cluster_url);

    let _ = rustls::crypto::ring::default_provider().install_default();
    Client::try_from(config).map_err(|e| CheckerError::Connection(e.to_string()))
}

//! # psa-checker
//!
//! Lists the pods of a Kubernetes cluster and reports every one that would be
//! rejected by a Pod Security Standards level (`baseline` or `restricted`).
//!
//! ## Pipeline
//!
//! - **Configuration**: [`config::RunConfig::resolve`] validates the level and selectors
//! - **Session**: [`cluster::connect`] builds a client from the kubeconfig
//! - **Listing**: [`cluster::list_pods`] issues one cancellable list request
//! - **Evaluation**: [`policy::Evaluator`] checks each pod spec
//! - **Report**: [`report::report_violations`] prints one line per violation
//!
//! ## Example
//!
//! ```rust,no_run
//! use psa_checker::cluster::AmbientKubeconfig;
//! use psa_checker::config::{FileConfig, RawInputs, RunConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> psa_checker::Result<()> {
//! let config = RunConfig::resolve(RawInputs::default(), FileConfig::default())?;
//! let outcome = psa_checker::run(
//!     &config,
//!     &AmbientKubeconfig::default(),
//!     &CancellationToken::new(),
//!     &mut std::io::stdout(),
//! )
//! .await?;
//! std::process::exit(outcome.exit_code());
//! # }
//! ```

pub mod cli;
pub mod cluster;
pub mod config;
pub mod error;
pub mod policy;
pub mod report;

pub use error::{CheckerError, Result};
pub use report::RunOutcome;

use cluster::{KubePodLister, KubeconfigSource, NamespaceScope, PodLister, connect, list_pods};
use config::RunConfig;
use policy::Evaluator;
use std::io::Write;
use tokio_util::sync::CancellationToken;

/// The current version of the CLI tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Connect to the cluster and report every pod violating the configured level.
pub async fn run<S, W>(
    config: &RunConfig,
    kubeconfig: &S,
    cancel: &CancellationToken,
    out: &mut W,
) -> Result<RunOutcome>
where
    S: KubeconfigSource,
    W: Write,
{
    let evaluator = Evaluator::with_default_checks()?;
    let client = connect(kubeconfig, config.context.as_deref()).await?;
    let lister = KubePodLister::new(client);

    scan(config, &lister, &evaluator, cancel, out).await
}

/// List pods through `lister` and report violations to `out`.
pub async fn scan<L, W>(
    config: &RunConfig,
    lister: &L,
    evaluator: &Evaluator,
    cancel: &CancellationToken,
    out: &mut W,
) -> Result<RunOutcome>
where
    L: PodLister,
    W: Write,
{
    let scope = NamespaceScope::from_selector(config.namespace.as_deref());
    let pods = list_pods(lister, &scope, cancel).await?;

    let outcome = report::report_violations(&pods, evaluator, config.level, config.format, out)?;
    log::info!(
        "Scanned {} pod(s) in {} against {}: {} violation(s)",
        outcome.pods_scanned,
        scope,
        config.level,
        outcome.violations
    );

    Ok(outcome)
}

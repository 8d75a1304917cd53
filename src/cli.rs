use crate::config::RawInputs;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "psa-cluster-checker")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Check running pods against the Pod Security Standards")]
#[command(long_about = "Lists the pods of a Kubernetes cluster and prints one line for every \
Pod Security Standards check a pod fails. Exits with 2 when any violation is found, \
0 when none is, and 1 on any error.")]
pub struct Cli {
    /// Pod Security Standards level to check against (baseline, restricted) [default: baseline]
    #[arg(long, env = "PSA_LEVEL", value_name = "LEVEL")]
    pub level: Option<String>,

    /// Kubernetes context to use (empty for the current context)
    #[arg(long, env = "PSA_CONTEXT", value_name = "CONTEXT")]
    pub context: Option<String>,

    /// Kubernetes namespace to scan (empty for all namespaces)
    #[arg(short, long, env = "PSA_NAMESPACE", value_name = "NAMESPACE")]
    pub namespace: Option<String>,

    /// Output format (text, json) [default: text]
    #[arg(long, env = "PSA_FORMAT", value_name = "FORMAT")]
    pub format: Option<String>,

    /// Read this kubeconfig file instead of the default locations
    #[arg(long, value_name = "FILE")]
    pub kubeconfig: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all logging
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }

    /// The selectors for the configuration resolver.
    pub fn raw_inputs(&self) -> RawInputs {
        RawInputs {
            level: self.level.clone(),
            context: self.context.clone(),
            namespace: self.namespace.clone(),
            format: self.format.clone(),
        }
    }
}

use clap::Parser;
use psa_checker::{
    RunOutcome,
    cli::Cli,
    cluster::AmbientKubeconfig,
    config::{self, RunConfig},
    error::{EXIT_FAULT, EXIT_OK},
};
use std::io;
use std::process;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    // Usage errors must not exit with 2, which means "violations found".
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { EXIT_FAULT } else { EXIT_OK };
            let _ = e.print();
            process::exit(code);
        }
    };

    cli.init_logging();

    match run(cli).await {
        Ok(outcome) => process::exit(outcome.exit_code()),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> psa_checker::Result<RunOutcome> {
    let file_config = config::load_config(cli.config.as_deref())?;
    let run_config = RunConfig::resolve(cli.raw_inputs(), file_config)?;
    log::debug!("Resolved configuration: {:?}", run_config);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupt received, cancelling");
            on_interrupt.cancel();
        }
    });

    let kubeconfig = match cli.kubeconfig {
        Some(path) => AmbientKubeconfig::from_path(path),
        None => AmbientKubeconfig::default(),
    };

    psa_checker::run(&run_config, &kubeconfig, &cancel, &mut io::stdout()).await
}

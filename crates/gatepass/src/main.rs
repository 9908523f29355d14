mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a store connection
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Scanning decodes locally; the store is only touched with --verify
        Command::Scan(args) => commands::scan::handle(args, &cli.global).await,

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "gatepass", &mut std::io::stdout());
            Ok(())
        }

        // All other commands require a store connection
        cmd => {
            let ctx = config::build_context(&cli.global)?;
            tracing::debug!(command = ?cmd, profile = %ctx.profile_name, "dispatching command");
            commands::dispatch(cmd, &ctx, &cli.global).await
        }
    }
}

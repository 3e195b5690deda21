use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tracing_subscriber::EnvFilter;

use armctl_core::Config;

mod cli;
mod commands;
mod connection;
mod error;
mod output;

use cli::{Cli, Commands};
use connection::ConnectionManager;
use error::Result as CliResult;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        e.print_diagnostic();
        std::process::exit(1);
    }
}

/// Map `-v` counts onto a tracing filter; `RUST_LOG` wins when set.
fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "armctl=info,armctl_core=info,azure_arm=info",
        2 => "armctl=debug,armctl_core=debug,azure_arm=debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> CliResult<()> {
    let config_path = cli.config_file.as_ref().map(PathBuf::from);
    let config = match &config_path {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    let conn_mgr = ConnectionManager::with_config_path(config, config_path);
    let profile = cli.profile.as_deref();

    match cli.command {
        Commands::Profile { command } => commands::profile::handle(conn_mgr, command, cli.output),
        Commands::Api {
            method,
            path,
            api_version,
            data,
        } => {
            commands::api::handle(
                &conn_mgr,
                profile,
                method,
                path,
                api_version,
                data,
                cli.output,
            )
            .await
        }
        Commands::ManagedApp { command } => {
            commands::managed_app::handle(&conn_mgr, profile, command, cli.output).await
        }
        Commands::RedisEnterprise { command } => {
            commands::redis_enterprise::handle(&conn_mgr, profile, command, cli.output).await
        }
        Commands::Openshift { command } => {
            commands::openshift::handle(&conn_mgr, profile, command, cli.output).await
        }
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "armctl", &mut std::io::stdout());
            Ok(())
        }
    }
}

//! vaws CLI - simulation images and clusters on AWS
//!
//! Usage: vaws <COMMAND>
//!
//! Commands:
//!   configure ami      Write a Packer build directory for a simulation package
//!   configure cluster  Write a parallelcluster configuration
//!   make ami           Build the image with packer
//!   make cluster       Create the cluster with pcluster

mod cli;
mod commands;
mod ui;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, ConfigureCommand, MakeCommand};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let (config, warnings) = vaws::config::load(cli.config.as_deref(), &cwd)?;
    ui::output::print_config_warnings(&warnings);

    match cli.command {
        Commands::Configure(ConfigureCommand::Ami(args)) => {
            commands::configure::cmd_configure_ami(args, &config, cli.json)
        }
        Commands::Configure(ConfigureCommand::Cluster(args)) => {
            commands::configure::cmd_configure_cluster(args, &config, cli.json)
        }
        Commands::Make(MakeCommand::Ami { spec }) => commands::make::cmd_make_ami(&spec, cli.json),
        Commands::Make(MakeCommand::Cluster { cluster_config }) => {
            commands::make::cmd_make_cluster(&cluster_config, cli.json)
        }
    }
}

/// Log to stderr; `-v` raises the level, `RUST_LOG` overrides it.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

//! # socbuild CLI Entry Point
//!
//! Parses the command line with clap, loads `socbuild.toml` and runs the
//! requested command chain.
//!
//! ```text
//! socbuild [OPTIONS] [PARAMETER=VALUE]... COMMAND [COMMANDS]...
//! ```

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use colored::*;
use std::io;
use std::path::PathBuf;

use socbuild::chain;
use socbuild::config;
use socbuild::errors::BuildError;
use socbuild::output::OutputSink;
use socbuild::process::ContainerRuntime;
use socbuild::session::Session;

#[derive(Parser)]
#[command(name = "socbuild")]
#[command(about = "Build, simulate and program the SoC", version = env!("CARGO_PKG_VERSION"))]
#[command(after_help = chain::help_text())]
struct Cli {
    /// Parameters (key=value) and commands, in any order
    #[arg(value_name = "PARAMETER=VALUE | COMMAND")]
    args: Vec<String>,

    /// Config file to use instead of ./socbuild.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print every command before running it
    #[arg(short, long)]
    verbose: bool,

    /// Show what would be executed without running
    #[arg(long)]
    dry_run: bool,

    /// Print a shell completion script and exit
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn main() {
    if let Err(err) = run() {
        let build_error = err.downcast_ref::<BuildError>();
        // Child failures have already been reported with the step's prefix.
        if !matches!(build_error, Some(BuildError::ChildFailed { .. })) {
            eprintln!("{} {:#}", "error:".red().bold(), err);
        }
        std::process::exit(build_error.map(BuildError::exit_code).unwrap_or(1));
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        generate(shell, &mut Cli::command(), "socbuild", &mut io::stdout());
        return Ok(());
    }

    if cli.args.is_empty() {
        Cli::command().print_help()?;
        return Ok(());
    }

    let plan = match chain::parse_arguments(&cli.args) {
        Ok(plan) => plan,
        Err(usage) => {
            if usage.shows_help() {
                Cli::command().print_help()?;
                println!();
            }
            println!("{}", usage);
            return Ok(());
        }
    };

    let config = config::load_config(cli.config.as_deref())?;
    let containers = ContainerRuntime::from_config(&config.container)?;

    let mut session = Session::new(OutputSink::stdio(), containers, config);
    session.verbose = cli.verbose;
    session.dry_run = cli.dry_run;
    if let Some(image) = plan.container_name {
        session.image = image;
    }

    chain::run_chain(&mut session, &plan.commands)
}

mod commands;
mod console_timer;
mod input;
mod shutdown;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use quakesplit_core::{EventCatalog, LayoutTable};
use tracing_subscriber::EnvFilter;

use commands::tracking::RunOptions;

#[derive(Parser)]
#[command(name = "quakesplit")]
#[command(about = "Autosplitter for Quake (JoeQuake)", version)]
struct Args {
    /// Settings file (events and options)
    #[arg(short, long, value_name = "FILE", default_value = "quakesplit.json")]
    settings: PathBuf,

    /// Extra memory layouts, tried before the built-in ones
    #[arg(long, value_name = "FILE", env = "QUAKESPLIT_LAYOUTS")]
    layouts: Option<PathBuf>,

    /// Process name to look for (repeatable); defaults to every known game
    #[arg(long = "process", value_name = "NAME")]
    processes: Vec<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Wait for the game and split automatically (default)
    Run {
        /// Directory for per-run logs
        #[arg(long, value_name = "DIR", default_value = "runs")]
        runs_dir: PathBuf,
    },
    /// Show the detected layout and current values
    Status {
        /// Process ID (skip automatic detection)
        #[arg(long)]
        pid: Option<u32>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List every event id usable in the settings file
    Events,
    /// Write a settings file for a full-game run
    InitSettings {
        /// Output file path
        #[arg(short, long, default_value = "quakesplit.json")]
        output: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the layout table, or save it as JSON
    Layouts {
        /// Output file path (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("quakesplit=info,quakesplit_core=info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let table = || -> Result<LayoutTable> {
        Ok(match &args.layouts {
            Some(path) => LayoutTable::with_overrides(path)?,
            None => LayoutTable::builtin(),
        })
    };

    match &args.command {
        None => commands::tracking::run(&run_options(&args, PathBuf::from("runs"))),
        Some(Command::Run { runs_dir }) => {
            commands::tracking::run(&run_options(&args, runs_dir.clone()))
        }
        Some(Command::Status { pid, json }) => {
            let table = table()?;
            let names: Vec<&str> = if args.processes.is_empty() {
                table.process_names()
            } else {
                args.processes.iter().map(String::as_str).collect()
            };
            commands::status::run(&table, &names, *pid, *json)
        }
        Some(Command::Events) => {
            commands::events::run(&EventCatalog::build());
            Ok(())
        }
        Some(Command::InitSettings { output, force }) => commands::init_settings::run(output, *force),
        Some(Command::Layouts { output }) => commands::layouts::run(&table()?, output.as_deref()),
    }
}

fn run_options(args: &Args, runs_dir: PathBuf) -> RunOptions {
    RunOptions {
        settings: args.settings.clone(),
        layouts: args.layouts.clone(),
        processes: args.processes.clone(),
        runs_dir,
    }
}

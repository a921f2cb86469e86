//! Tally - personal task-list manager

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tally::cli::{self, Cli, Commands};
use tally::task::Store;

fn main() -> Result<()> {
    if std::env::var("TALLY_DEBUG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter("tally=debug")
            .init();
    }

    let cli = Cli::parse();

    // Completion generation needs no store and works in read-only
    // environments.
    if let Commands::Completion { shell } = cli.command {
        generate(shell, &mut Cli::command(), "tally", &mut std::io::stdout());
        return Ok(());
    }

    // One store per invocation, passed by reference to every handler.
    let store = match &cli.data_dir {
        Some(dir) => Store::open(dir)?,
        None => Store::open_default()?,
    };

    match cli.command {
        Commands::Add(args) => cli::add::run(&store, args),
        Commands::List(args) => cli::list::run(&store, args),
        Commands::Edit(args) => cli::edit::run(&store, args),
        Commands::Done(args) => cli::done::run(&store, args),
        Commands::Remove(args) => cli::remove::run(&store, args),
        Commands::Archive(args) => cli::archive::run(&store, args),
        Commands::Stats(args) => cli::stats::run(&store, args),
        Commands::Completion { .. } => unreachable!(),
    }
}

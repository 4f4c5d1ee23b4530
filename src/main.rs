mod cli;
mod config;
mod fleet;
mod flow;
mod git;
mod gitlab;
mod output;
mod prompt;
mod repo;
#[cfg(test)]
mod testing;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let Cli { command } = Cli::parse();
    let config = config::load_config()?;

    match command {
        Commands::List(args) => fleet::list::run(&args, &config)?,
        Commands::Branch(args) => repo::branch::run(&args, &config)?,
        Commands::Checkout(args) => repo::checkout::run(&args, &config)?,
        Commands::Mergeall(args) => fleet::merge::run(&args, &config)?,
        Commands::Prune(args) => repo::prune::run(&args, &config)?,
        Commands::Diff(args) => repo::diff::run(&args, &config)?,
        Commands::Issue(cmd) => flow::issue::run(&cmd, &config)?,
        Commands::Mr(cmd) => flow::mr::run(&cmd, &config)?,
        Commands::Members(args) => flow::members::run(&args, &config)?,
        Commands::Missing(args) => flow::missing::run(&args, &config)?,
        Commands::Config(cmd) => cmd.run()?,
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "flo", &mut std::io::stdout());
        }
    }

    Ok(())
}

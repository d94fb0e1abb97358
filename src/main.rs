use clap::Parser;
use miette::Result;
use pxl::cli::{Cli, Commands};
use pxl::output::Printer;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let printer = Printer::new();

    match cli.command {
        Commands::Compile(args) => pxl::cli::compile::run(args, &printer)?,
        Commands::Check(args) => pxl::cli::check::run(args, &printer)?,
        Commands::Completions(args) => pxl::cli::completions::run(args)?,
    }

    Ok(())
}

//! Binary entry point for the `chandler` CLI.

use clap::Parser;

mod cli;
mod commands;
mod distribution;
mod error;
mod logging;
mod recipe;
mod templates;
mod transport;

fn main() {
    let args = cli::Cli::parse();
    logging::init(args.verbose);

    if let Err(err) = ctrlc::set_handler(|| {
        eprintln!("chandler: interrupted");
        std::process::exit(130);
    }) {
        tracing::debug!("could not install interrupt handler: {err}");
    }

    let result = match args.command {
        cli::Command::Setup(opts) => commands::setup::run(&args.global, &opts),
        cli::Command::Config(opts) => commands::config::run(&args.global, &opts),
        cli::Command::Generate { what } => commands::generate::run(&args.global, &what),
        cli::Command::Completions { shell } => {
            use clap::CommandFactory as _;
            clap_complete::generate(
                shell,
                &mut cli::Cli::command(),
                "chandler",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    };

    if let Err(err) = result {
        eprintln!("chandler: error: {err:#}");
        std::process::exit(1);
    }
}

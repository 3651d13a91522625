use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the chandler provisioning tool.
#[derive(Parser, Debug)]
#[command(
    name = "chandler",
    about = "Recipe-driven package setup and configuration for remote hosts",
    version = option_env!("CHANDLER_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared across all subcommands
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Preview commands and uploads without executing
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Override the recipe root directory (default: ./recipes)
    #[arg(long, global = true)]
    pub recipes: Option<std::path::PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install packages and replay their setup
    Setup(SetupOpts),
    /// Upload configuration files without installing
    Config(ConfigOpts),
    /// Scaffold recipe directories and files
    Generate {
        /// What to scaffold
        #[command(subcommand)]
        what: GenerateCommand,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

/// Options for the `setup` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct SetupOpts {
    /// Distribution whose recipes to use
    pub distribution: String,

    /// Packages to install
    #[arg(required = true)]
    pub packages: Vec<String>,

    /// Remote hosts to provision (default: the local machine)
    #[arg(long, value_delimiter = ',')]
    pub host: Vec<String>,

    /// Override the install command from common.toml
    #[arg(long)]
    pub install_command: Option<String>,
}

/// Options for the `config` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct ConfigOpts {
    /// Distribution whose recipes to use
    pub distribution: String,

    /// Packages whose configuration to replay
    #[arg(required = true)]
    pub packages: Vec<String>,

    /// Remote hosts to configure (default: the local machine)
    #[arg(long, value_delimiter = ',')]
    pub host: Vec<String>,
}

/// Scaffolding subcommands under `generate`.
#[derive(Subcommand, Debug)]
pub enum GenerateCommand {
    /// Create a distribution directory with a starter common.toml
    Template {
        /// Distribution to scaffold
        distribution: String,

        /// Directory to scaffold under (default: the recipe root)
        directory: Option<std::path::PathBuf>,
    },
    /// Write a starter recipe into every distribution directory
    Recipe {
        /// Packages to generate recipes for
        #[arg(required = true)]
        packages: Vec<String>,

        /// Overwrite recipe files that already exist
        #[arg(short, long)]
        force: bool,
    },
}

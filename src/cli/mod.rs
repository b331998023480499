pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::app::Stores;
use crate::config::{self, AppConfig};
use crate::fixtures::Fixture;
use crate::forms::ProfileLimits;

#[derive(Parser)]
#[command(name = "fitreview")]
#[command(about = "FitReview CLI - operate the instructor directory from the shell")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(
        long,
        global = true,
        help = "Load a fixture file before running the command (useful with STORE_BACKEND=memory)"
    )]
    pub fixture: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Load demo accounts, profiles and reviews from a fixture file")]
    Seed {
        #[arg(help = "Fixture JSON file", default_value = "fixtures/demo.json")]
        path: PathBuf,
    },

    #[command(about = "Browse the instructor directory")]
    Instructors {
        #[command(subcommand)]
        cmd: commands::instructors::InstructorCommands,
    },

    #[command(about = "Account administration")]
    Accounts {
        #[command(subcommand)]
        cmd: commands::accounts::AccountCommands,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Everything a command needs: opened stores, configuration and output mode
pub struct CliContext {
    pub config: AppConfig,
    pub stores: Stores,
    pub output: OutputFormat,
}

impl CliContext {
    pub fn limits(&self) -> ProfileLimits {
        ProfileLimits::from(&self.config.directory)
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = config::config().clone();
    let stores = Stores::open(&config.database).await?;
    let ctx = CliContext {
        output: OutputFormat::from_cli(&cli),
        config,
        stores,
    };

    if let Some(path) = &cli.fixture {
        Fixture::from_path(path)?.seed(&ctx.stores, &ctx.limits()).await?;
    }

    match cli.command {
        Commands::Seed { path } => commands::seed::handle(&ctx, path).await,
        Commands::Instructors { cmd } => commands::instructors::handle(&ctx, cmd).await,
        Commands::Accounts { cmd } => commands::accounts::handle(&ctx, cmd).await,
    }
}

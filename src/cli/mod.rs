pub mod commands;

use clap::{Parser, Subcommand};
use crate::error::Result;
use std::path::PathBuf;

pub use commands::Paths;

#[derive(Parser)]
#[command(name = "lesson-progress")]
#[command(about = "Rewrite the lesson progress table in a README from folder state")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Repository root that topic folders are relative to
    #[arg(long, global = true, env = "LESSON_PROGRESS_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Topic configuration file (default: <root>/topics.json)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// README to patch (default: <root>/README.md)
    #[arg(short, long, global = true)]
    pub readme: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify folders and rewrite the README progress block (default)
    Update,

    /// Print the rendered progress block without touching the README
    Show,

    /// Fail if the README progress block is out of date
    Check,

    /// Write a starter topics.json
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        commands::init_logging(self.debug, self.verbose)?;

        let paths = Paths::resolve(self.root, self.config, self.readme);

        match self.command.unwrap_or(Commands::Update) {
            Commands::Update => commands::update(&paths).map(|_| ()),
            Commands::Show => commands::show(&paths),
            Commands::Check => commands::check(&paths),
            Commands::Init { force } => commands::init(&paths, force),
            Commands::Completions { shell } => {
                commands::generate_completions(shell);
                Ok(())
            }
        }
    }
}

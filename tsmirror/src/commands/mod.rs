mod check;
mod generate;
mod init;

use std::path::Path;

use check::CheckCommand;
use clap::{Parser, Subcommand};
use eyre::Result;
use generate::GenerateCommand;
use init::InitCommand;
use tracing::debug;
use tsmirror_codegen::Generator;
use tsmirror_manifest::ManifestFile;

/// Extension trait for exiting on manifest errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for tsmirror_manifest::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

/// Open a manifest and lower it into a generator, exiting on manifest errors.
pub(crate) fn load(config: &Path) -> (ManifestFile, Generator) {
    let file = ManifestFile::open(config).unwrap_or_exit();
    let (graph, input) = file.manifest().lower().unwrap_or_exit();
    debug!(path = %file.path().display(), types = graph.len(), "loaded manifest");
    (file, Generator::from_parts(graph, input))
}

#[derive(Parser)]
#[command(name = "tsmirror")]
#[command(version)]
#[command(about = "Generate TypeScript types and fetch stubs from backend type declarations")]
pub(crate) struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Init(cmd) => cmd.run(),
            Commands::Generate(cmd) => cmd.run(),
            Commands::Check(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter tsmirror.toml
    Init(InitCommand),

    /// Generate TypeScript from tsmirror.toml
    Generate(GenerateCommand),

    /// Validate tsmirror.toml without generating code
    Check(CheckCommand),
}

use std::path::{Path, PathBuf};

use clap::Args;
use eyre::{Context, Result};
use tsmirror_codegen::WriteResult;
use tsmirror_core::is_identifier;
use tsmirror_manifest::MANIFEST_FILE;

#[derive(Args)]
pub struct GenerateCommand {
    /// Path to tsmirror.toml
    #[arg(short, long, default_value = MANIFEST_FILE)]
    pub config: PathBuf,

    /// Output file, or `-` for stdout (defaults to `[output] path`, else stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Namespace to wrap the declarations in, replacing the manifest's
    #[arg(long)]
    pub namespace: Option<String>,

    /// Show what would be written without touching the file
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateCommand {
    pub fn run(&self) -> Result<()> {
        let (file, mut generator) = super::load(&self.config);

        if let Some(namespace) = &self.namespace {
            if !namespace.split('.').all(is_identifier) {
                eyre::bail!("invalid namespace '{}'", namespace);
            }
            generator = generator.namespace(namespace.clone());
        }

        let target = self.output.clone().or_else(|| file.output_path());
        let Some(path) = target.filter(|path| path != Path::new("-")) else {
            return generator.generate(&mut std::io::stdout().lock());
        };

        if self.dry_run {
            let output = generator.render()?;
            let unchanged = std::fs::read_to_string(&path).is_ok_and(|existing| existing == output);
            if unchanged {
                println!("{} is up to date", path.display());
            } else {
                println!("Would write {} ({} bytes)", path.display(), output.len());
            }
            return Ok(());
        }

        let result = generator
            .write_to(&path)
            .wrap_err_with(|| format!("failed to generate {}", path.display()))?;
        match result {
            WriteResult::Written => println!("✓ Wrote {}", path.display()),
            WriteResult::Unchanged => println!("✓ {} is up to date", path.display()),
        }
        Ok(())
    }
}

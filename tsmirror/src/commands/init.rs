use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use tsmirror_manifest::{MANIFEST_FILE, ManifestFile, STARTER_MANIFEST};

use super::UnwrapOrExit;

#[derive(Args)]
pub struct InitCommand {
    /// Where to create the manifest
    #[arg(default_value = MANIFEST_FILE)]
    pub path: PathBuf,
}

impl InitCommand {
    pub fn run(&self) -> Result<()> {
        if self.path.exists() {
            eyre::bail!("{} already exists", self.path.display());
        }

        let file = ManifestFile::create(&self.path, STARTER_MANIFEST).unwrap_or_exit();
        println!("✓ Created {}", file.path().display());
        if let Some(output) = file.output_path() {
            println!("  Run 'tsmirror generate' to write {}", output.display());
        }
        Ok(())
    }
}

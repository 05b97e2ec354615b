use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

use super::Manifest;
use crate::Result;

/// A tsmirror.toml file with both raw content and parsed manifest.
#[derive(Debug)]
pub struct ManifestFile {
    path: PathBuf,
    content: String,
    manifest: Manifest,
}

impl ManifestFile {
    /// Open and parse a tsmirror.toml file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path).map_err(|e| io_error(&path, e))?;
        let filename = path.display().to_string();
        let manifest = Manifest::from_str_with_filename(&content, &filename)?;

        Ok(Self {
            path,
            content,
            manifest,
        })
    }

    /// Validate `content` and write it to a new file. Fails if the file exists.
    pub fn create(path: impl AsRef<Path>, content: impl Into<String>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = content.into();
        let manifest = Manifest::from_str_with_filename(&content, &path.display().to_string())?;

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| io_error(&path, e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| io_error(&path, e))?;

        Ok(Self {
            path,
            content,
            manifest,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Directory containing the manifest; relative paths resolve against it.
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// `[output] path`, resolved against the manifest directory.
    pub fn output_path(&self) -> Option<PathBuf> {
        let path = self.manifest.output.path.as_ref()?;
        if path.is_absolute() {
            Some(path.clone())
        } else {
            Some(self.directory().join(path))
        }
    }
}

fn io_error(path: &Path, source: std::io::Error) -> Box<crate::Error> {
    Box::new(crate::Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

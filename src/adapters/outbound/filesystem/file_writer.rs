use crate::ports::outbound::OutputPresenter;
use crate::shared::Result;
use anyhow::{bail, Context};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// FileSystemWriter adapter for writing report output to files
///
/// Refuses to write through symlinks and requires the parent directory
/// to already exist, so a typo in `--output` fails loudly instead of
/// scattering files.
pub struct FileSystemWriter {
    output_path: PathBuf,
}

impl FileSystemWriter {
    pub fn new(output_path: PathBuf) -> Self {
        Self { output_path }
    }

    fn validate_output_path(&self) -> Result<()> {
        if let Some(parent) = self.output_path.parent() {
            if !parent.exists() && parent != Path::new("") {
                bail!(
                    "Parent directory does not exist: {}\n\n💡 Hint: Create the directory first or pass a different --output path",
                    parent.display()
                );
            }
        }

        if self.output_path.exists() {
            let metadata = fs::symlink_metadata(&self.output_path)
                .with_context(|| format!("Failed to read metadata: {}", self.output_path.display()))?;
            if metadata.is_symlink() {
                bail!(
                    "Output path is a symbolic link: {}. Writing through symlinks is not allowed.",
                    self.output_path.display()
                );
            }
        }

        Ok(())
    }
}

impl OutputPresenter for FileSystemWriter {
    fn present(&self, content: &str) -> Result<()> {
        self.validate_output_path()?;

        fs::write(&self.output_path, content)
            .with_context(|| format!("Failed to write report: {}", self.output_path.display()))?;

        eprintln!("✅ Report written: {}", self.output_path.display());
        Ok(())
    }
}

/// StdoutPresenter adapter for writing report output to stdout
pub struct StdoutPresenter;

impl StdoutPresenter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StdoutPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputPresenter for StdoutPresenter {
    fn present(&self, content: &str) -> Result<()> {
        io::stdout()
            .write_all(content.as_bytes())
            .map_err(|e| anyhow::anyhow!("Failed to write to stdout: {}", e))?;
        Ok(())
    }
}

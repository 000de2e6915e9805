use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use pqr_forge::io::write_pqr_records;
use pqr_forge::{MissingValuePolicy, UnclassifiedPolicy};

use crate::commands::{InputFiles, PolicyOverrides, System};

const STDIN_OUTPUT_NAME: &str = "structure.pqr";

/// Options for writing the resolved PQR file.
#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Output PQR path. Defaults to the input path with a `.pqr` extension.
    #[arg(short, long, value_name = "PQR")]
    pub output: Option<PathBuf>,
    /// How to treat ligand instances whose size matches no protonation variant.
    #[arg(long = "on-unclassified", value_enum)]
    pub on_unclassified: Option<UnclassifiedCli>,
    /// How to treat atoms with no charge or radius.
    #[arg(long = "on-missing", value_enum)]
    pub on_missing: Option<MissingCli>,
}

impl ConvertArgs {
    /// Policy overrides requested on the command line.
    pub fn overrides(&self) -> PolicyOverrides {
        PolicyOverrides {
            on_unclassified: self.on_unclassified.map(Into::into),
            on_missing: self.on_missing.map(Into::into),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UnclassifiedCli {
    /// Abort the run.
    #[value(name = "fail")]
    Fail,
    /// Drop the instance with a warning.
    #[value(name = "skip")]
    Skip,
    /// Keep the instance; missing charges follow --on-missing.
    #[value(name = "include")]
    Include,
}

impl From<UnclassifiedCli> for UnclassifiedPolicy {
    fn from(value: UnclassifiedCli) -> Self {
        match value {
            UnclassifiedCli::Fail => UnclassifiedPolicy::Fail,
            UnclassifiedCli::Skip => UnclassifiedPolicy::Skip,
            UnclassifiedCli::Include => UnclassifiedPolicy::Include,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MissingCli {
    /// Abort the run naming the atom.
    #[value(name = "fail")]
    Fail,
    /// Write 0.0 with a warning.
    #[value(name = "zero")]
    Zero,
}

impl From<MissingCli> for MissingValuePolicy {
    fn from(value: MissingCli) -> Self {
        match value {
            MissingCli::Fail => MissingValuePolicy::Fail,
            MissingCli::Zero => MissingValuePolicy::Zero,
        }
    }
}

/// Resolves the system and writes the PQR file.
pub fn run(system: &System, files: &InputFiles, args: &ConvertArgs) -> Result<()> {
    let resolution = system.resolve()?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(files.structure.as_deref()));
    move_aside_existing(&output)?;

    let file = File::create(&output)
        .with_context(|| format!("Failed to create output file {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    write_pqr_records(&mut writer, &resolution.records)
        .with_context(|| format!("Failed to write PQR output to {}", output.display()))?;
    writer.flush().context("Failed to flush output writer")?;

    let summary = &resolution.summary;
    log::info!(
        "Wrote {} atoms to {} (net charge {:.4})",
        resolution.records.len(),
        output.display(),
        summary.net_charge
    );
    if summary.skipped > 0 {
        log::warn!(
            "{} ligand instances were skipped; the output has fewer atoms than the input",
            summary.skipped
        );
    }

    Ok(())
}

/// Output path derived from the structure path, or a fixed name when reading stdin.
fn default_output_path(structure: Option<&Path>) -> PathBuf {
    match structure {
        Some(path) => path.with_extension("pqr"),
        None => PathBuf::from(STDIN_OUTPUT_NAME),
    }
}

/// Renames an existing file at `path` to `<path>_<n>` using the first free `n`.
fn move_aside_existing(path: &Path) -> Result<Option<PathBuf>> {
    if !path.is_file() {
        return Ok(None);
    }

    let backup = (1..)
        .map(|n| {
            let mut name = path.as_os_str().to_owned();
            name.push(format!("_{n}"));
            PathBuf::from(name)
        })
        .find(|candidate| !candidate.exists())
        .context("No free backup name for existing output file")?;

    fs::rename(path, &backup).with_context(|| {
        format!(
            "Failed to move existing {} to {}",
            path.display(),
            backup.display()
        )
    })?;
    log::warn!("Moved existing {} to {}", path.display(), backup.display());
    Ok(Some(backup))
}

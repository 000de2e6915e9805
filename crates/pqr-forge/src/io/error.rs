//! Canonical error type for every reader and writer in the crate.
//!
//! Structure, topology, and parameter loaders as well as the PQR writer wrap their failures
//! into a single `Error` enum. Readers operate on plain streams and report `stream source`;
//! callers that know the originating file attach it afterwards with [`Error::with_path`].

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading input tables or writing PQR output.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrapper around operating-system level I/O failures.
    #[error(
        "I/O error for {path_desc}: {source}",
        path_desc = PathDisplay(path)
    )]
    Io {
        /// Path to the file involved in the failed operation, if any.
        path: Option<PathBuf>,
        /// Underlying error emitted by the standard library.
        #[source]
        source: std::io::Error,
    },

    /// An input line could not be parsed into the expected record.
    #[error(
        "failed to parse {format} {path_desc}: {details} (line {line_number})",
        path_desc = PathDisplay(path)
    )]
    Parse {
        /// Name of the textual format (e.g., `"PDB"`, `"ITP"`).
        format: &'static str,
        /// Path to the offending file, if known.
        path: Option<PathBuf>,
        /// One-based line number where parsing failed.
        line_number: usize,
        /// Human-readable description of what went wrong.
        details: String,
    },

    /// A required section or record type never appeared in the input.
    #[error(
        "{format} {path_desc} has no {section} records",
        path_desc = PathDisplay(path)
    )]
    MissingSection {
        format: &'static str,
        path: Option<PathBuf>,
        section: &'static str,
    },

    /// Logical inconsistencies such as conflicting duplicate rows.
    #[error(
        "inconsistent data in {format} {path_desc}: {details}",
        path_desc = PathDisplay(path)
    )]
    InconsistentData {
        /// Name of the textual format being processed.
        format: &'static str,
        /// Related file path when available.
        path: Option<PathBuf>,
        /// Summary of the detected inconsistency.
        details: String,
    },
}

impl Error {
    /// Constructs an [`Error::Io`] variant from a standard I/O error.
    ///
    /// # Arguments
    ///
    /// * `source` - The original `std::io::Error` emitted by the OS or runtime.
    /// * `path` - Optional file path associated with the operation.
    pub fn from_io(source: std::io::Error, path: Option<PathBuf>) -> Self {
        Self::Io { path, source }
    }

    /// Builds a [`Error::Parse`] variant with consistent messaging.
    ///
    /// # Arguments
    ///
    /// * `format` - Name of the textual format being parsed.
    /// * `path` - Optional path pointing to the input file.
    /// * `line_number` - Line where the failure occurred (1-indexed).
    /// * `details` - Additional context about the parsing problem.
    pub fn parse(
        format: &'static str,
        path: Option<PathBuf>,
        line_number: usize,
        details: impl Into<String>,
    ) -> Self {
        Self::Parse {
            format,
            path,
            line_number,
            details: details.into(),
        }
    }

    /// Creates an [`Error::MissingSection`] for inputs lacking a mandatory block.
    pub fn missing_section(
        format: &'static str,
        path: Option<PathBuf>,
        section: &'static str,
    ) -> Self {
        Self::MissingSection {
            format,
            path,
            section,
        }
    }

    /// Creates an [`Error::InconsistentData`] describing logical mismatches.
    ///
    /// # Arguments
    ///
    /// * `format` - Name of the textual format being processed.
    /// * `path` - Optional file path, if applicable.
    /// * `details` - Explanation of the inconsistency.
    pub fn inconsistent_data(
        format: &'static str,
        path: Option<PathBuf>,
        details: impl Into<String>,
    ) -> Self {
        Self::InconsistentData {
            format,
            path,
            details: details.into(),
        }
    }

    /// Attaches a file path to an error raised against an anonymous stream.
    ///
    /// An already recorded path is left untouched.
    pub fn with_path(mut self, file: impl Into<PathBuf>) -> Self {
        let slot = match &mut self {
            Self::Io { path, .. }
            | Self::Parse { path, .. }
            | Self::MissingSection { path, .. }
            | Self::InconsistentData { path, .. } => path,
        };
        if slot.is_none() {
            *slot = Some(file.into());
        }
        self
    }
}

/// Lightweight formatter for optional paths used in error messages.
///
/// When a path is present it prints `file '<path>'`; otherwise it emits `stream source` so
/// error messages remain grammatically consistent.
struct PathDisplay<'a>(&'a Option<PathBuf>);

impl<'a> fmt::Display for PathDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(p) => write!(f, "file '{}'", p.display()),
            None => write!(f, "stream source"),
        }
    }
}

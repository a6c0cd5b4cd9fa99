//! Error types for data imports.
//!
//! Copyright (c) 2025 Posit, PBC

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while resolving or loading a data import.
///
/// A reference that is not a data file is not an error: the importers
/// report it as `Ok(None)` so the host can fall back to other importers.
#[derive(Debug, Error)]
pub enum DataImportError {
    /// No candidate directory contained the requested file
    #[error(
        "Unable to find \"{reference}\" from the following path(s): {}. Check includePaths.",
        join_paths(.searched)
    )]
    NotFound {
        reference: String,
        /// Every directory searched, in search order
        searched: Vec<PathBuf>,
    },

    /// The file content is not valid YAML
    #[error("Failed to parse YAML data: {contents}")]
    DataParsingFailed {
        /// Raw file content, included for diagnosis
        contents: String,
        /// Parser message
        reason: String,
    },

    /// The file parsed, but its top level is not a mapping
    #[error("Data is not an object (found {found})")]
    InvalidData { found: &'static str },

    /// Reading a resolved file failed
    #[error("Failed to read data file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A path could not be expressed as a `file:` URL
    #[error("Cannot build a file URL for {locator}")]
    InvalidLocator { locator: String },

    /// The build tool's module resolver failed
    #[error("Module resolution failed for \"{reference}\": {message}")]
    ModuleResolution { reference: String, message: String },
}

impl DataImportError {
    /// Convenience constructor for `ModuleResolver` implementations.
    pub fn module_resolution(reference: impl Into<String>, message: impl ToString) -> Self {
        DataImportError::ModuleResolution {
            reference: reference.into(),
            message: message.to_string(),
        }
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

//! Configuration consumed by the legacy importer.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! The legacy importer API hands importers the compile options through
//! `this.options`. Only `includePaths` matters here: a single string joined
//! with the platform's path-list delimiter (`:` on Unix, `;` on Windows).

use std::ffi::OsStr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Compile options visible to a legacy importer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegacyOptions {
    /// Extra search directories, delimiter-joined
    pub include_paths: Option<String>,
}

impl LegacyOptions {
    /// Join directories with the platform delimiter.
    ///
    /// Directories that contain the delimiter themselves cannot be
    /// represented and are skipped.
    pub fn from_include_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let paths: Vec<PathBuf> = paths
            .into_iter()
            .map(Into::into)
            .filter(|p| std::env::join_paths([p]).is_ok())
            .collect();

        let include_paths = std::env::join_paths(&paths)
            .ok()
            .map(|joined| joined.to_string_lossy().into_owned());

        Self { include_paths }
    }

    /// The include paths as an ordered list, empty entries dropped.
    pub fn search_paths(&self) -> Vec<PathBuf> {
        match self.include_paths.as_deref() {
            Some(joined) if !joined.is_empty() => std::env::split_paths(OsStr::new(joined))
                .filter(|p| !p.as_os_str().is_empty())
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// The `this` a legacy importer is invoked with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyImporterThis {
    pub options: LegacyOptions,
}

impl LegacyImporterThis {
    pub fn new(options: LegacyOptions) -> Self {
        Self { options }
    }
}

//! Resolution of import references to data files.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Lookup mirrors the SASS compiler's own rules for relative imports: the
//! directory of the importing file is searched first, then each search path
//! in the order given. The first existing file wins.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::error::DataImportError;
use crate::fs::{ImportFs, NativeFs};
use crate::maybe_async::MaybeAsync;

/// One lookup: the reference as written, where it was written, and
/// where else to look.
#[derive(Debug, Clone, Copy)]
pub struct ResolveRequest<'a> {
    /// The string following `@import`/`@use`, e.g. `"vars.yml"`
    pub reference: &'a str,
    /// Absolute path of the importing stylesheet
    pub containing: &'a Path,
    /// Extra directories, searched after the containing directory
    pub search_paths: &'a [PathBuf],
}

impl<'a> ResolveRequest<'a> {
    pub fn new(reference: &'a str, containing: &'a Path) -> Self {
        Self {
            reference,
            containing,
            search_paths: &[],
        }
    }

    pub fn with_search_paths(mut self, search_paths: &'a [PathBuf]) -> Self {
        self.search_paths = search_paths;
        self
    }

    /// Directory of the importing file (`.` for a bare file name).
    pub fn containing_dir(&self) -> PathBuf {
        match self.containing.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            Some(_) => PathBuf::from("."),
            None => self.containing.to_path_buf(),
        }
    }
}

/// What a resolver found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// Absolute path of the data file
    Found(PathBuf),
    /// Nothing matched; `searched` lists every directory tried, in order
    NotFound { searched: Vec<PathBuf> },
}

pub type ResolveResult = Result<ResolveOutcome, DataImportError>;

/// A resolution strategy.
///
/// File-system strategies answer immediately with `MaybeAsync::Ready`;
/// strategies that delegate to a build tool answer with `MaybeAsync::Pending`.
pub trait Resolver: Send + Sync {
    fn resolve(&self, request: &ResolveRequest<'_>) -> MaybeAsync<ResolveResult>;
}

impl<F> Resolver for F
where
    F: Fn(&ResolveRequest<'_>) -> MaybeAsync<ResolveResult> + Send + Sync,
{
    fn resolve(&self, request: &ResolveRequest<'_>) -> MaybeAsync<ResolveResult> {
        self(request)
    }
}

impl fmt::Debug for dyn Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<Resolver>")
    }
}

/// Plain file-system resolution: containing directory, then search paths.
#[derive(Debug, Clone)]
pub struct FsResolver {
    fs: Arc<dyn ImportFs>,
}

impl FsResolver {
    pub fn new(fs: Arc<dyn ImportFs>) -> Self {
        Self { fs }
    }

    /// Resolver over the host file system.
    pub fn native() -> Self {
        Self::new(Arc::new(NativeFs))
    }

    /// Probe each candidate directory in order.
    pub fn find(&self, request: &ResolveRequest<'_>) -> ResolveOutcome {
        let mut searched = Vec::with_capacity(1 + request.search_paths.len());
        searched.push(request.containing_dir());
        searched.extend(request.search_paths.iter().cloned());

        for dir in &searched {
            let candidate = absolute(&dir.join(request.reference));
            tracing::trace!(candidate = %candidate.display(), "Probing for data file");
            if self.fs.is_file(&candidate) {
                tracing::debug!(
                    reference = request.reference,
                    path = %candidate.display(),
                    "Resolved data import"
                );
                return ResolveOutcome::Found(candidate);
            }
        }

        tracing::debug!(
            reference = request.reference,
            searched = searched.len(),
            "Data import not found"
        );
        ResolveOutcome::NotFound { searched }
    }
}

impl Resolver for FsResolver {
    fn resolve(&self, request: &ResolveRequest<'_>) -> MaybeAsync<ResolveResult> {
        MaybeAsync::ready(Ok(self.find(request)))
    }
}

/// Make `path` absolute against the current directory and drop `.`/`..`.
pub(crate) fn absolute(path: &Path) -> PathBuf {
    let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

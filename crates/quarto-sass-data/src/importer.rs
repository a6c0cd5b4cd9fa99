//! The importer protocol of the modern SASS API.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! The host calls [`DataImporter::canonicalize`] for every `@import`/`@use`
//! it sees and, if that produced a URL, [`DataImporter::load`] for that URL.
//! Canonicalization resolves but never reads; loading reads, parses and
//! serializes.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::DataImportError;
use crate::fs::{ImportFs, NativeFs};
use crate::loader::load_document;
use crate::maybe_async::MaybeAsync;
use crate::resolver::{FsResolver, ResolveOutcome, ResolveRequest, ResolveResult, Resolver, absolute};
use crate::serialize::serialize_document;

/// File extensions recognized as data files.
pub const DATA_FILE_EXTENSIONS: [&str; 3] = [".yml", ".yaml", ".json"];

/// Whether `reference` names a YAML or JSON file.
///
/// A suffix test only; the file content is never inspected.
pub fn is_data_file(reference: &str) -> bool {
    let reference = reference.to_ascii_lowercase();
    DATA_FILE_EXTENSIONS
        .iter()
        .any(|ext| reference.ends_with(ext))
}

/// What the host knows about the import being canonicalized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalizeContext {
    /// URL of the importing stylesheet, when it has one
    pub containing_url: Option<Url>,
}

impl CanonicalizeContext {
    pub fn new(containing_url: Option<Url>) -> Self {
        Self { containing_url }
    }
}

/// Stylesheet syntax of a loaded fragment.
///
/// Generated fragments are always SCSS, whatever the host's default syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Syntax {
    Scss,
}

/// A loaded stylesheet fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImporterResult {
    pub contents: String,
    pub syntax: Syntax,
}

/// Outcome of canonicalization: `Ok(None)` leaves the reference to other importers.
pub type CanonicalizeResult = Result<Option<Url>, DataImportError>;

/// Importer for YAML and JSON data files.
///
/// Cheap to clone; all state is shared.
#[derive(Debug, Clone)]
pub struct DataImporter {
    resolver: Arc<dyn Resolver>,
    fs: Arc<dyn ImportFs>,
}

impl DataImporter {
    /// Importer using `resolver`, reading from the host file system.
    pub fn new(resolver: Arc<dyn Resolver>) -> Self {
        Self::with_fs(resolver, Arc::new(NativeFs))
    }

    pub fn with_fs(resolver: Arc<dyn Resolver>, fs: Arc<dyn ImportFs>) -> Self {
        Self { resolver, fs }
    }

    /// Plain file-system importer over `fs`, resolving and loading from it.
    pub fn for_fs(fs: Arc<dyn ImportFs>) -> Self {
        Self::with_fs(Arc::new(FsResolver::new(fs.clone())), fs)
    }

    /// Resolve `reference` to a canonical `file:` URL.
    ///
    /// Ready immediately unless the resolver has to suspend.
    pub fn canonicalize(
        &self,
        reference: &str,
        context: &CanonicalizeContext,
    ) -> MaybeAsync<CanonicalizeResult> {
        self.canonicalize_with_search_paths(reference, context, &[])
    }

    pub(crate) fn canonicalize_with_search_paths(
        &self,
        reference: &str,
        context: &CanonicalizeContext,
        search_paths: &[PathBuf],
    ) -> MaybeAsync<CanonicalizeResult> {
        if !is_data_file(reference) {
            return MaybeAsync::ready(Ok(None));
        }
        let Some(containing) = context
            .containing_url
            .as_ref()
            .and_then(|url| url.to_file_path().ok())
        else {
            return MaybeAsync::ready(Ok(None));
        };

        let request = ResolveRequest::new(reference, &containing).with_search_paths(search_paths);
        let reference = reference.to_string();
        self.resolver
            .resolve(&request)
            .map(move |result| into_canonical_url(reference, result))
    }

    /// Load a URL produced by [`canonicalize`](Self::canonicalize).
    ///
    /// Returns `Ok(None)` for URLs that are not `file:` URLs.
    pub fn load(&self, canonical_url: &Url) -> Result<Option<ImporterResult>, DataImportError> {
        if canonical_url.scheme() != "file" {
            return Ok(None);
        }
        let path = canonical_url
            .to_file_path()
            .map_err(|()| DataImportError::InvalidLocator {
                locator: canonical_url.to_string(),
            })?;

        let document = load_document(self.fs.as_ref(), &path)?;
        tracing::debug!(
            path = %path.display(),
            variables = document.len(),
            "Loaded data import"
        );

        Ok(Some(ImporterResult {
            contents: serialize_document(&document),
            syntax: Syntax::Scss,
        }))
    }
}

/// The plain file-system importer over the host file system.
pub fn data_importer() -> DataImporter {
    DataImporter::new(Arc::new(FsResolver::native()))
}

fn into_canonical_url(reference: String, result: ResolveResult) -> CanonicalizeResult {
    match result? {
        ResolveOutcome::Found(path) => {
            let path = absolute(&path);
            Url::from_file_path(&path)
                .map(Some)
                .map_err(|()| DataImportError::InvalidLocator {
                    locator: path.display().to_string(),
                })
        }
        ResolveOutcome::NotFound { searched } => {
            Err(DataImportError::NotFound { reference, searched })
        }
    }
}

//! Resolution through a build tool's module resolver.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! When the SASS compiler runs inside a bundler (sass-loader and friends),
//! references that are not found next to the importing file are handed to
//! the bundler's own resolver, which is asynchronous. This is the only source
//! of suspension in the importers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::error::DataImportError;
use crate::importer::DataImporter;
use crate::legacy::LegacyDataImporter;
use crate::maybe_async::MaybeAsync;
use crate::resolver::{FsResolver, ResolveOutcome, ResolveRequest, ResolveResult, Resolver};

/// Options passed to the build tool when asking for a resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveOptions {
    pub extensions: Vec<String>,
    pub prefer_relative: bool,
}

impl ResolveOptions {
    /// The configuration used for data imports.
    pub fn data_imports() -> Self {
        Self {
            extensions: vec![".js".into(), ".mjs".into(), ".cjs".into()],
            prefer_relative: true,
        }
    }
}

/// An asynchronous module resolver supplied by a build tool.
pub trait ModuleResolver: Send + Sync {
    /// Resolve `request` from the directory `context`.
    ///
    /// `Ok(None)` means the build tool could not find the module.
    fn resolve(
        &self,
        context: &Path,
        request: &str,
    ) -> BoxFuture<'static, Result<Option<PathBuf>, DataImportError>>;
}

/// The build tool's loader context, as handed to importer factories.
pub trait LoaderContext {
    fn get_resolve(&self, options: &ResolveOptions) -> Arc<dyn ModuleResolver>;
}

/// File-system lookup next to the importing file, then the build tool.
///
/// Search paths are not consulted; the build tool has its own.
#[derive(Clone)]
pub struct BuildToolResolver {
    fs: FsResolver,
    modules: Arc<dyn ModuleResolver>,
}

impl BuildToolResolver {
    pub fn new(fs: FsResolver, modules: Arc<dyn ModuleResolver>) -> Self {
        Self { fs, modules }
    }

    pub fn from_loader_context(loader_context: &dyn LoaderContext) -> Self {
        Self::new(
            FsResolver::native(),
            loader_context.get_resolve(&ResolveOptions::data_imports()),
        )
    }
}

impl std::fmt::Debug for BuildToolResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildToolResolver")
            .field("fs", &self.fs)
            .field("modules", &"<ModuleResolver>")
            .finish()
    }
}

impl Resolver for BuildToolResolver {
    fn resolve(&self, request: &ResolveRequest<'_>) -> MaybeAsync<ResolveResult> {
        let local = ResolveRequest::new(request.reference, request.containing);
        let searched = match self.fs.find(&local) {
            found @ ResolveOutcome::Found(_) => return MaybeAsync::ready(Ok(found)),
            ResolveOutcome::NotFound { searched } => searched,
        };

        let context = request.containing_dir();
        tracing::debug!(
            reference = request.reference,
            context = %context.display(),
            "Delegating data import to module resolver"
        );
        let pending = ModuleResolver::resolve(self.modules.as_ref(), &context, request.reference);

        MaybeAsync::pending(async move {
            match pending.await? {
                Some(path) => Ok(ResolveOutcome::Found(path)),
                None => Ok(ResolveOutcome::NotFound { searched }),
            }
        })
    }
}

/// Modern importer for use inside a build tool.
pub fn sass_loader_importer(loader_context: &dyn LoaderContext) -> DataImporter {
    DataImporter::new(Arc::new(BuildToolResolver::from_loader_context(
        loader_context,
    )))
}

/// Legacy importer for use inside a build tool.
pub fn sass_loader_legacy_importer(loader_context: &dyn LoaderContext) -> LegacyDataImporter {
    LegacyDataImporter::new(sass_loader_importer(loader_context))
}

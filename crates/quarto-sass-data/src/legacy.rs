//! The importer protocol of the legacy SASS API.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! A legacy importer is a single call taking the requested URL and the path
//! of the previous (importing) file. It either returns its result, or, when
//! resolution has to suspend, returns nothing and reports through the `done`
//! callback later. Which of the two happens is decided per call by whether
//! canonicalization came back ready.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::Path;

use futures::FutureExt;
use url::Url;

use crate::error::DataImportError;
use crate::importer::{CanonicalizeContext, CanonicalizeResult, DataImporter};
use crate::options::LegacyImporterThis;
use crate::resolver::{FsResolver, absolute};

/// Contents returned to a legacy host; the syntax is implied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyContents {
    pub contents: String,
}

/// A legacy result: contents, `None` to let other importers try, or an error value.
pub type LegacyImporterResult = Result<Option<LegacyContents>, DataImportError>;

/// Completion callback for deferred results. Invoked exactly once.
pub type LegacyDone = Box<dyn FnOnce(LegacyImporterResult) + Send + 'static>;

/// What a legacy call hands back directly.
#[derive(Debug)]
pub enum LegacyReturn {
    /// Resolution was synchronous; `done` was not called
    Result(LegacyImporterResult),
    /// Resolution suspended; the result goes to `done`
    Deferred,
}

impl LegacyReturn {
    /// The direct result, if there is one.
    pub fn into_result(self) -> Option<LegacyImporterResult> {
        match self {
            LegacyReturn::Result(result) => Some(result),
            LegacyReturn::Deferred => None,
        }
    }
}

/// Legacy-protocol adapter over a [`DataImporter`].
#[derive(Debug, Clone)]
pub struct LegacyDataImporter {
    importer: DataImporter,
}

impl LegacyDataImporter {
    pub fn new(importer: DataImporter) -> Self {
        Self { importer }
    }

    /// Import `request` on behalf of the file at `previous`.
    ///
    /// Search paths come from `this.options.include_paths`. Deferred work
    /// runs on the current tokio runtime if there is one, otherwise on a
    /// thread with a runtime of its own.
    pub fn call(
        &self,
        request: &str,
        previous: &str,
        this: &LegacyImporterThis,
        done: Option<LegacyDone>,
    ) -> LegacyReturn {
        let containing_url = Url::from_file_path(absolute(Path::new(previous))).ok();
        let context = CanonicalizeContext::new(containing_url);
        let search_paths = this.options.search_paths();

        let canonical =
            self.importer
                .canonicalize_with_search_paths(request, &context, &search_paths);

        match canonical.into_ready() {
            Ok(canonical) => LegacyReturn::Result(load(&self.importer, canonical)),
            Err(pending) => {
                let importer = self.importer.clone();
                spawn_completion(
                    request.to_string(),
                    async move { load(&importer, pending.await) },
                    done,
                );
                LegacyReturn::Deferred
            }
        }
    }
}

/// Legacy importer over the host file system, honoring `includePaths`.
pub fn legacy_data_importer() -> LegacyDataImporter {
    LegacyDataImporter::new(DataImporter::new(std::sync::Arc::new(FsResolver::native())))
}

fn load(importer: &DataImporter, canonical: CanonicalizeResult) -> LegacyImporterResult {
    let Some(url) = canonical? else {
        return Ok(None);
    };
    Ok(importer.load(&url)?.map(|result| LegacyContents {
        contents: result.contents,
    }))
}

/// Drive a deferred import to completion and hand its result to `done`.
///
/// A panic while resolving is reported to `done` as a module resolution
/// error, so the callback runs exactly once either way.
fn spawn_completion<F>(request: String, completion: F, done: Option<LegacyDone>)
where
    F: Future<Output = LegacyImporterResult> + Send + 'static,
{
    let task = async move {
        let result = AssertUnwindSafe(completion)
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                Err(DataImportError::module_resolution(
                    request.as_str(),
                    panic_message(&*panic),
                ))
            });
        match done {
            Some(done) => done(result),
            None => tracing::warn!(
                request = %request,
                "Deferred data import finished with no callback to receive it"
            ),
        }
    };

    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(task);
        }
        Err(_) => {
            std::thread::spawn(move || {
                match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(runtime) => runtime.block_on(task),
                    Err(err) => {
                        tracing::warn!(
                            error = %err,
                            "Failed to start a runtime for a deferred data import"
                        );
                        pollster::block_on(task);
                    }
                }
            });
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "resolver panicked".to_string()
    }
}

//! YAML and JSON data imports for SASS.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! This crate lets a SASS compiler `@import`/`@use` a `.yml`, `.yaml` or
//! `.json` file. The file is parsed and replaced by SCSS source declaring one
//! variable per top-level key:
//!
//! ```yaml
//! primary: '#c33'
//! fonts: [Helvetica, Arial]
//! ```
//!
//! becomes
//!
//! ```scss
//! $primary: #c33;
//! $fonts: (Helvetica,Arial,);
//! ```
//!
//! It provides:
//! - [`DataImporter`] for the two-phase (canonicalize, load) importer protocol
//! - [`LegacyDataImporter`] for the single-call, callback-or-return protocol
//! - Pluggable resolution ([`Resolver`]): plain file system with search paths,
//!   or a build tool's asynchronous module resolver ([`BuildToolResolver`])
//!
//! # Example
//!
//! ```rust,no_run
//! use quarto_sass_data::{CanonicalizeContext, data_importer};
//! use url::Url;
//!
//! let importer = data_importer();
//! let context = CanonicalizeContext::new(Some(Url::from_file_path("/project/style.scss").unwrap()));
//!
//! if let Ok(Ok(Some(url))) = importer.canonicalize("vars.yml", &context).into_ready() {
//!     let fragment = importer.load(&url).unwrap().unwrap();
//!     println!("{}", fragment.contents);
//! }
//! ```

mod error;
mod fs;
mod importer;
mod legacy;
mod loader;
mod maybe_async;
mod module;
mod options;
mod resolver;
mod serialize;
mod value;

pub use error::DataImportError;
pub use fs::{ImportFs, MemoryFs, NativeFs};
pub use importer::{
    CanonicalizeContext, CanonicalizeResult, DATA_FILE_EXTENSIONS, DataImporter, ImporterResult,
    Syntax, data_importer, is_data_file,
};
pub use legacy::{
    LegacyContents, LegacyDataImporter, LegacyDone, LegacyImporterResult, LegacyReturn,
    legacy_data_importer,
};
pub use loader::{load_document, parse_document};
pub use maybe_async::MaybeAsync;
pub use module::{
    BuildToolResolver, LoaderContext, ModuleResolver, ResolveOptions, sass_loader_importer,
    sass_loader_legacy_importer,
};
pub use options::{LegacyImporterThis, LegacyOptions};
pub use resolver::{FsResolver, ResolveOutcome, ResolveRequest, ResolveResult, Resolver};
pub use serialize::{TextForm, classify_text, serialize_document, serialize_value};
pub use value::{DataDocument, DataValue, Number};

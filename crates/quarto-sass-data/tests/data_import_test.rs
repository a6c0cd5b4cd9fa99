//! Integration tests for data imports compiled with grass.
//!
//! Each fixture directory holds a `style.scss` importing a data file. A small
//! host below plays the compiler's part of the importer protocol: every
//! `@import "..."` line is offered to the importer, and claimed imports are
//! replaced by the generated fragment before grass compiles the result.
//! Unclaimed imports are left for grass to resolve itself.
//!
//! Module rules (`@use`, `@forward`) are compiled by grass natively instead:
//! [`DataFs`] serves each canonicalized data file's fragment at the path grass
//! probes for it.

use std::collections::HashMap;
use std::future::IntoFuture;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use quarto_sass_data::{
    CanonicalizeContext, DataImportError, DataImporter, LegacyDataImporter, LegacyImporterThis,
    LegacyOptions, LoaderContext, ModuleResolver, ResolveOptions, data_importer,
    legacy_data_importer, sass_loader_importer,
};
use url::Url;

const EXPECTATION: &str = "body {\n  color: #c33;\n}";

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test-fixtures")
        .join(name)
        .join("style.scss")
}

fn import_reference(line: &str) -> Option<&str> {
    let rest = line.trim().strip_prefix("@import")?.trim();
    let rest = rest.strip_suffix(';')?.trim_end();
    rest.strip_prefix('"')?.strip_suffix('"')
}

/// Rewrite `style` by offering each import to `import`, then compile with grass.
fn compile_with<F>(style: &Path, mut import: F) -> Result<String, String>
where
    F: FnMut(&str) -> Result<Option<String>, DataImportError>,
{
    let source = std::fs::read_to_string(style).map_err(|e| e.to_string())?;

    let mut scss = String::new();
    for line in source.lines() {
        let fragment = match import_reference(line) {
            Some(reference) => import(reference).map_err(|e| e.to_string())?,
            None => None,
        };
        scss.push_str(fragment.as_deref().unwrap_or(line));
        scss.push('\n');
    }

    let load_paths = vec![style.parent().unwrap().to_path_buf()];
    let options = grass::Options::default().load_paths(&load_paths);
    grass::from_string(scss, &options)
        .map(|css| css.trim_end().to_string())
        .map_err(|e| e.to_string())
}

fn compile_modern(importer: &DataImporter, style: &Path) -> Result<String, String> {
    let context = CanonicalizeContext::new(Some(Url::from_file_path(style).unwrap()));
    compile_with(style, |reference| {
        let canonical = pollster::block_on(importer.canonicalize(reference, &context).into_future())?;
        match canonical {
            Some(url) => Ok(importer.load(&url)?.map(|result| result.contents)),
            None => Ok(None),
        }
    })
}

fn compile_legacy(
    importer: &LegacyDataImporter,
    style: &Path,
    this: &LegacyImporterThis,
) -> Result<String, String> {
    let previous = style.to_str().unwrap();
    compile_with(style, |reference| {
        let result = importer
            .call(reference, previous, this, None)
            .into_result()
            .expect("file-system resolution is synchronous")?;
        Ok(result.map(|contents| contents.contents))
    })
}

/// Quoted reference of a module-loading rule (`@use`, `@forward` or `@import`).
fn module_reference(line: &str) -> Option<&str> {
    let line = line.trim();
    let rest = ["@use", "@forward", "@import"]
        .iter()
        .find_map(|rule| line.strip_prefix(rule))?
        .trim_start();
    let (reference, _) = rest.strip_prefix('"')?.split_once('"')?;
    Some(reference)
}

/// File system handed to grass, with generated fragments layered over disk.
///
/// grass swaps a reference's extension for `.scss` while probing, so each
/// fragment is registered under that path.
#[derive(Debug, Default)]
struct DataFs {
    fragments: HashMap<PathBuf, Vec<u8>>,
}

impl DataFs {
    /// Canonicalize and load every data reference in the stylesheets of `dir`.
    fn collect(importer: &DataImporter, dir: &Path) -> Result<Self, String> {
        let mut fs = DataFs::default();
        for entry in std::fs::read_dir(dir).map_err(|e| e.to_string())? {
            let sheet = entry.map_err(|e| e.to_string())?.path();
            if sheet.extension().is_none_or(|ext| ext != "scss") {
                continue;
            }
            let context = CanonicalizeContext::new(Some(Url::from_file_path(&sheet).unwrap()));
            let source = std::fs::read_to_string(&sheet).map_err(|e| e.to_string())?;

            for reference in source.lines().filter_map(module_reference) {
                let canonical = pollster::block_on(importer.canonicalize(reference, &context).into_future())
                    .map_err(|e| e.to_string())?;
                let Some(url) = canonical else { continue };
                let fragment = importer.load(&url).map_err(|e| e.to_string())?.unwrap();

                let probed = sheet.parent().unwrap().join(reference).with_extension("scss");
                fs.fragments.insert(probed, fragment.contents.into_bytes());
            }
        }
        Ok(fs)
    }
}

impl grass::Fs for DataFs {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        self.fragments.contains_key(path) || path.is_file()
    }

    fn read(&self, path: &Path) -> std::io::Result<Vec<u8>> {
        match self.fragments.get(path) {
            Some(fragment) => Ok(fragment.clone()),
            None => std::fs::read(path),
        }
    }
}

/// Compile a fixture with grass resolving module rules itself.
fn compile_modules(name: &str) -> Result<String, String> {
    let style = fixture(name);
    let fs = DataFs::collect(&data_importer(), style.parent().unwrap())?;
    let options = grass::Options::default().fs(&fs);
    grass::from_path(&style, &options)
        .map(|css| css.trim_end().to_string())
        .map_err(|e| e.to_string())
}

/// Compile a fixture through both protocols, checking they agree.
fn compile(name: &str) -> Result<String, String> {
    let style = fixture(name);
    let modern = compile_modern(&data_importer(), &style);
    let legacy = compile_legacy(&legacy_data_importer(), &style, &LegacyImporterThis::default());
    assert_eq!(modern, legacy, "protocols disagree for fixture {name}");
    modern
}

#[test]
fn test_imports_strings() {
    assert_eq!(compile("strings").unwrap(), EXPECTATION);
}

#[test]
fn test_imports_json_files() {
    assert_eq!(compile("json").unwrap(), EXPECTATION);
}

#[test]
fn test_imports_lists() {
    assert_eq!(compile("lists").unwrap(), EXPECTATION);
}

#[test]
fn test_imports_maps() {
    assert_eq!(compile("maps").unwrap(), EXPECTATION);
}

#[test]
fn test_imports_maps_with_single_quoted_keys() {
    assert_eq!(compile("maps/single-quoted-key").unwrap(), EXPECTATION);
}

#[test]
fn test_imports_maps_with_double_quoted_keys() {
    assert_eq!(compile("maps/double-quoted-key").unwrap(), EXPECTATION);
}

#[test]
fn test_lists_and_maps_keep_their_shape() {
    assert_eq!(
        compile("structure").unwrap(),
        "body {\n  width: 3;\n  height: 2;\n  depth: 1;\n}"
    );
}

#[test]
fn test_quotes_strings_where_appropriate() {
    assert_eq!(
        compile("quoting").unwrap(),
        "body {\n  color: red;\n  color: #f00;\n  color: \"red\";\n  color: \"really red\";\n}"
    );
}

#[test]
fn test_ignores_non_data_imports() {
    assert_eq!(compile("non-yaml").unwrap(), EXPECTATION);
}

#[test]
fn test_use_with_default_namespace() {
    assert_eq!(compile_modules("use/namespaced").unwrap(), EXPECTATION);
}

#[test]
fn test_use_with_alias() {
    assert_eq!(compile_modules("use/aliased").unwrap(), EXPECTATION);
}

#[test]
fn test_use_without_namespace() {
    assert_eq!(compile_modules("use/unwrapped").unwrap(), EXPECTATION);
}

#[test]
fn test_use_through_forward() {
    assert_eq!(compile_modules("use/forwarded").unwrap(), EXPECTATION);
}

#[test]
fn test_import_through_grass_file_system() {
    assert_eq!(compile_modules("strings").unwrap(), EXPECTATION);
}

#[test]
fn test_missing_data_file_fails_before_grass_compiles() {
    let err = compile_modules("errors/not-found").unwrap_err();
    assert!(err.starts_with("Unable to find \"variables.yml\""), "{err}");
}

#[test]
fn test_finds_imports_via_include_paths() {
    let style = fixture("include-paths");
    let variables = style.parent().unwrap().join("variables");

    let this = LegacyImporterThis::new(LegacyOptions::from_include_paths([variables]));
    let css = compile_legacy(&legacy_data_importer(), &style, &this).unwrap();

    assert_eq!(css, EXPECTATION);
}

#[test]
fn test_finds_imports_via_multiple_include_paths() {
    let style = fixture("include-paths");
    let variables = style.parent().unwrap().join("variables");

    let this = LegacyImporterThis::new(LegacyOptions::from_include_paths([
        variables,
        PathBuf::from("./some/other/path/"),
    ]));
    let css = compile_legacy(&legacy_data_importer(), &style, &this).unwrap();

    assert_eq!(css, EXPECTATION);
}

#[test]
fn test_modern_protocol_has_no_include_paths() {
    let err = compile_modern(&data_importer(), &fixture("include-paths")).unwrap_err();
    assert!(err.starts_with("Unable to find \"variables.yml\""), "{err}");
}

#[test]
fn test_missing_import_reports_searched_directories() {
    let style = fixture("errors/not-found");
    let dir = style.parent().unwrap().display().to_string();

    let err = compile("errors/not-found").unwrap_err();

    assert_eq!(
        err,
        format!(
            "Unable to find \"variables.yml\" from the following path(s): {dir}. Check includePaths."
        )
    );
}

#[test]
fn test_unparseable_data_fails() {
    let err = compile("errors/data-parsing-failed").unwrap_err();
    assert!(err.starts_with("Failed to parse YAML data"), "{err}");
    assert!(err.contains("color: \"red"), "{err}");
}

#[test]
fn test_scalar_data_is_not_an_object() {
    let err = compile("errors/invalid-data").unwrap_err();
    assert!(err.contains("Data is not an object"), "{err}");
}

#[test]
fn test_list_data_is_not_an_object() {
    let err = compile("errors/list-data").unwrap_err();
    assert!(err.contains("Data is not an object"), "{err}");
}

/// Resolves `~pkg/...` references into the fixtures directory.
struct FixtureModules;

impl ModuleResolver for FixtureModules {
    fn resolve(
        &self,
        _context: &Path,
        request: &str,
    ) -> BoxFuture<'static, Result<Option<PathBuf>, DataImportError>> {
        let path = request.strip_prefix("~pkg/").map(|rest| {
            PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                .join("test-fixtures")
                .join(rest)
        });
        async move { Ok(path) }.boxed()
    }
}

struct FixtureLoaderContext;

impl LoaderContext for FixtureLoaderContext {
    fn get_resolve(&self, options: &ResolveOptions) -> Arc<dyn ModuleResolver> {
        assert_eq!(options, &ResolveOptions::data_imports());
        Arc::new(FixtureModules)
    }
}

#[test]
fn test_build_tool_resolution_falls_back_to_module_resolver() {
    let importer = sass_loader_importer(&FixtureLoaderContext);
    let style = fixture("non-yaml");
    let context = CanonicalizeContext::new(Some(Url::from_file_path(&style).unwrap()));

    let pending = importer.canonicalize("~pkg/strings/variables.yml", &context);
    assert!(!pending.is_ready());

    let url = pollster::block_on(pending.into_future()).unwrap().unwrap();
    let fragment = importer.load(&url).unwrap().unwrap();

    assert_eq!(fragment.contents, "$color: #c33;");
}

#[test]
fn test_build_tool_resolution_prefers_local_files() {
    let importer = sass_loader_importer(&FixtureLoaderContext);
    let style = fixture("strings");

    assert_eq!(compile_modern(&importer, &style).unwrap(), EXPECTATION);
}

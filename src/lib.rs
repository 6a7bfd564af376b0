// Copyright 2024 the es-shims transform authors. MIT license.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use analyze::get_all_ident_names;
use analyze::get_ignore_line_indexes;
use analyze::get_top_level_decls;
use deps::DependencyTracker;
use injector::ImportInjector;
use parser::parse_source_file;
use text_changes::apply_text_changes;
use visitors::collect_usages;
use visitors::CollectUsagesParams;

pub use deno_ast::ModuleSpecifier;
pub use deps::NodeModulesPackageResolver;
pub use deps::PackageResolver;
pub use injector::ImportUtils;
pub use mappings::Descriptor;
pub use mappings::Mappings;
pub use mappings::UsageMeta;
pub use provider::InjectionMethod;
pub use provider::MissingDependenciesLog;
pub use provider::MissingDependenciesOptions;
pub use provider::ShimsProvider;
pub use provider::ShouldInjectPolyfill;
pub use reporter::ConsoleSink;
pub use reporter::DeferredReporter;
pub use reporter::WarningSink;
pub use reporter::DEFAULT_DEFERRED_REPORTER;

mod analyze;
mod deps;
mod injector;
mod mappings;
mod parser;
mod provider;
mod reporter;
mod text_changes;
mod utils;
mod visitors;

pub struct SourceFile {
  pub file_path: PathBuf,
  pub text: String,
}

#[derive(Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputFile {
  pub file_path: PathBuf,
  pub file_text: String,
}

#[derive(Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformOutput {
  pub files: Vec<OutputFile>,
  /// The run's missing dependency keys, sorted. The same keys are
  /// reported through the configured warning sink.
  pub missing_dependencies: Vec<String>,
}

pub struct TransformOptions {
  pub files: Vec<SourceFile>,
  pub mappings: Arc<Mappings>,
  /// Directory that package installation state is resolved against.
  pub project_root: PathBuf,
  pub should_inject_polyfill: ShouldInjectPolyfill,
  pub method: InjectionMethod,
  pub missing_dependencies: MissingDependenciesOptions,
  /// Defaults to probing `node_modules` directories on disk.
  pub package_resolver: Option<Box<dyn PackageResolver>>,
  /// Defaults to writing warnings to stderr.
  pub warning_sink: Option<Arc<dyn WarningSink>>,
  /// Defaults to the process wide aggregation window so that separate
  /// runs in one process still produce a single deferred report.
  pub deferred_reporter: Option<Arc<DeferredReporter>>,
}

/// Rewrites each file to import explicit polyfill implementations for
/// detected standard library usages and reports the polyfill packages
/// the output now depends on that are not installed.
pub async fn transform(options: TransformOptions) -> Result<TransformOutput> {
  let sink: Arc<dyn WarningSink> = options
    .warning_sink
    .unwrap_or_else(|| Arc::new(ConsoleSink));
  let deferred = options
    .deferred_reporter
    .unwrap_or_else(|| DEFAULT_DEFERRED_REPORTER.clone());
  let package_resolver = options
    .package_resolver
    .unwrap_or_else(|| Box::new(NodeModulesPackageResolver));
  let tracker = DependencyTracker::new(
    options.project_root,
    options.missing_dependencies.all,
    package_resolver,
  );
  let mut provider = ShimsProvider::new(
    options.mappings,
    options.should_inject_polyfill,
    tracker,
    options.missing_dependencies.log,
    sink,
    deferred,
  );

  let mut files = Vec::new();
  for source_file in options.files {
    let parsed = parse_source_file(&source_file)?;
    let text_changes = parsed.with_view(|program| {
      let unresolved_context = parsed.unresolved_context();
      let top_level_decls =
        get_top_level_decls(&program, unresolved_context);
      let ignore_line_indexes = get_ignore_line_indexes(&program);
      let usages = collect_usages(&CollectUsagesParams {
        program: &program,
        unresolved_context,
        top_level_decls: &top_level_decls,
        ignore_line_indexes: &ignore_line_indexes,
        include_patterns: options.method == InjectionMethod::UsageGlobal,
      });

      let mut injector = ImportInjector::new(get_all_ident_names(&program));
      for usage in usages {
        match options.method {
          InjectionMethod::UsageGlobal => {
            provider.usage_global(&usage.meta, &mut injector)
          }
          InjectionMethod::UsagePure => {
            provider.usage_pure(&usage.meta, usage.range, &mut injector)
          }
        }
      }
      injector.into_text_changes()
    });

    files.push(OutputFile {
      file_path: source_file.file_path,
      file_text: apply_text_changes(source_file.text, text_changes),
    });
    provider.finish_file();
  }

  Ok(TransformOutput {
    files,
    missing_dependencies: provider.into_missing_dependencies(),
  })
}

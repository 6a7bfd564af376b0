// Copyright 2024 the es-shims transform authors. MIT license.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use es_shims_transform::transform;
use es_shims_transform::DeferredReporter;
use es_shims_transform::InjectionMethod;
use es_shims_transform::Mappings;
use es_shims_transform::MissingDependenciesLog;
use es_shims_transform::MissingDependenciesOptions;
use es_shims_transform::SourceFile;
use es_shims_transform::TransformOptions;
use es_shims_transform::TransformOutput;

use super::CapturingSink;
use super::InMemoryPackageResolver;

/// A realistic slice of the es-shims catalog used by most tests.
pub const DEFAULT_CATALOG: &str = r#"{
  "globals": {
    "AggregateError": [{
      "name": "AggregateError",
      "package": "es-aggregate-error",
      "version": "1.0.9"
    }]
  },
  "staticProperties": {
    "Object": {
      "hasOwn": [{
        "name": "Object.hasOwn",
        "package": "object.hasown",
        "version": "1.1.0"
      }]
    },
    "Array": {
      "fromAsync": [{
        "name": "Array.fromAsync",
        "package": "array.fromasync",
        "version": "1.0.0"
      }]
    }
  },
  "instanceProperties": {
    "findLast": [{
      "name": "Array.prototype.findLast",
      "package": "array.prototype.findlast",
      "version": "1.2.0"
    }]
  }
}"#;

pub struct TestBuilder {
  files: Vec<(String, String)>,
  catalog_json: String,
  installed_packages: HashSet<String>,
  disabled_polyfills: HashSet<String>,
  method: InjectionMethod,
  missing_dependencies: MissingDependenciesOptions,
  sink: Arc<CapturingSink>,
  deferred: Arc<DeferredReporter>,
}

impl TestBuilder {
  pub fn new() -> Self {
    Self {
      files: Vec::new(),
      catalog_json: DEFAULT_CATALOG.to_string(),
      installed_packages: HashSet::new(),
      disabled_polyfills: HashSet::new(),
      method: InjectionMethod::UsageGlobal,
      missing_dependencies: MissingDependenciesOptions::default(),
      sink: Arc::new(CapturingSink::default()),
      deferred: Arc::new(DeferredReporter::new(Duration::from_millis(
        1000,
      ))),
    }
  }

  pub fn add_file(
    &mut self,
    file_path: impl AsRef<str>,
    text: impl AsRef<str>,
  ) -> &mut Self {
    self
      .files
      .push((file_path.as_ref().to_string(), text.as_ref().to_string()));
    self
  }

  pub fn catalog(&mut self, json: impl AsRef<str>) -> &mut Self {
    self.catalog_json = json.as_ref().to_string();
    self
  }

  pub fn add_installed_package(
    &mut self,
    package: impl AsRef<str>,
  ) -> &mut Self {
    self
      .installed_packages
      .insert(package.as_ref().to_string());
    self
  }

  pub fn disable_polyfill(&mut self, name: impl AsRef<str>) -> &mut Self {
    self.disabled_polyfills.insert(name.as_ref().to_string());
    self
  }

  pub fn method(&mut self, method: InjectionMethod) -> &mut Self {
    self.method = method;
    self
  }

  pub fn log_mode(&mut self, log: MissingDependenciesLog) -> &mut Self {
    self.missing_dependencies.log = log;
    self
  }

  pub fn all_missing(&mut self) -> &mut Self {
    self.missing_dependencies.all = true;
    self
  }

  pub fn warnings(&self) -> Vec<String> {
    self.sink.messages()
  }

  pub async fn transform(&self) -> Result<TransformOutput> {
    let disabled_polyfills = self.disabled_polyfills.clone();
    transform(TransformOptions {
      files: self
        .files
        .iter()
        .map(|(file_path, text)| SourceFile {
          file_path: PathBuf::from(file_path),
          text: text.clone(),
        })
        .collect(),
      mappings: Arc::new(Mappings::from_json(&self.catalog_json)?),
      project_root: PathBuf::from("/project"),
      should_inject_polyfill: Box::new(move |name| {
        !disabled_polyfills.contains(name)
      }),
      method: self.method,
      missing_dependencies: self.missing_dependencies,
      package_resolver: Some(Box::new(InMemoryPackageResolver::new(
        self.installed_packages.clone(),
      ))),
      warning_sink: Some(
        self.sink.clone() as Arc<dyn es_shims_transform::WarningSink>
      ),
      deferred_reporter: Some(self.deferred.clone()),
    })
    .await
  }
}

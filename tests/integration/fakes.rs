// Copyright 2024 the es-shims transform authors. MIT license.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;

use es_shims_transform::PackageResolver;
use es_shims_transform::WarningSink;

/// Resolves packages against an in memory installed set instead of
/// the file system.
#[derive(Default)]
pub struct InMemoryPackageResolver {
  installed_packages: HashSet<String>,
}

impl InMemoryPackageResolver {
  pub fn new(installed_packages: HashSet<String>) -> Self {
    Self { installed_packages }
  }
}

impl PackageResolver for InMemoryPackageResolver {
  fn package_is_resolvable(
    &self,
    _project_root: &Path,
    package: &str,
  ) -> bool {
    self.installed_packages.contains(package)
  }
}

/// Captures warnings instead of writing them to stderr.
#[derive(Default)]
pub struct CapturingSink {
  messages: Mutex<Vec<String>>,
}

impl CapturingSink {
  pub fn messages(&self) -> Vec<String> {
    self.messages.lock().unwrap().clone()
  }
}

impl WarningSink for CapturingSink {
  fn warn(&self, message: &str) {
    self.messages.lock().unwrap().push(message.to_string());
  }
}

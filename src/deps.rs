// Copyright 2024 the es-shims transform authors. MIT license.

use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;

use crate::mappings::Descriptor;

/// Answers whether a package can be resolved from a project root.
///
/// Implementations must return `false` for the ordinary "not installed"
/// case rather than failing.
pub trait PackageResolver {
  fn package_is_resolvable(&self, project_root: &Path, package: &str)
    -> bool;
}

/// Resolves packages the way Node.js does for this purpose: probing
/// `node_modules/<package>/package.json` in the project root and each
/// of its ancestor directories.
pub struct NodeModulesPackageResolver;

impl PackageResolver for NodeModulesPackageResolver {
  fn package_is_resolvable(
    &self,
    project_root: &Path,
    package: &str,
  ) -> bool {
    let mut current_dir = Some(project_root);
    while let Some(dir) = current_dir {
      let package_json = dir
        .join("node_modules")
        .join(package)
        .join("package.json");
      if package_json.is_file() {
        return true;
      }
      current_dir = dir.parent();
    }
    false
  }
}

/// Classifies every used polyfill's backing package as installed or
/// missing for the current project root, deduplicated by dependency
/// key. First classification wins and is memoized for the run.
pub struct DependencyTracker {
  project_root: PathBuf,
  treat_all_as_missing: bool,
  resolver: Box<dyn PackageResolver>,
  installed: BTreeSet<String>,
  missing: BTreeSet<String>,
}

impl DependencyTracker {
  pub fn new(
    project_root: PathBuf,
    treat_all_as_missing: bool,
    resolver: Box<dyn PackageResolver>,
  ) -> Self {
    Self {
      project_root,
      treat_all_as_missing,
      resolver,
      installed: BTreeSet::new(),
      missing: BTreeSet::new(),
    }
  }

  pub fn mark(&mut self, descriptor: &Descriptor) {
    tracing::debug!("injecting polyfill {}", descriptor.name);

    let key = descriptor.dependency_key();
    if self.installed.contains(&key) || self.missing.contains(&key) {
      return;
    }

    if self.treat_all_as_missing
      || !self
        .resolver
        .package_is_resolvable(&self.project_root, &descriptor.package)
    {
      self.missing.insert(key);
    } else {
      self.installed.insert(key);
    }
  }

  pub fn missing(&self) -> &BTreeSet<String> {
    &self.missing
  }

  #[cfg(test)]
  pub fn installed(&self) -> &BTreeSet<String> {
    &self.installed
  }
}

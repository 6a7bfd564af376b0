// Copyright 2024 the es-shims transform authors. MIT license.

use std::ops::Range;
use std::sync::Arc;

use crate::deps::DependencyTracker;
use crate::injector::ImportUtils;
use crate::mappings::Descriptor;
use crate::mappings::Mappings;
use crate::mappings::UsageMeta;
use crate::reporter::format_missing_dependencies;
use crate::reporter::DeferredReporter;
use crate::reporter::WarningSink;

/// How resolved polyfills are injected for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InjectionMethod {
  /// Side effecting import of `<package>/auto.js` that patches the
  /// ambient environment. Usage sites are left untouched.
  #[default]
  UsageGlobal,
  /// Default import of `<package>/implementation.js` whose binding
  /// replaces the usage site.
  UsagePure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingDependenciesLog {
  /// One warning per file as soon as it finishes.
  PerFile,
  /// One consolidated warning per burst of files, emitted after the
  /// aggregation window goes quiet.
  #[default]
  Deferred,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MissingDependenciesOptions {
  pub log: MissingDependenciesLog,
  /// Report every used polyfill as missing without checking whether
  /// it is installed.
  pub all: bool,
}

/// External predicate deciding whether a polyfill should be injected
/// for the target environment.
pub type ShouldInjectPolyfill = Box<dyn Fn(&str) -> bool>;

/// The es-shims polyfill provider for one configured run, which may
/// span many files.
pub struct ShimsProvider {
  mappings: Arc<Mappings>,
  should_inject: ShouldInjectPolyfill,
  tracker: DependencyTracker,
  log: MissingDependenciesLog,
  sink: Arc<dyn WarningSink>,
  deferred: Arc<DeferredReporter>,
}

impl ShimsProvider {
  pub fn new(
    mappings: Arc<Mappings>,
    should_inject: ShouldInjectPolyfill,
    tracker: DependencyTracker,
    log: MissingDependenciesLog,
    sink: Arc<dyn WarningSink>,
    deferred: Arc<DeferredReporter>,
  ) -> Self {
    Self {
      mappings,
      should_inject,
      tracker,
      log,
      sink,
      deferred,
    }
  }

  /// Handles a usage with the global injection strategy. Unmapped or
  /// fully gated out usages are a silent no-op.
  pub fn usage_global(
    &mut self,
    meta: &UsageMeta,
    utils: &mut dyn ImportUtils,
  ) {
    for descriptor in self.gated_candidates(meta) {
      if !descriptor.global {
        continue;
      }
      utils
        .inject_global_import(&format!("{}/auto.js", descriptor.package));
      self.tracker.mark(&descriptor);
    }
  }

  /// Handles a usage with the pure injection strategy, replacing the
  /// triggering node with a reference to the imported implementation.
  pub fn usage_pure(
    &mut self,
    meta: &UsageMeta,
    range: Range<usize>,
    utils: &mut dyn ImportUtils,
  ) {
    let mut reference = None;
    for descriptor in self.gated_candidates(meta) {
      if !descriptor.pure {
        continue;
      }
      reference = Some(utils.inject_default_import(
        &format!("{}/implementation.js", descriptor.package),
        &descriptor.name,
      ));
      self.tracker.mark(&descriptor);
    }
    // the site is rewritten at most once. with several candidates the
    // last one's binding wins, the way repeated in place replacement
    // would end up.
    if let Some(reference) = reference {
      utils.replace(range, &reference);
    }
  }

  /// Reports missing dependencies after a file finishes: immediately
  /// in per file mode, otherwise by merging into the shared window.
  pub fn finish_file(&self) {
    match self.log {
      MissingDependenciesLog::PerFile => {
        if let Some(message) =
          format_missing_dependencies(self.tracker.missing())
        {
          self.sink.warn(&message);
        }
      }
      MissingDependenciesLog::Deferred => {
        self.deferred.merge(
          self.tracker.missing().iter().cloned(),
          self.sink.clone(),
        );
      }
    }
  }

  pub fn into_missing_dependencies(self) -> Vec<String> {
    self.tracker.missing().iter().cloned().collect()
  }

  /// All candidates for the usage key whose enablement gate passes.
  /// Every one of them gets injected, not just the first match.
  fn gated_candidates(&self, meta: &UsageMeta) -> Vec<Descriptor> {
    self
      .mappings
      .resolve(meta)
      .unwrap_or(&[])
      .iter()
      .filter(|descriptor| (self.should_inject)(&descriptor.name))
      .cloned()
      .collect()
  }
}

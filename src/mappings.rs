// Copyright 2024 the es-shims transform authors. MIT license.

use std::collections::HashMap;

use anyhow::Context;
use anyhow::Result;

/// A single polyfillable unit of standard library surface and the
/// es-shims package that backs it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
  /// Unique identifier across the whole catalog. Used for enablement
  /// checks and debug logging (ex. `"Array.isArray"`).
  pub name: String,
  /// The backing distributable package (ex. `"array.prototype.findlast"`).
  pub package: String,
  /// Minimum required version of the backing package.
  pub version: String,
  /// Whether this polyfill may be injected as a side effecting
  /// global import of `<package>/auto.js`.
  #[serde(default = "default_true")]
  pub global: bool,
  /// Whether this polyfill may be injected as a default import of
  /// `<package>/implementation.js` replacing the usage site.
  #[serde(default = "default_true")]
  pub pure: bool,
}

fn default_true() -> bool {
  true
}

impl Descriptor {
  /// The deduplication key used for install state classification
  /// (ex. `"es-object-atoms@^1.0.0"`).
  pub fn dependency_key(&self) -> String {
    format!("{}@^{}", self.package, self.version)
  }
}

/// The usage shape detected at a tree node, carrying exactly the data
/// needed to form a catalog lookup key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsageMeta {
  /// A bare reference to a global binding (ex. `structuredClone`).
  Global { name: String },
  /// A member access off a global binding (ex. `Object.hasOwn`).
  StaticMember { object: String, property: String },
  /// A member access off any other expression (ex. `arr.findLast`).
  InstanceMember { property: String },
}

/// The polyfill catalog: three read-only tables mapping usage keys to
/// ordered candidate descriptor lists. Loaded once at the start of a
/// run and shared by every file.
#[derive(Debug, Default, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Mappings {
  #[serde(default)]
  globals: HashMap<String, Vec<Descriptor>>,
  #[serde(default)]
  static_properties: HashMap<String, HashMap<String, Vec<Descriptor>>>,
  #[serde(default)]
  instance_properties: HashMap<String, Vec<Descriptor>>,
}

impl Mappings {
  pub fn from_json(text: &str) -> Result<Self> {
    let mappings: Mappings =
      serde_json::from_str(text).context("Error parsing polyfill catalog.")?;
    for descriptor in mappings.all_descriptors() {
      deno_semver::Version::parse_standard(&descriptor.version).with_context(
        || {
          format!(
            "Invalid version '{}' for polyfill '{}' in catalog.",
            descriptor.version, descriptor.name
          )
        },
      )?;
    }
    Ok(mappings)
  }

  /// Resolves a usage meta to its ordered candidate list, or `None`
  /// when the catalog has no entry for the key. Does not filter by
  /// enablement. Pure lookup with no side effects.
  ///
  /// A static member lookup that misses falls through to the instance
  /// table because an unresolved object identifier may be an unknown
  /// global holding a value (`values.findLast` in ambient code) just
  /// as well as a built in namespace.
  pub fn resolve(&self, meta: &UsageMeta) -> Option<&[Descriptor]> {
    let candidates = match meta {
      UsageMeta::Global { name } => self.globals.get(name),
      UsageMeta::StaticMember { object, property } => self
        .static_properties
        .get(object)
        .and_then(|properties| properties.get(property))
        .or_else(|| self.instance_properties.get(property)),
      UsageMeta::InstanceMember { property } => {
        self.instance_properties.get(property)
      }
    }?;
    if candidates.is_empty() {
      None
    } else {
      Some(candidates)
    }
  }

  fn all_descriptors(&self) -> impl Iterator<Item = &Descriptor> {
    self
      .globals
      .values()
      .chain(self.instance_properties.values())
      .chain(
        self
          .static_properties
          .values()
          .flat_map(|properties| properties.values()),
      )
      .flatten()
  }
}

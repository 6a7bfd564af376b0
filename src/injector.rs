// Copyright 2024 the es-shims transform authors. MIT license.

use std::collections::HashMap;
use std::collections::HashSet;
use std::ops::Range;

use crate::analyze::get_unique_name;
use crate::text_changes::TextChange;

/// Mutation capable handle given to the provider for one file.
pub trait ImportUtils {
  /// Adds a side effecting import of the module at the top of the
  /// file. Deduplicated per file by module path.
  fn inject_global_import(&mut self, module_path: &str);
  /// Adds a default import of the module bound to a collision free
  /// local name hinted by `export_name`, returning the local name.
  /// Deduplicated per file by module path.
  fn inject_default_import(
    &mut self,
    module_path: &str,
    export_name: &str,
  ) -> String;
  /// Replaces the source at the byte range with a reference.
  fn replace(&mut self, range: Range<usize>, reference: &str);
}

/// Accumulates injected imports and replacements for one file and
/// finalizes them into text changes.
pub struct ImportInjector {
  used_names: HashSet<String>,
  global_imports: Vec<String>,
  seen_global_modules: HashSet<String>,
  default_imports: Vec<(String, String)>,
  bindings_by_module: HashMap<String, String>,
  replacements: Vec<TextChange>,
}

impl ImportInjector {
  pub fn new(file_ident_names: HashSet<String>) -> Self {
    Self {
      used_names: file_ident_names,
      global_imports: Vec::new(),
      seen_global_modules: HashSet::new(),
      default_imports: Vec::new(),
      bindings_by_module: HashMap::new(),
      replacements: Vec::new(),
    }
  }

  pub fn into_text_changes(self) -> Vec<TextChange> {
    let mut import_text = String::new();
    for module_path in self.global_imports.iter() {
      import_text.push_str(&format!("import \"{}\";\n", module_path));
    }
    for (module_path, binding) in self.default_imports.iter() {
      import_text.push_str(&format!(
        "import {} from \"{}\";\n",
        binding, module_path
      ));
    }

    let mut text_changes = self.replacements;
    if !import_text.is_empty() {
      text_changes.push(TextChange {
        range: 0..0,
        new_text: import_text,
      });
    }
    text_changes
  }
}

impl ImportUtils for ImportInjector {
  fn inject_global_import(&mut self, module_path: &str) {
    if self.seen_global_modules.insert(module_path.to_string()) {
      self.global_imports.push(module_path.to_string());
    }
  }

  fn inject_default_import(
    &mut self,
    module_path: &str,
    export_name: &str,
  ) -> String {
    if let Some(binding) = self.bindings_by_module.get(module_path) {
      return binding.clone();
    }

    let binding =
      get_unique_name(&binding_name_hint(export_name), &self.used_names);
    self.used_names.insert(binding.clone());
    self
      .bindings_by_module
      .insert(module_path.to_string(), binding.clone());
    self
      .default_imports
      .push((module_path.to_string(), binding.clone()));
    binding
  }

  fn replace(&mut self, range: Range<usize>, reference: &str) {
    self.replacements.push(TextChange {
      range,
      new_text: reference.to_string(),
    });
  }
}

fn binding_name_hint(export_name: &str) -> String {
  let mut hint = String::from("_");
  for c in export_name.chars() {
    if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
      hint.push(c);
    } else {
      hint.push('_');
    }
  }
  hint
}

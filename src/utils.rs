// Copyright 2024 the es-shims transform authors. MIT license.

use std::path::Path;

use anyhow::anyhow;
use anyhow::Result;
use deno_ast::ModuleSpecifier;

pub const BOM_CHAR: char = '\u{FEFF}';

/// Strips the byte order mark from the provided text if it exists.
pub fn strip_bom(text: &str) -> &str {
  if text.starts_with(BOM_CHAR) {
    &text[BOM_CHAR.len_utf8()..]
  } else {
    text
  }
}

/// Creates a file specifier for a path in a way that also works for
/// the rooted forward slash paths used in tests.
pub fn file_path_to_specifier(path: &Path) -> Result<ModuleSpecifier> {
  let path_text = path.to_string_lossy().replace('\\', "/");
  let specifier_text = if path_text.starts_with('/') {
    format!("file://{}", path_text)
  } else {
    format!("file:///{}", path_text)
  };
  ModuleSpecifier::parse(&specifier_text)
    .map_err(|err| anyhow!("Error creating specifier for {}: {}", path.display(), err))
}

// Copyright 2024 the es-shims transform authors. MIT license.

use anyhow::Context;
use anyhow::Result;
use deno_ast::parse_module;
use deno_ast::MediaType;
use deno_ast::ParseParams;
use deno_ast::ParsedSource;

use crate::utils::file_path_to_specifier;
use crate::utils::strip_bom;
use crate::SourceFile;

/// Parses a source file with scope analysis so that references to
/// globals can be told apart from local bindings.
pub fn parse_source_file(file: &SourceFile) -> Result<ParsedSource> {
  let specifier = file_path_to_specifier(&file.file_path)?;
  let media_type = MediaType::from_specifier(&specifier);
  parse_module(ParseParams {
    specifier,
    text: strip_bom(&file.text).to_string().into(),
    media_type,
    capture_tokens: true,
    scope_analysis: true,
    maybe_syntax: None,
  })
  .with_context(|| {
    format!("Error parsing {}", file.file_path.display())
  })
}

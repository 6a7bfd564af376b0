// Copyright 2024 the es-shims transform authors. MIT license.

use std::cmp::Ordering;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChange {
  /// Byte range in the original source text.
  pub range: Range<usize>,
  pub new_text: String,
}

pub fn apply_text_changes(
  mut source: String,
  mut changes: Vec<TextChange>,
) -> String {
  changes.sort_by(|a, b| match a.range.start.cmp(&b.range.start) {
    // reverse order
    Ordering::Greater => Ordering::Less,
    Ordering::Less => Ordering::Greater,
    Ordering::Equal => Ordering::Equal,
  });

  for change in changes {
    source = format!(
      "{}{}{}",
      &source[..change.range.start],
      change.new_text,
      &source[change.range.end..],
    );
  }

  source
}

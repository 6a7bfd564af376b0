// Copyright 2024 the es-shims transform authors. MIT license.

mod usages;

pub use usages::*;

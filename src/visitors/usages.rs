// Copyright 2024 the es-shims transform authors. MIT license.

use std::collections::HashSet;
use std::ops::Range;

use deno_ast::swc::common::SyntaxContext;
use deno_ast::view::*;
use deno_ast::SourceRanged;
use deno_ast::SourceTextInfoProvider;

use crate::analyze::is_declaration_ident;
use crate::analyze::is_in_left_hand_assignment;
use crate::analyze::is_in_type;
use crate::mappings::UsageMeta;

/// Aliases of the global object. A member access off one of these is a
/// reference to the property as a global.
const GLOBAL_OBJECT_NAMES: [&str; 4] =
  ["globalThis", "window", "self", "global"];

pub struct CollectUsagesParams<'a> {
  pub program: &'a Program<'a>,
  pub unresolved_context: SyntaxContext,
  pub top_level_decls: &'a HashSet<String>,
  pub ignore_line_indexes: &'a HashSet<usize>,
  /// Whether destructuring of a global (`const { hasOwn } = Object;`)
  /// counts as a usage. Off for pure injection, which has no way to
  /// value replace a binding pattern.
  pub include_patterns: bool,
}

/// A detected usage of potentially polyfillable standard library
/// surface, in traversal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedUsage {
  pub meta: UsageMeta,
  /// Byte range of the triggering node, for value replacement.
  pub range: Range<usize>,
}

struct Context<'a> {
  program: &'a Program<'a>,
  unresolved_context: SyntaxContext,
  top_level_decls: &'a HashSet<String>,
  ignore_line_indexes: &'a HashSet<usize>,
  include_patterns: bool,
  usages: Vec<CollectedUsage>,
}

pub fn collect_usages(
  params: &CollectUsagesParams<'_>,
) -> Vec<CollectedUsage> {
  let mut context = Context {
    program: params.program,
    unresolved_context: params.unresolved_context,
    top_level_decls: params.top_level_decls,
    ignore_line_indexes: params.ignore_line_indexes,
    include_patterns: params.include_patterns,
    usages: Vec::new(),
  };
  visit_children(params.program.as_node(), &mut context);
  context.usages
}

fn visit_children(node: Node, context: &mut Context) {
  match node {
    Node::Ident(ident) => visit_ident(ident, context),
    Node::MemberExpr(expr) => visit_member_expr(expr, context),
    Node::VarDeclarator(decl) => visit_var_declarator(decl, context),
    _ => {}
  }

  for child in node.children() {
    visit_children(child, context);
  }
}

fn visit_ident(ident: &Ident, context: &mut Context) {
  if !is_unshadowed_global(ident, context)
    || should_ignore(ident.as_node(), context)
    || is_declaration_ident(ident.as_node())
    || GLOBAL_OBJECT_NAMES.contains(&ident.text_fast(context.program))
  {
    return;
  }

  // the property side is handled at the member expression node. an
  // object identifier is still a plain reference of its own.
  if let Some(member_expr) = ident.parent().to::<MemberExpr>() {
    if member_expr.prop.range().contains(&ident.range()) {
      return;
    }
  }

  push_usage(
    UsageMeta::Global {
      name: ident.text_fast(context.program).to_string(),
    },
    ident.range(),
    context,
  );
}

fn visit_member_expr(expr: &MemberExpr, context: &mut Context) {
  if should_ignore(expr.as_node(), context) {
    return;
  }
  let property = match member_prop_name(&expr.prop, context) {
    Some(property) => property,
    None => return,
  };

  let meta = match expr.obj {
    Expr::Ident(obj) if is_unshadowed_global(obj, context) => {
      let object = obj.text_fast(context.program);
      if GLOBAL_OBJECT_NAMES.contains(&object) {
        // the outermost member access off the global object wins
        // (`globalThis.Object.hasOwn` resolves at the outer node)
        if is_object_of_parent_member(expr) {
          return;
        }
        UsageMeta::Global { name: property }
      } else {
        UsageMeta::StaticMember {
          object: object.to_string(),
          property,
        }
      }
    }
    Expr::Member(inner) => match global_object_property(inner, context) {
      Some(object) => UsageMeta::StaticMember { object, property },
      None => UsageMeta::InstanceMember { property },
    },
    _ => UsageMeta::InstanceMember { property },
  };

  push_usage(meta, expr.range(), context);
}

fn visit_var_declarator(decl: &VarDeclarator, context: &mut Context) {
  if !context.include_patterns || should_ignore(decl.as_node(), context) {
    return;
  }
  let object = match decl.init {
    Some(Expr::Ident(obj)) if is_unshadowed_global(obj, context) => {
      obj.text_fast(context.program)
    }
    _ => return,
  };
  let object_pat = match decl.name {
    Pat::Object(object_pat) => object_pat,
    _ => return,
  };

  for prop in object_pat.props.iter() {
    let property = match prop {
      ObjectPatProp::KeyValue(kv) => match kv.key {
        PropName::Ident(ident) => ident.sym().to_string(),
        PropName::Str(str) => str.value().to_string(),
        _ => continue,
      },
      ObjectPatProp::Assign(assign) => assign.key.id.sym().to_string(),
      // can't tell which properties a rest pattern pulls in
      ObjectPatProp::Rest(_) => continue,
    };
    let meta = if GLOBAL_OBJECT_NAMES.contains(&object) {
      UsageMeta::Global { name: property }
    } else {
      UsageMeta::StaticMember {
        object: object.to_string(),
        property,
      }
    };
    push_usage(meta, decl.range(), context);
  }
}

fn push_usage(
  meta: UsageMeta,
  range: deno_ast::SourceRange,
  context: &mut Context,
) {
  let range = range
    .as_byte_range(context.program.text_info().range().start);
  context.usages.push(CollectedUsage { meta, range });
}

fn is_unshadowed_global(ident: &Ident, context: &Context) -> bool {
  ident.ctxt() == context.unresolved_context
    && !context
      .top_level_decls
      .contains(ident.text_fast(context.program))
}

fn member_prop_name(
  prop: &MemberProp,
  context: &Context,
) -> Option<String> {
  match prop {
    MemberProp::Ident(ident) => Some(ident.sym().to_string()),
    MemberProp::Computed(computed) => match computed.expr {
      Expr::Lit(Lit::Str(str)) => Some(str.value().to_string()),
      _ => None,
    },
    MemberProp::PrivateName(_) => None,
  }
}

/// For `globalThis.Object` style expressions, the name of the global
/// being accessed.
fn global_object_property(
  expr: &MemberExpr,
  context: &Context,
) -> Option<String> {
  match expr.obj {
    Expr::Ident(obj)
      if is_unshadowed_global(obj, context)
        && GLOBAL_OBJECT_NAMES
          .contains(&obj.text_fast(context.program)) =>
    {
      member_prop_name(&expr.prop, context)
    }
    _ => None,
  }
}

fn is_object_of_parent_member(expr: &MemberExpr) -> bool {
  match expr.parent().to::<MemberExpr>() {
    Some(parent) => parent.obj.range().contains(&expr.range()),
    None => false,
  }
}

fn should_ignore(node: Node, context: &Context) -> bool {
  context
    .ignore_line_indexes
    .contains(&node.start_line_fast(context.program))
    || is_in_type(node)
    || is_in_left_hand_assignment(node)
}

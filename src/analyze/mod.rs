// Copyright 2024 the es-shims transform authors. MIT license.

use std::collections::HashSet;

use deno_ast::swc::common::SyntaxContext;
use deno_ast::view::*;
use deno_ast::RootNode;
use deno_ast::SourceRanged;
use deno_ast::SourceRangedForSpanned;

/// Names declared at the top level scope of the file. A polyfillable
/// global shadowed by one of these is not a usage.
pub fn get_top_level_decls(
  program: &Program,
  unresolved_context: SyntaxContext,
) -> HashSet<String> {
  let mut results = HashSet::new();
  fill_top_level_decls(program.as_node(), unresolved_context, &mut results);
  results
}

fn fill_top_level_decls(
  node: Node,
  unresolved_context: SyntaxContext,
  results: &mut HashSet<String>,
) {
  if let Node::Ident(ident) = node {
    if ident.ctxt() == unresolved_context && is_declaration_ident(node) {
      results.insert(ident.sym().to_string());
    }
  }

  for child in node.children() {
    fill_top_level_decls(child, unresolved_context, results);
  }
}

/// Whether the identifier node is the name being declared by its
/// parent rather than a reference.
pub fn is_declaration_ident(node: Node) -> bool {
  match node.parent() {
    Some(parent) => match parent {
      Node::BindingIdent(decl) => decl.id.range().contains(&node.range()),
      Node::ClassDecl(decl) => decl.ident.range().contains(&node.range()),
      Node::ClassExpr(decl) => decl
        .ident
        .as_ref()
        .map(|i| i.range().contains(&node.range()))
        .unwrap_or(false),
      Node::TsInterfaceDecl(decl) => decl.id.range().contains(&node.range()),
      Node::FnDecl(decl) => decl.ident.range().contains(&node.range()),
      Node::FnExpr(decl) => decl
        .ident
        .as_ref()
        .map(|i| i.range().contains(&node.range()))
        .unwrap_or(false),
      Node::TsModuleDecl(decl) => decl.id.range().contains(&node.range()),
      Node::TsNamespaceDecl(decl) => decl.id.range().contains(&node.range()),
      Node::VarDeclarator(decl) => decl.name.range().contains(&node.range()),
      Node::ImportNamedSpecifier(decl) => {
        decl.local.range().contains(&node.range())
      }
      Node::ImportDefaultSpecifier(decl) => {
        decl.local.range().contains(&node.range())
      }
      Node::ImportStarAsSpecifier(decl) => decl.range().contains(&node.range()),
      Node::ExportNamedSpecifier(decl) => decl.range().contains(&node.range()),
      Node::ExportNamespaceSpecifier(decl) => {
        decl.range().contains(&node.range())
      }
      Node::KeyValuePatProp(decl) => decl.key.range().contains(&node.range()),
      Node::AssignPatProp(decl) => decl.key.range().contains(&node.range()),
      _ => false,
    },
    None => false,
  }
}

/// Line indexes of statements annotated with an `es-shims-ignore`
/// comment. Usages on those lines are left untouched.
pub fn get_ignore_line_indexes(program: &Program) -> HashSet<usize> {
  let mut line_indexes = HashSet::new();
  for comment in program.comment_container().all_comments() {
    if comment
      .text
      .trim()
      .to_lowercase()
      .starts_with("es-shims-ignore")
    {
      if let Some(next_token) = comment.next_token_fast(program) {
        line_indexes.insert(next_token.span.lo.start_line_fast(program));
      }
    }
  }
  line_indexes
}

/// Whether the node is part of the target of an assignment. Writing
/// to standard library surface is not a polyfillable usage.
pub fn is_in_left_hand_assignment(node: Node) -> bool {
  let mut current = node;
  while let Some(parent) = current.parent() {
    if let Node::AssignExpr(expr) = parent {
      return expr.left.range().contains(&current.range());
    }
    current = parent;
  }
  false
}

/// Whether the node sits inside a TypeScript type position, where
/// injecting a value import would be meaningless.
pub fn is_in_type(node: Node) -> bool {
  let mut current = node.parent();
  while let Some(parent) = current {
    match parent {
      Node::TsTypeAnn(_)
      | Node::TsTypeRef(_)
      | Node::TsTypeQuery(_)
      | Node::TsTypeAliasDecl(_)
      | Node::TsInterfaceDecl(_) => return true,
      _ => {}
    }
    current = parent.parent();
  }
  false
}

/// All identifier names appearing anywhere in the file, used to pick
/// collision free names for injected bindings.
pub fn get_all_ident_names(program: &Program) -> HashSet<String> {
  let mut results = HashSet::new();
  fill_ident_names(program.as_node(), &mut results);
  results
}

fn fill_ident_names(node: Node, results: &mut HashSet<String>) {
  if let Node::Ident(ident) = node {
    results.insert(ident.sym().to_string());
  }
  for child in node.children() {
    fill_ident_names(child, results);
  }
}

pub fn get_unique_name(name: &str, used_names: &HashSet<String>) -> String {
  let mut count = 0;
  let mut new_name = name.to_string();
  while used_names.contains(&new_name) {
    count += 1;
    new_name = format!("{}{}", name, count);
  }
  new_name
}

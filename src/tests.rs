use super::*;
use crate::error::RewriteError;

const STORE_KEY: &str = "globalThis[Symbol.for('@@mongosh.lexicalContext')]";

#[test]
fn test_plain_expression_is_wrapped_untouched() {
  let mut rewriter = AsyncRewriter::new();
  let out = rewriter.process("1 + 2").unwrap();
  assert_eq!(out, "(()=>{var _cr;_cr=1+2;return _cr;})();");
}

#[test]
fn test_tagged_call_is_awaited_at_top_level() {
  let mut rewriter = AsyncRewriter::new();
  let out = rewriter.process("db.test.find()").unwrap();
  // The program wrapper becomes the dual-mode state machine and the call
  // result goes through the maybe-await sequence.
  assert!(out.contains("let _fs='sync';"));
  assert!(out.contains("_isp(_ex)?await _ex:_ex"));
  assert!(out.contains("'\u{feff}db.test.find()\u{feff}'"));
  assert!(out.ends_with("})();"));
}

#[test]
fn test_lexical_names_persist_across_snippets() {
  let mut rewriter = AsyncRewriter::new();
  let first = rewriter.process("let a = 1").unwrap();
  assert!(first.contains(&format!("({STORE_KEY}||({STORE_KEY}={{}})).a=a;")));
  let second = rewriter.process("a").unwrap();
  assert!(second.contains(&format!("let a=({STORE_KEY}||{{}}).a;")));
  // The prologue-bound name is written back so reads and writes both persist.
  assert!(second.contains(".a=a;"));
}

#[test]
fn test_const_rebinds_as_const() {
  let mut rewriter = AsyncRewriter::new();
  rewriter.process("const c = 1").unwrap();
  let out = rewriter.process("c").unwrap();
  assert!(out.contains(&format!("const c=({STORE_KEY}||{{}}).c;")));
}

#[test]
fn test_var_redeclaration_evicts_persisted_lexical() {
  let mut rewriter = AsyncRewriter::new();
  rewriter.process("let x = 1").unwrap();
  rewriter.process("var x = 2").unwrap();
  let out = rewriter.process("x").unwrap();
  // `x` now lives on the global object; nothing re-binds it from the store.
  assert!(!out.contains("lexicalContext"));
}

#[test]
fn test_function_declarations_are_hoisted_out_of_the_wrapper() {
  let mut rewriter = AsyncRewriter::new();
  let out = rewriter.process("f(); function f() { return 1 + 2; }").unwrap();
  assert!(out.starts_with("function f(){"));
  // Every user function opens with its toString marker.
  assert!(out.contains("'<async_rewriter>function%20f"));
}

#[test]
fn test_nested_var_and_function_are_hoisted_out_of_the_wrapper() {
  let mut rewriter = AsyncRewriter::new();
  let out = rewriter.process("if (true) { var x = 1 }").unwrap();
  assert!(out.starts_with("var x;"));
  let out = rewriter.process("{ function g() {} }").unwrap();
  assert!(out.starts_with("function g(){"));
}

#[test]
fn test_class_declaration_becomes_hoisted_var_and_assignment() {
  let mut rewriter = AsyncRewriter::new();
  let out = rewriter.process("class A {}").unwrap();
  assert!(out.starts_with("var A;"));
  assert!(out.contains("A=class A{"));
}

#[test]
fn test_catch_clauses_skip_uncatchable_errors() {
  let mut rewriter = AsyncRewriter::new();
  let out = rewriter.process("try { a() } catch (e) { b() }").unwrap();
  assert!(out.contains("Symbol.for('@@mongosh.uncatchable')"));
  assert!(out.contains("else{throw e;}"));
}

#[test]
fn test_duplicate_lexical_declaration_is_rejected() {
  let mut rewriter = AsyncRewriter::new();
  let err = rewriter.process("let a = 1; let a = 2;").unwrap_err();
  assert!(matches!(err, RewriteError::DuplicateDeclaration { ref name, .. } if name == "a"));
  // The failed snippet must not have touched the store.
  let out = rewriter.process("a").unwrap();
  assert!(!out.contains("lexicalContext"));
}

#[test]
fn test_redeclaration_across_calls_is_allowed() {
  let mut rewriter = AsyncRewriter::new();
  rewriter.process("let a = 1").unwrap();
  let out = rewriter.process("let a = 2").unwrap();
  // The snippet's own declaration wins; no prologue re-bind from the store.
  assert!(!out.contains(".a;"));
  assert!(out.contains("let a=2;"));
}

#[test]
fn test_syntax_errors_surface() {
  let mut rewriter = AsyncRewriter::new();
  assert!(matches!(
    rewriter.process("foo("),
    Err(RewriteError::Syntax(_))
  ));
}

#[test]
fn test_import_statement_is_rejected() {
  let mut rewriter = AsyncRewriter::new();
  assert!(matches!(
    rewriter.process("import fs from 'fs';"),
    Err(RewriteError::Syntax(_))
  ));
}

#[test]
fn test_trailing_comment_is_accepted() {
  let mut rewriter = AsyncRewriter::new();
  let out = rewriter.process("db.test.find() // comment").unwrap();
  assert!(out.contains("db.test.find()"));
}

#[test]
fn test_recursive_function_round_trips() {
  let mut rewriter = AsyncRewriter::new();
  let out = rewriter
    .process("function sumToN(n) { if (n <= 1) return 1; return n + sumToN(n - 1); } sumToN(2);")
    .unwrap();
  // The recursive call is a maybe-async site, so the function converts.
  assert!(out.contains("let _fs='sync';"));
  assert!(out.contains("'<async_rewriter>function%20sumToN"));
}

#[test]
fn test_for_of_over_tagged_iterable_adapts() {
  let mut rewriter = AsyncRewriter::new();
  let out = rewriter
    .process("let sum = 0; for (const v of it()) sum += v;")
    .unwrap();
  assert!(out.contains("_aaitsi("));
  assert!(out.contains("isSyntheticAsyncIterable"));
}

#[test]
fn test_sort_comparator_asserts_instead_of_converting() {
  let mut rewriter = AsyncRewriter::new();
  let out = rewriter.process("arr.sort((x, y) => f(x, y));").unwrap();
  assert!(out.contains("_ansp(f(x,y),'f(x, y)')"));
}

#[test]
fn test_runtime_support_code_is_stable_and_self_contained() {
  let code = AsyncRewriter::runtime_support_code();
  assert!(code.contains("'<async_rewriter>'"));
  assert!(code.contains("Symbol.for('@@mongosh.syntheticPromise')"));
  assert_eq!(code, AsyncRewriter::runtime_support_code());
}

use super::analyze;
use super::FrameKind;
use super::PROGRAM_FRAME;
use crate::error::RewriteError;
use crate::lex::Lexer;
use crate::parse::Parser;
use crate::store::DeclKind;

fn analyzed(source: &str) -> super::Analysis {
  let mut parser = Parser::new(Lexer::new(source));
  let mut top = parser.parse_top_level().unwrap();
  analyze(&mut top).unwrap()
}

#[test]
fn test_literal_only_program_has_no_site() {
  let analysis = analyzed("42;");
  assert!(!analysis.frame(PROGRAM_FRAME).has_site);
  assert!(!analysis.frame(PROGRAM_FRAME).needs_async);
}

#[test]
fn test_call_marks_program_async() {
  let analysis = analyzed("db.coll.find();");
  assert!(analysis.frame(PROGRAM_FRAME).needs_async);
}

#[test]
fn test_site_in_nested_arrow_propagates_to_program() {
  let analysis = analyzed("let f = () => db.test.find();");
  let arrow = analysis
    .frames
    .iter()
    .find(|f| f.kind == FrameKind::Arrow)
    .unwrap();
  assert!(arrow.has_site);
  assert!(arrow.needs_async);
  assert!(analysis.frame(PROGRAM_FRAME).needs_async);
}

#[test]
fn test_constructor_is_not_convertible() {
  let analysis = analyzed("class A { constructor() { db.find(); } }");
  let ctor = analysis
    .frames
    .iter()
    .find(|f| f.kind == FrameKind::Constructor)
    .unwrap();
  assert!(!ctor.convertible);
  assert!(ctor.has_site);
  assert!(!ctor.needs_async);
  // The constructor boundary absorbs the flag.
  assert!(!analysis.frame(PROGRAM_FRAME).needs_async);
}

#[test]
fn test_plain_generator_is_not_convertible() {
  let analysis = analyzed("function* g() { yield x(); }");
  let gen = analysis.frames.iter().find(|f| f.generator).unwrap();
  assert!(!gen.convertible);
  let analysis = analyzed("async function* g() { yield x(); }");
  let gen = analysis.frames.iter().find(|f| f.generator).unwrap();
  assert!(gen.convertible);
  assert!(gen.async_user);
}

#[test]
fn test_sort_comparator_is_not_convertible() {
  let analysis = analyzed("arr.sort((a, b) => a.x - b.x);");
  let arrow = analysis
    .frames
    .iter()
    .find(|f| f.kind == FrameKind::Arrow)
    .unwrap();
  assert!(!arrow.convertible);
  // The `.sort(...)` call itself is still a site for the program.
  assert!(analysis.frame(PROGRAM_FRAME).needs_async);
}

#[test]
fn test_top_level_declarations_collected_in_order() {
  let analysis = analyzed("var a = 1; function f() {} class C {} let b; const c = 2;");
  let names: Vec<_> = analysis
    .top_level
    .iter()
    .map(|d| (d.name.as_str(), d.kind))
    .collect();
  assert_eq!(names, vec![
    ("a", DeclKind::Var),
    ("f", DeclKind::Func),
    ("C", DeclKind::Class),
    ("b", DeclKind::Let),
    ("c", DeclKind::Const),
  ]);
}

#[test]
fn test_nested_var_and_function_decls_are_collected() {
  let analysis = analyzed(
    "if (x) { var a = 1; function f() {} } for (var i of xs) {} \
     try { var b; } catch (e) { var c; } function g() { var inner; }",
  );
  let names: Vec<_> = analysis
    .top_level
    .iter()
    .map(|d| (d.name.as_str(), d.kind))
    .collect();
  assert_eq!(names, vec![
    ("a", DeclKind::Var),
    ("f", DeclKind::Func),
    ("i", DeclKind::Var),
    ("b", DeclKind::Var),
    ("c", DeclKind::Var),
    ("g", DeclKind::Func),
  ]);
}

#[test]
fn test_destructured_top_level_names() {
  let analysis = analyzed("const { a, b: [c, d] } = x;");
  let names: Vec<_> = analysis.top_level.iter().map(|d| d.name.as_str()).collect();
  assert_eq!(names, vec!["a", "c", "d"]);
}

#[test]
fn test_duplicate_lexical_declaration_rejected() {
  let mut parser = Parser::new(Lexer::new("let a = 1; const a = 2;"));
  let mut top = parser.parse_top_level().unwrap();
  let err = analyze(&mut top).unwrap_err();
  assert!(matches!(
    err,
    RewriteError::DuplicateDeclaration { ref name, .. } if name == "a"
  ));
}

#[test]
fn test_var_redeclaration_allowed() {
  let analysis = analyzed("var a = 1; var a = 2;");
  assert_eq!(analysis.top_level.len(), 2);
}

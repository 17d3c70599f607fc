use super::emit_js;
use crate::lex::Lexer;
use crate::parse::Parser;

fn reemit(source: &str) -> String {
  let mut parser = Parser::new(Lexer::new(source));
  let top = parser.parse_top_level().unwrap();
  emit_js(&top)
}

#[test]
fn test_precedence_parens_preserved() {
  assert_eq!(reemit("(a + b) * c;"), "(a+b)*c;");
  assert_eq!(reemit("a + b * c;"), "a+b*c;");
  assert_eq!(reemit("a - (b - c);"), "a-(b-c);");
  assert_eq!(reemit("(a, b);"), "a,b;");
  assert_eq!(reemit("f((a, b));"), "f((a,b));");
}

#[test]
fn test_token_boundaries() {
  assert_eq!(reemit("a + +b;"), "a+ +b;");
  assert_eq!(reemit("a - --b;"), "a- --b;");
  assert_eq!(reemit("typeof x;"), "typeof x;");
  assert_eq!(reemit("a in b;"), "a in b;");
  assert_eq!(reemit("void 0;"), "void 0;");
}

#[test]
fn test_statement_start_parenthesization() {
  assert_eq!(reemit("({ a: 1 });"), "({a:1});");
  assert_eq!(reemit("(function () {});"), "(function(){});");
  assert_eq!(reemit("(class {});"), "(class{});");
}

#[test]
fn test_arrow_with_object_body() {
  assert_eq!(reemit("x => ({ a: x });"), "x=>({a:x});");
}

#[test]
fn test_raw_literals_round_trip() {
  assert_eq!(reemit("'a\\n\\u1234';"), "'a\\n\\u1234';");
  assert_eq!(reemit("0x1F + 1e3;"), "0x1F+1e3;");
  assert_eq!(reemit("a = /ab\\/c/gi;"), "a=/ab\\/c/gi;");
  assert_eq!(reemit("`a${b}\\n`;"), "`a${b}\\n`;");
}

#[test]
fn test_member_of_integer_literal() {
  assert_eq!(reemit("1 .toString();"), "1..toString();");
  assert_eq!(reemit("1.5.toString();"), "1.5.toString();");
}

#[test]
fn test_new_expression() {
  assert_eq!(reemit("new a.b(1);"), "new a.b(1);");
  assert_eq!(reemit("new (a ?? b)();"), "new(a??b)();");
}

#[test]
fn test_optional_chaining() {
  assert_eq!(reemit("a?.b?.(c)?.[d];"), "a?.b?.(c)?.[d];");
}

#[test]
fn test_control_flow() {
  assert_eq!(
    reemit("if (a) b(); else { c(); }"),
    "if(a){b();}else{c();}"
  );
  assert_eq!(
    reemit("for (const x of xs) { y(x); }"),
    "for(const x of xs){y(x);}"
  );
  assert_eq!(
    reemit("outer: while (a) continue outer;"),
    "outer:while(a){continue outer;}"
  );
  assert_eq!(
    reemit("try { a(); } catch ({ message }) { b(); } finally { c(); }"),
    "try{a();}catch({message}){b();}finally{c();}"
  );
  assert_eq!(
    reemit("switch (a) { case 1: b(); default: c(); }"),
    "switch(a){case 1:b();default:c();}"
  );
}

#[test]
fn test_declarations() {
  assert_eq!(
    reemit("const [a, ...b] = c, { d: e = 1 } = f;"),
    "const[a,...b]=c,{d:e=1}=f;"
  );
  assert_eq!(
    reemit("async function* gen(a, ...rest) { yield a; }"),
    "async function*gen(a,...rest){yield a;}"
  );
  assert_eq!(
    reemit("class A extends B { static x = 1; async *m() {} get g() {} }"),
    "class A extends B{static x=1;async*m(){}get g(){}}"
  );
}

#[test]
fn test_asi_input_gets_explicit_semicolons() {
  assert_eq!(reemit("const a = 1\nf(a)"), "const a=1;f(a);");
}

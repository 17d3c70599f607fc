use super::expr::pat::ParsePatternRules;
use super::ParseCtx;
use super::Parser;
use crate::ast::expr::Expr;
use crate::ast::node::Node;
use crate::ast::stmt::Stmt;
use crate::error::SyntaxErrorType;
use crate::lex::Lexer;
use crate::token::TT;
use crate::util::test::assert_syntax_eq;
use serde_json::json;
use serde_json::to_value;

fn parse_expr(input: &str) -> Node<Expr> {
  let mut parser = Parser::new(Lexer::new(input));
  let ctx = ParseCtx {
    rules: ParsePatternRules {
      await_allowed: true,
      yield_allowed: true,
    },
  };
  parser.expr(ctx, [TT::Semicolon]).unwrap()
}

fn parse_stmt(input: &str) -> Node<Stmt> {
  let mut parser = Parser::new(Lexer::new(input));
  let ctx = ParseCtx {
    rules: ParsePatternRules {
      await_allowed: true,
      yield_allowed: true,
    },
  };
  parser.stmt(ctx).unwrap()
}

fn parse_stmt_err(input: &str) -> SyntaxErrorType {
  let mut parser = Parser::new(Lexer::new(input));
  let ctx = ParseCtx {
    rules: ParsePatternRules {
      await_allowed: true,
      yield_allowed: true,
    },
  };
  match parser.stmt(ctx) {
    Ok(node) => panic!("expected syntax error, parsed {:?}", node),
    Err(err) => err.typ,
  }
}

fn check_expr(input: &str, expected: serde_json::Value) {
  assert_syntax_eq(to_value(parse_expr(input)).unwrap(), expected);
}

fn check_stmt(input: &str, expected: serde_json::Value) {
  assert_syntax_eq(to_value(parse_stmt(input)).unwrap(), expected);
}

#[test]
fn test_operator_precedence() {
  check_expr("a + b * c", json!({
    "$t": "Binary",
    "operator": "Addition",
    "left": { "$t": "Id", "name": "a" },
    "right": {
      "$t": "Binary",
      "operator": "Multiplication",
      "left": { "$t": "Id", "name": "b" },
      "right": { "$t": "Id", "name": "c" },
    },
  }));
}

#[test]
fn test_assignment_is_right_associative() {
  check_expr("a = b = 1", json!({
    "$t": "Binary",
    "operator": "Assignment",
    "left": { "$t": "IdPat", "name": "a" },
    "right": {
      "$t": "Binary",
      "operator": "Assignment",
      "left": { "$t": "IdPat", "name": "b" },
      "right": { "$t": "LitNum", "raw": "1" },
    },
  }));
}

#[test]
fn test_conditional_alternate_is_assignment_expression() {
  // `a ? b : c = 1` is `a ? b : (c = 1)`.
  check_expr("a ? b : c = 1", json!({
    "$t": "Cond",
    "test": { "$t": "Id", "name": "a" },
    "consequent": { "$t": "Id", "name": "b" },
    "alternate": {
      "$t": "Binary",
      "operator": "Assignment",
      "left": { "$t": "IdPat", "name": "c" },
      "right": { "$t": "LitNum", "raw": "1" },
    },
  }));
}

#[test]
fn test_member_and_call_chain() {
  check_expr("a.b?.(c)", json!({
    "$t": "Call",
    "optional_chaining": true,
    "callee": {
      "$t": "Member",
      "optional_chaining": false,
      "left": { "$t": "Id", "name": "a" },
      "right": "b",
    },
    "arguments": [
      { "spread": false, "value": { "$t": "Id", "name": "c" } },
    ],
  }));
}

#[test]
fn test_new_wraps_entire_call() {
  // `new a.b()` must parse as New over the whole call, not a call of `new a.b`.
  check_expr("new a.b()", json!({
    "$t": "Unary",
    "operator": "New",
    "argument": {
      "$t": "Call",
      "optional_chaining": false,
      "callee": {
        "$t": "Member",
        "optional_chaining": false,
        "left": { "$t": "Id", "name": "a" },
        "right": "b",
      },
      "arguments": [],
    },
  }));
}

#[test]
fn test_new_target() {
  check_expr("new.target", json!({ "$t": "NewTarget" }));
}

#[test]
fn test_typeof_unary() {
  check_expr("typeof x", json!({
    "$t": "Unary",
    "operator": "Typeof",
    "argument": { "$t": "Id", "name": "x" },
  }));
}

#[test]
fn test_raw_literals_preserved() {
  check_expr("0x1F", json!({ "$t": "LitNum", "raw": "0x1F" }));
  check_expr("123n", json!({ "$t": "LitBigInt", "raw": "123n" }));
  check_expr("'a\\n'", json!({ "$t": "LitStr", "raw": "'a\\n'" }));
  check_expr("/ab+/gi", json!({ "$t": "LitRegex", "raw": "/ab+/gi" }));
}

#[test]
fn test_regex_vs_division() {
  // At operand position a slash starts a regex; after an operand it's division.
  check_expr("a / b", json!({
    "$t": "Binary",
    "operator": "Division",
    "left": { "$t": "Id", "name": "a" },
    "right": { "$t": "Id", "name": "b" },
  }));
  check_expr("a = /b/", json!({
    "$t": "Binary",
    "operator": "Assignment",
    "left": { "$t": "IdPat", "name": "a" },
    "right": { "$t": "LitRegex", "raw": "/b/" },
  }));
}

#[test]
fn test_template_literal_parts() {
  check_expr("`a${b}c`", json!({
    "$t": "LitTemplate",
    "parts": [
      { "String": "a" },
      { "Substitution": { "$t": "Id", "name": "b" } },
      { "String": "c" },
    ],
  }));
}

#[test]
fn test_tagged_template() {
  check_expr("tag`x`", json!({
    "$t": "TaggedTemplate",
    "function": { "$t": "Id", "name": "tag" },
    "parts": [
      { "String": "x" },
    ],
  }));
}

#[test]
fn test_arrow_functions() {
  check_expr("x => x", json!({
    "$t": "ArrowFunc",
    "func": {
      "arrow": true,
      "async_": false,
      "generator": false,
      "parameters": [
        {
          "rest": false,
          "pattern": { "pat": { "$t": "Id", "name": "x" } },
          "default_value": null,
        },
      ],
      "body": { "Expression": { "$t": "Id", "name": "x" } },
    },
  }));
  check_expr("async (a, ...b) => {}", json!({
    "$t": "ArrowFunc",
    "func": {
      "arrow": true,
      "async_": true,
      "generator": false,
      "parameters": [
        {
          "rest": false,
          "pattern": { "pat": { "$t": "Id", "name": "a" } },
          "default_value": null,
        },
        {
          "rest": true,
          "pattern": { "pat": { "$t": "Id", "name": "b" } },
          "default_value": null,
        },
      ],
      "body": { "Block": [] },
    },
  }));
}

#[test]
fn test_grouping_does_not_produce_a_node() {
  check_expr("(a)", json!({ "$t": "Id", "name": "a" }));
}

#[test]
fn test_object_literal_members() {
  check_expr("{ a, b: 1, c() {}, get d() {}, ...e }", json!({
    "$t": "LitObj",
    "members": [
      { "typ": { "Shorthand": { "id": { "name": "a" } } } },
      { "typ": { "Valued": {
        "key": { "Direct": { "key": "b", "tt": "Identifier" } },
        "val": { "Prop": { "$t": "LitNum", "raw": "1" } },
      } } },
      { "typ": { "Valued": {
        "key": { "Direct": { "key": "c", "tt": "Identifier" } },
        "val": { "Method": { "func": {
          "arrow": false,
          "async_": false,
          "generator": false,
          "parameters": [],
          "body": { "Block": [] },
        } } },
      } } },
      { "typ": { "Valued": {
        "key": { "Direct": { "key": "d", "tt": "Identifier" } },
        "val": { "Getter": { "func": {
          "arrow": false,
          "async_": false,
          "generator": false,
          "parameters": [],
          "body": { "Block": [] },
        } } },
      } } },
      { "typ": { "Rest": { "val": { "$t": "Id", "name": "e" } } } },
    ],
  }));
}

#[test]
fn test_object_literal_computed_keys() {
  check_expr("{ [Symbol.iterator]() { return this; }, [k]: 1, get [g]() {} }", json!({
    "$t": "LitObj",
    "members": [
      { "typ": { "Valued": {
        "key": { "Computed": {
          "$t": "Member",
          "optional_chaining": false,
          "left": { "$t": "Id", "name": "Symbol" },
          "right": "iterator",
        } },
        "val": { "Method": { "func": {
          "arrow": false,
          "async_": false,
          "generator": false,
          "parameters": [],
          "body": { "Block": [
            { "$t": "Return", "value": { "$t": "This" } },
          ] },
        } } },
      } } },
      { "typ": { "Valued": {
        "key": { "Computed": { "$t": "Id", "name": "k" } },
        "val": { "Prop": { "$t": "LitNum", "raw": "1" } },
      } } },
      { "typ": { "Valued": {
        "key": { "Computed": { "$t": "Id", "name": "g" } },
        "val": { "Getter": { "func": {
          "arrow": false,
          "async_": false,
          "generator": false,
          "parameters": [],
          "body": { "Block": [] },
        } } },
      } } },
    ],
  }));
}

#[test]
fn test_destructuring_assignment() {
  check_expr("[a, ...b] = c", json!({
    "$t": "Binary",
    "operator": "Assignment",
    "left": {
      "$t": "ArrPat",
      "elements": [
        { "target": { "$t": "Id", "name": "a" }, "default_value": null },
      ],
      "rest": { "$t": "Id", "name": "b" },
    },
    "right": { "$t": "Id", "name": "c" },
  }));
}

#[test]
fn test_yield_without_operand() {
  let mut parser = Parser::new(Lexer::new("function* f() { yield; }"));
  let ctx = ParseCtx {
    rules: ParsePatternRules {
      await_allowed: true,
      yield_allowed: true,
    },
  };
  let node = parser.stmt(ctx).unwrap();
  assert_syntax_eq(to_value(&node).unwrap(), json!({
    "$t": "FunctionDecl",
    "name": { "name": "f" },
    "function": {
      "arrow": false,
      "async_": false,
      "generator": true,
      "parameters": [],
      "body": { "Block": [
        { "$t": "Expr", "expr": {
          "$t": "Unary",
          "operator": "Yield",
          "argument": { "$t": "Id", "name": "undefined" },
        } },
      ] },
    },
  }));
}

#[test]
fn test_await_is_an_identifier_at_top_level() {
  check_stmt("let await = 1;", json!({
    "$t": "VarDecl",
    "mode": "Let",
    "declarators": [
      {
        "pattern": { "pat": { "$t": "Id", "name": "await" } },
        "initializer": { "$t": "LitNum", "raw": "1" },
      },
    ],
  }));
}

#[test]
fn test_var_decl_asi() {
  // No semicolon; the line terminator must end the declaration.
  check_stmt("const a = 1\nconst b = 2;", json!({
    "$t": "VarDecl",
    "mode": "Const",
    "declarators": [
      {
        "pattern": { "pat": { "$t": "Id", "name": "a" } },
        "initializer": { "$t": "LitNum", "raw": "1" },
      },
    ],
  }));
}

#[test]
fn test_return_asi() {
  check_stmt("function f() { return\n1; }", json!({
    "$t": "FunctionDecl",
    "name": { "name": "f" },
    "function": {
      "arrow": false,
      "async_": false,
      "generator": false,
      "parameters": [],
      "body": { "Block": [
        { "$t": "Return", "value": null },
        { "$t": "Expr", "expr": { "$t": "LitNum", "raw": "1" } },
      ] },
    },
  }));
}

#[test]
fn test_for_of_with_declaration() {
  check_stmt("for (const x of xs) {}", json!({
    "$t": "ForOf",
    "await_": false,
    "lhs": { "Decl": ["Const", { "pat": { "$t": "Id", "name": "x" } }] },
    "rhs": { "$t": "Id", "name": "xs" },
    "body": { "body": [] },
  }));
}

#[test]
fn test_for_of_with_member_target() {
  check_stmt("for (a.b of xs) {}", json!({
    "$t": "ForOf",
    "await_": false,
    // The assignment-target tag is shadowed by the inner expression's own tag.
    "lhs": { "Assign": {
      "$t": "Member",
      "optional_chaining": false,
      "left": { "$t": "Id", "name": "a" },
      "right": "b",
    } },
    "rhs": { "$t": "Id", "name": "xs" },
    "body": { "body": [] },
  }));
}

#[test]
fn test_for_triple_with_let() {
  check_stmt("for (let i = 0; i < n; i++) {}", json!({
    "$t": "ForTriple",
    "init": { "Decl": {
      "mode": "Let",
      "declarators": [
        {
          "pattern": { "pat": { "$t": "Id", "name": "i" } },
          "initializer": { "$t": "LitNum", "raw": "0" },
        },
      ],
    } },
    "cond": {
      "$t": "Binary",
      "operator": "LessThan",
      "left": { "$t": "Id", "name": "i" },
      "right": { "$t": "Id", "name": "n" },
    },
    "post": {
      "$t": "UnaryPostfix",
      "operator": "PostfixIncrement",
      "argument": { "$t": "Id", "name": "i" },
    },
    "body": { "body": [] },
  }));
}

#[test]
fn test_try_catch_with_destructuring_parameter() {
  check_stmt("try {} catch ({ message }) {}", json!({
    "$t": "Try",
    "wrapped": { "body": [] },
    "catch": {
      "parameter": { "pat": {
        "$t": "Obj",
        "properties": [
          {
            "key": { "Direct": { "key": "message", "tt": "Identifier" } },
            "target": { "$t": "Id", "name": "message" },
            "shorthand": true,
            "default_value": null,
          },
        ],
        "rest": null,
      } },
      "body": [],
    },
    "finally": null,
  }));
}

#[test]
fn test_try_requires_catch_or_finally() {
  assert_eq!(
    parse_stmt_err("try {}"),
    SyntaxErrorType::TryStatementHasNoCatchOrFinally
  );
}

#[test]
fn test_class_declaration() {
  check_stmt("class A extends B { static x = 1; m() {} }", json!({
    "$t": "ClassDecl",
    "name": { "name": "A" },
    "extends": { "$t": "Id", "name": "B" },
    "members": [
      {
        "key": { "Direct": { "key": "x", "tt": "Identifier" } },
        "static_": true,
        "val": { "Prop": { "$t": "LitNum", "raw": "1" } },
      },
      {
        "key": { "Direct": { "key": "m", "tt": "Identifier" } },
        "static_": false,
        "val": { "Method": { "func": {
          "arrow": false,
          "async_": false,
          "generator": false,
          "parameters": [],
          "body": { "Block": [] },
        } } },
      },
    ],
  }));
}

#[test]
fn test_label_statement() {
  check_stmt("outer: for (;;) break outer;", json!({
    "$t": "Label",
    "name": "outer",
    "statement": {
      "$t": "ForTriple",
      "init": "None",
      "cond": null,
      "post": null,
      "body": { "body": [
        { "$t": "Break", "label": "outer" },
      ] },
    },
  }));
}

#[test]
fn test_module_syntax_rejected() {
  assert_eq!(
    parse_stmt_err("import x from 'y';"),
    SyntaxErrorType::ModuleSyntaxNotAllowed
  );
  assert_eq!(
    parse_stmt_err("export const a = 1;"),
    SyntaxErrorType::ModuleSyntaxNotAllowed
  );
  assert_eq!(
    parse_stmt_err("import.meta"),
    SyntaxErrorType::ModuleSyntaxNotAllowed
  );
}

#[test]
fn test_dynamic_import_allowed() {
  check_stmt("import('mod');", json!({
    "$t": "Expr",
    "expr": {
      "$t": "Import",
      "module": { "$t": "LitStr", "raw": "'mod'" },
    },
  }));
}

#[test]
fn test_full_snippet_parses() {
  let mut parser = Parser::new(Lexer::new(
    r#"
      const docs = db.coll.find({ x: { $gt: 1 } }).toArray();
      for (const d of docs) {
        print(d._id);
      }
      docs.length
    "#,
  ));
  let top = parser.parse_top_level().unwrap();
  assert_eq!(top.stx.body.len(), 3);
}

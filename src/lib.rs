//! Source-to-source rewriter that gives a REPL implicit awaiting: snippets
//! are transformed so that host values tagged as synthetic promises or
//! synthetic async iterables are awaited transparently wherever the
//! surrounding syntax can legally become async, and raise a source-quoting
//! error at the moment of use wherever it cannot.
//!
//! `AsyncRewriter::process` runs the whole pipeline on one snippet: parse,
//! frame analysis, the three rewrite stages (program wrapper, uncatchable
//! exception guards, the implicit-await transform), and code generation.
//! Top-level `let`/`const` names persist in a [`store::LexicalContextStore`]
//! across calls so consecutive snippets behave like one long script.
//! [`AsyncRewriter::runtime_support_code`] returns the companion library the
//! generated code expects to have been evaluated once in its context.

use analyze::analyze;
use ast::node::Node;
use ast::stx::TopLevel;
use emit::emit_js;
use error::RewriteResult;
use error::SyntaxResult;
use lex::Lexer;
use parse::Parser;
use rewrite::awaitify;
use rewrite::iife;
use rewrite::names::FreshInternalNameGenerator;
use rewrite::names::GeneratedNames;
use rewrite::uncatchable;
use store::LexicalContextStore;

pub mod analyze;
pub mod ast;
pub mod char;
pub mod emit;
pub mod error;
pub mod lex;
pub mod loc;
pub mod operator;
pub mod parse;
pub mod rewrite;
pub mod runtime;
pub mod source;
pub mod store;
pub mod token;
pub mod util;

pub fn parse(source: &str) -> SyntaxResult<Node<TopLevel>> {
  let lexer = Lexer::new(source);
  let mut parser = Parser::new(lexer);
  parser.parse_top_level()
}

/// One rewriter per REPL session. Owns the lexical context carried between
/// snippets; everything else is per-call.
#[derive(Debug, Default)]
pub struct AsyncRewriter {
  store: LexicalContextStore,
}

impl AsyncRewriter {
  pub fn new() -> Self {
    Self {
      store: LexicalContextStore::new(),
    }
  }

  /// Transforms one snippet. The store is only updated once the whole
  /// pipeline has succeeded, so a failed snippet leaves no trace.
  pub fn process(&mut self, source: &str) -> RewriteResult<String> {
    let mut top = parse(source)?;
    let analysis = analyze(&mut top)?;
    let mut names = FreshInternalNameGenerator::for_program(&mut top);
    let g = GeneratedNames::generate(&mut names);
    iife::wrap_program(&mut top, &analysis, &self.store, &g);
    let names = uncatchable::apply(&mut top, names);
    awaitify::apply(&mut top, source, &analysis, &g, names)?;
    let out = emit_js(&top);

    for decl in &analysis.top_level {
      if decl.kind.is_lexical() {
        self.store.insert(&decl.name, decl.kind);
      } else {
        // A var/function/class redeclaration moves the name onto the global
        // object; the store must stop re-binding it.
        self.store.remove(&decl.name);
      }
    }
    Ok(out)
  }

  /// The support library's source, to be evaluated once per execution
  /// context before any `process` output runs.
  pub fn runtime_support_code() -> &'static str {
    runtime::RUNTIME_SUPPORT
  }
}

#[cfg(test)]
mod tests;

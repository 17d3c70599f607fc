use crate::ast::expr::pat::ClassOrFuncName;
use crate::ast::expr::pat::IdPat;
use crate::ast::expr::IdExpr;
use crate::ast::node::Node;
use crate::ast::stx::TopLevel;
use ahash::HashSet;
use ahash::HashSetExt;
use derive_visitor::DriveMut;
use derive_visitor::VisitorMut;

type IdExprNode = Node<IdExpr>;
type IdPatNode = Node<IdPat>;
type ClassOrFuncNameNode = Node<ClassOrFuncName>;

/// Produces identifiers guaranteed not to collide with any name appearing in
/// the program being rewritten.
#[derive(Debug)]
pub struct FreshInternalNameGenerator {
  used: HashSet<String>,
}

impl FreshInternalNameGenerator {
  pub fn for_program(top_level: &mut Node<TopLevel>) -> Self {
    Self {
      used: collect_all_identifier_strings(top_level),
    }
  }

  pub fn fresh(&mut self, preferred: &str) -> String {
    if self.used.insert(preferred.to_string()) {
      return preferred.to_string();
    }
    for suffix in 1usize.. {
      let candidate = format!("{preferred}_{suffix}");
      if self.used.insert(candidate.clone()) {
        return candidate;
      }
    }
    unreachable!();
  }
}

fn collect_all_identifier_strings(top_level: &mut Node<TopLevel>) -> HashSet<String> {
  #[derive(VisitorMut)]
  #[visitor(IdExprNode(enter), IdPatNode(enter), ClassOrFuncNameNode(enter))]
  struct Collector {
    names: HashSet<String>,
  }

  impl Collector {
    fn enter_id_expr_node(&mut self, node: &mut IdExprNode) {
      self.names.insert(node.stx.name.clone());
    }

    fn enter_id_pat_node(&mut self, node: &mut IdPatNode) {
      self.names.insert(node.stx.name.clone());
    }

    fn enter_class_or_func_name_node(&mut self, node: &mut ClassOrFuncNameNode) {
      self.names.insert(node.stx.name.clone());
    }
  }

  let mut collector = Collector {
    names: HashSet::new(),
  };
  top_level.drive_mut(&mut collector);
  collector.names
}

/// The helper identifiers shared by all rewrite stages of one `process` call.
/// Nested rewritten functions redeclare the per-frame state names (`fs`,
/// `srv`, `arv`), shadowing the enclosing frame's bindings.
#[derive(Debug)]
pub struct GeneratedNames {
  /// Completion record of the program wrapper.
  pub cr: String,
  /// Function state: "sync" | "returned" | "threw" | "async".
  pub fs: String,
  /// Synchronous return value (or synchronously thrown error).
  pub srv: String,
  /// The promise returned by the generated inner async function.
  pub arv: String,
  /// Scratch holder for expressions under a maybe-await check.
  pub ex: String,
  /// markSyntheticPromise.
  pub msp: String,
  /// isSyntheticPromise.
  pub isp: String,
  /// adaptAsyncIterableToSyncIterable.
  pub aaitsi: String,
  /// assertNotSyntheticPromise.
  pub ansp: String,
  /// The synthetic-promise well-known symbol.
  pub sp: String,
  /// The synthetic-async-iterable well-known symbol.
  pub sai: String,
  /// demangleError.
  pub de: String,
}

impl GeneratedNames {
  pub fn generate(names: &mut FreshInternalNameGenerator) -> Self {
    Self {
      cr: names.fresh("_cr"),
      fs: names.fresh("_fs"),
      srv: names.fresh("_srv"),
      arv: names.fresh("_arv"),
      ex: names.fresh("_ex"),
      msp: names.fresh("_msp"),
      isp: names.fresh("_isp"),
      aaitsi: names.fresh("_aaitsi"),
      ansp: names.fresh("_ansp"),
      sp: names.fresh("_sp"),
      sai: names.fresh("_sai"),
      de: names.fresh("_de"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::lex::Lexer;
  use crate::parse::Parser;

  #[test]
  fn test_fresh_names_avoid_program_identifiers() {
    let mut top = Parser::new(Lexer::new("let _cr = 1; function _cr_1() {}"))
      .parse_top_level()
      .unwrap();
    let mut names = FreshInternalNameGenerator::for_program(&mut top);
    assert_eq!(names.fresh("_cr"), "_cr_2");
    assert_eq!(names.fresh("_fs"), "_fs");
    assert_eq!(names.fresh("_fs"), "_fs_1");
  }
}

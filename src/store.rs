use ahash::HashMap;
use ahash::HashMapExt;
use serde::Serialize;

/// How a top-level name was declared. This drives both hoisting (Stage A) and
/// which names survive in the [`LexicalContextStore`] between snippets.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum DeclKind {
  Var,
  Func,
  Class,
  Let,
  Const,
}

impl DeclKind {
  /// Lexical names stay off the global object and persist through the store.
  pub fn is_lexical(self) -> bool {
    matches!(self, DeclKind::Let | DeclKind::Const)
  }
}

/// Top-level `let`/`const` names persisted across `process` calls.
///
/// The rewritten program re-binds these in its wrapper prologue (reading from
/// the store object the previous snippet's epilogue populated) so that later
/// snippets and `eval` sites observe earlier snippets' lexical bindings
/// without those names ever becoming host-global properties.
#[derive(Debug, Default)]
pub struct LexicalContextStore {
  // Insertion order matters: the prologue re-binds in first-declaration order.
  names: Vec<String>,
  kinds: HashMap<String, DeclKind>,
}

impl LexicalContextStore {
  pub fn new() -> Self {
    Self {
      names: Vec::new(),
      kinds: HashMap::new(),
    }
  }

  pub fn insert(&mut self, name: &str, kind: DeclKind) {
    debug_assert!(kind.is_lexical());
    if self.kinds.insert(name.to_string(), kind).is_none() {
      self.names.push(name.to_string());
    }
  }

  /// A later snippet redeclaring a persisted name with `var`, `function`, or
  /// `class` moves it to the global object; drop the stale lexical entry so
  /// the prologue no longer shadows it.
  pub fn remove(&mut self, name: &str) {
    if self.kinds.remove(name).is_some() {
      self.names.retain(|n| n != name);
    }
  }

  pub fn contains(&self, name: &str) -> bool {
    self.kinds.contains_key(name)
  }

  pub fn kind(&self, name: &str) -> Option<DeclKind> {
    self.kinds.get(name).copied()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, DeclKind)> {
    self
      .names
      .iter()
      .map(|n| (n.as_str(), self.kinds[n.as_str()]))
  }

  pub fn is_empty(&self) -> bool {
    self.names.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_store_preserves_insertion_order_and_redeclaration() {
    let mut store = LexicalContextStore::new();
    store.insert("b", DeclKind::Let);
    store.insert("a", DeclKind::Const);
    store.insert("b", DeclKind::Const);
    let entries: Vec<_> = store.iter().collect();
    assert_eq!(entries, vec![("b", DeclKind::Const), ("a", DeclKind::Const)]);
    store.remove("b");
    assert!(!store.contains("b"));
    assert!(store.contains("a"));
  }
}

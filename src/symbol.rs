//! Scope-aware symbol table.
//!
//! Scopes live in an arena and refer to their parent by index, so a scope
//! that has been left is simply no longer the current one; nothing dangles.
//! Lookups walk outward through parents and never see sibling scopes.

use std::collections::HashMap;

/// Size of one storage slot in bytes.
pub const WORD: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolType {
  Integer,
  String,
  Function,
  Boolean,
  Void,
}

impl SymbolType {
  /// Types that occupy a data word and can be loaded into a register.
  pub fn is_value(self) -> bool {
    matches!(
      self,
      SymbolType::Integer | SymbolType::String | SymbolType::Boolean
    )
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
  Global,
  Function,
  If,
  While,
}

impl ScopeKind {
  pub fn is_loop(self) -> bool {
    matches!(self, ScopeKind::While)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
  pub name: String,
  pub ty: SymbolType,
  /// Byte offset within the owning scope, assigned in steps of `WORD`.
  pub offset: i32,
  pub is_global: bool,
  pub is_temp: bool,
  pub is_builtin_print: bool,
  pub scope: ScopeKind,
  pub params: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

#[derive(Debug)]
struct Scope {
  kind: ScopeKind,
  parent: Option<ScopeId>,
  symbols: Vec<Symbol>,
  index: HashMap<String, usize>,
  next_offset: i32,
  temp_count: usize,
  loop_depth: usize,
}

impl Scope {
  fn new(kind: ScopeKind, parent: Option<ScopeId>, loop_depth: usize) -> Self {
    Self {
      kind,
      parent,
      symbols: Vec::new(),
      index: HashMap::new(),
      next_offset: 0,
      temp_count: 0,
      loop_depth,
    }
  }

  /// Insert or overwrite; an overwritten name keeps its place in order.
  fn insert(&mut self, symbol: Symbol) -> &Symbol {
    let slot = match self.index.get(&symbol.name) {
      Some(&slot) => {
        self.symbols[slot] = symbol;
        slot
      }
      None => {
        self.index.insert(symbol.name.clone(), self.symbols.len());
        self.symbols.push(symbol);
        self.symbols.len() - 1
      }
    };
    &self.symbols[slot]
  }

  fn get(&self, name: &str) -> Option<&Symbol> {
    self.index.get(name).map(|&slot| &self.symbols[slot])
  }

  fn take_offset(&mut self) -> i32 {
    let offset = self.next_offset;
    self.next_offset += WORD;
    offset
  }
}

#[derive(Debug)]
pub struct SymbolTable {
  scopes: Vec<Scope>,
}

impl Default for SymbolTable {
  fn default() -> Self {
    Self::new()
  }
}

impl SymbolTable {
  /// Create a table holding only the global scope with the builtin `print`.
  pub fn new() -> Self {
    let mut global = Scope::new(ScopeKind::Global, None, 0);
    global.insert(Symbol {
      name: "print".to_string(),
      ty: SymbolType::Function,
      offset: 0,
      is_global: true,
      is_temp: false,
      is_builtin_print: true,
      scope: ScopeKind::Global,
      params: Vec::new(),
    });
    Self {
      scopes: vec![global],
    }
  }

  pub fn global(&self) -> ScopeId {
    ScopeId(0)
  }

  /// Open a child scope; loop kinds deepen the loop nesting by one.
  pub fn enter_scope(&mut self, parent: ScopeId, kind: ScopeKind) -> ScopeId {
    let depth = self.scope(parent).loop_depth + usize::from(kind.is_loop());
    let id = ScopeId(self.scopes.len());
    self.scopes.push(Scope::new(kind, Some(parent), depth));
    id
  }

  pub fn define(&mut self, scope: ScopeId, name: &str, ty: SymbolType) -> &Symbol {
    self.define_with_params(scope, name, ty, Vec::new())
  }

  pub fn define_function(&mut self, scope: ScopeId, name: &str, params: Vec<String>) -> &Symbol {
    self.define_with_params(scope, name, SymbolType::Function, params)
  }

  fn define_with_params(
    &mut self,
    scope: ScopeId,
    name: &str,
    ty: SymbolType,
    params: Vec<String>,
  ) -> &Symbol {
    let target = self.scope_mut(scope);
    let offset = target.take_offset();
    let symbol = Symbol {
      name: name.to_string(),
      ty,
      offset,
      is_global: target.parent.is_none(),
      is_temp: false,
      is_builtin_print: false,
      scope: target.kind,
      params,
    };
    target.insert(symbol)
  }

  /// Allocate an unnamed intermediate (`_t1`, `_t2`, ...) in `scope`.
  pub fn new_temp(&mut self, scope: ScopeId, ty: SymbolType) -> &Symbol {
    let target = self.scope_mut(scope);
    target.temp_count += 1;
    let offset = target.take_offset();
    let symbol = Symbol {
      name: format!("_t{}", target.temp_count),
      ty,
      offset,
      is_global: false,
      is_temp: true,
      is_builtin_print: false,
      scope: target.kind,
      params: Vec::new(),
    };
    target.insert(symbol)
  }

  pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<&Symbol> {
    let mut current = Some(scope);
    while let Some(id) = current {
      let candidate = self.scope(id);
      if let Some(symbol) = candidate.get(name) {
        return Some(symbol);
      }
      current = candidate.parent;
    }
    None
  }

  /// Symbols defined directly in `scope`, in definition order.
  pub fn symbols(&self, scope: ScopeId) -> &[Symbol] {
    &self.scope(scope).symbols
  }

  pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
    self.scope(scope).parent
  }

  pub fn kind(&self, scope: ScopeId) -> ScopeKind {
    self.scope(scope).kind
  }

  pub fn loop_depth(&self, scope: ScopeId) -> usize {
    self.scope(scope).loop_depth
  }

  pub fn in_loop(&self, scope: ScopeId) -> bool {
    self.loop_depth(scope) > 0
  }

  // Ids are only minted by this table and scopes are never removed.
  fn scope(&self, id: ScopeId) -> &Scope {
    &self.scopes[id.0]
  }

  fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
    &mut self.scopes[id.0]
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn globals_are_marked_and_offsets_advance() {
    let mut table = SymbolTable::new();
    let global = table.global();
    let x = table.define(global, "x", SymbolType::Integer).clone();
    let y = table.define(global, "y", SymbolType::Integer).clone();
    assert!(x.is_global && y.is_global);
    assert_eq!((x.offset, y.offset), (0, 4));
    assert_eq!(x.scope, ScopeKind::Global);
  }

  #[test]
  fn temporaries_get_sequential_names() {
    let mut table = SymbolTable::new();
    let global = table.global();
    let first = table.new_temp(global, SymbolType::Integer).clone();
    let second = table.new_temp(global, SymbolType::Integer).clone();
    assert_eq!((first.name.as_str(), second.name.as_str()), ("_t1", "_t2"));
    assert!(first.is_temp && !first.is_global);
    assert_ne!(first.offset, second.offset);
  }

  #[test]
  fn builtin_print_lives_in_the_root() {
    let mut table = SymbolTable::new();
    let global = table.global();
    let print = table.lookup(global, "print").cloned();
    assert!(print.is_some_and(|p| p.is_builtin_print && p.ty == SymbolType::Function));

    let inner = table.enter_scope(global, ScopeKind::Function);
    assert!(table.lookup(inner, "print").is_some_and(|p| p.is_builtin_print));
    assert!(!table.symbols(inner).iter().any(|s| s.name == "print"));
  }

  #[test]
  fn inner_definitions_are_invisible_outside() {
    let mut table = SymbolTable::new();
    let global = table.global();
    let if_scope = table.enter_scope(global, ScopeKind::If);
    table.define(global, "x", SymbolType::Integer);
    let y = table.define(if_scope, "y", SymbolType::Integer).clone();

    assert!(!y.is_global);
    assert_eq!(y.scope, ScopeKind::If);
    assert!(table.lookup(global, "y").is_none());
    assert!(table.lookup(if_scope, "x").is_some());
  }

  #[test]
  fn siblings_do_not_see_each_other() {
    let mut table = SymbolTable::new();
    let global = table.global();
    let left = table.enter_scope(global, ScopeKind::If);
    let right = table.enter_scope(global, ScopeKind::If);
    table.define(left, "a", SymbolType::Integer);
    assert!(table.lookup(right, "a").is_none());
    assert_eq!(table.parent(right), Some(global));
    assert_eq!(table.parent(global), None);
  }

  #[test]
  fn loop_depth_follows_while_scopes() {
    let mut table = SymbolTable::new();
    let global = table.global();
    let outer = table.enter_scope(global, ScopeKind::While);
    let branch = table.enter_scope(outer, ScopeKind::If);
    let inner = table.enter_scope(branch, ScopeKind::While);

    assert!(!table.in_loop(global));
    assert_eq!(table.loop_depth(outer), 1);
    assert_eq!(table.loop_depth(branch), 1);
    assert_eq!(table.loop_depth(inner), 2);
    assert_eq!(table.kind(inner), ScopeKind::While);
  }

  #[test]
  fn redefinition_overwrites_in_place() {
    let mut table = SymbolTable::new();
    let global = table.global();
    table.define(global, "x", SymbolType::Integer);
    table.define(global, "y", SymbolType::Integer);
    table.define(global, "x", SymbolType::String);

    let names: Vec<_> = table
      .symbols(global)
      .iter()
      .map(|s| (s.name.as_str(), s.ty))
      .collect();
    assert_eq!(
      names,
      vec![
        ("print", SymbolType::Function),
        ("x", SymbolType::String),
        ("y", SymbolType::Integer)
      ]
    );
    assert_eq!(table.lookup(global, "x").map(|s| s.offset), Some(8));
  }

  #[test]
  fn functions_remember_parameters() {
    let mut table = SymbolTable::new();
    let global = table.global();
    table.define_function(global, "add", vec!["a".into(), "b".into()]);
    let add = table.lookup(global, "add").cloned();
    assert_eq!(
      add.map(|s| (s.ty, s.params)),
      Some((SymbolType::Function, vec!["a".to_string(), "b".to_string()]))
    );
  }

  #[test]
  fn shadowing_resolves_to_nearest_scope() {
    let mut table = SymbolTable::new();
    let global = table.global();
    let function = table.enter_scope(global, ScopeKind::Function);
    table.define(global, "a", SymbolType::String);
    table.define(function, "a", SymbolType::Integer);
    assert_eq!(table.lookup(function, "a").map(|s| s.ty), Some(SymbolType::Integer));
    assert_eq!(table.lookup(global, "a").map(|s| s.ty), Some(SymbolType::String));
  }
}

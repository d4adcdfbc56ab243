//! Lexical scope stack.
//!
//! Single-thread-owned: `define` is strictly ordered with subsequent
//! `lookup`s on the same thread, so the table carries no synchronization.

use std::collections::HashMap;

use crate::ast_context::Ty;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Module,
    Function,
    Block,
    GenericParams,
    Impl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Var,
    Const,
    Func,
    Param,
    Type,
    GenericParam,
    Module,
}

/// A named binding. Carries the resolved type so later lookups don't need to
/// walk back to the declaring AST node.
#[derive(Debug, Clone)]
pub struct Symbol<'ctx> {
    pub name: String,
    pub kind: SymbolKind,
    pub ty: Ty<'ctx>,
    pub mutable: bool,
}

struct Scope<'ctx> {
    kind: ScopeKind,
    symbols: HashMap<(String, SymbolKind), Symbol<'ctx>>,
    /// Insertion order, used only so "define the same kind twice" error
    /// messages can name the first declaration when scopes are later walked.
    order: Vec<(String, SymbolKind)>,
}

pub struct SymbolTable<'ctx> {
    scopes: Vec<Scope<'ctx>>,
}

impl<'ctx> Default for SymbolTable<'ctx> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'ctx> SymbolTable<'ctx> {
    pub fn new() -> Self {
        // A symbol table is never empty: the root Module scope always exists.
        Self {
            scopes: vec![Scope {
                kind: ScopeKind::Module,
                symbols: HashMap::new(),
                order: Vec::new(),
            }],
        }
    }

    pub fn enter_scope(&mut self, kind: ScopeKind) {
        self.scopes.push(Scope {
            kind,
            symbols: HashMap::new(),
            order: Vec::new(),
        });
    }

    /// Releases every symbol added since the matching `enter_scope`.
    /// No-op (but logged) if called on the root scope.
    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn current_kind(&self) -> ScopeKind {
        self.scopes.last().map(|s| s.kind).unwrap_or(ScopeKind::Module)
    }

    /// Walks outward to find the nearest enclosing scope of `kind` (e.g. the
    /// function scope a `return` must target even under nested blocks).
    pub fn enclosing(&self, kind: ScopeKind) -> bool {
        self.scopes.iter().rev().any(|s| s.kind == kind)
    }

    /// `false` on collision: redeclaration within the *same* scope for the
    /// same symbol kind is an error. Shadowing across scopes is allowed.
    pub fn define(&mut self, name: &str, kind: SymbolKind, ty: Ty<'ctx>, mutable: bool) -> bool {
        let scope = self.scopes.last_mut().expect("root scope always present");
        let key = (name.to_string(), kind);
        if scope.symbols.contains_key(&key) {
            return false;
        }
        scope.order.push(key.clone());
        scope.symbols.insert(
            key,
            Symbol {
                name: name.to_string(),
                kind,
                ty,
                mutable,
            },
        );
        true
    }

    /// Walks outward; innermost definition wins.
    pub fn lookup(&self, name: &str) -> Option<&Symbol<'ctx>> {
        for scope in self.scopes.iter().rev() {
            for kind in [
                SymbolKind::Var,
                SymbolKind::Const,
                SymbolKind::Func,
                SymbolKind::Param,
                SymbolKind::Type,
                SymbolKind::GenericParam,
                SymbolKind::Module,
            ] {
                if let Some(sym) = scope.symbols.get(&(name.to_string(), kind)) {
                    return Some(sym);
                }
            }
        }
        None
    }

    pub fn lookup_kind(&self, name: &str, kind: SymbolKind) -> Option<&Symbol<'ctx>> {
        for scope in self.scopes.iter().rev() {
            if let Some(sym) = scope.symbols.get(&(name.to_string(), kind)) {
                return Some(sym);
            }
        }
        None
    }

    pub fn lookup_in_current(&self, name: &str) -> Option<&Symbol<'ctx>> {
        let scope = self.scopes.last()?;
        for kind in [
            SymbolKind::Var,
            SymbolKind::Const,
            SymbolKind::Func,
            SymbolKind::Param,
            SymbolKind::Type,
            SymbolKind::GenericParam,
            SymbolKind::Module,
        ] {
            if let Some(sym) = scope.symbols.get(&(name.to_string(), kind)) {
                return Some(sym);
            }
        }
        None
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast_context::ASTContext;

    #[test]
    fn shadowing_across_scopes_allowed() {
        let ctx = ASTContext::new();
        let mut table = SymbolTable::new();
        let i32_ty = ctx.integer_type(32, true);
        assert!(table.define("x", SymbolKind::Var, i32_ty, false));
        table.enter_scope(ScopeKind::Block);
        assert!(table.define("x", SymbolKind::Var, i32_ty, true));
        assert_eq!(table.lookup("x").unwrap().mutable, true);
        table.exit_scope();
        assert_eq!(table.lookup("x").unwrap().mutable, false);
    }

    #[test]
    fn redeclaration_in_same_scope_is_rejected() {
        let ctx = ASTContext::new();
        let mut table = SymbolTable::new();
        let i32_ty = ctx.integer_type(32, true);
        assert!(table.define("x", SymbolKind::Var, i32_ty, false));
        assert!(!table.define("x", SymbolKind::Var, i32_ty, false));
    }

    #[test]
    fn exit_scope_removes_added_symbols() {
        let ctx = ASTContext::new();
        let mut table = SymbolTable::new();
        let i32_ty = ctx.integer_type(32, true);
        table.enter_scope(ScopeKind::Block);
        table.define("y", SymbolKind::Var, i32_ty, false);
        assert!(table.lookup("y").is_some());
        table.exit_scope();
        assert!(table.lookup("y").is_none());
    }
}

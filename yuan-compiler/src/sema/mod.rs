//! Semantic analysis: binds the syntactic tree to canonical types, enforces
//! declaration/statement/expression rules.
//!
//! Sema never touches the filesystem itself — module aliasing
//! (`const X = @import(...)`) is resolved through the [`ModuleLoader`] the
//! driver supplies, which is backed by [`crate::module_manager`] in
//! production and by an in-memory stub in tests.

mod declarations;
mod expressions;
mod statements;

use std::collections::HashMap;

use yuan_ast::{Item, Program};

use crate::ast_context::{ASTContext, Ty};
use crate::builtins::BuiltinRegistry;
use crate::symbol_table::{ScopeKind, SymbolTable};
use yuan_diagnostics::{Diagnostic, DiagnosticEngine, Span};

pub mod error_codes {
    pub const TYPE_MISMATCH: &str = "err_type_mismatch";
    pub const UNDEFINED_VARIABLE: &str = "err_undefined_variable";
    pub const UNDEFINED_FUNCTION: &str = "err_undefined_function";
    pub const UNDEFINED_TYPE: &str = "err_undefined_type";
    pub const UNDEFINED_FIELD: &str = "err_undefined_field";
    pub const REDECLARATION: &str = "err_redeclaration";
    pub const WRONG_ARG_COUNT: &str = "err_wrong_argument_count";
    pub const WRONG_BUILTIN_ARG_COUNT: &str = "err_wrong_builtin_argument_count";
    pub const UNKNOWN_BUILTIN: &str = "err_unknown_builtin";
    pub const BREAK_OUTSIDE_LOOP: &str = "err_break_outside_loop";
    pub const CONTINUE_OUTSIDE_LOOP: &str = "err_continue_outside_loop";
    pub const RETURN_OUTSIDE_FUNCTION: &str = "err_return_outside_function";
    pub const NONEXHAUSTIVE_MATCH: &str = "err_nonexhaustive_match";
    pub const CIRCULAR_IMPORT: &str = "err_circular_import";
    pub const MISSING_TRAIT_METHOD: &str = "err_missing_trait_method";
    pub const IMMUTABLE_ASSIGNMENT: &str = "err_immutable_assignment";
    pub const UNREACHABLE_CODE: &str = "warn_unreachable_code";
    pub const UNUSED_RESULT: &str = "warn_unused_result";
}

/// Anything Sema needs from module resolution, kept abstract so this module
/// has no filesystem dependency of its own.
pub trait ModuleLoader<'ctx> {
    fn resolve_module_alias(&mut self, ctx: &'ctx ASTContext<'ctx>, path: &str) -> Option<Ty<'ctx>>;
}

/// A `ModuleLoader` that never resolves anything, for analyzing a single
/// file in isolation (tests, `-fsyntax-only` without `--module-cache`).
pub struct NullModuleLoader;

impl<'ctx> ModuleLoader<'ctx> for NullModuleLoader {
    fn resolve_module_alias(&mut self, _ctx: &'ctx ASTContext<'ctx>, _path: &str) -> Option<Ty<'ctx>> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopKind {
    For,
    While,
    ForIn,
}

pub struct FunctionCtx<'ctx> {
    pub return_type: Ty<'ctx>,
    pub can_error: bool,
    pub is_async: bool,
}

pub struct Sema<'ctx, 'a> {
    pub ctx: &'ctx ASTContext<'ctx>,
    pub symbols: SymbolTable<'ctx>,
    pub diagnostics: &'a mut DiagnosticEngine,
    pub builtins: &'a BuiltinRegistry,
    pub loader: &'a mut dyn ModuleLoader<'ctx>,
    function_stack: Vec<FunctionCtx<'ctx>>,
    loop_stack: Vec<LoopKind>,
    /// Exported names this translation unit actually produced, handed back
    /// to the module manager after a successful pass so it can write the
    /// `.ymi` interface.
    pub exported_names: Vec<String>,
    current_module: String,
}

impl<'ctx, 'a> Sema<'ctx, 'a> {
    pub fn new(
        ctx: &'ctx ASTContext<'ctx>,
        diagnostics: &'a mut DiagnosticEngine,
        builtins: &'a BuiltinRegistry,
        loader: &'a mut dyn ModuleLoader<'ctx>,
        module_name: &str,
    ) -> Self {
        Self {
            ctx,
            symbols: SymbolTable::new(),
            diagnostics,
            builtins,
            loader,
            function_stack: Vec::new(),
            loop_stack: Vec::new(),
            exported_names: Vec::new(),
            current_module: module_name.to_string(),
        }
    }

    pub fn module_name(&self) -> &str {
        &self.current_module
    }

    pub fn error(&mut self, code: &str, message: impl Into<String>, span: Span) {
        self.diagnostics.emit_error(code, message.into(), span);
    }

    pub fn warn(&mut self, code: &str, message: impl Into<String>, span: Span) {
        self.diagnostics.emit_warning(code, message.into(), span);
    }

    pub fn in_loop(&self) -> bool {
        !self.loop_stack.is_empty()
    }

    pub fn enter_loop(&mut self, kind: LoopKind) {
        self.loop_stack.push(kind);
    }

    pub fn exit_loop(&mut self) {
        self.loop_stack.pop();
    }

    pub fn current_function(&self) -> Option<&FunctionCtx<'ctx>> {
        self.function_stack.last()
    }

    pub fn enter_function(&mut self, f: FunctionCtx<'ctx>) {
        self.function_stack.push(f);
        self.symbols.enter_scope(ScopeKind::Function);
    }

    pub fn exit_function(&mut self) {
        self.symbols.exit_scope();
        self.function_stack.pop();
    }

    /// Full two-pass analysis of one translation unit: declarations
    /// are forward-bound before any body is walked, so mutual recursion
    /// between top-level items works regardless of source order.
    pub fn analyze_program(&mut self, program: &Program) {
        for import in &program.imports {
            declarations::analyze_import(self, import);
        }

        // Pass 1: forward-declare every nominal name so bodies can reference
        // items declared later in the file (invariant 3's raison d'être).
        for item in &program.items {
            declarations::forward_declare(self, item);
        }

        // Pass 2: populate bodies (struct fields, enum variants, function
        // signatures+bodies, trait conformance, const initializers).
        for item in &program.items {
            declarations::analyze_item(self, item);
        }
    }
}

/// Standalone helper the driver also uses to pretty-print a resolved type
/// without constructing a full `Sema` (e.g. `--emit=ast` diagnostics dump).
pub fn describe_ty(ty: Ty<'_>) -> String {
    ty.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::BuiltinRegistry;
    use yuan_diagnostics::DiagnosticEngine;
    use yuan_parser::Parser as YuanParser;

    fn analyze_source(src: &str) -> (DiagnosticEngine, usize) {
        let mut parser = YuanParser::new(src).expect("lex");
        let program = parser.parse_file().expect("parse");
        let ctx = ASTContext::new();
        let mut diags = DiagnosticEngine::new();
        let builtins = BuiltinRegistry::global();
        let mut loader = NullModuleLoader;
        let mut sema = Sema::new(&ctx, &mut diags, builtins, &mut loader, "main");
        sema.analyze_program(&program);
        let errors = diags.error_count();
        (diags, errors)
    }

    #[test]
    fn well_typed_function_has_no_errors() {
        let (_, errors) = analyze_source(
            r#"
            func add(a: i32, b: i32) -> i32 {
                return a + b;
            }
            "#,
        );
        assert_eq!(errors, 0);
    }

    #[test]
    fn undefined_variable_is_reported() {
        let (_, errors) = analyze_source(
            r#"
            func bad() -> i32 {
                return undeclared_name;
            }
            "#,
        );
        assert!(errors > 0);
    }

    #[test]
    fn break_outside_loop_is_reported() {
        let (_, errors) = analyze_source(
            r#"
            func bad() {
                break;
            }
            "#,
        );
        assert!(errors > 0);
    }

    #[test]
    fn struct_forward_reference_resolves() {
        // `Node` mentions itself through a reference before its own
        // declaration would otherwise be complete — tests invariant 3's
        // forward-declare-before-populate ordering.
        let (_, errors) = analyze_source(
            r#"
            struct Node {
                value: i32,
                next: &Node,
            }
            "#,
        );
        assert_eq!(errors, 0);
    }
}

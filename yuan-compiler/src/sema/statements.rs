//! Statement analysis: `Block`/`If`/`Match`(Switch)/`For`/`Defer`/
//! `Break`/`Continue`, plus the reachability/loop-context rules around them.

use yuan_ast::{Block, Statement};

use crate::symbol_table::{ScopeKind, SymbolKind};
use yuan_diagnostics::Span;

use super::declarations::lower_type;
use super::expressions::analyze_expr;
use super::{error_codes as ec, LoopKind, Sema};

pub fn analyze_block(sema: &mut Sema<'_, '_>, block: &Block) {
    sema.symbols.enter_scope(ScopeKind::Block);
    analyze_stmt_list(sema, &block.statements);
    sema.symbols.exit_scope();
}

/// Walks a statement list, warning once a `return`/`break`/`continue` makes
/// the remainder unreachable.
pub fn analyze_stmt_list(sema: &mut Sema<'_, '_>, statements: &[Statement]) {
    let mut terminated = false;
    for stmt in statements {
        if terminated {
            sema.warn(ec::UNREACHABLE_CODE, "unreachable statement", Span::unknown());
        }
        analyze_stmt(sema, stmt);
        if matches!(stmt, Statement::Return(_) | Statement::Break | Statement::Continue) {
            terminated = true;
        }
    }
}

fn analyze_stmt(sema: &mut Sema<'_, '_>, stmt: &Statement) {
    match stmt {
        Statement::Let { is_mutable, name, ty, value } => {
            let value_ty = analyze_expr(sema, value);
            let declared = ty.as_ref().map(|t| lower_type(sema, t));
            if let Some(declared) = declared {
                if !crate::type_checker::compatible(sema.ctx, declared, value_ty) {
                    sema.error(
                        ec::TYPE_MISMATCH,
                        format!("`{}` declared as `{}` but initializer has type `{}`", name, declared, value_ty),
                        Span::unknown(),
                    );
                }
            }
            let bound_ty = declared.unwrap_or(value_ty);
            if !sema.symbols.define(name, SymbolKind::Var, bound_ty, *is_mutable) {
                sema.error(
                    ec::REDECLARATION,
                    format!("`{}` is already declared in this scope", name),
                    Span::unknown(),
                );
            }
        }
        Statement::Assign { target, value } => {
            check_assignable(sema, target);
            let target_ty = analyze_expr(sema, target);
            let value_ty = analyze_expr(sema, value);
            if !crate::type_checker::compatible(sema.ctx, target_ty, value_ty) {
                sema.error(
                    ec::TYPE_MISMATCH,
                    format!("cannot assign `{}` to `{}`", value_ty, target_ty),
                    Span::unknown(),
                );
            }
        }
        Statement::CompoundAssign { target, value, .. } => {
            check_assignable(sema, target);
            let _ = analyze_expr(sema, target);
            let _ = analyze_expr(sema, value);
        }
        Statement::Return(value) => {
            let actual = value
                .as_ref()
                .map(|v| analyze_expr(sema, v))
                .unwrap_or_else(|| sema.ctx.void_type());
            match sema.current_function() {
                Some(f) => {
                    if !crate::type_checker::compatible(sema.ctx, f.return_type, actual) {
                        sema.error(
                            ec::TYPE_MISMATCH,
                            format!("function returns `{}` but this returns `{}`", f.return_type, actual),
                            Span::unknown(),
                        );
                    }
                }
                None => sema.error(ec::RETURN_OUTSIDE_FUNCTION, "`return` outside of a function", Span::unknown()),
            }
        }
        Statement::Break => {
            if !sema.in_loop() {
                sema.error(ec::BREAK_OUTSIDE_LOOP, "`break` outside of a loop", Span::unknown());
            }
        }
        Statement::Continue => {
            if !sema.in_loop() {
                sema.error(ec::CONTINUE_OUTSIDE_LOOP, "`continue` outside of a loop", Span::unknown());
            }
        }
        Statement::Defer(inner) => analyze_stmt(sema, inner),
        Statement::If { condition, then_block, elif_branches, else_block, .. } => {
            let _ = analyze_expr(sema, condition);
            analyze_block(sema, then_block);
            for (cond, block) in elif_branches {
                let _ = analyze_expr(sema, cond);
                analyze_block(sema, block);
            }
            if let Some(block) = else_block {
                analyze_block(sema, block);
            }
        }
        Statement::For { init, condition, post, body, .. } => {
            sema.symbols.enter_scope(ScopeKind::Block);
            if let Some(init) = init {
                analyze_stmt(sema, init);
            }
            if let Some(cond) = condition {
                let _ = analyze_expr(sema, cond);
            }
            sema.enter_loop(LoopKind::For);
            analyze_block(sema, body);
            sema.exit_loop();
            if let Some(post) = post {
                analyze_stmt(sema, post);
            }
            sema.symbols.exit_scope();
        }
        Statement::While { condition, body, .. } => {
            let _ = analyze_expr(sema, condition);
            sema.enter_loop(LoopKind::While);
            analyze_block(sema, body);
            sema.exit_loop();
        }
        Statement::ForIn { variable, iterable, body } => {
            let iter_ty = analyze_expr(sema, iterable);
            let elem_ty = match &iter_ty.kind {
                crate::ast_context::TypeKind::Array { elem, .. }
                | crate::ast_context::TypeKind::Slice { elem, .. }
                | crate::ast_context::TypeKind::Range { elem, .. } => *elem,
                _ => sema.ctx.dynamic_value_type(),
            };
            sema.symbols.enter_scope(ScopeKind::Block);
            sema.symbols.define(variable, SymbolKind::Var, elem_ty, false);
            sema.enter_loop(LoopKind::ForIn);
            analyze_block(sema, body);
            sema.exit_loop();
            sema.symbols.exit_scope();
        }
        Statement::Switch { value, cases, default_case } => {
            if let Some(v) = value {
                let _ = analyze_expr(sema, v);
            }
            for case in cases {
                for pattern in &case.patterns {
                    let _ = analyze_expr(sema, pattern);
                }
                analyze_block(sema, &case.body);
            }
            if let Some(default) = default_case {
                analyze_block(sema, default);
            } else if cases.is_empty() {
                sema.error(ec::NONEXHAUSTIVE_MATCH, "switch statement has no cases", Span::unknown());
            }
        }
        Statement::Select { cases } => {
            for case in cases {
                let ty = analyze_expr(sema, &case.expr);
                if let Some(var) = &case.var {
                    sema.symbols.enter_scope(ScopeKind::Block);
                    sema.symbols.define(var, SymbolKind::Var, ty, false);
                    analyze_block(sema, &case.body);
                    sema.symbols.exit_scope();
                } else {
                    analyze_block(sema, &case.body);
                }
            }
        }
        Statement::Go(expr) => {
            let _ = analyze_expr(sema, expr);
        }
        Statement::Unsafe(block) => analyze_block(sema, block),
        Statement::Expression(expr) => {
            let _ = analyze_expr(sema, expr);
        }
    }
}

fn check_assignable(sema: &mut Sema<'_, '_>, target: &yuan_ast::Expression) {
    if let yuan_ast::Expression::Ident(name) = target {
        if let Some(sym) = sema.symbols.lookup(name) {
            if !sym.mutable {
                sema.error(
                    ec::IMMUTABLE_ASSIGNMENT,
                    format!("cannot assign to immutable binding `{}`", name),
                    Span::unknown(),
                );
            }
        }
    }
}

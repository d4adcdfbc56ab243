//! Expression analysis: binary/unary/call/builtin-call/member/index/
//! slice/cast/range/error-propagate/error-handle/closure/await.

use yuan_ast::{BinaryOp, Expression, UnaryOp};

use crate::ast_context::{Ty, TypeKind};
use crate::symbol_table::SymbolKind;
use yuan_diagnostics::Span;

use super::declarations::lower_type;
use super::{error_codes as ec, Sema};

/// Recognizes `@import("path")` so const-alias resolution (module alias
/// resolution) can special-case it before generic expression analysis runs.
pub fn as_import_call(expr: &Expression) -> Option<String> {
    if let Expression::Call { func, args, .. } = expr {
        if let Expression::Ident(name) = func.as_ref() {
            if name == "@import" {
                if let Some(Expression::StringLiteral(path)) = args.first() {
                    return Some(path.clone());
                }
            }
        }
    }
    None
}

pub fn analyze_expr<'ctx>(sema: &mut Sema<'ctx, '_>, expr: &Expression) -> Ty<'ctx> {
    let ctx = sema.ctx;
    match expr {
        Expression::IntLiteral(_) => ctx.integer_type(32, true),
        Expression::FloatLiteral(_) => ctx.float_type(64),
        Expression::StringLiteral(_) | Expression::FStringLiteral(_) => ctx.string_type(),
        Expression::BoolLiteral(_) => ctx.bool_type(),
        Expression::Nil => ctx.optional_type(ctx.dynamic_value_type()),

        Expression::Ident(name) => lookup_ident(sema, name),

        Expression::Binary { left, op, right, .. } => analyze_binary(sema, left, *op, right),
        Expression::Unary { op, expr, .. } => analyze_unary(sema, *op, expr),

        Expression::Call { func, args, type_args, .. } => analyze_call(sema, func, type_args, args),
        Expression::MethodCall { receiver, method, args, .. } => analyze_method_call(sema, receiver, method, args),
        Expression::FieldAccess { object, field } => analyze_field_access(sema, object, field),
        Expression::Index { object, index } => analyze_index(sema, object, index),

        Expression::Array(elems) => {
            let elem_ty = elems
                .first()
                .map(|e| analyze_expr(sema, e))
                .unwrap_or_else(|| ctx.fresh_type_var());
            for e in elems.iter().skip(1) {
                let ty = analyze_expr(sema, e);
                check_compatible(sema, elem_ty, ty, "array literal element");
            }
            ctx.array_type(elem_ty, elems.len() as u64)
        }
        Expression::ArrayRepeat(value, _count) => {
            let elem_ty = analyze_expr(sema, value);
            ctx.slice_type(elem_ty, false)
        }
        Expression::MapLiteral(_) => ctx.dynamic_value_type(),
        Expression::TupleLiteral(elems) => {
            let tys = elems.iter().map(|e| analyze_expr(sema, e)).collect();
            ctx.tuple_type(tys)
        }
        Expression::StructLiteral { name, fields, .. } => analyze_struct_literal(sema, name, fields),
        Expression::EnumLiteral { enum_name, .. } => lookup_ident(sema, enum_name),

        Expression::Range { start, end } => analyze_range(sema, start, end, false),
        Expression::RangeInclusive { start, end } => analyze_range(sema, start, end, true),

        Expression::Reference { is_mutable, expr } => {
            let inner = analyze_expr(sema, expr);
            ctx.reference_type(inner, *is_mutable)
        }
        Expression::Deref(inner) => {
            let t = analyze_expr(sema, inner);
            match &t.kind {
                TypeKind::Reference { pointee, .. } | TypeKind::Pointer { pointee, .. } => pointee,
                _ => t,
            }
        }
        Expression::Await(inner) => analyze_expr(sema, inner),

        Expression::Match { value, arms } => analyze_match(sema, value, arms),
        Expression::Block { statements, return_expr } => {
            super::statements::analyze_stmt_list(sema, statements);
            return_expr
                .as_ref()
                .map(|e| analyze_expr(sema, e))
                .unwrap_or_else(|| ctx.void_type())
        }

        Expression::Launch { .. } => ctx.void_type(),
        Expression::New(inner) => {
            let t = analyze_expr(sema, inner);
            ctx.reference_type(t, true)
        }
        Expression::Make { element_type, size } => {
            let _ = analyze_expr(sema, size);
            let elem = lower_type(sema, element_type);
            ctx.slice_type(elem, true)
        }
        Expression::Cast { expr, target_type } => {
            let _ = analyze_expr(sema, expr);
            lower_type(sema, target_type)
        }
        Expression::QuestionMark(inner) => analyze_question_mark(sema, inner),
        Expression::Typeof(inner) => {
            let t = analyze_expr(sema, inner);
            let _ = t;
            ctx.string_type()
        }
        Expression::PostfixOp { expr, .. } => analyze_expr(sema, expr),
        Expression::ErrorNew(inner) => {
            let t = analyze_expr(sema, inner);
            ctx.error_type(t)
        }
        Expression::Closure { params, return_type, body, .. } => analyze_closure(sema, params, return_type, body),
    }
}

fn lookup_ident<'ctx>(sema: &mut Sema<'ctx, '_>, name: &str) -> Ty<'ctx> {
    if let Some(sym) = sema.symbols.lookup(name) {
        return sym.ty;
    }
    sema.error(
        ec::UNDEFINED_VARIABLE,
        format!("undefined identifier `{}`", name),
        Span::unknown(),
    );
    sema.ctx.dynamic_value_type()
}

fn check_compatible(sema: &mut Sema<'_, '_>, expected: Ty<'_>, actual: Ty<'_>, what: &str) {
    if !crate::type_checker::compatible(sema.ctx, expected, actual) {
        sema.error(
            ec::TYPE_MISMATCH,
            format!("{} expected `{}`, found `{}`", what, expected, actual),
            Span::unknown(),
        );
    }
}

fn analyze_binary<'ctx>(
    sema: &mut Sema<'ctx, '_>,
    left: &Expression,
    op: BinaryOp,
    right: &Expression,
) -> Ty<'ctx> {
    let lt = analyze_expr(sema, left);
    let rt = analyze_expr(sema, right);
    match op {
        BinaryOp::Eq
        | BinaryOp::NotEq
        | BinaryOp::Lt
        | BinaryOp::LtEq
        | BinaryOp::Gt
        | BinaryOp::GtEq
        | BinaryOp::And
        | BinaryOp::Or => sema.ctx.bool_type(),
        _ => {
            check_compatible(sema, lt, rt, "binary operand");
            lt
        }
    }
}

fn analyze_unary<'ctx>(sema: &mut Sema<'ctx, '_>, op: UnaryOp, expr: &Expression) -> Ty<'ctx> {
    let t = analyze_expr(sema, expr);
    match op {
        UnaryOp::Not => sema.ctx.bool_type(),
        UnaryOp::Ref => sema.ctx.reference_type(t, false),
        UnaryOp::Deref => match &t.kind {
            TypeKind::Reference { pointee, .. } | TypeKind::Pointer { pointee, .. } => pointee,
            _ => t,
        },
        UnaryOp::Neg => t,
    }
}

fn analyze_call<'ctx>(
    sema: &mut Sema<'ctx, '_>,
    func: &Expression,
    type_args: &[yuan_ast::Type],
    args: &[Expression],
) -> Ty<'ctx> {
    if let Expression::Ident(name) = func {
        if name.starts_with('@') {
            return analyze_builtin_call(sema, name, args);
        }
    }
    let arg_tys: Vec<Ty<'ctx>> = args.iter().map(|a| analyze_expr(sema, a)).collect();
    let func_ty = analyze_expr(sema, func);
    match &func_ty.kind {
        TypeKind::Function { params, ret, .. } => {
            if params.len() != arg_tys.len() && !type_args.is_empty() {
                // generic call with explicit type args: arity checked structurally elsewhere
            } else if params.len() != arg_tys.len() {
                sema.error(
                    ec::WRONG_ARG_COUNT,
                    format!("expected {} argument(s), found {}", params.len(), arg_tys.len()),
                    Span::unknown(),
                );
            } else {
                for (p, a) in params.iter().zip(arg_tys.iter()) {
                    check_compatible(sema, p, *a, "call argument");
                }
            }
            ret
        }
        _ => func_ty,
    }
}

fn analyze_builtin_call<'ctx>(sema: &mut Sema<'ctx, '_>, name: &str, args: &[Expression]) -> Ty<'ctx> {
    let bare = name.trim_start_matches('@');
    let arg_tys: Vec<Ty<'ctx>> = args.iter().map(|a| analyze_expr(sema, a)).collect();
    match sema.builtins.get(bare) {
        Some(builtin) => {
            if let Some(expected) = builtin.arg_count {
                if expected != arg_tys.len() {
                    sema.error(
                        ec::WRONG_BUILTIN_ARG_COUNT,
                        format!(
                            "builtin `@{}` expects {} argument(s), found {}",
                            bare,
                            expected,
                            arg_tys.len()
                        ),
                        Span::unknown(),
                    );
                }
            }
            (builtin.analyze)(sema.ctx, &arg_tys)
        }
        None => {
            sema.error(ec::UNKNOWN_BUILTIN, format!("unknown builtin `@{}`", bare), Span::unknown());
            sema.ctx.dynamic_value_type()
        }
    }
}

fn analyze_method_call<'ctx>(
    sema: &mut Sema<'ctx, '_>,
    receiver: &Expression,
    method: &str,
    args: &[Expression],
) -> Ty<'ctx> {
    let recv_ty = analyze_expr(sema, receiver);
    let arg_tys: Vec<Ty<'ctx>> = args.iter().map(|a| analyze_expr(sema, a)).collect();
    let base = match &recv_ty.kind {
        TypeKind::Reference { pointee, .. } => pointee,
        _ => recv_ty,
    };
    if let Some(m) = sema.ctx.lookup_impl_method(base, method) {
        if let TypeKind::Function { params, ret, .. } = &m.func_type.kind {
            let declared_params = if m.takes_self_by_ref { &params[..] } else { &params[..] };
            if declared_params.len() == arg_tys.len() {
                for (p, a) in declared_params.iter().zip(arg_tys.iter()) {
                    check_compatible(sema, p, *a, "method argument");
                }
            }
            return ret;
        }
    }
    sema.ctx.dynamic_value_type()
}

fn analyze_field_access<'ctx>(sema: &mut Sema<'ctx, '_>, object: &Expression, field: &str) -> Ty<'ctx> {
    let obj_ty = analyze_expr(sema, object);
    let base = match &obj_ty.kind {
        TypeKind::Reference { pointee, .. } => pointee,
        _ => obj_ty,
    };
    match &base.kind {
        TypeKind::Struct(s) => s.field(field).unwrap_or_else(|| {
            sema.error(
                ec::UNDEFINED_FIELD,
                format!("no field `{}` on `{}`", field, s.name()),
                Span::unknown(),
            );
            sema.ctx.dynamic_value_type()
        }),
        TypeKind::Module(m) => m.member(field).unwrap_or_else(|| {
            sema.error(
                ec::UNDEFINED_FIELD,
                format!("module `{}` has no member `{}`", m.name, field),
                Span::unknown(),
            );
            sema.ctx.dynamic_value_type()
        }),
        _ => sema.ctx.dynamic_value_type(),
    }
}

fn analyze_index<'ctx>(sema: &mut Sema<'ctx, '_>, object: &Expression, index: &Expression) -> Ty<'ctx> {
    let obj_ty = analyze_expr(sema, object);
    let _ = analyze_expr(sema, index);
    match &obj_ty.kind {
        TypeKind::Array { elem, .. } | TypeKind::Slice { elem, .. } => elem,
        _ => sema.ctx.dynamic_value_type(),
    }
}

fn analyze_struct_literal<'ctx>(
    sema: &mut Sema<'ctx, '_>,
    name: &str,
    fields: &[(String, Expression)],
) -> Ty<'ctx> {
    let ty = sema.ctx.struct_type(name);
    let TypeKind::Struct(data) = &ty.kind else {
        unreachable!()
    };
    for (fname, fexpr) in fields {
        let given = analyze_expr(sema, fexpr);
        if let Some(declared) = data.field(fname) {
            check_compatible(sema, declared, given, &format!("field `{}`", fname));
        }
    }
    ty
}

fn analyze_range<'ctx>(
    sema: &mut Sema<'ctx, '_>,
    start: &Option<Box<Expression>>,
    end: &Option<Box<Expression>>,
    inclusive: bool,
) -> Ty<'ctx> {
    let ty = start
        .as_ref()
        .map(|e| analyze_expr(sema, e))
        .or_else(|| end.as_ref().map(|e| analyze_expr(sema, e)))
        .unwrap_or_else(|| sema.ctx.integer_type(32, true));
    sema.ctx.range_type(ty, inclusive)
}

fn analyze_match<'ctx>(
    sema: &mut Sema<'ctx, '_>,
    value: &Expression,
    arms: &[yuan_ast::MatchArm],
) -> Ty<'ctx> {
    let _ = analyze_expr(sema, value);
    let has_wildcard = arms.iter().any(|a| matches!(a.pattern, yuan_ast::Pattern::Wildcard | yuan_ast::Pattern::Ident(_)));
    if !has_wildcard && arms.is_empty() {
        sema.error(
            ec::NONEXHAUSTIVE_MATCH,
            "match expression has no arms",
            Span::unknown(),
        );
    }
    let mut result = None;
    for arm in arms {
        let t = analyze_expr(sema, &arm.body);
        result = Some(result.map(|prev| {
            check_compatible(sema, prev, t, "match arm");
            prev
        })
        .unwrap_or(t));
    }
    result.unwrap_or_else(|| sema.ctx.void_type())
}

fn analyze_question_mark<'ctx>(sema: &mut Sema<'ctx, '_>, inner: &Expression) -> Ty<'ctx> {
    let t = analyze_expr(sema, inner);
    match &t.kind {
        TypeKind::Error { success } => success,
        TypeKind::Optional(inner) => inner,
        _ => t,
    }
}

fn analyze_closure<'ctx>(
    sema: &mut Sema<'ctx, '_>,
    params: &[yuan_ast::Param],
    return_type: &Option<yuan_ast::Type>,
    body: &Expression,
) -> Ty<'ctx> {
    sema.symbols.enter_scope(crate::symbol_table::ScopeKind::Function);
    let param_tys: Vec<Ty<'ctx>> = params
        .iter()
        .map(|p| {
            let t = lower_type(sema, &p.ty);
            sema.symbols.define(&p.name, SymbolKind::Param, t, false);
            t
        })
        .collect();
    let body_ty = analyze_expr(sema, body);
    sema.symbols.exit_scope();
    let ret = return_type.as_ref().map(|t| lower_type(sema, t)).unwrap_or(body_ty);
    sema.ctx.function_type(param_tys, ret, false, false)
}

//! Declaration analysis: `VarDecl`/`ConstDecl`/`FuncDecl`/`Struct`/`Enum`/
//! `Trait`/`TypeAlias`/`ImplDecl`, and module-alias resolution.

use std::collections::HashMap;

use yuan_ast::{Field, Function, Import, ImportKind, Item, Param, Struct, Type as AstType};

use crate::ast_context::{FieldDef, Ty, TypeKind, VariantDef};
use crate::symbol_table::{ScopeKind, SymbolKind};
use yuan_diagnostics::Span;

use super::{error_codes as ec, expressions, statements, Sema};

/// Lowers a syntactic `Type` to a canonical, interned `Ty`. Named types are
/// resolved against whatever nominal type is already (possibly
/// forward-declared) in the context — `struct_type`/`enum_type`/etc. are
/// idempotent so this never creates a duplicate.
pub fn lower_type<'ctx>(sema: &mut Sema<'ctx, '_>, ty: &AstType) -> Ty<'ctx> {
    let ctx = sema.ctx;
    match ty {
        AstType::I8 => ctx.integer_type(8, true),
        AstType::I16 => ctx.integer_type(16, true),
        AstType::I32 => ctx.integer_type(32, true),
        AstType::I64 => ctx.integer_type(64, true),
        AstType::I128 => ctx.integer_type(128, true),
        AstType::U8 => ctx.integer_type(8, false),
        AstType::U16 => ctx.integer_type(16, false),
        AstType::U32 => ctx.integer_type(32, false),
        AstType::U64 => ctx.integer_type(64, false),
        AstType::U128 => ctx.integer_type(128, false),
        AstType::F32 => ctx.float_type(32),
        AstType::F64 => ctx.float_type(64),
        AstType::F128 => ctx.float_type(128),
        AstType::Bool => ctx.bool_type(),
        AstType::String => ctx.string_type(),
        AstType::Byte => ctx.integer_type(8, false),
        AstType::Error => ctx.error_type(ctx.void_type()),
        AstType::Nil | AstType::Unit => ctx.void_type(),
        AstType::Never => ctx.void_type(),
        AstType::Named(name) => resolve_named(sema, name),
        AstType::Generic { name, type_args } => {
            let base = resolve_named(sema, name);
            let args = type_args.iter().map(|t| lower_type(sema, t)).collect();
            sema.ctx.generic_instance_type(base, args)
        }
        AstType::Array(inner, n) => {
            let elem = lower_type(sema, inner);
            ctx.array_type(elem, *n as u64)
        }
        AstType::Slice(inner, mutable) => {
            let elem = lower_type(sema, inner);
            ctx.slice_type(elem, *mutable)
        }
        AstType::Reference(inner, mutable) => {
            let pointee = lower_type(sema, inner);
            ctx.reference_type(pointee, *mutable)
        }
        AstType::RawPtr { inner, is_const } => {
            let pointee = lower_type(sema, inner);
            ctx.pointer_type(pointee, !is_const)
        }
        AstType::Tuple(elems) => {
            let elems = elems.iter().map(|t| lower_type(sema, t)).collect();
            ctx.tuple_type(elems)
        }
        AstType::Function { params, return_type } => {
            let params = params.iter().map(|t| lower_type(sema, t)).collect();
            let ret = lower_type(sema, return_type);
            ctx.function_type(params, ret, false, false)
        }
        AstType::Option(inner) => {
            let t = lower_type(sema, inner);
            ctx.optional_type(t)
        }
        AstType::Result(ok, _err) => {
            let t = lower_type(sema, ok);
            ctx.error_type(t)
        }
        AstType::Vec(inner) => {
            let base = ctx.struct_type("Vec");
            let elem = lower_type(sema, inner);
            ctx.generic_instance_type(base, vec![elem])
        }
        AstType::Box(inner) => {
            let base = ctx.struct_type("Box");
            let elem = lower_type(sema, inner);
            ctx.generic_instance_type(base, vec![elem])
        }
        AstType::Channel(inner) => {
            let base = ctx.struct_type("Channel");
            let elem = lower_type(sema, inner);
            ctx.generic_instance_type(base, vec![elem])
        }
        // Union/Intersection/Conditional/Infer/Typeof are accepted by the
        // parser but have no runtime representation yet; fold to `any` so
        // Sema can keep analyzing the rest of the file.
        AstType::Union(_)
        | AstType::Intersection(_)
        | AstType::Conditional { .. }
        | AstType::Infer(_)
        | AstType::Typeof(_) => ctx.dynamic_value_type(),
    }
}

fn resolve_named<'ctx>(sema: &mut Sema<'ctx, '_>, name: &str) -> Ty<'ctx> {
    if let Some(sym) = sema.symbols.lookup_kind(name, SymbolKind::GenericParam) {
        return sym.ty;
    }
    if let Some(sym) = sema.symbols.lookup_kind(name, SymbolKind::Type) {
        return sym.ty;
    }
    // Not yet forward-declared in this translation unit: assume it will be
    // (or comes from an already-resolved import) and mint the nominal slot
    // now. `struct_type`/`enum_type` are idempotent w.r.t. later population.
    sema.ctx.struct_type(name)
}

pub fn analyze_import(sema: &mut Sema<'_, '_>, import: &Import) {
    match &import.kind {
        ImportKind::Module => {
            if let Some(ty) = sema.loader.resolve_module_alias(sema.ctx, &import.module) {
                let alias = import.alias.clone().unwrap_or_else(|| import.module.clone());
                sema.symbols.define(&alias, SymbolKind::Module, ty, false);
            } else {
                sema.error(
                    ec::CIRCULAR_IMPORT,
                    format!("could not resolve module `{}`", import.module),
                    Span::unknown(),
                );
            }
        }
        ImportKind::Named | ImportKind::Namespace(_) => {
            let Some(module_ty) = sema.loader.resolve_module_alias(sema.ctx, &import.module) else {
                sema.error(
                    ec::CIRCULAR_IMPORT,
                    format!("could not resolve module `{}`", import.module),
                    Span::unknown(),
                );
                return;
            };
            let TypeKind::Module(data) = &module_ty.kind else {
                return;
            };
            for item in &import.items {
                if let Some(member_ty) = data.member(item) {
                    sema.symbols.define(item, SymbolKind::Type, member_ty, false);
                }
            }
        }
    }
}

/// Pass 1: mint the nominal slot for every top-level item so sibling items
/// (and bodies analyzed in pass 2) can forward-reference them regardless of
/// textual order.
pub fn forward_declare(sema: &mut Sema<'_, '_>, item: &Item) {
    match item {
        Item::Struct(s) => {
            let ty = sema.ctx.struct_type(&s.name);
            sema.symbols.define(&s.name, SymbolKind::Type, ty, false);
        }
        Item::Enum(e) => {
            let ty = sema.ctx.enum_type(&e.name);
            sema.symbols.define(&e.name, SymbolKind::Type, ty, false);
        }
        Item::Trait(t) => {
            let ty = sema.ctx.trait_type(&t.name);
            sema.symbols.define(&t.name, SymbolKind::Type, ty, false);
            let TypeKind::Trait(data) = &ty.kind else {
                unreachable!()
            };
            if data.required_methods.borrow().is_empty() {
                let required: Vec<(String, Ty)> = t
                    .methods
                    .iter()
                    .filter(|m| m.body.is_none())
                    .map(|m| {
                        let params = m.params.iter().map(|p| lower_type(sema, &p.ty)).collect();
                        let ret = m
                            .return_type
                            .as_ref()
                            .map(|ty| lower_type(sema, ty))
                            .unwrap_or_else(|| sema.ctx.void_type());
                        (m.name.clone(), sema.ctx.function_type(params, ret, false, false))
                    })
                    .collect();
                *data.required_methods.borrow_mut() = required;
            }
        }
        Item::TypeAlias(a) => {
            let ty = sema.ctx.type_alias(&a.name);
            sema.symbols.define(&a.name, SymbolKind::Type, ty, false);
        }
        Item::Function(f) => {
            // Signature is bound now (params may reference not-yet-populated
            // structs, which is fine — only the pointer identity matters
            // here), body is walked in pass 2.
            let fn_ty = function_signature_type(sema, f);
            sema.symbols.define(&f.name, SymbolKind::Func, fn_ty, false);
        }
        Item::Const(c) => {
            let ty = c
                .ty
                .as_ref()
                .map(|t| lower_type(sema, t))
                .unwrap_or_else(|| sema.ctx.fresh_type_var());
            sema.symbols.define(&c.name, SymbolKind::Const, ty, false);
        }
        Item::Policy(_) | Item::TraitImpl(_) | Item::ExternBlock(_) | Item::Export(_) => {}
    }
}

fn function_signature_type<'ctx>(sema: &mut Sema<'ctx, '_>, f: &Function) -> Ty<'ctx> {
    let params: Vec<Ty<'ctx>> = f.params.iter().map(|p: &Param| lower_type(sema, &p.ty)).collect();
    let ret = f
        .return_type
        .as_ref()
        .map(|t| lower_type(sema, t))
        .unwrap_or_else(|| sema.ctx.void_type());
    sema.ctx.function_type(params, ret, false, f.is_variadic)
}

pub fn analyze_item(sema: &mut Sema<'_, '_>, item: &Item) {
    match item {
        Item::Struct(s) => analyze_struct(sema, s),
        Item::Enum(e) => analyze_enum(sema, e),
        Item::Trait(_) => {} // required_methods already captured via forward_declare; body-less by construction
        Item::TraitImpl(impl_) => analyze_trait_impl(sema, impl_),
        Item::TypeAlias(a) => analyze_type_alias(sema, a),
        Item::Function(f) => analyze_function(sema, f, None),
        Item::Const(c) => analyze_const(sema, c),
        Item::Policy(_) | Item::ExternBlock(_) | Item::Export(_) => {}
    }
}

fn analyze_struct(sema: &mut Sema<'_, '_>, s: &Struct) {
    let ty = sema.ctx.struct_type(&s.name);
    let TypeKind::Struct(data) = &ty.kind else {
        unreachable!()
    };
    if data.is_populated() {
        return; // already populated through an earlier alias of this name
    }
    sema.symbols.enter_scope(ScopeKind::GenericParams);
    for tp in &s.type_params {
        let g = sema.ctx.generic_type(&tp.name, Vec::new());
        sema.symbols.define(&tp.name, SymbolKind::GenericParam, g, false);
    }
    let fields: Vec<FieldDef> = s
        .fields
        .iter()
        .map(|f: &Field| FieldDef {
            name: f.name.clone(),
            ty: lower_type(sema, &f.ty),
        })
        .collect();
    data.populate_fields_if_empty(fields);

    for method in &s.methods {
        analyze_function(sema, method, Some(ty));
    }
    sema.symbols.exit_scope();
}

fn analyze_enum(sema: &mut Sema<'_, '_>, e: &yuan_ast::Enum) {
    let ty = sema.ctx.enum_type(&e.name);
    let TypeKind::Enum(data) = &ty.kind else {
        unreachable!()
    };
    if data.is_populated() {
        return;
    }
    let variants: Vec<VariantDef> = e
        .variants
        .iter()
        .map(|v| VariantDef {
            name: v.name.clone(),
            payload: v.data.first().map(|t| lower_type(sema, t)),
        })
        .collect();
    data.populate_variants_if_empty(variants);
}

fn analyze_type_alias(sema: &mut Sema<'_, '_>, a: &yuan_ast::TypeAlias) {
    let ty = sema.ctx.type_alias(&a.name);
    let TypeKind::TypeAlias { aliased, .. } = &ty.kind else {
        unreachable!()
    };
    if aliased.borrow().is_some() {
        return;
    }
    let target = lower_type(sema, &a.ty);
    *aliased.borrow_mut() = Some(target);
}

fn analyze_trait_impl(sema: &mut Sema<'_, '_>, impl_: &yuan_ast::TraitImpl) {
    let target_ty = lower_type(sema, &impl_.for_type);
    let Some(trait_ty) = sema.symbols.lookup_kind(&impl_.trait_name, SymbolKind::Type).map(|s| s.ty) else {
        sema.error(
            ec::UNDEFINED_TYPE,
            format!("unknown trait `{}`", impl_.trait_name),
            Span::unknown(),
        );
        return;
    };
    let mut provided: HashMap<String, Ty> = HashMap::new();
    for method in &impl_.methods {
        let fn_ty = function_signature_type(sema, method);
        provided.insert(method.name.clone(), fn_ty);
        analyze_function(sema, method, Some(target_ty));
    }
    // Trait bounds are enforced primarily here, at definition time — a
    // redundant check at specialization time catches substitutions that
    // break conformance for a specific generic instantiation.
    if let TypeKind::Trait(trait_data) = &trait_ty.kind {
        for (name, _) in trait_data.required_methods.borrow().iter() {
            if !provided.contains_key(name) {
                sema.error(
                    ec::MISSING_TRAIT_METHOD,
                    format!(
                        "impl of `{}` for `{}` is missing required method `{}`",
                        impl_.trait_name, target_ty, name
                    ),
                    Span::unknown(),
                );
            }
        }
    }
}

fn analyze_const(sema: &mut Sema<'_, '_>, c: &yuan_ast::Const) {
    if let Some(module_path) = expressions::as_import_call(&c.value) {
        if let Some(ty) = sema.loader.resolve_module_alias(sema.ctx, &module_path) {
            sema.symbols.define(&c.name, SymbolKind::Module, ty, false);
            return;
        }
        sema.error(
            ec::CIRCULAR_IMPORT,
            format!("could not resolve module `{}`", module_path),
            Span::unknown(),
        );
        return;
    }
    let declared = sema
        .symbols
        .lookup_kind(&c.name, SymbolKind::Const)
        .map(|s| s.ty);
    let value_ty = expressions::analyze_expr(sema, &c.value);
    if let Some(declared) = declared {
        if !crate::type_checker::compatible(sema.ctx, declared, value_ty) {
            sema.error(
                ec::TYPE_MISMATCH,
                format!(
                    "const `{}` declared as `{}` but initializer has type `{}`",
                    c.name, declared, value_ty
                ),
                Span::unknown(),
            );
        }
    }
}

fn analyze_function<'ctx>(sema: &mut Sema<'ctx, '_>, f: &Function, owner: Option<Ty<'ctx>>) {
    sema.symbols.enter_scope(ScopeKind::GenericParams);
    for tp in &f.type_params {
        let g = sema.ctx.generic_type(&tp.name, Vec::new());
        sema.symbols.define(&tp.name, SymbolKind::GenericParam, g, false);
    }

    let return_type = f
        .return_type
        .as_ref()
        .map(|t| lower_type(sema, t))
        .unwrap_or_else(|| sema.ctx.void_type());
    sema.enter_function(super::FunctionCtx {
        return_type,
        can_error: false,
        is_async: f.is_async,
    });

    if let Some(recv) = &f.receiver {
        if let Some(owner) = owner {
            let self_ty = sema.ctx.reference_type(owner, recv.is_mutable);
            sema.symbols.define("self", SymbolKind::Param, self_ty, recv.is_mutable);
        }
    }
    for p in &f.params {
        let pty = lower_type(sema, &p.ty);
        sema.symbols.define(&p.name, SymbolKind::Param, pty, false);
    }

    statements::analyze_block(sema, &f.body);

    if let Some(owner) = owner {
        sema.ctx.register_impl_method(
            owner,
            crate::ast_context::ImplMethod {
                name: f.name.clone(),
                func_type: sema.symbols.lookup_kind(&f.name, SymbolKind::Func).map(|s| s.ty).unwrap_or(return_type),
                takes_self_by_ref: f.receiver.is_some(),
                takes_self_mut: f.receiver.as_ref().map(|r| r.is_mutable).unwrap_or(false),
            },
        );
    }

    sema.exit_function();
    sema.symbols.exit_scope();
}

//! Subtype/compat rules, common-type joins and generic unification.

use std::collections::HashMap;

use crate::ast_context::{resolve_alias, ASTContext, Ty, TypeKind};

/// An untyped numeric literal unifies with any compatible numeric type until
/// it carries an explicit suffix (`3` vs `3i64`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralSuffix {
    None,
    Explicit,
}

pub struct TypeChecker<'ctx> {
    ctx: &'ctx ASTContext<'ctx>,
}

/// Free-function convenience wrapper so call sites that only need a single
/// compatibility check don't have to hold onto a `TypeChecker`.
pub fn compatible<'ctx>(ctx: &'ctx ASTContext<'ctx>, expected: Ty<'ctx>, actual: Ty<'ctx>) -> bool {
    TypeChecker::new(ctx).compatible(expected, actual)
}

impl<'ctx> TypeChecker<'ctx> {
    pub fn new(ctx: &'ctx ASTContext<'ctx>) -> Self {
        Self { ctx }
    }

    /// `compatible(expected, actual)` — can a value of type `actual` be used
    /// where `expected` is required.
    pub fn compatible(&self, expected: Ty<'ctx>, actual: Ty<'ctx>) -> bool {
        let expected = resolve_alias(expected);
        let actual = resolve_alias(actual);

        if std::ptr::eq(expected, actual) {
            return true;
        }

        match (&expected.kind, &actual.kind) {
            // Integer widening only within the same signedness.
            (
                TypeKind::Integer { bits: eb, signed: es },
                TypeKind::Integer { bits: ab, signed: as_ },
            ) => es == as_ && ab <= eb,

            // float widening f32 -> f64 only
            (TypeKind::Float { bits: 64 }, TypeKind::Float { bits: 32 }) => true,

            // any T -> Optional(T); None literal (modeled as Optional(Void)) -> any Optional
            (TypeKind::Optional(inner), _) => {
                if let TypeKind::Optional(actual_inner) = &actual.kind {
                    if matches!(actual_inner.kind, TypeKind::Void) {
                        return true; // `None` literal
                    }
                    return self.compatible(inner, actual_inner);
                }
                self.compatible(inner, actual)
            }

            // reference coercion: &mut T -> &T allowed, never the reverse (depth-0 only)
            (
                TypeKind::Reference { pointee: ep, mutable: false },
                TypeKind::Reference { pointee: ap, mutable: _ },
            ) => self.compatible_exact(ep, ap),
            (
                TypeKind::Reference { pointee: ep, mutable: true },
                TypeKind::Reference { pointee: ap, mutable: true },
            ) => self.compatible_exact(ep, ap),

            // slice coercion: [T; n] -> &[T] / &mut [T]
            (TypeKind::Slice { elem: se, mutable: _ }, TypeKind::Array { elem: ae, n: _ }) => {
                self.compatible_exact(se, ae)
            }
            (TypeKind::Reference { pointee, mutable }, TypeKind::Array { elem, n: _ }) => {
                if let TypeKind::Slice { elem: se, mutable: sm } = &pointee.kind {
                    (!*sm || *mutable) && self.compatible_exact(se, elem)
                } else {
                    false
                }
            }

            // GenericInstance compatible iff bases match and args pairwise compatible
            (
                TypeKind::GenericInstance { base: eb, args: ea },
                TypeKind::GenericInstance { base: ab, args: aa },
            ) => {
                std::ptr::eq(*eb, *ab)
                    && ea.len() == aa.len()
                    && ea.iter().zip(aa.iter()).all(|(e, a)| self.compatible(e, a))
            }

            // enum variant literal typed against expected enum: handled by caller via
            // infer_enum_variant; structural equality already covers the common case.
            _ => false,
        }
    }

    /// Stricter check used inside reference/slice coercions: depth-0 only, so
    /// nested positions require exact (already-resolved) identity.
    fn compatible_exact(&self, a: Ty<'ctx>, b: Ty<'ctx>) -> bool {
        std::ptr::eq(resolve_alias(a), resolve_alias(b))
    }

    /// Picks the widening join of two types, or `None` if incompatible.
    /// Untyped integer/float literals on both sides default to `i32`.
    pub fn common_type(
        &self,
        a: Ty<'ctx>,
        a_suffix: LiteralSuffix,
        b: Ty<'ctx>,
        b_suffix: LiteralSuffix,
    ) -> Option<Ty<'ctx>> {
        if std::ptr::eq(a, b) {
            return Some(a);
        }
        match (&a.kind, &b.kind, a_suffix, b_suffix) {
            (
                TypeKind::Integer { signed: sa, .. },
                TypeKind::Integer { signed: sb, .. },
                LiteralSuffix::None,
                LiteralSuffix::None,
            ) if sa == sb => Some(self.ctx.integer_type(32, *sa)),
            (TypeKind::Integer { .. }, TypeKind::Integer { .. }, LiteralSuffix::Explicit, _) => {
                Some(a)
            }
            (TypeKind::Integer { .. }, TypeKind::Integer { .. }, _, LiteralSuffix::Explicit) => {
                Some(b)
            }
            _ if self.compatible(a, b) => Some(a),
            _ if self.compatible(b, a) => Some(b),
            _ => None,
        }
    }

    /// Best-effort one-way unification used to infer generic type arguments
    /// at call sites. Updates `subst`; returns `false` on conflict.
    pub fn unify_generic(
        &self,
        declared: Ty<'ctx>,
        actual: Ty<'ctx>,
        subst: &mut HashMap<String, Ty<'ctx>>,
    ) -> bool {
        match &declared.kind {
            TypeKind::Generic { name, .. } => {
                if let Some(existing) = subst.get(name) {
                    return std::ptr::eq(*existing, actual) || self.compatible(existing, actual);
                }
                subst.insert(name.clone(), actual);
                true
            }
            TypeKind::Array { elem: de, n: dn } => match &actual.kind {
                TypeKind::Array { elem: ae, n: an } => dn == an && self.unify_generic(de, ae, subst),
                _ => false,
            },
            TypeKind::Slice { elem: de, .. } => match &actual.kind {
                TypeKind::Slice { elem: ae, .. } => self.unify_generic(de, ae, subst),
                TypeKind::Array { elem: ae, .. } => self.unify_generic(de, ae, subst),
                _ => false,
            },
            TypeKind::Reference { pointee: dp, .. } => match &actual.kind {
                TypeKind::Reference { pointee: ap, .. } => self.unify_generic(dp, ap, subst),
                _ => false,
            },
            TypeKind::Optional(di) => match &actual.kind {
                TypeKind::Optional(ai) => self.unify_generic(di, ai, subst),
                _ => self.unify_generic(di, actual, subst),
            },
            TypeKind::Tuple(delems) => match &actual.kind {
                TypeKind::Tuple(aelems) if delems.len() == aelems.len() => delems
                    .iter()
                    .zip(aelems.iter())
                    .all(|(d, a)| self.unify_generic(d, a, subst)),
                _ => false,
            },
            TypeKind::GenericInstance { base: db, args: dargs } => match &actual.kind {
                TypeKind::GenericInstance { base: ab, args: aargs }
                    if std::ptr::eq(*db, *ab) && dargs.len() == aargs.len() =>
                {
                    dargs
                        .iter()
                        .zip(aargs.iter())
                        .all(|(d, a)| self.unify_generic(d, a, subst))
                }
                _ => false,
            },
            TypeKind::Function {
                params: dparams,
                ret: dret,
                ..
            } => match &actual.kind {
                TypeKind::Function {
                    params: aparams,
                    ret: aret,
                    ..
                } if dparams.len() == aparams.len() => {
                    dparams
                        .iter()
                        .zip(aparams.iter())
                        .all(|(d, a)| self.unify_generic(d, a, subst))
                        && self.unify_generic(dret, aret, subst)
                }
                _ => false,
            },
            _ => self.compatible(declared, actual) || self.compatible(actual, declared),
        }
    }

    /// Substitutes generic parameters everywhere in a type tree; result is
    /// re-interned via the `ASTContext` so canonicalization survives.
    pub fn substitute(&self, ty: Ty<'ctx>, subst: &HashMap<String, Ty<'ctx>>) -> Ty<'ctx> {
        match &ty.kind {
            TypeKind::Generic { name, .. } => subst.get(name).copied().unwrap_or(ty),
            TypeKind::Array { elem, n } => {
                let e = self.substitute(elem, subst);
                self.ctx.array_type(e, *n)
            }
            TypeKind::Slice { elem, mutable } => {
                let e = self.substitute(elem, subst);
                self.ctx.slice_type(e, *mutable)
            }
            TypeKind::Tuple(elems) => {
                let subbed = elems.iter().map(|e| self.substitute(e, subst)).collect();
                self.ctx.tuple_type(subbed)
            }
            TypeKind::VarArgs(elem) => {
                let e = self.substitute(elem, subst);
                self.ctx.varargs_type(e)
            }
            TypeKind::Optional(inner) => {
                let i = self.substitute(inner, subst);
                self.ctx.optional_type(i)
            }
            TypeKind::Reference { pointee, mutable } => {
                let p = self.substitute(pointee, subst);
                self.ctx.reference_type(p, *mutable)
            }
            TypeKind::Pointer { pointee, mutable } => {
                let p = self.substitute(pointee, subst);
                self.ctx.pointer_type(p, *mutable)
            }
            TypeKind::Function {
                params,
                ret,
                can_error,
                variadic,
            } => {
                let params = params.iter().map(|p| self.substitute(p, subst)).collect();
                let ret = self.substitute(ret, subst);
                self.ctx.function_type(params, ret, *can_error, *variadic)
            }
            TypeKind::GenericInstance { base, args } => {
                let base = self.substitute(base, subst);
                let args = args.iter().map(|a| self.substitute(a, subst)).collect();
                self.ctx.generic_instance_type(base, args)
            }
            TypeKind::Error { success } => {
                let s = self.substitute(success, subst);
                self.ctx.error_type(s)
            }
            TypeKind::Range { elem, inclusive } => {
                let e = self.substitute(elem, subst);
                self.ctx.range_type(e, *inclusive)
            }
            // Nominal types, TypeVar, primitives: substitution is the identity.
            _ => ty,
        }
    }

    /// Casts allow-list: numeric widening/narrowing, pointer<->integer,
    /// enum->integer when tag-only, any T -> DynamicValue boxing.
    pub fn cast_allowed(&self, from: Ty<'ctx>, to: Ty<'ctx>) -> bool {
        let from = resolve_alias(from);
        let to = resolve_alias(to);
        match (&from.kind, &to.kind) {
            (TypeKind::Integer { .. }, TypeKind::Integer { .. }) => true,
            (TypeKind::Float { .. }, TypeKind::Float { .. }) => true,
            (TypeKind::Integer { .. }, TypeKind::Float { .. }) => true,
            (TypeKind::Float { .. }, TypeKind::Integer { .. }) => true,
            (TypeKind::Pointer { .. }, TypeKind::Integer { .. }) => true,
            (TypeKind::Integer { .. }, TypeKind::Pointer { .. }) => true,
            (TypeKind::Enum(e), TypeKind::Integer { .. }) => {
                e.variants().is_some_and(|vs| vs.iter().all(|v| v.payload.is_none()))
            }
            (_, TypeKind::DynamicValue) => true,
            (TypeKind::Bool, TypeKind::Integer { .. }) => true,
            (TypeKind::Char, TypeKind::Integer { bits, .. }) if *bits >= 32 => true,
            _ => std::ptr::eq(from, to),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast_context::ASTContext;

    #[test]
    fn integer_widening_same_signedness_only() {
        let ctx = ASTContext::new();
        let tc = TypeChecker::new(&ctx);
        let i32_ty = ctx.integer_type(32, true);
        let i64_ty = ctx.integer_type(64, true);
        let u32_ty = ctx.integer_type(32, false);
        assert!(tc.compatible(i64_ty, i32_ty));
        assert!(!tc.compatible(i32_ty, i64_ty));
        assert!(!tc.compatible(i64_ty, u32_ty));
    }

    #[test]
    fn mut_ref_coerces_to_shared_ref_never_reverse() {
        let ctx = ASTContext::new();
        let tc = TypeChecker::new(&ctx);
        let i32_ty = ctx.integer_type(32, true);
        let shared = ctx.reference_type(i32_ty, false);
        let mutable = ctx.reference_type(i32_ty, true);
        assert!(tc.compatible(shared, mutable));
        assert!(!tc.compatible(mutable, shared));
    }

    #[test]
    fn slice_array_coercion() {
        let ctx = ASTContext::new();
        let tc = TypeChecker::new(&ctx);
        let i32_ty = ctx.integer_type(32, true);
        let arr = ctx.array_type(i32_ty, 4);
        let slice_ref = ctx.reference_type(ctx.slice_type(i32_ty, false), false);
        assert!(tc.compatible(slice_ref, arr));
    }

    #[test]
    fn unify_generic_binds_type_param() {
        let ctx = ASTContext::new();
        let tc = TypeChecker::new(&ctx);
        let t = ctx.generic_type("T", vec![]);
        let i32_ty = ctx.integer_type(32, true);
        let mut subst = HashMap::new();
        assert!(tc.unify_generic(t, i32_ty, &mut subst));
        assert_eq!(subst.get("T").copied(), Some(i32_ty));

        let substituted = tc.substitute(t, &subst);
        assert!(std::ptr::eq(substituted, i32_ty));
    }

    #[test]
    fn substitute_preserves_interning() {
        let ctx = ASTContext::new();
        let tc = TypeChecker::new(&ctx);
        let t = ctx.generic_type("T", vec![]);
        let i32_ty = ctx.integer_type(32, true);
        let mut subst = HashMap::new();
        subst.insert("T".to_string(), i32_ty);

        let generic_array = ctx.array_type(t, 3);
        let substituted = tc.substitute(generic_array, &subst);
        let expected = ctx.array_type(i32_ty, 3);
        assert!(std::ptr::eq(substituted, expected));
    }
}

//! Stable, total and reversible type serialization grammar.
//!
//! `decode(encode(T), ctx)` is pointer-equal (after re-interning) to `T` in
//! the same `ASTContext` — this is the primary round-trip property tested
//! below. The grammar is also used standalone (no `ASTContext`) by `yuanfilt`
//! to render human-readable types from mangled symbols it has no compiler
//! state for; `parse_encoded`/`describe` implement that text-only half.

use crate::ast_context::{ASTContext, Ty, TypeKind};

pub fn escape_ident(s: &str) -> String {
    let hex: String = s.bytes().map(|b| format!("{:02x}", b)).collect();
    format!("I{}_{}", s.len(), hex)
}

/// Consumes a leading `I<len>_<hex>` escape, returning the decoded string and
/// what follows it.
pub fn unescape_ident(s: &str) -> Option<(String, &str)> {
    let rest = s.strip_prefix('I')?;
    let (len_str, rest) = rest.split_once('_')?;
    let len: usize = len_str.parse().ok()?;
    let hex_len = len * 2;
    if rest.len() < hex_len {
        return None;
    }
    let (hex, rest) = rest.split_at(hex_len);
    let bytes: Vec<u8> = (0..hex_len)
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16))
        .collect::<Result<_, _>>()
        .ok()?;
    Some((String::from_utf8(bytes).ok()?, rest))
}

/// Recursively encodes a canonical type into the `.ymi` TypeCodec grammar.
pub fn encode_type(ty: Ty<'_>) -> String {
    match &ty.kind {
        TypeKind::Void => "Tv".to_string(),
        TypeKind::Bool => "Tb".to_string(),
        TypeKind::Char => "Tc".to_string(),
        TypeKind::String => "Tstr".to_string(),
        TypeKind::DynamicValue => "Tval".to_string(),
        TypeKind::Integer { bits, signed } => {
            format!("T{}{}", if *signed { "i" } else { "u" }, bits)
        }
        TypeKind::Float { bits } => format!("Tf{}", bits),
        TypeKind::Array { elem, n } => format!("Ta{}_{}_E", n, encode_type(elem)),
        TypeKind::Slice { elem, mutable } => {
            format!("Ts{}_{}_E", if *mutable { "m" } else { "i" }, encode_type(elem))
        }
        TypeKind::Tuple(elems) => {
            let mut s = format!("Tt{}", elems.len());
            for e in elems {
                s.push('_');
                s.push_str(&encode_type(e));
            }
            s.push_str("_E");
            s
        }
        TypeKind::Optional(inner) => format!("To_{}_E", encode_type(inner)),
        TypeKind::Reference { pointee, mutable } => {
            format!("Tr{}_{}_E", if *mutable { "m" } else { "i" }, encode_type(pointee))
        }
        TypeKind::Pointer { pointee, mutable } => {
            format!("Tp{}_{}_E", if *mutable { "m" } else { "i" }, encode_type(pointee))
        }
        TypeKind::Function {
            params,
            ret,
            can_error,
            variadic,
        } => {
            let mut s = format!("Tfn{}", params.len());
            for p in params {
                s.push('_');
                s.push_str(&encode_type(p));
            }
            s.push_str("_R_");
            s.push_str(&encode_type(ret));
            s.push_str(&format!("_Er{}_Vr{}_E", *can_error as u8, *variadic as u8));
            s
        }
        TypeKind::Struct(st) => format!("Tst_{}", escape_ident(&st.name)),
        TypeKind::Enum(en) => format!("Ten_{}", escape_ident(&en.name)),
        TypeKind::Trait(tr) => format!("Ttr_{}", escape_ident(&tr.name)),
        TypeKind::Generic { name, .. } => format!("Tg_{}", escape_ident(name)),
        TypeKind::GenericInstance { base, args } => {
            let mut s = format!("Tgi_{}_N{}", encode_type(base), args.len());
            for a in args {
                s.push('_');
                s.push_str(&encode_type(a));
            }
            s.push_str("_E");
            s
        }
        TypeKind::TypeVar(v) => match v.resolution.get() {
            Some(resolved) => format!("Ttv{}_{}_E", v.id, encode_type(resolved)),
            None => format!("Ttv{}", v.id),
        },
        TypeKind::Error { success } => format!("Terr_{}_E", encode_type(success)),
        TypeKind::TypeAlias { name, aliased } => {
            let aliased_str = aliased
                .borrow()
                .map(|t| encode_type(t))
                .unwrap_or_else(|| "Tv".to_string());
            format!("Tal_{}_{}_E", escape_ident(name), aliased_str)
        }
        TypeKind::Module(m) => format!("Tmo_{}", escape_ident(&m.name)),
        TypeKind::Range { elem, inclusive } => {
            format!("Tra{}_{}_E", *inclusive as u8, encode_type(elem))
        }
        TypeKind::VarArgs(elem) => format!("Tvargs_{}_E", encode_type(elem)),
    }
}

/// Text-only intermediate form, used when no `ASTContext` is available
/// (`yuanfilt` demangling an arbitrary symbol).
#[derive(Debug, Clone)]
pub enum EncodedType {
    Void,
    Bool,
    Char,
    Str,
    Val,
    Int(u32, bool),
    Float(u32),
    Array(Box<EncodedType>, u64),
    Slice(Box<EncodedType>, bool),
    Tuple(Vec<EncodedType>),
    Optional(Box<EncodedType>),
    Reference(Box<EncodedType>, bool),
    Pointer(Box<EncodedType>, bool),
    Function {
        params: Vec<EncodedType>,
        ret: Box<EncodedType>,
        can_error: bool,
        variadic: bool,
    },
    Struct(String),
    Enum(String),
    Trait(String),
    Generic(String),
    GenericInstance(Box<EncodedType>, Vec<EncodedType>),
    TypeVar(u32, Option<Box<EncodedType>>),
    Error(Box<EncodedType>),
    Alias(String, Box<EncodedType>),
    Module(String),
    Range(Box<EncodedType>, bool),
    VarArgs(Box<EncodedType>),
}

impl std::fmt::Display for EncodedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncodedType::Void => write!(f, "void"),
            EncodedType::Bool => write!(f, "bool"),
            EncodedType::Char => write!(f, "char"),
            EncodedType::Str => write!(f, "string"),
            EncodedType::Val => write!(f, "any"),
            EncodedType::Int(bits, signed) => write!(f, "{}{}", if *signed { "i" } else { "u" }, bits),
            EncodedType::Float(bits) => write!(f, "f{}", bits),
            EncodedType::Array(e, n) => write!(f, "[{}; {}]", e, n),
            EncodedType::Slice(e, m) => write!(f, "&{}[{}]", if *m { "mut " } else { "" }, e),
            EncodedType::Tuple(elems) => {
                write!(f, "(")?;
                for (i, e) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", e)?;
                }
                write!(f, ")")
            }
            EncodedType::Optional(inner) => write!(f, "?{}", inner),
            EncodedType::Reference(p, m) => write!(f, "&{}{}", if *m { "mut " } else { "" }, p),
            EncodedType::Pointer(p, m) => write!(f, "*{}{}", if *m { "mut " } else { "const " }, p),
            EncodedType::Function {
                params, ret, can_error, ..
            } => {
                write!(f, "func(")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", p)?;
                }
                write!(f, ") -> {}{}", if *can_error { "!" } else { "" }, ret)
            }
            EncodedType::Struct(n) | EncodedType::Enum(n) | EncodedType::Trait(n) | EncodedType::Generic(n) => {
                write!(f, "{}", n)
            }
            EncodedType::GenericInstance(base, args) => {
                write!(f, "{}<", base)?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", a)?;
                }
                write!(f, ">")
            }
            EncodedType::TypeVar(id, resolved) => match resolved {
                Some(t) => write!(f, "{}", t),
                None => write!(f, "?{}", id),
            },
            EncodedType::Error(s) => write!(f, "{}!", s),
            EncodedType::Alias(name, _) => write!(f, "{}", name),
            EncodedType::Module(n) => write!(f, "module {}", n),
            EncodedType::Range(e, incl) => write!(f, "Range<{}>{}", e, if *incl { "=" } else { "" }),
            EncodedType::VarArgs(e) => write!(f, "...{}", e),
        }
    }
}

fn take_digits(s: &str) -> Option<(&str, &str)> {
    let idx = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if idx == 0 {
        return None;
    }
    Some(s.split_at(idx))
}

fn expect(s: &str, lit: &str) -> Option<&str> {
    s.strip_prefix(lit)
}

/// Parses exactly one encoded type from the front of `s`, returning it and
/// whatever text follows — self-delimiting, so this also underlies
/// `split_one_encoded_type` and list-decoding in `mangle.rs`.
pub fn parse_encoded(s: &str) -> Option<(EncodedType, &str)> {
    let s = expect(s, "T")?;
    if let Some(rest) = expect(s, "v") {
        // `Tv` (Void) vs `Tval` (DynamicValue) vs `Tvargs` (VarArgs) share a prefix.
        if let Some(rest) = expect(rest, "al") {
            return Some((EncodedType::Val, rest));
        }
        if let Some(rest) = expect(rest, "args_") {
            let (inner, rest) = parse_encoded(rest)?;
            let rest = expect(rest, "_E")?;
            return Some((EncodedType::VarArgs(Box::new(inner)), rest));
        }
        return Some((EncodedType::Void, rest));
    }
    if let Some(rest) = expect(s, "b") {
        return Some((EncodedType::Bool, rest));
    }
    if let Some(rest) = expect(s, "c") {
        return Some((EncodedType::Char, rest));
    }
    if let Some(rest) = expect(s, "str") {
        return Some((EncodedType::Str, rest));
    }
    if let Some(rest) = expect(s, "i") {
        let (digits, rest) = take_digits(rest)?;
        return Some((EncodedType::Int(digits.parse().ok()?, true), rest));
    }
    if let Some(rest) = expect(s, "u") {
        let (digits, rest) = take_digits(rest)?;
        return Some((EncodedType::Int(digits.parse().ok()?, false), rest));
    }
    if let Some(rest) = expect(s, "f") {
        let (digits, rest) = take_digits(rest)?;
        return Some((EncodedType::Float(digits.parse().ok()?), rest));
    }
    // `Tal_...` (TypeAlias) vs `Ta<n>_...` (Array) share the `a` prefix;
    // the alias's `l` can never start a digit run, so it must be checked first.
    if let Some(rest) = expect(s, "al_") {
        let (name, rest) = unescape_ident(rest)?;
        let rest = expect(rest, "_")?;
        let (inner, rest) = parse_encoded(rest)?;
        let rest = expect(rest, "_E")?;
        return Some((EncodedType::Alias(name, Box::new(inner)), rest));
    }
    if let Some(rest) = expect(s, "a") {
        let (n, rest) = take_digits(rest)?;
        let rest = expect(rest, "_")?;
        let (inner, rest) = parse_encoded(rest)?;
        let rest = expect(rest, "_E")?;
        return Some((EncodedType::Array(Box::new(inner), n.parse().ok()?), rest));
    }
    // `Tst_...` (Struct) vs `Ts{m|i}_...` (Slice) share the `s` prefix; the
    // struct's `t` never matches the slice's mandatory `m`/`i` mutability tag.
    if let Some(rest) = expect(s, "st_") {
        let (name, rest) = unescape_ident(rest)?;
        return Some((EncodedType::Struct(name), rest));
    }
    if let Some(rest) = expect(s, "s") {
        let (mutable, rest) = parse_mi(rest)?;
        let rest = expect(rest, "_")?;
        let (inner, rest) = parse_encoded(rest)?;
        let rest = expect(rest, "_E")?;
        return Some((EncodedType::Slice(Box::new(inner), mutable), rest));
    }
    if let Some(rest) = expect(s, "t") {
        if let Some(rest) = expect(rest, "v") {
            let (id, rest) = take_digits(rest)?;
            if let Some(rest) = expect(rest, "_") {
                let (inner, rest) = parse_encoded(rest)?;
                let rest = expect(rest, "_E")?;
                return Some((EncodedType::TypeVar(id.parse().ok()?, Some(Box::new(inner))), rest));
            }
            return Some((EncodedType::TypeVar(id.parse().ok()?, None), rest));
        }
        // `Ttr_...` (Trait) also falls under the `t` prefix; must be checked
        // before the digit-count parse below claims its leading `r`.
        if let Some(rest) = expect(rest, "r_") {
            let (name, rest) = unescape_ident(rest)?;
            return Some((EncodedType::Trait(name), rest));
        }
        let (n, rest) = take_digits(rest)?;
        let count: usize = n.parse().ok()?;
        let mut elems = Vec::with_capacity(count);
        let mut rest = rest;
        for _ in 0..count {
            rest = expect(rest, "_")?;
            let (elem, remainder) = parse_encoded(rest)?;
            elems.push(elem);
            rest = remainder;
        }
        let rest = expect(rest, "_E")?;
        return Some((EncodedType::Tuple(elems), rest));
    }
    if let Some(rest) = expect(s, "o") {
        let rest = expect(rest, "_")?;
        let (inner, rest) = parse_encoded(rest)?;
        let rest = expect(rest, "_E")?;
        return Some((EncodedType::Optional(Box::new(inner)), rest));
    }
    if let Some(rest) = expect(s, "r") {
        // `Tra...` (Range) vs `Tr{m|i}...` (Reference).
        if rest.starts_with('a') {
            let rest = &rest[1..];
            let (incl, rest) = parse_01(rest)?;
            let rest = expect(rest, "_")?;
            let (inner, rest) = parse_encoded(rest)?;
            let rest = expect(rest, "_E")?;
            return Some((EncodedType::Range(Box::new(inner), incl), rest));
        }
        let (mutable, rest) = parse_mi(rest)?;
        let rest = expect(rest, "_")?;
        let (inner, rest) = parse_encoded(rest)?;
        let rest = expect(rest, "_E")?;
        return Some((EncodedType::Reference(Box::new(inner), mutable), rest));
    }
    if let Some(rest) = expect(s, "p") {
        let (mutable, rest) = parse_mi(rest)?;
        let rest = expect(rest, "_")?;
        let (inner, rest) = parse_encoded(rest)?;
        let rest = expect(rest, "_E")?;
        return Some((EncodedType::Pointer(Box::new(inner), mutable), rest));
    }
    if let Some(rest) = expect(s, "fn") {
        let (n, rest) = take_digits(rest)?;
        let count: usize = n.parse().ok()?;
        let mut params = Vec::with_capacity(count);
        let mut rest = rest;
        for _ in 0..count {
            rest = expect(rest, "_")?;
            let (p, remainder) = parse_encoded(rest)?;
            params.push(p);
            rest = remainder;
        }
        let rest = expect(rest, "_R_")?;
        let (ret, rest) = parse_encoded(rest)?;
        let rest = expect(rest, "_Er")?;
        let (can_error, rest) = parse_01(rest)?;
        let rest = expect(rest, "_Vr")?;
        let (variadic, rest) = parse_01(rest)?;
        let rest = expect(rest, "_E")?;
        return Some((
            EncodedType::Function {
                params,
                ret: Box::new(ret),
                can_error,
                variadic,
            },
            rest,
        ));
    }
    if let Some(rest) = expect(s, "en_") {
        let (name, rest) = unescape_ident(rest)?;
        return Some((EncodedType::Enum(name), rest));
    }
    if let Some(rest) = expect(s, "g_") {
        let (name, rest) = unescape_ident(rest)?;
        return Some((EncodedType::Generic(name), rest));
    }
    if let Some(rest) = expect(s, "gi_") {
        let (base, rest) = parse_encoded(rest)?;
        let rest = expect(rest, "_N")?;
        let (n, rest) = take_digits(rest)?;
        let count: usize = n.parse().ok()?;
        let mut args = Vec::with_capacity(count);
        let mut rest = rest;
        for _ in 0..count {
            rest = expect(rest, "_")?;
            let (a, remainder) = parse_encoded(rest)?;
            args.push(a);
            rest = remainder;
        }
        let rest = expect(rest, "_E")?;
        return Some((EncodedType::GenericInstance(Box::new(base), args), rest));
    }
    if let Some(rest) = expect(s, "err_") {
        let (inner, rest) = parse_encoded(rest)?;
        let rest = expect(rest, "_E")?;
        return Some((EncodedType::Error(Box::new(inner)), rest));
    }
    if let Some(rest) = expect(s, "mo_") {
        let (name, rest) = unescape_ident(rest)?;
        return Some((EncodedType::Module(name), rest));
    }
    None
}

fn parse_mi(s: &str) -> Option<(bool, &str)> {
    if let Some(rest) = expect(s, "m") {
        Some((true, rest))
    } else {
        expect(s, "i").map(|rest| (false, rest))
    }
}

fn parse_01(s: &str) -> Option<(bool, &str)> {
    if let Some(rest) = expect(s, "1") {
        Some((true, rest))
    } else {
        expect(s, "0").map(|rest| (false, rest))
    }
}

/// Returns (consumed segment, remainder) for one encoded type at the front
/// of `s`, without needing an `ASTContext`.
pub fn split_one_encoded_type(s: &str) -> Option<(&str, &str)> {
    let (_, remainder) = parse_encoded(s)?;
    let consumed_len = s.len() - remainder.len();
    Some((&s[..consumed_len], remainder))
}

/// Human-readable rendering of one encoded type segment, context-free.
pub fn describe_encoded(segment: &str) -> String {
    match parse_encoded(segment) {
        Some((encoded, _)) => encoded.to_string(),
        None => segment.to_string(),
    }
}

fn build<'ctx>(ctx: &'ctx ASTContext<'ctx>, e: &EncodedType) -> Ty<'ctx> {
    match e {
        EncodedType::Void => ctx.void_type(),
        EncodedType::Bool => ctx.bool_type(),
        EncodedType::Char => ctx.char_type(),
        EncodedType::Str => ctx.string_type(),
        EncodedType::Val => ctx.dynamic_value_type(),
        EncodedType::Int(bits, signed) => ctx.integer_type(*bits as u8, *signed),
        EncodedType::Float(bits) => ctx.float_type(*bits as u8),
        EncodedType::Array(e, n) => {
            let elem = build(ctx, e);
            ctx.array_type(elem, *n)
        }
        EncodedType::Slice(e, m) => {
            let elem = build(ctx, e);
            ctx.slice_type(elem, *m)
        }
        EncodedType::Tuple(elems) => {
            let elems = elems.iter().map(|e| build(ctx, e)).collect();
            ctx.tuple_type(elems)
        }
        EncodedType::Optional(e) => {
            let inner = build(ctx, e);
            ctx.optional_type(inner)
        }
        EncodedType::Reference(e, m) => {
            let pointee = build(ctx, e);
            ctx.reference_type(pointee, *m)
        }
        EncodedType::Pointer(e, m) => {
            let pointee = build(ctx, e);
            ctx.pointer_type(pointee, *m)
        }
        EncodedType::Function {
            params,
            ret,
            can_error,
            variadic,
        } => {
            let params = params.iter().map(|p| build(ctx, p)).collect();
            let ret = build(ctx, ret);
            ctx.function_type(params, ret, *can_error, *variadic)
        }
        EncodedType::Struct(name) => ctx.struct_type(name),
        EncodedType::Enum(name) => ctx.enum_type(name),
        EncodedType::Trait(name) => ctx.trait_type(name),
        EncodedType::Generic(name) => ctx.generic_type(name, vec![]),
        EncodedType::GenericInstance(base, args) => {
            let base = build(ctx, base);
            let args = args.iter().map(|a| build(ctx, a)).collect();
            ctx.generic_instance_type(base, args)
        }
        EncodedType::TypeVar(_, resolved) => match resolved {
            Some(inner) => build(ctx, inner),
            None => ctx.fresh_type_var(),
        },
        EncodedType::Error(e) => {
            let success = build(ctx, e);
            ctx.error_type(success)
        }
        EncodedType::Alias(name, _inner) => ctx.type_alias(name),
        EncodedType::Module(name) => ctx.module_type(name),
        EncodedType::Range(e, incl) => {
            let elem = build(ctx, e);
            ctx.range_type(elem, *incl)
        }
        EncodedType::VarArgs(e) => {
            let elem = build(ctx, e);
            ctx.varargs_type(elem)
        }
    }
}

/// Decodes one full encoded type, requiring the entire string be consumed.
pub fn decode<'ctx>(s: &str, ctx: &'ctx ASTContext<'ctx>) -> Option<Ty<'ctx>> {
    let (encoded, rest) = parse_encoded(s)?;
    if !rest.is_empty() {
        return None;
    }
    Some(build(ctx, &encoded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast_context::ASTContext;

    fn roundtrip<'ctx>(ctx: &'ctx ASTContext<'ctx>, ty: Ty<'ctx>) {
        let encoded = encode_type(ty);
        let decoded = decode(&encoded, ctx).unwrap_or_else(|| panic!("failed to decode {encoded}"));
        assert!(std::ptr::eq(ty, decoded), "round-trip mismatch for {encoded}");
    }

    #[test]
    fn primitives_round_trip() {
        let ctx = ASTContext::new();
        roundtrip(&ctx, ctx.void_type());
        roundtrip(&ctx, ctx.bool_type());
        roundtrip(&ctx, ctx.char_type());
        roundtrip(&ctx, ctx.string_type());
        roundtrip(&ctx, ctx.dynamic_value_type());
        roundtrip(&ctx, ctx.integer_type(32, true));
        roundtrip(&ctx, ctx.integer_type(64, false));
        roundtrip(&ctx, ctx.float_type(64));
    }

    #[test]
    fn composite_types_round_trip_to_depth_5() {
        let ctx = ASTContext::new();
        let i32_ty = ctx.integer_type(32, true);
        let arr = ctx.array_type(i32_ty, 4);
        let slice = ctx.slice_type(arr, true);
        let opt = ctx.optional_type(slice);
        let refr = ctx.reference_type(opt, false);
        let tuple = ctx.tuple_type(vec![refr, i32_ty]);
        roundtrip(&ctx, tuple);

        let func = ctx.function_type(vec![i32_ty, i32_ty], ctx.bool_type(), true, false);
        roundtrip(&ctx, func);

        let ptr = ctx.pointer_type(i32_ty, true);
        roundtrip(&ctx, ptr);

        let range = ctx.range_type(i32_ty, true);
        roundtrip(&ctx, range);

        let varargs = ctx.varargs_type(ctx.dynamic_value_type());
        roundtrip(&ctx, varargs);

        let err = ctx.error_type(i32_ty);
        roundtrip(&ctx, err);
    }

    #[test]
    fn nominal_types_round_trip_by_name() {
        let ctx = ASTContext::new();
        let s = ctx.struct_type("Point");
        roundtrip(&ctx, s);
        let e = ctx.enum_type("Color");
        roundtrip(&ctx, e);
        let t = ctx.trait_type("Display");
        roundtrip(&ctx, t);
        let m = ctx.module_type("std.io");
        roundtrip(&ctx, m);
    }

    #[test]
    fn generic_instance_round_trips() {
        let ctx = ASTContext::new();
        let vec_base = ctx.struct_type("Vec");
        let i32_ty = ctx.integer_type(32, true);
        let instance = ctx.generic_instance_type(vec_base, vec![i32_ty]);
        roundtrip(&ctx, instance);
    }

    #[test]
    fn identifiers_with_special_chars_escape_safely() {
        let name = "std.io::File_1";
        let escaped = escape_ident(name);
        let (decoded, rest) = unescape_ident(&escaped).unwrap();
        assert_eq!(decoded, name);
        assert!(rest.is_empty());
    }
}

//! Stable, reversible cross-module symbol mangling.
//!
//! Scheme: `_Y1<K>M<module>N<name>P<n>_<T1>_..._<Tn>_ER_<Ret>Er{0|1}Vr{0|1}Ar{0|1}G<n>_..._E_<discriminator>[_S...]`
//! Identifiers are escaped `I<len>_<hex>` the same way the TypeCodec
//! escapes them, so `yuanfilt` can walk both grammars with one tokenizer.

use crate::ast_context::{Ty, TypeKind};
use crate::type_codec::{encode_type, escape_ident, unescape_ident};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKindTag {
    Function,
    Method,
    Variable,
    Constant,
}

impl SymbolKindTag {
    fn letter(self) -> char {
        match self {
            SymbolKindTag::Function => 'F',
            SymbolKindTag::Method => 'M',
            SymbolKindTag::Variable => 'V',
            SymbolKindTag::Constant => 'C',
        }
    }

    fn from_letter(c: char) -> Option<Self> {
        match c {
            'F' => Some(SymbolKindTag::Function),
            'M' => Some(SymbolKindTag::Method),
            'V' => Some(SymbolKindTag::Variable),
            'C' => Some(SymbolKindTag::Constant),
            _ => None,
        }
    }
}

/// Disambiguates overloads that share module+name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discriminator {
    None,
    Location { line: u32, col: u32 },
    Pointer(u64),
}

impl Discriminator {
    fn render(&self) -> String {
        match self {
            Discriminator::None => "Dnone".to_string(),
            Discriminator::Location { line, col } => format!("DL{}_{}", line, col),
            Discriminator::Pointer(p) => format!("DP{:x}", p),
        }
    }
}

pub struct MangleInput<'ctx> {
    pub kind: SymbolKindTag,
    pub module: String,
    pub name: String,
    pub params: Vec<Ty<'ctx>>,
    pub ret: Ty<'ctx>,
    pub can_error: bool,
    pub variadic: bool,
    pub is_async: bool,
    pub generic_params: Vec<String>,
    pub discriminator: Discriminator,
    /// Present only for a concrete generic specialization: (param name, bound arg) pairs.
    pub specialization: Vec<(String, Ty<'ctx>)>,
}

/// Produces a symbol that is stable and collision-free: two distinct
/// definitions with the same module+name+signature+discriminator always
/// differ because `discriminator` is required to disambiguate them.
pub fn mangle(input: &MangleInput<'_>) -> String {
    let mut out = String::from("_Y1");
    out.push(input.kind.letter());
    out.push('M');
    out.push_str(&escape_ident(&input.module));
    out.push('N');
    out.push_str(&escape_ident(&input.name));

    out.push('P');
    out.push_str(&input.params.len().to_string());
    out.push('_');
    for p in &input.params {
        out.push_str(&encode_type(p));
        out.push('_');
    }
    out.push('E');

    out.push('R');
    out.push('_');
    out.push_str(&encode_type(input.ret));
    out.push_str(&format!(
        "Er{}Vr{}Ar{}",
        input.can_error as u8, input.variadic as u8, input.is_async as u8
    ));

    out.push('G');
    out.push_str(&input.generic_params.len().to_string());
    out.push('_');
    for g in &input.generic_params {
        out.push_str(&escape_ident(g));
        out.push('_');
    }
    out.push('E');

    out.push('_');
    out.push_str(&input.discriminator.render());

    if !input.specialization.is_empty() {
        out.push_str("_S");
        out.push_str(&input.specialization.len().to_string());
        out.push('_');
        for (name, ty) in &input.specialization {
            out.push_str(&escape_ident(name));
            out.push('_');
            out.push_str(&encode_type(ty));
            out.push('_');
        }
        out.push('E');
    }

    out
}

/// A human-readable decomposition of a mangled symbol, the shape `yuanfilt`
/// renders.
#[derive(Debug, Clone)]
pub struct DemangledSymbol {
    pub kind: SymbolKindTag,
    pub module: String,
    pub name: String,
    pub param_types: Vec<String>,
    pub return_type: String,
    pub can_error: bool,
    pub variadic: bool,
    pub is_async: bool,
    pub generic_params: Vec<String>,
}

impl std::fmt::Display for DemangledSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "func {}.{}(", self.module, self.name)?;
        for (i, p) in self.param_types.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", p)?;
        }
        write!(f, ") -> {}", self.return_type)?;
        if self.can_error {
            write!(f, "!")?;
        }
        Ok(())
    }
}

/// Demangles a `_Y1...` symbol back into its structural parts. This is the
/// reference decoder `yuanfilt` is built on; it must keep working on names
/// produced by any past `mangle()` call, stability is the whole point.
pub fn demangle(sym: &str) -> Option<DemangledSymbol> {
    let rest = sym.strip_prefix("_Y1")?;
    let mut chars = rest.chars();
    let kind = SymbolKindTag::from_letter(chars.next()?)?;
    let rest = &rest[1..];

    let rest = rest.strip_prefix('M')?;
    let (module, rest) = unescape_ident(rest)?;
    let rest = rest.strip_prefix('N')?;
    let (name, rest) = unescape_ident(rest)?;

    let rest = rest.strip_prefix('P')?;
    let (count_str, rest) = rest.split_once('_')?;
    let param_count: usize = count_str.parse().ok()?;
    let mut param_types = Vec::with_capacity(param_count);
    let mut rest = rest;
    for _ in 0..param_count {
        let (ty_str, remainder) = crate::type_codec::split_one_encoded_type(rest)?;
        param_types.push(crate::type_codec::describe_encoded(ty_str));
        rest = remainder.strip_prefix('_').unwrap_or(remainder);
    }
    let rest = rest.strip_prefix('E')?;

    let rest = rest.strip_prefix('R')?;
    let rest = rest.strip_prefix('_')?;
    let (ret_str, rest) = crate::type_codec::split_one_encoded_type(rest)?;
    let return_type = crate::type_codec::describe_encoded(ret_str);

    let rest = rest.strip_prefix("Er")?;
    let can_error = rest.starts_with('1');
    let rest = &rest[1..];
    let rest = rest.strip_prefix("Vr")?;
    let variadic = rest.starts_with('1');
    let rest = &rest[1..];
    let rest = rest.strip_prefix("Ar")?;
    let is_async = rest.starts_with('1');
    let rest = &rest[1..];

    let rest = rest.strip_prefix('G')?;
    let (gcount_str, mut rest) = rest.split_once('_')?;
    let gcount: usize = gcount_str.parse().ok()?;
    let mut generic_params = Vec::with_capacity(gcount);
    for _ in 0..gcount {
        let (g, remainder) = unescape_ident(rest)?;
        generic_params.push(g);
        rest = remainder.strip_prefix('_').unwrap_or(remainder);
    }
    let _rest = rest.strip_prefix('E')?;

    Some(DemangledSymbol {
        kind,
        module,
        name,
        param_types,
        return_type,
        can_error,
        variadic,
        is_async,
        generic_params,
    })
}

/// Builds the `Ty` required for `MangleInput` from an already-interned
/// function type, used by Sema right after analyzing a `FuncDecl`.
pub fn mangle_func(
    module: &str,
    name: &str,
    func_ty: Ty<'_>,
    is_async: bool,
    generic_params: Vec<String>,
    discriminator: Discriminator,
) -> Option<String> {
    let TypeKind::Function {
        params,
        ret,
        can_error,
        variadic,
    } = &func_ty.kind
    else {
        return None;
    };
    Some(mangle(&MangleInput {
        kind: SymbolKindTag::Function,
        module: module.to_string(),
        name: name.to_string(),
        params: params.clone(),
        ret,
        can_error: *can_error,
        variadic: *variadic,
        is_async,
        generic_params,
        discriminator,
        specialization: Vec::new(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast_context::ASTContext;

    #[test]
    fn round_trips_module_and_name() {
        let ctx = ASTContext::new();
        let i32_ty = ctx.integer_type(32, true);
        let input = MangleInput {
            kind: SymbolKindTag::Function,
            module: "math".to_string(),
            name: "add".to_string(),
            params: vec![i32_ty, i32_ty],
            ret: i32_ty,
            can_error: false,
            variadic: false,
            is_async: false,
            generic_params: vec![],
            discriminator: Discriminator::None,
            specialization: vec![],
        };
        let mangled = mangle(&input);
        let demangled = demangle(&mangled).expect("demangles");
        assert_eq!(demangled.module, "math");
        assert_eq!(demangled.name, "add");
        assert_eq!(demangled.param_types, vec!["i32", "i32"]);
        assert_eq!(demangled.return_type, "i32");
        assert_eq!(demangled.to_string(), "func math.add(i32, i32) -> i32");
    }

    #[test]
    fn distinct_signatures_never_collide() {
        let ctx = ASTContext::new();
        let i32_ty = ctx.integer_type(32, true);
        let i64_ty = ctx.integer_type(64, true);
        let base = MangleInput {
            kind: SymbolKindTag::Function,
            module: "m".to_string(),
            name: "f".to_string(),
            params: vec![i32_ty],
            ret: i32_ty,
            can_error: false,
            variadic: false,
            is_async: false,
            generic_params: vec![],
            discriminator: Discriminator::None,
            specialization: vec![],
        };
        let mut other = MangleInput {
            params: vec![i64_ty],
            ..MangleInput {
                kind: base.kind,
                module: base.module.clone(),
                name: base.name.clone(),
                params: vec![],
                ret: base.ret,
                can_error: base.can_error,
                variadic: base.variadic,
                is_async: base.is_async,
                generic_params: base.generic_params.clone(),
                discriminator: base.discriminator.clone(),
                specialization: vec![],
            }
        };
        other.params = vec![i64_ty];
        assert_ne!(mangle(&base), mangle(&other));
    }

    #[test]
    fn overloads_need_a_discriminator_to_differ() {
        let ctx = ASTContext::new();
        let i32_ty = ctx.integer_type(32, true);
        let mk = |d: Discriminator| MangleInput {
            kind: SymbolKindTag::Function,
            module: "m".to_string(),
            name: "f".to_string(),
            params: vec![i32_ty],
            ret: i32_ty,
            can_error: false,
            variadic: false,
            is_async: false,
            generic_params: vec![],
            discriminator: d,
            specialization: vec![],
        };
        let a = mangle(&mk(Discriminator::Location { line: 1, col: 1 }));
        let b = mangle(&mk(Discriminator::Location { line: 2, col: 1 }));
        assert_ne!(a, b);
    }
}

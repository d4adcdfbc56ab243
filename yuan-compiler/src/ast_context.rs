//! Per-translation-unit arena owning canonical semantic types.
//!
//! The syntactic AST (`yuan_ast::Program`) is already an owned, acyclic tree —
//! no raw back-pointers to eliminate, so it needs no re-arena-ification (see
//! DESIGN.md). What genuinely needs arena + interning discipline is the
//! canonical *semantic* type graph Sema builds while walking that tree:
//! `Type` values here are handed out as `&'ctx TypeData<'ctx>` and are
//! pointer-equal iff structurally equal, per invariant 1.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;

use typed_arena::Arena;

/// A canonical, interned semantic type. Pointer equality is type equality.
pub type Ty<'ctx> = &'ctx TypeData<'ctx>;

#[derive(Debug)]
pub struct TypeData<'ctx> {
    pub kind: TypeKind<'ctx>,
}

#[derive(Debug)]
pub enum TypeKind<'ctx> {
    Void,
    Bool,
    Char,
    String,
    DynamicValue,
    Integer { bits: u8, signed: bool },
    Float { bits: u8 },
    Array { elem: Ty<'ctx>, n: u64 },
    Slice { elem: Ty<'ctx>, mutable: bool },
    Tuple(Vec<Ty<'ctx>>),
    VarArgs(Ty<'ctx>),
    Optional(Ty<'ctx>),
    Reference { pointee: Ty<'ctx>, mutable: bool },
    Pointer { pointee: Ty<'ctx>, mutable: bool },
    Function {
        params: Vec<Ty<'ctx>>,
        ret: Ty<'ctx>,
        can_error: bool,
        variadic: bool,
    },
    Struct(StructTypeData<'ctx>),
    Enum(EnumTypeData<'ctx>),
    Trait(TraitTypeData<'ctx>),
    Generic { name: String, bounds: Vec<String> },
    GenericInstance { base: Ty<'ctx>, args: Vec<Ty<'ctx>> },
    TypeVar(TypeVarData<'ctx>),
    Error { success: Ty<'ctx> },
    TypeAlias {
        name: String,
        aliased: RefCell<Option<Ty<'ctx>>>,
    },
    Module(ModuleTypeData<'ctx>),
    Range { elem: Ty<'ctx>, inclusive: bool },
}

#[derive(Debug, Clone)]
pub struct FieldDef<'ctx> {
    pub name: String,
    pub ty: Ty<'ctx>,
}

#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub size: u64,
    pub align: u64,
}

impl Layout {
    pub const ZERO: Layout = Layout { size: 0, align: 1 };

    fn round_up(self) -> Layout {
        let align = self.align.max(1);
        let size = (self.size + align - 1) / align * align;
        Layout { size, align }
    }
}

/// Forward-declarable nominal struct type. `fields` is `None` until
/// `populate_fields_if_empty` runs exactly once (invariant 3).
#[derive(Debug)]
pub struct StructTypeData<'ctx> {
    pub name: String,
    fields: RefCell<Option<Vec<FieldDef<'ctx>>>>,
    layout: Cell<Option<Layout>>,
}

impl<'ctx> StructTypeData<'ctx> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_populated(&self) -> bool {
        self.fields.borrow().is_some()
    }

    /// Populates the body exactly once. Returns `false` (no-op) if the body
    /// was already populated — callers must not rely on silent overwrite.
    pub fn populate_fields_if_empty(&self, fields: Vec<FieldDef<'ctx>>) -> bool {
        let mut slot = self.fields.borrow_mut();
        if slot.is_some() {
            return false;
        }
        *slot = Some(fields);
        true
    }

    pub fn fields(&self) -> Option<Vec<FieldDef<'ctx>>> {
        self.fields.borrow().clone()
    }

    pub fn field(&self, name: &str) -> Option<Ty<'ctx>> {
        self.fields
            .borrow()
            .as_ref()?
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.ty)
    }

    /// Size in bytes. Empty forward declarations report 0 — using one in a
    /// `sizeof` is a Sema-level error, not a panic.
    pub fn layout(&self) -> Layout {
        if let Some(l) = self.layout.get() {
            return l;
        }
        let fields = self.fields.borrow();
        let Some(fields) = fields.as_ref() else {
            return Layout::ZERO;
        };
        let mut offset = 0u64;
        let mut max_align = 1u64;
        for f in fields {
            let fl = layout_of(f.ty);
            max_align = max_align.max(fl.align);
            offset = (offset + fl.align - 1) / fl.align * fl.align;
            offset += fl.size;
        }
        let l = Layout {
            size: offset,
            align: max_align,
        }
        .round_up();
        self.layout.set(Some(l));
        l
    }
}

#[derive(Debug, Clone)]
pub struct VariantDef<'ctx> {
    pub name: String,
    pub payload: Option<Ty<'ctx>>,
}

#[derive(Debug)]
pub struct EnumTypeData<'ctx> {
    pub name: String,
    variants: RefCell<Option<Vec<VariantDef<'ctx>>>>,
    layout: Cell<Option<Layout>>,
}

impl<'ctx> EnumTypeData<'ctx> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_populated(&self) -> bool {
        self.variants.borrow().is_some()
    }

    pub fn populate_variants_if_empty(&self, variants: Vec<VariantDef<'ctx>>) -> bool {
        let mut slot = self.variants.borrow_mut();
        if slot.is_some() {
            return false;
        }
        *slot = Some(variants);
        true
    }

    pub fn variants(&self) -> Option<Vec<VariantDef<'ctx>>> {
        self.variants.borrow().clone()
    }

    pub fn variant_index(&self, name: &str) -> Option<usize> {
        self.variants
            .borrow()
            .as_ref()?
            .iter()
            .position(|v| v.name == name)
    }

    /// Tag byte widened to 2/4 bytes once variant count exceeds 255/65535,
    /// followed by the largest payload, aligned to
    /// `max(tag, payload)`.
    pub fn layout(&self) -> Layout {
        if let Some(l) = self.layout.get() {
            return l;
        }
        let variants = self.variants.borrow();
        let Some(variants) = variants.as_ref() else {
            return Layout::ZERO;
        };
        let tag_size: u64 = if variants.len() > 65535 {
            4
        } else if variants.len() > 255 {
            2
        } else {
            1
        };
        let mut payload = Layout { size: 0, align: 1 };
        for v in variants {
            if let Some(ty) = v.payload {
                let vl = layout_of(ty);
                payload.size = payload.size.max(vl.size);
                payload.align = payload.align.max(vl.align);
            }
        }
        let align = tag_size.max(payload.align);
        let size = tag_size + payload.size;
        let l = Layout { size, align }.round_up();
        self.layout.set(Some(l));
        l
    }
}

#[derive(Debug)]
pub struct TraitTypeData<'ctx> {
    pub name: String,
    pub required_methods: RefCell<Vec<(String, Ty<'ctx>)>>,
}

#[derive(Debug)]
pub struct ModuleTypeData<'ctx> {
    pub name: String,
    pub members: RefCell<Vec<(String, Ty<'ctx>)>>,
}

impl<'ctx> ModuleTypeData<'ctx> {
    pub fn member(&self, name: &str) -> Option<Ty<'ctx>> {
        self.members
            .borrow()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| *t)
    }
}

#[derive(Debug)]
pub struct TypeVarData<'ctx> {
    pub id: u32,
    /// Resolved at most once; survives the rest of the context's lifetime.
    pub resolution: Cell<Option<Ty<'ctx>>>,
}

fn layout_of(ty: Ty<'_>) -> Layout {
    match &ty.kind {
        TypeKind::Void => Layout { size: 0, align: 1 },
        TypeKind::Bool => Layout { size: 1, align: 1 },
        TypeKind::Char => Layout { size: 4, align: 4 },
        TypeKind::Integer { bits, .. } => {
            let size = (*bits as u64 + 7) / 8;
            Layout { size, align: size.max(1) }
        }
        TypeKind::Float { bits } => {
            let size = (*bits as u64) / 8;
            Layout { size, align: size }
        }
        TypeKind::String => Layout { size: 16, align: 8 },
        TypeKind::DynamicValue => Layout { size: 16, align: 8 },
        TypeKind::Array { elem, n } => {
            let el = layout_of(elem);
            Layout {
                size: el.size * n,
                align: el.align,
            }
        }
        TypeKind::Slice { .. } => Layout { size: 16, align: 8 },
        TypeKind::Tuple(elems) => {
            let mut offset = 0u64;
            let mut max_align = 1u64;
            for e in elems {
                let el = layout_of(e);
                max_align = max_align.max(el.align);
                offset = (offset + el.align - 1) / el.align * el.align;
                offset += el.size;
            }
            Layout { size: offset, align: max_align }.round_up()
        }
        TypeKind::VarArgs(_) => Layout { size: 16, align: 8 },
        TypeKind::Optional(inner) => {
            let il = layout_of(inner);
            let align = il.align.max(1);
            Layout {
                size: align + il.size,
                align,
            }
            .round_up()
        }
        TypeKind::Reference { .. } | TypeKind::Pointer { .. } => Layout { size: 8, align: 8 },
        TypeKind::Function { .. } => Layout { size: 8, align: 8 },
        TypeKind::Struct(s) => s.layout(),
        TypeKind::Enum(e) => e.layout(),
        TypeKind::Trait(_) => Layout { size: 16, align: 8 }, // fat pointer (vtable)
        TypeKind::Generic { .. } | TypeKind::TypeVar(_) => Layout::ZERO,
        TypeKind::GenericInstance { base, .. } => layout_of(base),
        TypeKind::Error { success } => layout_of(success),
        TypeKind::TypeAlias { aliased, .. } => aliased
            .borrow()
            .map(layout_of)
            .unwrap_or(Layout::ZERO),
        TypeKind::Module(_) => Layout::ZERO,
        TypeKind::Range { elem, .. } => {
            let el = layout_of(elem);
            Layout {
                size: el.size * 2,
                align: el.align,
            }
        }
    }
}

/// Structural fingerprint used only as a hash-map key for structural
/// (non-nominal) types. Sub-types are already interned, so their pointer
/// address is a stable, cheap component of the key.
fn fingerprint(ty: &TypeKind<'_>) -> String {
    fn p<T>(t: &T) -> usize {
        t as *const T as usize
    }
    match ty {
        TypeKind::Void => "v".into(),
        TypeKind::Bool => "b".into(),
        TypeKind::Char => "c".into(),
        TypeKind::String => "s".into(),
        TypeKind::DynamicValue => "dyn".into(),
        TypeKind::Integer { bits, signed } => format!("i{}{}", bits, signed),
        TypeKind::Float { bits } => format!("f{}", bits),
        TypeKind::Array { elem, n } => format!("a{}_{:x}", n, p(*elem)),
        TypeKind::Slice { elem, mutable } => format!("sl{}_{:x}", mutable, p(*elem)),
        TypeKind::Tuple(elems) => {
            let mut s = String::from("t");
            for e in elems {
                s.push_str(&format!("_{:x}", p(*e)));
            }
            s
        }
        TypeKind::VarArgs(elem) => format!("va_{:x}", p(*elem)),
        TypeKind::Optional(inner) => format!("o_{:x}", p(*inner)),
        TypeKind::Reference { pointee, mutable } => format!("r{}_{:x}", mutable, p(*pointee)),
        TypeKind::Pointer { pointee, mutable } => format!("p{}_{:x}", mutable, p(*pointee)),
        TypeKind::Function {
            params,
            ret,
            can_error,
            variadic,
        } => {
            let mut s = String::from("fn");
            for p_ in params {
                s.push_str(&format!("_{:x}", p(*p_)));
            }
            s.push_str(&format!("_r{:x}_e{}_v{}", p(*ret), can_error, variadic));
            s
        }
        TypeKind::GenericInstance { base, args } => {
            let mut s = format!("gi{:x}", p(*base));
            for a in args {
                s.push_str(&format!("_{:x}", p(*a)));
            }
            s
        }
        TypeKind::Error { success } => format!("err_{:x}", p(*success)),
        TypeKind::Range { elem, inclusive } => format!("rg{}_{:x}", inclusive, p(*elem)),
        // Nominal/TypeVar kinds never go through the structural cache.
        TypeKind::Struct(_)
        | TypeKind::Enum(_)
        | TypeKind::Trait(_)
        | TypeKind::Generic { .. }
        | TypeKind::TypeVar(_)
        | TypeKind::TypeAlias { .. }
        | TypeKind::Module(_) => unreachable!("nominal kinds are interned by name, not fingerprint"),
    }
}

/// Handle Sema associates with an `impl` method: the function declaration's
/// identity in the owning `ASTContext` (mangled name is computed separately).
#[derive(Debug, Clone)]
pub struct ImplMethod<'ctx> {
    pub name: String,
    pub func_type: Ty<'ctx>,
    pub takes_self_by_ref: bool,
    pub takes_self_mut: bool,
}

/// Arena owning every canonical semantic type for one translation unit / one
/// loaded module. Created on first use, destroyed with the containing
/// compiler instance.
pub struct ASTContext<'ctx> {
    arena: Arena<TypeData<'ctx>>,
    structural: RefCell<HashMap<String, Ty<'ctx>>>,
    nominal: RefCell<HashMap<String, Ty<'ctx>>>,
    typevar_counter: Cell<u32>,
    pointer_bits: Cell<u32>,
    impl_methods: RefCell<HashMap<String, Vec<ImplMethod<'ctx>>>>,
    display_impls: RefCell<HashMap<String, String>>,
    debug_impls: RefCell<HashMap<String, String>>,
}

impl<'ctx> Default for ASTContext<'ctx> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'ctx> ASTContext<'ctx> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            structural: RefCell::new(HashMap::new()),
            nominal: RefCell::new(HashMap::new()),
            typevar_counter: Cell::new(0),
            pointer_bits: Cell::new(64),
            impl_methods: RefCell::new(HashMap::new()),
            display_impls: RefCell::new(HashMap::new()),
            debug_impls: RefCell::new(HashMap::new()),
        }
    }

    /// Target pointer width; defaults to host (64), driver may override.
    pub fn pointer_bit_width(&self) -> u32 {
        self.pointer_bits.get()
    }

    pub fn set_pointer_bit_width(&self, bits: u32) {
        self.pointer_bits.set(bits);
    }

    fn alloc(&self, kind: TypeKind<'ctx>) -> Ty<'ctx> {
        self.arena.alloc(TypeData { kind })
    }

    fn intern_structural(&self, kind: TypeKind<'ctx>) -> Ty<'ctx> {
        let key = fingerprint(&kind);
        if let Some(existing) = self.structural.borrow().get(&key) {
            return existing;
        }
        let ty = self.alloc(kind);
        self.structural.borrow_mut().insert(key, ty);
        ty
    }

    fn intern_nominal(&self, key: String, make: impl FnOnce() -> TypeKind<'ctx>) -> Ty<'ctx> {
        if let Some(existing) = self.nominal.borrow().get(&key) {
            return existing;
        }
        let ty = self.alloc(make());
        self.nominal.borrow_mut().insert(key, ty);
        ty
    }

    // ---- factory methods: structural types (pointer-equal iff equal) ----

    pub fn void_type(&self) -> Ty<'ctx> {
        self.intern_structural(TypeKind::Void)
    }
    pub fn bool_type(&self) -> Ty<'ctx> {
        self.intern_structural(TypeKind::Bool)
    }
    pub fn char_type(&self) -> Ty<'ctx> {
        self.intern_structural(TypeKind::Char)
    }
    pub fn string_type(&self) -> Ty<'ctx> {
        self.intern_structural(TypeKind::String)
    }
    pub fn dynamic_value_type(&self) -> Ty<'ctx> {
        self.intern_structural(TypeKind::DynamicValue)
    }
    pub fn integer_type(&self, bits: u8, signed: bool) -> Ty<'ctx> {
        self.intern_structural(TypeKind::Integer { bits, signed })
    }
    pub fn float_type(&self, bits: u8) -> Ty<'ctx> {
        self.intern_structural(TypeKind::Float { bits })
    }
    pub fn array_type(&self, elem: Ty<'ctx>, n: u64) -> Ty<'ctx> {
        self.intern_structural(TypeKind::Array { elem, n })
    }
    pub fn slice_type(&self, elem: Ty<'ctx>, mutable: bool) -> Ty<'ctx> {
        self.intern_structural(TypeKind::Slice { elem, mutable })
    }
    pub fn tuple_type(&self, elems: Vec<Ty<'ctx>>) -> Ty<'ctx> {
        self.intern_structural(TypeKind::Tuple(elems))
    }
    pub fn varargs_type(&self, elem: Ty<'ctx>) -> Ty<'ctx> {
        self.intern_structural(TypeKind::VarArgs(elem))
    }
    pub fn optional_type(&self, inner: Ty<'ctx>) -> Ty<'ctx> {
        self.intern_structural(TypeKind::Optional(inner))
    }
    pub fn reference_type(&self, pointee: Ty<'ctx>, mutable: bool) -> Ty<'ctx> {
        self.intern_structural(TypeKind::Reference { pointee, mutable })
    }
    pub fn pointer_type(&self, pointee: Ty<'ctx>, mutable: bool) -> Ty<'ctx> {
        self.intern_structural(TypeKind::Pointer { pointee, mutable })
    }
    pub fn function_type(
        &self,
        params: Vec<Ty<'ctx>>,
        ret: Ty<'ctx>,
        can_error: bool,
        variadic: bool,
    ) -> Ty<'ctx> {
        self.intern_structural(TypeKind::Function {
            params,
            ret,
            can_error,
            variadic,
        })
    }
    pub fn generic_instance_type(&self, base: Ty<'ctx>, args: Vec<Ty<'ctx>>) -> Ty<'ctx> {
        self.intern_structural(TypeKind::GenericInstance { base, args })
    }
    pub fn error_type(&self, success: Ty<'ctx>) -> Ty<'ctx> {
        self.intern_structural(TypeKind::Error { success })
    }
    pub fn range_type(&self, elem: Ty<'ctx>, inclusive: bool) -> Ty<'ctx> {
        self.intern_structural(TypeKind::Range { elem, inclusive })
    }

    // ---- factory methods: nominal types (interned by name) ----

    /// Returns the existing struct if already forward-declared/populated,
    /// else interns a new empty one (invariant 3).
    pub fn struct_type(&self, name: &str) -> Ty<'ctx> {
        self.intern_nominal(format!("struct:{name}"), || {
            TypeKind::Struct(StructTypeData {
                name: name.to_string(),
                fields: RefCell::new(None),
                layout: Cell::new(None),
            })
        })
    }

    pub fn enum_type(&self, name: &str) -> Ty<'ctx> {
        self.intern_nominal(format!("enum:{name}"), || {
            TypeKind::Enum(EnumTypeData {
                name: name.to_string(),
                variants: RefCell::new(None),
                layout: Cell::new(None),
            })
        })
    }

    pub fn trait_type(&self, name: &str) -> Ty<'ctx> {
        self.intern_nominal(format!("trait:{name}"), || {
            TypeKind::Trait(TraitTypeData {
                name: name.to_string(),
                required_methods: RefCell::new(Vec::new()),
            })
        })
    }

    pub fn generic_type(&self, name: &str, bounds: Vec<String>) -> Ty<'ctx> {
        self.intern_nominal(format!("generic:{name}"), || TypeKind::Generic {
            name: name.to_string(),
            bounds,
        })
    }

    pub fn type_alias(&self, name: &str) -> Ty<'ctx> {
        self.intern_nominal(format!("alias:{name}"), || TypeKind::TypeAlias {
            name: name.to_string(),
            aliased: RefCell::new(None),
        })
    }

    pub fn module_type(&self, name: &str) -> Ty<'ctx> {
        self.intern_nominal(format!("module:{name}"), || {
            TypeKind::Module(ModuleTypeData {
                name: name.to_string(),
                members: RefCell::new(Vec::new()),
            })
        })
    }

    /// Fresh type variable; never interned — each call is a new unknown.
    pub fn fresh_type_var(&self) -> Ty<'ctx> {
        let id = self.typevar_counter.get();
        self.typevar_counter.set(id + 1);
        self.alloc(TypeKind::TypeVar(TypeVarData {
            id,
            resolution: Cell::new(None),
        }))
    }

    pub fn usize_type(&self) -> Ty<'ctx> {
        self.integer_type(self.pointer_bit_width() as u8, false)
    }

    // ---- impl-method / trait-impl registry ----

    fn nominal_key(ty: Ty<'ctx>) -> Option<String> {
        match &ty.kind {
            TypeKind::Struct(s) => Some(format!("struct:{}", s.name)),
            TypeKind::Enum(e) => Some(format!("enum:{}", e.name)),
            TypeKind::Integer { bits, signed } => Some(format!("i{}{}", bits, signed)),
            TypeKind::Float { bits } => Some(format!("f{}", bits)),
            TypeKind::Bool => Some("bool".into()),
            TypeKind::String => Some("string".into()),
            _ => None,
        }
    }

    pub fn register_impl_method(&self, ty: Ty<'ctx>, method: ImplMethod<'ctx>) {
        if let Some(key) = Self::nominal_key(ty) {
            self.impl_methods.borrow_mut().entry(key).or_default().push(method);
        }
    }

    pub fn lookup_impl_method(&self, ty: Ty<'ctx>, name: &str) -> Option<ImplMethod<'ctx>> {
        let key = Self::nominal_key(ty)?;
        self.impl_methods
            .borrow()
            .get(&key)?
            .iter()
            .find(|m| m.name == name)
            .cloned()
    }

    pub fn register_display_impl(&self, ty: Ty<'ctx>, mangled_func: String) {
        if let Some(key) = Self::nominal_key(ty) {
            self.display_impls.borrow_mut().insert(key, mangled_func);
        }
    }

    pub fn register_debug_impl(&self, ty: Ty<'ctx>, mangled_func: String) {
        if let Some(key) = Self::nominal_key(ty) {
            self.debug_impls.borrow_mut().insert(key, mangled_func);
        }
    }

    pub fn display_impl(&self, ty: Ty<'ctx>) -> Option<String> {
        let key = Self::nominal_key(ty)?;
        self.display_impls.borrow().get(&key).cloned()
    }

    pub fn debug_impl(&self, ty: Ty<'ctx>) -> Option<String> {
        let key = Self::nominal_key(ty)?;
        self.debug_impls.borrow().get(&key).cloned()
    }

    pub fn layout_of(&self, ty: Ty<'ctx>) -> Layout {
        layout_of(ty)
    }
}

/// `?T` and `Optional(T)` are the same type — the sugar is resolved at parse
/// time, so the semantic layer only ever constructs `TypeKind::Optional`.
pub fn is_optional(ty: Ty<'_>) -> Option<Ty<'_>> {
    match &ty.kind {
        TypeKind::Optional(inner) => Some(inner),
        _ => None,
    }
}

pub fn resolve_alias<'ctx>(ty: Ty<'ctx>) -> Ty<'ctx> {
    match &ty.kind {
        TypeKind::TypeAlias { aliased, .. } => match aliased.borrow().as_ref() {
            Some(t) => resolve_alias(t),
            None => ty,
        },
        _ => ty,
    }
}

impl<'ctx> fmt::Display for TypeData<'ctx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeKind::Void => write!(f, "void"),
            TypeKind::Bool => write!(f, "bool"),
            TypeKind::Char => write!(f, "char"),
            TypeKind::String => write!(f, "string"),
            TypeKind::DynamicValue => write!(f, "any"),
            TypeKind::Integer { bits, signed } => {
                write!(f, "{}{}", if *signed { "i" } else { "u" }, bits)
            }
            TypeKind::Float { bits } => write!(f, "f{}", bits),
            TypeKind::Array { elem, n } => write!(f, "[{}; {}]", elem, n),
            TypeKind::Slice { elem, mutable } => {
                write!(f, "&{}[{}]", if *mutable { "mut " } else { "" }, elem)
            }
            TypeKind::Tuple(elems) => {
                write!(f, "(")?;
                for (i, e) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", e)?;
                }
                write!(f, ")")
            }
            TypeKind::VarArgs(elem) => write!(f, "...{}", elem),
            TypeKind::Optional(inner) => write!(f, "?{}", inner),
            TypeKind::Reference { pointee, mutable } => {
                write!(f, "&{}{}", if *mutable { "mut " } else { "" }, pointee)
            }
            TypeKind::Pointer { pointee, mutable } => {
                write!(f, "*{}{}", if *mutable { "mut " } else { "const " }, pointee)
            }
            TypeKind::Function {
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
            TypeKind::Struct(s) => write!(f, "{}", s.name),
            TypeKind::Enum(e) => write!(f, "{}", e.name),
            TypeKind::Trait(t) => write!(f, "{}", t.name),
            TypeKind::Generic { name, .. } => write!(f, "{}", name),
            TypeKind::GenericInstance { base, args } => {
                write!(f, "{}<", base)?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", a)?;
                }
                write!(f, ">")
            }
            TypeKind::TypeVar(v) => match v.resolution.get() {
                Some(t) => write!(f, "{}", t),
                None => write!(f, "?{}", v.id),
            },
            TypeKind::Error { success } => write!(f, "{}!", success),
            TypeKind::TypeAlias { name, .. } => write!(f, "{}", name),
            TypeKind::Module(m) => write!(f, "module {}", m.name),
            TypeKind::Range { elem, inclusive } => {
                write!(f, "Range<{}>{}", elem, if *inclusive { "=" } else { "" })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_types_are_pointer_equal() {
        let ctx = ASTContext::new();
        let a = ctx.integer_type(32, true);
        let b = ctx.integer_type(32, true);
        assert!(std::ptr::eq(a, b));

        let arr_a = ctx.array_type(a, 4);
        let arr_b = ctx.array_type(b, 4);
        assert!(std::ptr::eq(arr_a, arr_b));

        let arr_c = ctx.array_type(a, 5);
        assert!(!std::ptr::eq(arr_a, arr_c));
    }

    #[test]
    fn nominal_types_share_single_instance() {
        let ctx = ASTContext::new();
        let s1 = ctx.struct_type("Point");
        let s2 = ctx.struct_type("Point");
        assert!(std::ptr::eq(s1, s2));
    }

    #[test]
    fn struct_populates_exactly_once() {
        let ctx = ASTContext::new();
        let s = ctx.struct_type("Point");
        let TypeKind::Struct(data) = &s.kind else {
            unreachable!()
        };
        let i32_ty = ctx.integer_type(32, true);
        assert!(data.populate_fields_if_empty(vec![
            FieldDef { name: "x".into(), ty: i32_ty },
            FieldDef { name: "y".into(), ty: i32_ty },
        ]));
        assert!(!data.populate_fields_if_empty(vec![]));
        assert_eq!(data.layout().size, 8);
        assert_eq!(data.layout().align, 4);
    }

    #[test]
    fn empty_forward_decl_has_zero_size() {
        let ctx = ASTContext::new();
        let s = ctx.struct_type("Incomplete");
        assert_eq!(layout_of(s).size, 0);
    }

    #[test]
    fn enum_tag_widens_with_variant_count() {
        let ctx = ASTContext::new();
        let e = ctx.enum_type("Big");
        let TypeKind::Enum(data) = &e.kind else {
            unreachable!()
        };
        let variants = (0..300)
            .map(|i| VariantDef {
                name: format!("V{i}"),
                payload: None,
            })
            .collect();
        data.populate_variants_if_empty(variants);
        assert_eq!(data.layout().size, 2);
    }
}

//! The CodeGen contract: what Sema/ModuleManager require of a
//! code generator, independent of which backend implements it.
//!
//! This module defines the contract only. [`crate::codegen_ast`] (the
//! inkwell/LLVM backend, unchanged from before this rework) is the concrete
//! implementation in this workspace; [`crate::builtins::CodeGenKind`] is the
//! dispatch tag a CodeGen uses to route `@name(...)` builtin calls to the
//! right lowering strategy.

use crate::ast_context::Ty;
use crate::builtins::Builtin;

/// A function or method body CodeGen can lower, already fully type-checked
/// by Sema. `body` stays an opaque handle (the syntactic `yuan_ast::Block`)
/// because CodeGen re-walks it with the canonical types Sema computed rather
/// than re-deriving them.
pub struct LowerableFunction<'ctx, 'ast> {
    pub mangled_name: String,
    pub func_type: Ty<'ctx>,
    pub body: &'ast yuan_ast::Block,
}

/// Implemented by a concrete backend (LLVM, SPIR-V, ...). Mirrors the three
/// kept CodeGen responsibilities from: lower a function body, resolve
/// a builtin call, and materialize a struct/enum layout for its ABI.
pub trait CodeGen<'ctx> {
    type Value;
    type Error;

    fn lower_function(&mut self, func: &LowerableFunction<'ctx, '_>) -> Result<Self::Value, Self::Error>;

    /// `args` are already-lowered CodeGen values, one per analyzed argument;
    /// `result_ty` is what `Builtin::analyze` already decided the call
    /// produces, so CodeGen never re-derives it.
    fn lower_builtin_call(
        &mut self,
        builtin: &Builtin,
        args: &[Self::Value],
        result_ty: Ty<'ctx>,
    ) -> Result<Self::Value, Self::Error>;

    fn declare_struct_layout(&mut self, ty: Ty<'ctx>) -> Result<(), Self::Error>;
}

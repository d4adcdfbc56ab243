//! Process-wide, read-only-after-init registry of `@name(...)` builtins.
//! Each entry pairs a Sema-side `analyze` contract (what type the
//! call produces, given its already-analyzed argument types) with a
//! `CodeGenKind` tag the CodeGen collaborator (`codegen_ast`, via
//! [`crate::codegen_interface`]) dispatches on to actually lower the call.

use std::sync::OnceLock;

use crate::ast_context::{ASTContext, Ty};

/// What family of lowering a builtin needs from CodeGen. Kept as a flat tag
/// rather than a trait object so the registry stays `Sync` and allocation-free.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeGenKind {
    Compile,       // @sizeof, @alignof, @typeof — resolved entirely at compile time
    SourceInfo,    // @file, @line, @column, @func
    Intrinsic,     // @panic, @assert, @print, @format
    Memory,        // @alloc, @realloc, @free, @memcpy, @memmove, @memset
    StrSlice,      // @str_from_parts, @slice
    Async,         // @async, @promise, @await_all, @select
    Ffi,           // @ffi_call, @ffi_bind
    Os,            // @os_exec, @os_env, @os_exit
    ModuleAlias,   // @import — handled specially in Sema before reaching here
}

pub type AnalyzeFn = for<'ctx> fn(&'ctx ASTContext<'ctx>, &[Ty<'ctx>]) -> Ty<'ctx>;

pub struct Builtin {
    pub name: &'static str,
    pub kind: CodeGenKind,
    /// `None` means variadic (e.g. `@print`, `@format`).
    pub arg_count: Option<usize>,
    pub analyze: AnalyzeFn,
}

pub struct BuiltinRegistry {
    entries: Vec<Builtin>,
}

impl BuiltinRegistry {
    pub fn get(&self, name: &str) -> Option<&Builtin> {
        self.entries.iter().find(|b| b.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Builtin> {
        self.entries.iter()
    }

    /// The single process-wide instance; building it twice would be a waste,
    /// not a correctness problem, so `OnceLock` is an optimization, not a
    /// safety requirement here.
    pub fn global() -> &'static BuiltinRegistry {
        static REGISTRY: OnceLock<BuiltinRegistry> = OnceLock::new();
        REGISTRY.get_or_init(BuiltinRegistry::build)
    }

    fn build() -> Self {
        fn usize_of<'ctx>(ctx: &'ctx ASTContext<'ctx>, _args: &[Ty<'ctx>]) -> Ty<'ctx> {
            ctx.usize_type()
        }
        fn void_of<'ctx>(ctx: &'ctx ASTContext<'ctx>, _args: &[Ty<'ctx>]) -> Ty<'ctx> {
            ctx.void_type()
        }
        fn string_of<'ctx>(ctx: &'ctx ASTContext<'ctx>, _args: &[Ty<'ctx>]) -> Ty<'ctx> {
            ctx.string_type()
        }
        fn bool_of<'ctx>(ctx: &'ctx ASTContext<'ctx>, _args: &[Ty<'ctx>]) -> Ty<'ctx> {
            ctx.bool_type()
        }
        fn never_returns<'ctx>(ctx: &'ctx ASTContext<'ctx>, _args: &[Ty<'ctx>]) -> Ty<'ctx> {
            ctx.void_type()
        }
        fn first_arg_or_any<'ctx>(ctx: &'ctx ASTContext<'ctx>, args: &[Ty<'ctx>]) -> Ty<'ctx> {
            args.first().copied().unwrap_or_else(|| ctx.dynamic_value_type())
        }
        fn raw_pointer<'ctx>(ctx: &'ctx ASTContext<'ctx>, _args: &[Ty<'ctx>]) -> Ty<'ctx> {
            ctx.pointer_type(ctx.void_type(), true)
        }
        fn slice_from_args<'ctx>(ctx: &'ctx ASTContext<'ctx>, args: &[Ty<'ctx>]) -> Ty<'ctx> {
            let elem = args.first().copied().unwrap_or_else(|| ctx.dynamic_value_type());
            ctx.slice_type(elem, true)
        }
        fn promise_of<'ctx>(ctx: &'ctx ASTContext<'ctx>, args: &[Ty<'ctx>]) -> Ty<'ctx> {
            let inner = args.first().copied().unwrap_or_else(|| ctx.void_type());
            ctx.generic_instance_type(ctx.struct_type("Promise"), vec![inner])
        }

        let entries = vec![
            Builtin { name: "sizeof", kind: CodeGenKind::Compile, arg_count: Some(1), analyze: usize_of },
            Builtin { name: "alignof", kind: CodeGenKind::Compile, arg_count: Some(1), analyze: usize_of },
            Builtin { name: "typeof", kind: CodeGenKind::Compile, arg_count: Some(1), analyze: |_, args| args.first().copied().unwrap() },
            Builtin { name: "panic", kind: CodeGenKind::Intrinsic, arg_count: Some(1), analyze: never_returns },
            Builtin { name: "assert", kind: CodeGenKind::Intrinsic, arg_count: None, analyze: void_of },
            Builtin { name: "file", kind: CodeGenKind::SourceInfo, arg_count: Some(0), analyze: string_of },
            Builtin { name: "line", kind: CodeGenKind::SourceInfo, arg_count: Some(0), analyze: usize_of },
            Builtin { name: "column", kind: CodeGenKind::SourceInfo, arg_count: Some(0), analyze: usize_of },
            Builtin { name: "func", kind: CodeGenKind::SourceInfo, arg_count: Some(0), analyze: string_of },
            Builtin { name: "print", kind: CodeGenKind::Intrinsic, arg_count: None, analyze: void_of },
            Builtin { name: "format", kind: CodeGenKind::Intrinsic, arg_count: None, analyze: string_of },
            Builtin { name: "alloc", kind: CodeGenKind::Memory, arg_count: Some(1), analyze: raw_pointer },
            Builtin { name: "realloc", kind: CodeGenKind::Memory, arg_count: Some(2), analyze: raw_pointer },
            Builtin { name: "free", kind: CodeGenKind::Memory, arg_count: Some(1), analyze: void_of },
            Builtin { name: "memcpy", kind: CodeGenKind::Memory, arg_count: Some(3), analyze: void_of },
            Builtin { name: "memmove", kind: CodeGenKind::Memory, arg_count: Some(3), analyze: void_of },
            Builtin { name: "memset", kind: CodeGenKind::Memory, arg_count: Some(3), analyze: void_of },
            Builtin { name: "str_from_parts", kind: CodeGenKind::StrSlice, arg_count: Some(2), analyze: string_of },
            Builtin { name: "slice", kind: CodeGenKind::StrSlice, arg_count: Some(3), analyze: slice_from_args },
            Builtin { name: "async", kind: CodeGenKind::Async, arg_count: Some(1), analyze: promise_of },
            Builtin { name: "promise", kind: CodeGenKind::Async, arg_count: Some(1), analyze: promise_of },
            Builtin { name: "await_all", kind: CodeGenKind::Async, arg_count: None, analyze: first_arg_or_any },
            Builtin { name: "select", kind: CodeGenKind::Async, arg_count: None, analyze: first_arg_or_any },
            Builtin { name: "ffi_call", kind: CodeGenKind::Ffi, arg_count: None, analyze: first_arg_or_any },
            Builtin { name: "ffi_bind", kind: CodeGenKind::Ffi, arg_count: Some(2), analyze: void_of },
            Builtin { name: "os_exec", kind: CodeGenKind::Os, arg_count: None, analyze: usize_of },
            Builtin { name: "os_env", kind: CodeGenKind::Os, arg_count: Some(1), analyze: string_of },
            Builtin { name: "os_exit", kind: CodeGenKind::Os, arg_count: Some(1), analyze: never_returns },
            Builtin { name: "import", kind: CodeGenKind::ModuleAlias, arg_count: Some(1), analyze: bool_of },
        ];
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_is_idempotent_across_lookups() {
        let a = BuiltinRegistry::global() as *const _;
        let b = BuiltinRegistry::global() as *const _;
        assert_eq!(a, b);
    }

    #[test]
    fn sizeof_and_alignof_return_usize() {
        let ctx = ASTContext::new();
        let reg = BuiltinRegistry::global();
        let i32_ty = ctx.integer_type(32, true);
        let sizeof = reg.get("sizeof").unwrap();
        let result = (sizeof.analyze)(&ctx, &[i32_ty]);
        assert_eq!(result.to_string(), ctx.usize_type().to_string());
    }

    #[test]
    fn unknown_builtin_is_absent() {
        assert!(BuiltinRegistry::global().get("not_a_builtin").is_none());
    }

    #[test]
    fn every_builtin_has_a_stable_name() {
        let reg = BuiltinRegistry::global();
        let names: Vec<&str> = reg.iter().map(|b| b.name).collect();
        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(names.len(), sorted.len(), "builtin names must be unique");
    }
}

pub mod ast_context; // Canonical, interned semantic type system + arena
pub mod builtin_contracts; // Builtin contract implementations for primitives (codegen-layer)
pub mod builtins; // Sema-level `@name(...)` builtin registry
pub mod codegen_ast; // Modular LLVM codegen
pub mod codegen_interface; // CodeGen contract, implemented by codegen_ast
pub mod linter; // Static analysis and code quality warnings
pub mod mangle; // Symbol mangling/demangling
pub mod module_manager; // Import resolution, cycle detection, .ymi cache
pub mod module_resolver; // legacy primitive resolver, superseded by module_manager
pub mod prelude; // Embedded Layer 1 prelude (Yuan code in compiler binary)
pub mod prelude_loader; // Prelude parser and injection
pub mod project_config; // yuan-project.json discovery/merge
pub mod resolver; // Platform detection & stdlib resolution
pub mod sema; // Declaration/statement/expression semantic analysis
pub mod symbol_table; // Lexical scope stack
pub mod trait_bounds_checker; // Trait bounds verification
pub mod type_checker; // Compatibility, coercion, generic unification
pub mod type_codec; // .ymi type serialization grammar
pub mod types; // legacy type interning, superseded by ast_context
pub mod utils; // Utility modules (safe arithmetic, etc.)

// Re-export diagnostics from yuan-diagnostics crate
pub use yuan_diagnostics as diagnostics;

pub use ast_context::{ASTContext, Ty, TypeKind};
pub use builtins::BuiltinRegistry;
pub use codegen_ast::ASTCodeGen;
pub use diagnostics::{error_codes, Diagnostic, DiagnosticEngine, ErrorLevel, Span};
pub use linter::{LintRule, Linter, UnusedVariableRule};
pub use mangle::{demangle, mangle, DemangledSymbol, Discriminator, MangleInput, SymbolKindTag};
pub use module_manager::{ModuleExport, ModuleInfo, ModuleLoadError, ModuleManager, ModuleManagerConfig};
pub use module_resolver::ModuleResolver;
pub use prelude_loader::{inject_prelude_into_program, load_embedded_prelude, PreludeLoadError};
pub use project_config::ProjectConfig;
pub use resolver::{Arch, Platform, ResolveError, StdlibResolver, Target};
pub use sema::Sema;
pub use symbol_table::SymbolTable;
pub use trait_bounds_checker::TraitBoundsChecker;
pub use type_checker::compatible;
pub use type_codec::{decode, encode_type};
pub use utils::llvm_safety::{
    emit_bounds_check, emit_null_check, is_pointer_provably_nonnull,
    validate_stack_allocation_size, MAX_STACK_ALLOC_SIZE,
};
pub use utils::safe_arithmetic::{
    safe_array_size, safe_field_index, safe_param_index, CheckedArithmetic, SafeCast,
};

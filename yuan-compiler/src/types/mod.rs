// Legacy type interning, superseded by ast_context::ASTContext.
// Kept for codegen_ast's standalone TypeInterner cache.

pub mod interner;

// Pattern binding support (placeholder - delegates to pattern_matching module)

use crate::codegen_ast::ASTCodeGen;

impl<'ctx> ASTCodeGen<'ctx> {
    // Pattern binding is handled by the pattern_matching module
    // This file exists for module organization consistency
}

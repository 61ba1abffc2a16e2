//! Validation of standalone options and failover record declarations.
//!
//! Covers configuration records built outside a client construction call
//! and passed along later:
//!
//! ```text
//! mysql:Options options = {connectTimeout: -1};
//! ```

use mysqlint_parser::NodeKind;

use crate::error::AnalyzeError;
use crate::ident::{FAILOVER_RECORD, OPTIONS_RECORD, is_client_record};
use crate::pipeline::AnalysisContext;
use crate::validators::{validate_failover_config, validate_options_config};

/// Analyze one variable declaration node.
pub fn analyze(ctx: &mut AnalysisContext<'_>) -> Result<(), AnalyzeError> {
    if ctx.has_compilation_errors() {
        return Ok(());
    }
    let tree = ctx.tree;
    let Some(NodeKind::VariableDecl {
        type_desc,
        initializer,
        ..
    }) = tree.kind(ctx.node)
    else {
        return Ok(());
    };
    let initializer = *initializer;
    if !matches!(tree.kind(initializer), Some(NodeKind::MappingConstructor { .. })) {
        return Ok(());
    }
    let resolved = ctx.model.resolve_type_desc(tree, *type_desc);
    if is_client_record(&resolved, FAILOVER_RECORD) {
        validate_failover_config(ctx, initializer)?;
    } else if is_client_record(&resolved, OPTIONS_RECORD) {
        validate_options_config(ctx, initializer)?;
    }
    Ok(())
}

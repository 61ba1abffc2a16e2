//! Advisory hints for client query calls with an uninferable result type.
//!
//! The hint augments a host diagnostic rather than replacing it: it is
//! only emitted when the compilation already carries a "cannot infer type"
//! error on the exact same line range as the remote call. Known limitation:
//! the correlation is by line range, so multiple statements on one line can
//! confuse it.

use mysqlint_binder::CANNOT_INFER_TYPE;
use mysqlint_parser::NodeKind;

use crate::diagnostics::DiagnosticCode;
use crate::ident::{QUERY_METHOD, QUERY_ROW_METHOD, is_client_type};
use crate::pipeline::AnalysisContext;

/// Analyze one remote method call node.
pub fn analyze(ctx: &mut AnalysisContext<'_>) {
    let tree = ctx.tree;
    let Some(NodeKind::RemoteCall { target, method, .. }) = tree.kind(ctx.node) else {
        return;
    };
    let target = *target;
    let method = method.clone();
    let call_range = tree.line_range(ctx.node);
    let correlated = ctx
        .model
        .diagnostics()
        .iter()
        .filter(|diagnostic| diagnostic.is_error() && diagnostic.code == CANNOT_INFER_TYPE)
        .filter(|diagnostic| tree.line_map().line_range(diagnostic.span) == call_range)
        .count();
    if correlated == 0 {
        return;
    }
    if !is_client_type(tree, ctx.model, target) {
        return;
    }
    let code = match method.as_str() {
        QUERY_METHOD => DiagnosticCode::Mysql901,
        QUERY_ROW_METHOD => DiagnosticCode::Mysql902,
        _ => return,
    };
    for _ in 0..correlated {
        ctx.report(code, tree.span(ctx.node));
    }
}

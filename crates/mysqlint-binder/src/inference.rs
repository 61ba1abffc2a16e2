//! Result-type inference check.
//!
//! When the result of a remote call is discarded through a wildcard binding,
//! a dependently-typed result parameter cannot be inferred from the context.
//! The compiler reports this as an error; hint analyzers downstream correlate
//! against it by line range.

use mysqlint_common::Diagnostic;
use mysqlint_parser::{NodeId, NodeKind, SyntaxTree};

/// Diagnostic code for an uninferable result type.
pub const CANNOT_INFER_TYPE: &str = "BCE2055";

const MESSAGE: &str = "cannot infer the 'typedesc' argument for the result parameter";

pub(crate) fn check_module(tree: &SyntaxTree, diagnostics: &mut Vec<Diagnostic>) {
    for id in tree.preorder() {
        let Some(NodeKind::WildcardAssign { value }) = tree.kind(id) else {
            continue;
        };
        let call = unwrap_check(tree, *value);
        let Some(NodeKind::RemoteCall { args, .. }) = tree.kind(call) else {
            continue;
        };
        if has_explicit_result_type(tree, args) {
            continue;
        }
        diagnostics.push(Diagnostic::error(
            CANNOT_INFER_TYPE,
            MESSAGE,
            tree.span(call),
        ));
    }
}

fn unwrap_check(tree: &SyntaxTree, id: NodeId) -> NodeId {
    match tree.kind(id) {
        Some(NodeKind::CheckExpr { inner }) => *inner,
        _ => id,
    }
}

/// A second positional argument or any named argument pins the result type.
fn has_explicit_result_type(tree: &SyntaxTree, args: &[NodeId]) -> bool {
    let mut positional = 0usize;
    for &arg in args {
        match tree.kind(arg) {
            Some(NodeKind::NamedArg { .. }) => return true,
            Some(NodeKind::PositionalArg { .. }) => positional += 1,
            _ => {}
        }
    }
    positional >= 2
}

//! Validation of configuration arguments at client construction sites.
//!
//! Locates the options and connection-pool arguments of a client
//! construction call, preferring named arguments and falling back to the
//! positional convention of the client constructor: with exactly seven
//! positional arguments, indices 5 and 6 hold options and pool; with
//! exactly six, index 5 holds options; any other arity is not validated.

use mysqlint_parser::{NodeId, NodeKind};

use crate::error::AnalyzeError;
use crate::ident::is_client_type;
use crate::pipeline::AnalysisContext;
use crate::validators::{validate_connection_pool, validate_options_config};

pub const OPTIONS_PARAM_NAME: &str = "options";
pub const CONNECTION_POOL_PARAM_NAME: &str = "connectionPool";

const OPTIONS_POSITION: usize = 5;
const CONNECTION_POOL_POSITION: usize = 6;

/// Analyze one construction node.
pub fn analyze(ctx: &mut AnalysisContext<'_>) -> Result<(), AnalyzeError> {
    if ctx.has_compilation_errors() {
        return Ok(());
    }
    if !is_client_type(ctx.tree, ctx.model, ctx.node) {
        return Ok(());
    }
    let tree = ctx.tree;
    let Some(args) = tree.constructor_args(ctx.node) else {
        return Ok(());
    };

    let named: Vec<(&str, NodeId)> = args
        .iter()
        .filter_map(|&arg| match tree.kind(arg) {
            Some(NodeKind::NamedArg { name, expr }) => Some((name.as_str(), *expr)),
            _ => None,
        })
        .collect();

    let mut options = NodeId::NONE;
    let mut connection_pool = NodeId::NONE;
    if !named.is_empty() {
        for (name, expr) in named {
            if name == OPTIONS_PARAM_NAME {
                options = expr;
            }
            if name == CONNECTION_POOL_PARAM_NAME {
                connection_pool = expr;
            }
        }
    } else if args.len() == CONNECTION_POOL_POSITION + 1 {
        options = positional_expr(ctx, args[OPTIONS_POSITION]);
        connection_pool = positional_expr(ctx, args[CONNECTION_POOL_POSITION]);
    } else if args.len() == OPTIONS_POSITION + 1 {
        options = positional_expr(ctx, args[OPTIONS_POSITION]);
    } else {
        return Ok(());
    }

    if matches!(tree.kind(options), Some(NodeKind::MappingConstructor { .. })) {
        validate_options_config(ctx, options)?;
    }
    if matches!(
        tree.kind(connection_pool),
        Some(NodeKind::MappingConstructor { .. })
    ) {
        validate_connection_pool(ctx, connection_pool)?;
    }
    Ok(())
}

fn positional_expr(ctx: &AnalysisContext<'_>, arg: NodeId) -> NodeId {
    match ctx.tree.kind(arg) {
        Some(NodeKind::PositionalArg { expr }) => *expr,
        _ => NodeId::NONE,
    }
}

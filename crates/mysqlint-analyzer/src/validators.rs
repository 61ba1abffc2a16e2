//! Field validators for connection-pool, options, and failover records.
//!
//! The same rules apply whether a field is written explicitly or arrives
//! through a spread entry. Only statically-known values are validated: a
//! literal, a directly-negated literal, or (for spread fields) the record
//! type's declared default. Everything else falls back to the field's own
//! minimum valid boundary and therefore never produces a finding.

use rustc_hash::FxHashMap;

use mysqlint_parser::{NodeId, NodeKind, SyntaxTree};

use crate::diagnostics::DiagnosticCode;
use crate::error::AnalyzeError;
use crate::pipeline::AnalysisContext;
use crate::spread::{access_segments, resolve_spread_fields};

// Connection pool fields
pub const MAX_OPEN_CONNECTIONS: &str = "maxOpenConnections";
pub const MAX_CONNECTION_LIFE_TIME: &str = "maxConnectionLifeTime";
pub const MIN_IDLE_CONNECTIONS: &str = "minIdleConnections";

// Options fields
pub const CONNECT_TIMEOUT: &str = "connectTimeout";
pub const SOCKET_TIMEOUT: &str = "socketTimeout";
pub const FAILOVER_CONFIG: &str = "failoverConfig";

// Failover fields
pub const TIME_BEFORE_RETRY: &str = "timeBeforeRetry";
pub const QUERIES_BEFORE_RETRY: &str = "queriesBeforeRetry";

/// One field of a mapping constructor after spread expansion.
#[derive(Clone, Debug)]
pub(crate) struct FieldEntry {
    pub name: String,
    pub value: NodeId,
    #[allow(dead_code)]
    pub from_spread: bool,
}

/// Flatten a mapping constructor into named field entries. Explicit fields
/// map directly; spread fields expand to the resolved record type's fields,
/// taking the value from the spread source's own initializer when it sets
/// the field explicitly, and from the declared default otherwise. Fields
/// with no statically-known value are dropped.
pub(crate) fn flatten_mapping(ctx: &AnalysisContext<'_>, mapping: NodeId) -> Vec<FieldEntry> {
    let tree = ctx.tree;
    let mut entries = Vec::new();
    let Some(fields) = tree.mapping_fields(mapping) else {
        return entries;
    };
    for &field in fields {
        match tree.kind(field) {
            Some(NodeKind::SpecificField { name, value }) => entries.push(FieldEntry {
                name: name.clone(),
                value: *value,
                from_spread: false,
            }),
            Some(NodeKind::SpreadField { value }) => {
                let record_fields = resolve_spread_fields(tree, ctx.model, *value);
                let overlay = spread_overlay(ctx, *value);
                for &record_field in &record_fields {
                    let Some(NodeKind::RecordField {
                        name,
                        default_value,
                        ..
                    }) = tree.kind(record_field)
                    else {
                        continue;
                    };
                    let value = overlay
                        .get(name.as_str())
                        .copied()
                        .unwrap_or(*default_value);
                    if value.is_some() {
                        entries.push(FieldEntry {
                            name: name.clone(),
                            value,
                            from_spread: true,
                        });
                    }
                }
            }
            _ => {}
        }
    }
    entries
}

/// Field values set explicitly in the spread source variable's mapping
/// initializer. Only single-segment spread targets are tracked; deeper
/// chains would need data-flow analysis.
fn spread_overlay<'t>(ctx: &AnalysisContext<'t>, spread_value: NodeId) -> FxHashMap<&'t str, NodeId> {
    let tree = ctx.tree;
    let mut overlay = FxHashMap::default();
    let segments = access_segments(tree, spread_value);
    let [name] = segments.as_slice() else {
        return overlay;
    };
    let Some(symbol) = ctx
        .model
        .find_symbol(name, mysqlint_binder::SymbolKind::Variable)
    else {
        return overlay;
    };
    let Some(NodeKind::VariableDecl { initializer, .. }) = tree.kind(symbol.decl) else {
        return overlay;
    };
    let Some(fields) = tree.mapping_fields(*initializer) else {
        return overlay;
    };
    for &field in fields {
        if let Some(NodeKind::SpecificField { name, value }) = tree.kind(field) {
            overlay.insert(name.as_str(), *value);
        }
    }
    overlay
}

// =============================================================================
// Record validation
// =============================================================================

/// Validate a connection-pool mapping constructor.
pub(crate) fn validate_connection_pool(
    ctx: &mut AnalysisContext<'_>,
    mapping: NodeId,
) -> Result<(), AnalyzeError> {
    for entry in flatten_mapping(ctx, mapping) {
        validate_pool_field(ctx, &entry.name, entry.value)?;
    }
    Ok(())
}

/// Validate an options mapping constructor, descending into a failover
/// sub-record when one is written inline.
pub(crate) fn validate_options_config(
    ctx: &mut AnalysisContext<'_>,
    mapping: NodeId,
) -> Result<(), AnalyzeError> {
    for entry in flatten_mapping(ctx, mapping) {
        validate_options_field(ctx, &entry.name, entry.value)?;
    }
    Ok(())
}

/// Validate a failover-configuration mapping constructor.
pub(crate) fn validate_failover_config(
    ctx: &mut AnalysisContext<'_>,
    mapping: NodeId,
) -> Result<(), AnalyzeError> {
    for entry in flatten_mapping(ctx, mapping) {
        validate_failover_field(ctx, &entry.name, entry.value)?;
    }
    Ok(())
}

fn validate_pool_field(
    ctx: &mut AnalysisContext<'_>,
    name: &str,
    value: NodeId,
) -> Result<(), AnalyzeError> {
    match name {
        MAX_OPEN_CONNECTIONS => {
            let max_open = parse_int(&terminal_value(ctx.tree, value, "1"))?;
            if max_open < 1 {
                ctx.report(DiagnosticCode::Sql101, ctx.tree.span(value));
            }
        }
        MIN_IDLE_CONNECTIONS => {
            let min_idle = parse_int(&terminal_value(ctx.tree, value, "0"))?;
            if min_idle < 0 {
                ctx.report(DiagnosticCode::Sql102, ctx.tree.span(value));
            }
        }
        MAX_CONNECTION_LIFE_TIME => {
            let life_time = parse_number(&terminal_value(ctx.tree, value, "30"))?;
            if life_time < 30.0 {
                ctx.report(DiagnosticCode::Sql103, ctx.tree.span(value));
            }
        }
        _ => {}
    }
    Ok(())
}

fn validate_options_field(
    ctx: &mut AnalysisContext<'_>,
    name: &str,
    value: NodeId,
) -> Result<(), AnalyzeError> {
    match name {
        CONNECT_TIMEOUT | SOCKET_TIMEOUT => {
            let timeout = parse_number(&terminal_value(ctx.tree, value, "0"))?;
            if timeout < 0.0 {
                ctx.report(DiagnosticCode::Mysql101, ctx.tree.span(value));
            }
        }
        FAILOVER_CONFIG => {
            if matches!(ctx.tree.kind(value), Some(NodeKind::MappingConstructor { .. })) {
                validate_failover_config(ctx, value)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn validate_failover_field(
    ctx: &mut AnalysisContext<'_>,
    name: &str,
    value: NodeId,
) -> Result<(), AnalyzeError> {
    if name == TIME_BEFORE_RETRY || name == QUERIES_BEFORE_RETRY {
        let retry = parse_int(&terminal_value(ctx.tree, value, "0"))?;
        if retry < 0 {
            ctx.report(DiagnosticCode::Mysql101, ctx.tree.span(value));
        }
    }
    Ok(())
}

// =============================================================================
// Terminal values
// =============================================================================

/// Extract the statically-known text of a value expression: a literal's
/// text, or operator + literal text for a unary expression over a literal.
/// Values originating from variables cannot be processed without data-flow
/// analysis; they yield the caller-supplied default.
pub(crate) fn terminal_value(tree: &SyntaxTree, value: NodeId, default: &str) -> String {
    match tree.kind(value) {
        Some(NodeKind::BasicLiteral { text, .. }) => clean_literal_text(text),
        Some(NodeKind::UnaryExpr { op, operand }) => match tree.kind(*operand) {
            Some(NodeKind::BasicLiteral { text, .. }) => {
                format!("{}{}", op.as_str(), clean_literal_text(text))
            }
            _ => default.to_string(),
        },
        _ => default.to_string(),
    }
}

fn clean_literal_text(text: &str) -> String {
    text.chars().filter(|&c| c != '"' && c != '\n').collect()
}

fn parse_int(text: &str) -> Result<i64, AnalyzeError> {
    text.parse::<i64>().map_err(|source| AnalyzeError::InvalidInt {
        text: text.to_string(),
        source,
    })
}

fn parse_number(text: &str) -> Result<f64, AnalyzeError> {
    text.parse::<f64>()
        .map_err(|source| AnalyzeError::InvalidNumber {
            text: text.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mysqlint_common::Span;
    use mysqlint_parser::{LiteralKind, UnaryOp};

    fn literal_tree(kind: LiteralKind, text: &str) -> (SyntaxTree, NodeId) {
        let mut tree = SyntaxTree::new("test.bal", text);
        let id = tree.add_node(
            NodeKind::BasicLiteral {
                literal: kind,
                text: text.to_string(),
            },
            Span::new(0, text.len() as u32),
        );
        (tree, id)
    }

    #[test]
    fn terminal_value_of_literal() {
        let (tree, id) = literal_tree(LiteralKind::Int, "42");
        assert_eq!(terminal_value(&tree, id, "0"), "42");
    }

    #[test]
    fn terminal_value_of_negated_literal() {
        let mut tree = SyntaxTree::new("test.bal", "-7");
        let operand = tree.add_node(
            NodeKind::BasicLiteral {
                literal: LiteralKind::Int,
                text: "7".to_string(),
            },
            Span::new(1, 2),
        );
        let unary = tree.add_node(
            NodeKind::UnaryExpr {
                op: UnaryOp::Minus,
                operand,
            },
            Span::new(0, 2),
        );
        assert_eq!(terminal_value(&tree, unary, "0"), "-7");
    }

    #[test]
    fn terminal_value_of_symbolic_expression_is_default() {
        let mut tree = SyntaxTree::new("test.bal", "x");
        let name = tree.add_node(
            NodeKind::SimpleNameRef {
                name: "x".to_string(),
            },
            Span::new(0, 1),
        );
        assert_eq!(terminal_value(&tree, name, "30"), "30");
    }

    #[test]
    fn string_literal_text_is_unquoted() {
        let (tree, id) = literal_tree(LiteralKind::Str, "\"12\"");
        assert_eq!(terminal_value(&tree, id, "0"), "12");
    }
}

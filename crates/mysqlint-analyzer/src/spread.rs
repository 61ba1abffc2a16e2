//! Spread-field resolution.
//!
//! A spread entry in a mapping constructor (`{...p}` or `{...cfg.pool}`)
//! introduces the fields of an already-typed value. Resolution walks from
//! the spread target back to its declared record type:
//!
//! 1. decompose the target into access segments (`a.b.c` -> `[a, b, c]`),
//! 2. find the variable symbol named by the first segment and read the
//!    type-reference name off its declaration,
//! 3. find the record type definition with that name,
//! 4. follow each remaining segment through the record's fields, switching
//!    to the field's record type when its declared type names one,
//! 5. return the final record type's field declarations.
//!
//! Any failed step yields an empty field list; an unresolved spread is a
//! safe no-op, never an error. Same-named symbols resolve to the first
//! declaration in module order.

use smallvec::SmallVec;

use mysqlint_binder::{SemanticModel, SymbolKind};
use mysqlint_parser::{NodeId, NodeKind, SyntaxTree};

/// Resolve the record fields a spread entry expands to. Returns the
/// `RecordField` nodes of the resolved record type, in declaration order,
/// or an empty list when the target cannot be resolved to a record type.
#[must_use]
pub fn resolve_spread_fields(
    tree: &SyntaxTree,
    model: &SemanticModel,
    spread_value: NodeId,
) -> SmallVec<[NodeId; 8]> {
    let segments = access_segments(tree, spread_value);
    let Some(first) = segments.first() else {
        return SmallVec::new();
    };
    let Some(type_name) = declared_type_name(tree, model, first) else {
        return SmallVec::new();
    };
    let Some(mut record) = record_descriptor_named(tree, model, &type_name) else {
        return SmallVec::new();
    };
    for segment in &segments[1..] {
        if let Some(next) = field_record_type(tree, model, record, segment) {
            record = next;
        }
    }
    match tree.kind(record) {
        Some(NodeKind::RecordTypeDesc { fields }) => fields.clone(),
        _ => SmallVec::new(),
    }
}

/// Decompose a spread target into base-first access segments. Only plain
/// name references and field-access chains qualify; anything else yields
/// no segments.
pub(crate) fn access_segments(tree: &SyntaxTree, expr: NodeId) -> SmallVec<[String; 4]> {
    let mut reversed: SmallVec<[String; 4]> = SmallVec::new();
    let mut current = expr;
    loop {
        match tree.kind(current) {
            Some(NodeKind::FieldAccess { base, field }) => {
                reversed.push(field.clone());
                current = *base;
            }
            Some(NodeKind::SimpleNameRef { name }) => {
                reversed.push(name.clone());
                reversed.reverse();
                return reversed;
            }
            _ => return SmallVec::new(),
        }
    }
}

/// The declared type-reference name of the first-segment variable. Only a
/// simple (unqualified) type name can lead to a local record definition.
fn declared_type_name(tree: &SyntaxTree, model: &SemanticModel, name: &str) -> Option<String> {
    let symbol = model.find_symbol(name, SymbolKind::Variable)?;
    let NodeKind::VariableDecl { type_desc, .. } = tree.kind(symbol.decl)? else {
        return None;
    };
    match tree.kind(*type_desc)? {
        NodeKind::SimpleNameRef { name } => Some(name.clone()),
        _ => None,
    }
}

/// Find a type definition with the given name whose descriptor is a record
/// type; returns the `RecordTypeDesc` node.
fn record_descriptor_named(
    tree: &SyntaxTree,
    model: &SemanticModel,
    name: &str,
) -> Option<NodeId> {
    let symbol = model.find_symbol(name, SymbolKind::TypeDefinition)?;
    let NodeKind::TypeDefinition { descriptor, .. } = tree.kind(symbol.decl)? else {
        return None;
    };
    match tree.kind(*descriptor)? {
        NodeKind::RecordTypeDesc { .. } => Some(*descriptor),
        _ => None,
    }
}

/// Follow one access segment: find the named field in the current record
/// type and resolve its declared type to another record definition. Fields
/// whose type is not a simple named record keep the current record type.
fn field_record_type(
    tree: &SyntaxTree,
    model: &SemanticModel,
    record: NodeId,
    segment: &str,
) -> Option<NodeId> {
    let NodeKind::RecordTypeDesc { fields } = tree.kind(record)? else {
        return None;
    };
    for &field in fields {
        let Some(NodeKind::RecordField {
            type_desc, name, ..
        }) = tree.kind(field)
        else {
            continue;
        };
        if name != segment {
            continue;
        }
        if let Some(NodeKind::SimpleNameRef { name: type_name }) = tree.kind(*type_desc) {
            return record_descriptor_named(tree, model, type_name);
        }
        return None;
    }
    None
}

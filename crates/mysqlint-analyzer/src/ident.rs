//! Nominal identification of the client type and its configuration records.

use mysqlint_binder::{ResolvedType, SemanticModel};
use mysqlint_parser::{NodeId, SyntaxTree};

/// Organization that publishes the client module.
pub const ORG_NAME: &str = "ballerinax";
/// Module the client type is declared in.
pub const MODULE_NAME: &str = "mysql";

/// Declared name of the client object type.
pub const CLIENT: &str = "Client";
/// Declared name of the options record.
pub const OPTIONS_RECORD: &str = "Options";
/// Declared name of the failover configuration record.
pub const FAILOVER_RECORD: &str = "FailoverConfig";

pub const QUERY_METHOD: &str = "query";
pub const QUERY_ROW_METHOD: &str = "queryRow";

/// Whether the expression's static type is, or through a union includes,
/// the client type. Unresolvable types are never a match.
#[must_use]
pub fn is_client_type(tree: &SyntaxTree, model: &SemanticModel, expr: NodeId) -> bool {
    match model.type_of(tree, expr) {
        Some(resolved) => type_matches(&resolved, CLIENT),
        None => false,
    }
}

/// Whether a resolved type is, or through a union includes, the named
/// record from the client module.
#[must_use]
pub fn is_client_record(resolved: &ResolvedType, record_name: &str) -> bool {
    type_matches(resolved, record_name)
}

fn type_matches(resolved: &ResolvedType, name: &str) -> bool {
    match resolved {
        ResolvedType::Union(members) => members.iter().any(|member| type_matches(member, name)),
        ResolvedType::Reference { ident, .. } => ident.matches(ORG_NAME, MODULE_NAME, name),
        ResolvedType::Unresolved => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mysqlint_binder::TypeIdent;

    #[test]
    fn union_membership_matches() {
        let union = ResolvedType::Union(vec![
            ResolvedType::Reference {
                ident: TypeIdent::qualified("ballerinax", "mysql", "Client"),
                decl: NodeId::NONE,
            },
            ResolvedType::Unresolved,
        ]);
        assert!(type_matches(&union, CLIENT));
    }

    #[test]
    fn matching_is_nominal_not_structural() {
        // Same declared name from a different module never matches.
        let foreign = ResolvedType::Reference {
            ident: TypeIdent::qualified("acme", "mysql", "Client"),
            decl: NodeId::NONE,
        };
        assert!(!type_matches(&foreign, CLIENT));

        let local = ResolvedType::Reference {
            ident: TypeIdent::local("Client"),
            decl: NodeId::NONE,
        };
        assert!(!type_matches(&local, CLIENT));
    }
}

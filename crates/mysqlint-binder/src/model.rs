//! The semantic model: symbol lookups and static-type resolution.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use mysqlint_common::Diagnostic;
use mysqlint_parser::{NodeId, NodeKind, SyntaxTree};

use crate::symbols::{Symbol, SymbolArena, SymbolId, SymbolKind};

/// Target of an import declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportedModule {
    pub org: String,
    pub module: String,
}

/// Qualified type identity: defining organization, module, and declared
/// name. Every nominal type comparison in the toolchain goes through
/// [`TypeIdent::matches`]. Locally defined types carry empty organization
/// and module components, so they never collide with imported identities.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeIdent {
    pub org: String,
    pub module: String,
    pub name: String,
}

impl TypeIdent {
    #[must_use]
    pub fn qualified(org: impl Into<String>, module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            org: org.into(),
            module: module.into(),
            name: name.into(),
        }
    }

    #[must_use]
    pub fn local(name: impl Into<String>) -> Self {
        Self {
            org: String::new(),
            module: String::new(),
            name: name.into(),
        }
    }

    /// The one nominal comparison: namespace (organization + module) and
    /// declared name, nothing structural.
    #[must_use]
    pub fn matches(&self, org: &str, module: &str, name: &str) -> bool {
        self.org == org && self.module == module && self.name == name
    }
}

/// The static type of an expression, as far as the model can resolve it.
#[derive(Clone, Debug)]
pub enum ResolvedType {
    /// A named type reference. `decl` points at the local type definition
    /// when the name resolves inside the module, and is `NodeId::NONE` for
    /// imported types.
    Reference { ident: TypeIdent, decl: NodeId },
    Union(Vec<ResolvedType>),
    Unresolved,
}

/// Read-only semantic queries over one bound module.
#[derive(Debug)]
pub struct SemanticModel {
    symbols: SymbolArena,
    module_symbols: Vec<SymbolId>,
    imports: IndexMap<String, ImportedModule>,
    node_symbols: FxHashMap<u32, SymbolId>,
    diagnostics: Vec<Diagnostic>,
}

impl SemanticModel {
    pub(crate) fn new(
        symbols: SymbolArena,
        module_symbols: Vec<SymbolId>,
        imports: IndexMap<String, ImportedModule>,
        node_symbols: FxHashMap<u32, SymbolId>,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        Self {
            symbols,
            module_symbols,
            imports,
            node_symbols,
            diagnostics,
        }
    }

    /// Compilation diagnostics produced while binding.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    #[must_use]
    pub fn imports(&self) -> &IndexMap<String, ImportedModule> {
        &self.imports
    }

    /// All symbols in declaration order.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.module_symbols
            .iter()
            .filter_map(|&id| self.symbols.get(id))
    }

    /// First symbol of the given kind with the given name, in declaration
    /// order. Duplicate names are not disambiguated further; first match
    /// wins.
    #[must_use]
    pub fn find_symbol(&self, name: &str, kind: SymbolKind) -> Option<&Symbol> {
        self.symbols()
            .find(|symbol| symbol.kind == kind && symbol.name == name)
    }

    /// Symbol declared by the given node, if any.
    #[must_use]
    pub fn symbol_of(&self, node: NodeId) -> Option<&Symbol> {
        self.node_symbols
            .get(&node.0)
            .and_then(|&id| self.symbols.get(id))
    }

    /// Static type of an expression. Returns `None` for expression shapes
    /// the model does not type.
    #[must_use]
    pub fn type_of(&self, tree: &SyntaxTree, expr: NodeId) -> Option<ResolvedType> {
        match tree.kind(expr)? {
            NodeKind::SimpleNameRef { name } => {
                let symbol = self.find_symbol(name, SymbolKind::Variable)?;
                let NodeKind::VariableDecl { type_desc, .. } = tree.kind(symbol.decl)? else {
                    return None;
                };
                Some(self.resolve_type_desc(tree, *type_desc))
            }
            NodeKind::CheckExpr { inner } => self.type_of(tree, *inner),
            NodeKind::ImplicitNew { .. } => {
                let decl = self.enclosing_variable_decl(tree, expr)?;
                let NodeKind::VariableDecl { type_desc, .. } = tree.kind(decl)? else {
                    return None;
                };
                Some(self.resolve_type_desc(tree, *type_desc))
            }
            NodeKind::ExplicitNew { type_ref, .. } => Some(self.resolve_type_desc(tree, *type_ref)),
            _ => None,
        }
    }

    /// Resolve a type-descriptor node to a [`ResolvedType`].
    #[must_use]
    pub fn resolve_type_desc(&self, tree: &SyntaxTree, desc: NodeId) -> ResolvedType {
        match tree.kind(desc) {
            Some(NodeKind::QualifiedNameRef { prefix, name }) => match self.imports.get(prefix) {
                Some(imported) => ResolvedType::Reference {
                    ident: TypeIdent::qualified(&imported.org, &imported.module, name),
                    decl: NodeId::NONE,
                },
                None => ResolvedType::Unresolved,
            },
            Some(NodeKind::SimpleNameRef { name }) => {
                match self.find_symbol(name, SymbolKind::TypeDefinition) {
                    Some(symbol) => ResolvedType::Reference {
                        ident: TypeIdent::local(name),
                        decl: symbol.decl,
                    },
                    None => ResolvedType::Unresolved,
                }
            }
            Some(NodeKind::UnionTypeDesc { members }) => ResolvedType::Union(
                members
                    .iter()
                    .map(|&member| self.resolve_type_desc(tree, member))
                    .collect(),
            ),
            Some(NodeKind::OptionalTypeDesc { inner }) => {
                ResolvedType::Union(vec![self.resolve_type_desc(tree, *inner)])
            }
            _ => ResolvedType::Unresolved,
        }
    }

    /// Walk parents to the nearest enclosing variable declaration.
    fn enclosing_variable_decl(&self, tree: &SyntaxTree, id: NodeId) -> Option<NodeId> {
        let mut current = tree.parent(id);
        while current.is_some() {
            if matches!(tree.kind(current), Some(NodeKind::VariableDecl { .. })) {
                return Some(current);
            }
            current = tree.parent(current);
        }
        None
    }
}

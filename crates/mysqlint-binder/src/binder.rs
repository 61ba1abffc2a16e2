//! Declaration binding.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::debug;

use mysqlint_common::Diagnostic;
use mysqlint_parser::{NodeId, NodeKind, SyntaxTree};

use crate::inference;
use crate::model::{ImportedModule, SemanticModel};
use crate::symbols::{Symbol, SymbolArena, SymbolId, SymbolKind};

/// Binder state, consumed into a [`SemanticModel`] once binding finishes.
#[derive(Default)]
pub struct BinderState {
    symbols: SymbolArena,
    module_symbols: Vec<SymbolId>,
    imports: IndexMap<String, ImportedModule>,
    node_symbols: FxHashMap<u32, SymbolId>,
    diagnostics: Vec<Diagnostic>,
}

impl BinderState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind every declaration in the module, then run the inference check
    /// that produces the host "cannot infer type" diagnostics.
    pub fn bind_module(&mut self, tree: &SyntaxTree) {
        let root = tree.root();
        let Some(NodeKind::ModulePart { imports, members }) = tree.kind(root) else {
            return;
        };
        for &import in imports {
            self.bind_import(tree, import);
        }
        for &member in members {
            self.bind_member(tree, member);
        }
        inference::check_module(tree, &mut self.diagnostics);
    }

    fn bind_import(&mut self, tree: &SyntaxTree, id: NodeId) {
        let Some(NodeKind::ImportDecl {
            org,
            module,
            prefix,
        }) = tree.kind(id)
        else {
            return;
        };
        let key = prefix.clone().unwrap_or_else(|| module.clone());
        debug!(prefix = %key, org = %org, module = %module, "bound import");
        self.imports.insert(
            key,
            ImportedModule {
                org: org.clone(),
                module: module.clone(),
            },
        );
    }

    fn bind_member(&mut self, tree: &SyntaxTree, id: NodeId) {
        match tree.kind(id) {
            Some(NodeKind::TypeDefinition { name, .. }) => {
                self.declare_symbol(tree, name.clone(), SymbolKind::TypeDefinition, id);
            }
            Some(NodeKind::VariableDecl { name, .. }) => {
                self.declare_symbol(tree, name.clone(), SymbolKind::Variable, id);
            }
            Some(NodeKind::FunctionDef { name, body }) => {
                self.declare_symbol(tree, name.clone(), SymbolKind::Function, id);
                for &statement in body {
                    if let Some(NodeKind::VariableDecl { name, .. }) = tree.kind(statement) {
                        self.declare_symbol(tree, name.clone(), SymbolKind::Variable, statement);
                    }
                }
            }
            _ => {}
        }
    }

    fn declare_symbol(
        &mut self,
        tree: &SyntaxTree,
        name: String,
        kind: SymbolKind,
        decl: NodeId,
    ) -> SymbolId {
        debug!(name = %name, ?kind, "declared symbol");
        let id = self.symbols.alloc(Symbol {
            name,
            kind,
            decl,
            span: tree.span(decl),
        });
        self.module_symbols.push(id);
        self.node_symbols.insert(decl.0, id);
        id
    }

    /// Finish binding and hand the collected tables to the semantic model.
    #[must_use]
    pub fn into_model(self) -> SemanticModel {
        SemanticModel::new(
            self.symbols,
            self.module_symbols,
            self.imports,
            self.node_symbols,
            self.diagnostics,
        )
    }
}

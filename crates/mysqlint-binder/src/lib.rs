//! Name binding and the semantic model.
//!
//! The binder walks a parsed module once and records:
//! - module and function-local symbols (variables, type definitions) in
//!   declaration order,
//! - the import table mapping prefixes to organization/module pairs,
//! - compilation diagnostics, including the result-type inference error
//!   that downstream hint analyzers correlate against.
//!
//! The finished [`SemanticModel`] answers `type_of` / symbol queries for the
//! analyzers without further tree mutation.

pub mod symbols;
pub use symbols::{Symbol, SymbolArena, SymbolId, SymbolKind};

pub mod binder;
pub use binder::BinderState;

pub mod inference;
pub use inference::CANNOT_INFER_TYPE;

pub mod model;
pub use model::{ImportedModule, ResolvedType, SemanticModel, TypeIdent};

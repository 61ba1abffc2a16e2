//! Scanner, syntax tree, and parser for the mysqlint toolchain.
//!
//! The grammar covers the declaration and expression forms the analyzers
//! inspect: imports, record type definitions, typed variable declarations,
//! client construction (`new`), mapping constructors with spread fields,
//! remote method calls, function calls, and the literal shapes that feed
//! the configuration validators.

pub mod scanner;
pub use scanner::{ScannerState, Token, TokenKind};

pub mod tree;
pub use tree::{LiteralKind, Node, NodeId, NodeKind, SyntaxTree, UnaryOp};

pub mod parser;
pub use parser::ParserState;

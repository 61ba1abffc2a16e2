//! Common types and utilities for the mysqlint analyzer.
//!
//! This crate provides foundational types used across all mysqlint crates:
//! - Source spans (`Span`)
//! - Line/column mapping (`LineMap`, `Position`, `LineRange`)
//! - Diagnostic types (`Diagnostic`, `DiagnosticSeverity`)

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::{LineMap, LineRange, Position, Span};

// Diagnostics - coded findings with severity and location
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticSeverity};

//! Static analysis of MySQL client usage.
//!
//! The analyzers validate client construction and configuration records and
//! scan for insecure password patterns:
//! - numeric bounds on connection-pool, options, and failover records,
//!   including fields introduced through spread entries,
//! - advisory hints for `query`/`queryRow` calls whose result type cannot
//!   be inferred,
//! - vulnerability issues for weak or non-literal passwords.
//!
//! Entry point: [`AnalyzerPipeline`].

pub mod diagnostics;
pub use diagnostics::DiagnosticCode;

pub mod error;
pub use error::AnalyzeError;

pub mod ident;

pub mod spread;
pub use spread::resolve_spread_fields;

pub mod validators;

pub mod rules;
pub use rules::{Issue, Rule, RuleKind, RuleRegistry};

pub mod analyzers;

pub mod pipeline;
pub use pipeline::{AnalysisContext, AnalysisResult, AnalyzerPipeline, Reporter};

//! Per-node analysis dispatch.
//!
//! The pipeline walks the tree once in source order and hands each matching
//! node to the analyzers. Each visit is self-contained: a fatal visit error
//! is logged and the scan continues with the next node.

use tracing::warn;

use mysqlint_binder::SemanticModel;
use mysqlint_common::{Diagnostic, Span};
use mysqlint_parser::{NodeId, NodeKind, SyntaxTree};

use crate::analyzers::{initializer, password, record, remote};
use crate::diagnostics::DiagnosticCode;
use crate::rules::{Issue, Rule, RuleRegistry};

/// Sink for analyzer findings, accumulated in source order.
#[derive(Debug, Default)]
pub struct Reporter {
    diagnostics: Vec<Diagnostic>,
    issues: Vec<Issue>,
}

impl Reporter {
    pub fn report_diagnostic(&mut self, code: DiagnosticCode, span: Span) {
        self.diagnostics
            .push(Diagnostic::new(code.code(), code.message(), code.severity(), span));
    }

    pub fn report_issue(&mut self, rule: &Rule, span: Span) {
        self.issues.push(Issue {
            rule_id: rule.id,
            span,
        });
    }
}

/// Everything the analyzers collected for one module.
#[derive(Debug)]
pub struct AnalysisResult {
    pub diagnostics: Vec<Diagnostic>,
    pub issues: Vec<Issue>,
}

impl AnalysisResult {
    /// Diagnostics with the given code, in report order.
    #[must_use]
    pub fn with_code(&self, code: DiagnosticCode) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.code == code.code())
            .collect()
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }
}

/// Analysis context for one node visit.
pub struct AnalysisContext<'a> {
    pub tree: &'a SyntaxTree,
    pub model: &'a SemanticModel,
    pub node: NodeId,
    reporter: &'a mut Reporter,
}

impl<'a> AnalysisContext<'a> {
    pub fn report(&mut self, code: DiagnosticCode, span: Span) {
        self.reporter.report_diagnostic(code, span);
    }

    pub fn report_issue(&mut self, rule: &Rule, span: Span) {
        self.reporter.report_issue(rule, span);
    }

    /// Whether the host compilation (parse + bind) already carries errors.
    /// Configuration validation is skipped on broken input; the values the
    /// analyzers would read may be incomplete.
    #[must_use]
    pub fn has_compilation_errors(&self) -> bool {
        self.tree.diagnostics().iter().any(Diagnostic::is_error) || self.model.has_errors()
    }
}

/// The analyzer set. Constructed once per scan; owns the rule registry.
pub struct AnalyzerPipeline {
    rules: RuleRegistry,
}

impl AnalyzerPipeline {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: RuleRegistry::new(),
        }
    }

    #[must_use]
    pub fn rules(&self) -> &RuleRegistry {
        &self.rules
    }

    /// Analyze one module: dispatch every matching node, collect findings.
    #[must_use]
    pub fn analyze(&self, tree: &SyntaxTree, model: &SemanticModel) -> AnalysisResult {
        let mut reporter = Reporter::default();
        for node in tree.preorder() {
            match tree.kind(node) {
                Some(NodeKind::ImplicitNew { .. } | NodeKind::ExplicitNew { .. }) => {
                    let mut ctx = AnalysisContext {
                        tree,
                        model,
                        node,
                        reporter: &mut reporter,
                    };
                    if let Err(err) = initializer::analyze(&mut ctx) {
                        warn!(node = node.0, %err, "constructor analysis aborted");
                    }
                    let mut ctx = AnalysisContext {
                        tree,
                        model,
                        node,
                        reporter: &mut reporter,
                    };
                    password::analyze_construction(&mut ctx, &self.rules);
                }
                Some(NodeKind::FunctionCall { .. }) => {
                    let mut ctx = AnalysisContext {
                        tree,
                        model,
                        node,
                        reporter: &mut reporter,
                    };
                    password::analyze_call(&mut ctx, &self.rules);
                }
                Some(NodeKind::RemoteCall { .. }) => {
                    let mut ctx = AnalysisContext {
                        tree,
                        model,
                        node,
                        reporter: &mut reporter,
                    };
                    remote::analyze(&mut ctx);
                }
                Some(NodeKind::VariableDecl { .. }) => {
                    let mut ctx = AnalysisContext {
                        tree,
                        model,
                        node,
                        reporter: &mut reporter,
                    };
                    if let Err(err) = record::analyze(&mut ctx) {
                        warn!(node = node.0, %err, "record analysis aborted");
                    }
                }
                _ => {}
            }
        }
        AnalysisResult {
            diagnostics: reporter.diagnostics,
            issues: reporter.issues,
        }
    }
}

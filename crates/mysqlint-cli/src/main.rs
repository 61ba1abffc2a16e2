//! Command-line driver: parse, bind, analyze, render findings.

mod args;

use std::fs;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use mysqlint_analyzer::{AnalyzerPipeline, Issue};
use mysqlint_binder::BinderState;
use mysqlint_common::{Diagnostic, DiagnosticSeverity};
use mysqlint_parser::{ParserState, SyntaxTree};

use crate::args::{CliArgs, OutputFormat};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let args = CliArgs::parse();
    let file_name = args.file.display().to_string();
    let source = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {file_name}"))?;

    let mut parser = ParserState::new(file_name.clone(), source);
    parser.parse_module();
    let tree = parser.into_tree();

    let mut binder = BinderState::new();
    binder.bind_module(&tree);
    let model = binder.into_model();
    debug!(symbols = model.symbols().count(), "module bound");

    let pipeline = AnalyzerPipeline::new();
    let result = pipeline.analyze(&tree, &model);

    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    diagnostics.extend_from_slice(tree.diagnostics());
    diagnostics.extend_from_slice(model.diagnostics());
    diagnostics.extend(result.diagnostics.iter().cloned());
    diagnostics.sort_by_key(|diagnostic| diagnostic.span.start);

    let mut issues = result.issues.clone();
    issues.sort_by_key(|issue| issue.span.start);

    match args.format {
        OutputFormat::Text => render_text(&tree, &diagnostics, &issues, &pipeline),
        OutputFormat::Json => render_json(&diagnostics, &issues)?,
    }

    if diagnostics.iter().any(Diagnostic::is_error) {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn render_text(
    tree: &SyntaxTree,
    diagnostics: &[Diagnostic],
    issues: &[Issue],
    pipeline: &AnalyzerPipeline,
) {
    for diagnostic in diagnostics {
        let label = match diagnostic.severity {
            DiagnosticSeverity::Error => "error".red().bold(),
            DiagnosticSeverity::Warning => "warning".yellow().bold(),
            DiagnosticSeverity::Hint => "hint".cyan().bold(),
            DiagnosticSeverity::Info => "info".normal(),
        };
        let position = tree.line_map().position(diagnostic.span.start);
        println!("{label}[{}]: {}", diagnostic.code, diagnostic.message);
        println!(
            "  --> {}:{}:{}",
            tree.file_name(),
            position.line + 1,
            position.column + 1
        );
    }
    for issue in issues {
        let description = pipeline
            .rules()
            .rule(issue.rule_id)
            .map_or("unknown rule", |rule| rule.description);
        let position = tree.line_map().position(issue.span.start);
        println!(
            "{}[rule:{}]: {}",
            "vulnerability".yellow().bold(),
            issue.rule_id,
            description
        );
        println!(
            "  --> {}:{}:{}",
            tree.file_name(),
            position.line + 1,
            position.column + 1
        );
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    diagnostics: &'a [Diagnostic],
    issues: &'a [Issue],
}

fn render_json(diagnostics: &[Diagnostic], issues: &[Issue]) -> Result<()> {
    let output = JsonOutput {
        diagnostics,
        issues,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

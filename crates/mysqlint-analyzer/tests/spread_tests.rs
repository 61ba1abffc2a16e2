//! Spread-field resolution through declared record types.

use mysqlint_analyzer::{AnalysisResult, AnalyzerPipeline};
use mysqlint_binder::BinderState;
use mysqlint_parser::{NodeKind, ParserState, SyntaxTree};

fn run(source: &str) -> (SyntaxTree, AnalysisResult) {
    let mut parser = ParserState::new("main.bal", source);
    parser.parse_module();
    let tree = parser.into_tree();
    assert!(
        tree.diagnostics().is_empty(),
        "unexpected parse diagnostics: {:?}",
        tree.diagnostics()
    );
    let mut binder = BinderState::new();
    binder.bind_module(&tree);
    let model = binder.into_model();
    let result = AnalyzerPipeline::new().analyze(&tree, &model);
    (tree, result)
}

fn error_codes(result: &AnalysisResult) -> Vec<&str> {
    result
        .diagnostics
        .iter()
        .filter(|diagnostic| diagnostic.is_error())
        .map(|diagnostic| diagnostic.code.as_str())
        .collect()
}

#[test]
fn spread_source_initializer_overrides_declared_default() {
    // The declared default (5) is valid; the value actually carried by the
    // spread variable (-1) is not, and must be the one validated.
    let source = "import ballerinax/mysql;\n\ntype Pool record {|\n    int maxOpenConnections = 5;\n|};\n\nPool p = {maxOpenConnections: -1};\n\nfunction run() returns error? {\n    mysql:Client c = check new (\"h\", \"u\", \"Str0ng!Pass\", \"db\", 3306, connectionPool = {...p});\n}\n";
    let (tree, result) = run(source);
    assert_eq!(error_codes(&result), vec!["SQL_101"]);
    // The error attaches to the span of the offending value expression.
    let negated = tree
        .preorder()
        .into_iter()
        .find(|&id| matches!(tree.kind(id), Some(NodeKind::UnaryExpr { .. })))
        .expect("negated literal");
    assert_eq!(result.diagnostics[0].span, tree.span(negated));
}

#[test]
fn declared_default_is_validated_when_initializer_is_silent() {
    let source = "import ballerinax/mysql;\n\ntype Pool record {|\n    int maxOpenConnections = -1;\n|};\n\nPool p = {};\n\nfunction run() returns error? {\n    mysql:Client c = check new (\"h\", \"u\", \"Str0ng!Pass\", \"db\", 3306, connectionPool = {...p});\n}\n";
    let (_, result) = run(source);
    assert_eq!(error_codes(&result), vec!["SQL_101"]);
}

#[test]
fn valid_spread_produces_no_findings() {
    let source = "import ballerinax/mysql;\n\ntype Pool record {|\n    int maxOpenConnections = 5;\n    int minIdleConnections = 0;\n|};\n\nPool p = {maxOpenConnections: 10};\n\nfunction run() returns error? {\n    mysql:Client c = check new (\"h\", \"u\", \"Str0ng!Pass\", \"db\", 3306, connectionPool = {...p});\n}\n";
    let (_, result) = run(source);
    assert!(error_codes(&result).is_empty());
}

#[test]
fn fields_without_any_value_are_skipped() {
    let source = "import ballerinax/mysql;\n\ntype Pool record {|\n    int maxOpenConnections;\n|};\n\nPool p = {};\n\nfunction run() returns error? {\n    mysql:Client c = check new (\"h\", \"u\", \"Str0ng!Pass\", \"db\", 3306, connectionPool = {...p});\n}\n";
    let (_, result) = run(source);
    assert!(error_codes(&result).is_empty());
}

#[test]
fn multi_segment_spread_follows_field_types() {
    // {...cfg.pool} resolves through Outer.pool to the Pool record type and
    // validates its declared defaults.
    let source = "import ballerinax/mysql;\n\ntype Pool record {|\n    int maxOpenConnections = -1;\n|};\n\ntype Outer record {|\n    Pool pool;\n|};\n\nOuter cfg = {};\n\nfunction run() returns error? {\n    mysql:Client c = check new (\"h\", \"u\", \"Str0ng!Pass\", \"db\", 3306, connectionPool = {...cfg.pool});\n}\n";
    let (_, result) = run(source);
    assert_eq!(error_codes(&result), vec!["SQL_101"]);
}

#[test]
fn unresolved_spread_target_is_a_safe_no_op() {
    let source = "import ballerinax/mysql;\n\nfunction run() returns error? {\n    mysql:Client c = check new (\"h\", \"u\", \"Str0ng!Pass\", \"db\", 3306, connectionPool = {...unknown});\n}\n";
    let (_, result) = run(source);
    assert!(error_codes(&result).is_empty());
}

#[test]
fn imported_record_types_cannot_be_expanded() {
    // The spread variable's declared type names an imported record; there is
    // no local definition to expand, so resolution yields nothing.
    let source = "import ballerinax/mysql;\nimport ballerina/sql;\n\nsql:ConnectionPool p = {maxOpenConnections: -1};\n\nfunction run() returns error? {\n    mysql:Client c = check new (\"h\", \"u\", \"Str0ng!Pass\", \"db\", 3306, connectionPool = {...p});\n}\n";
    let (_, result) = run(source);
    assert!(error_codes(&result).is_empty());
}

#[test]
fn spread_into_options_is_validated() {
    let source = "import ballerinax/mysql;\n\ntype Opts record {|\n    decimal connectTimeout = -1;\n|};\n\nOpts o = {};\n\nfunction run() returns error? {\n    mysql:Client c = check new (\"h\", \"u\", \"Str0ng!Pass\", \"db\", 3306, options = {...o});\n}\n";
    let (_, result) = run(source);
    assert_eq!(error_codes(&result), vec!["MYSQL_101"]);
}

#[test]
fn explicit_fields_beside_a_spread_are_still_validated() {
    let source = "import ballerinax/mysql;\n\ntype Pool record {|\n    int maxOpenConnections = 5;\n|};\n\nPool p = {};\n\nfunction run() returns error? {\n    mysql:Client c = check new (\"h\", \"u\", \"Str0ng!Pass\", \"db\", 3306, connectionPool = {...p, minIdleConnections: -1});\n}\n";
    let (_, result) = run(source);
    assert_eq!(error_codes(&result), vec!["SQL_102"]);
}

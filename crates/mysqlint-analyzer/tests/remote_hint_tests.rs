//! Hints for query calls whose result type cannot be inferred.

use mysqlint_analyzer::{AnalysisResult, AnalyzerPipeline, DiagnosticCode};
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

fn client_module(body: &str) -> String {
    format!(
        "import ballerinax/mysql;\n\nfunction run() returns error? {{\n    mysql:Client c = check new (\"h\", \"u\", \"Str0ng!Pass\", \"db\", 3306);\n    {body}\n}}\n"
    )
}

#[test]
fn ignored_query_result_gets_a_row_type_hint() {
    let (tree, result) = run(&client_module("_ = check c->query(`SELECT 1`);"));
    let hints = result.with_code(DiagnosticCode::Mysql901);
    assert_eq!(hints.len(), 1);
    // The hint attaches to the whole call expression.
    let call = tree
        .preorder()
        .into_iter()
        .find(|&id| matches!(tree.kind(id), Some(NodeKind::RemoteCall { .. })))
        .expect("remote call");
    assert_eq!(hints[0].span, tree.span(call));
    assert!(result.with_code(DiagnosticCode::Mysql902).is_empty());
}

#[test]
fn ignored_query_row_result_gets_a_return_type_hint() {
    let (_, result) = run(&client_module("_ = check c->queryRow(`SELECT 1`);"));
    assert_eq!(result.with_code(DiagnosticCode::Mysql902).len(), 1);
    assert!(result.with_code(DiagnosticCode::Mysql901).is_empty());
}

#[test]
fn typed_binding_produces_no_hint() {
    let (_, result) = run(&client_module("stream<Row, error?> rows = c->query(`SELECT 1`);"));
    assert!(result.with_code(DiagnosticCode::Mysql901).is_empty());
}

#[test]
fn explicit_result_type_produces_no_hint() {
    let (_, result) = run(&client_module("_ = check c->query(`SELECT 1`, Row);"));
    assert!(result.with_code(DiagnosticCode::Mysql901).is_empty());
}

#[test]
fn non_client_targets_get_no_hint() {
    let (_, result) = run(
        "function run() returns error? {\n    _ = check c->query(`SELECT 1`);\n}\n",
    );
    assert!(result.with_code(DiagnosticCode::Mysql901).is_empty());
}

#[test]
fn other_remote_methods_get_no_hint() {
    let (_, result) = run(&client_module("_ = check c->execute(`DELETE FROM t`);"));
    assert!(result.with_code(DiagnosticCode::Mysql901).is_empty());
    assert!(result.with_code(DiagnosticCode::Mysql902).is_empty());
}

#[test]
fn hints_are_advisory_not_errors() {
    let (_, result) = run(&client_module("_ = check c->query(`SELECT 1`);"));
    assert_eq!(result.error_count(), 0);
}

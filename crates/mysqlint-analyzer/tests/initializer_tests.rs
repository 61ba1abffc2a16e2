//! Connection-pool and options validation at construction sites.

use mysqlint_analyzer::{AnalysisResult, AnalyzerPipeline};
use mysqlint_binder::BinderState;
use mysqlint_parser::ParserState;

fn analyze(source: &str) -> AnalysisResult {
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
    AnalyzerPipeline::new().analyze(&tree, &model)
}

fn error_codes(result: &AnalysisResult) -> Vec<&str> {
    result
        .diagnostics
        .iter()
        .filter(|diagnostic| diagnostic.is_error())
        .map(|diagnostic| diagnostic.code.as_str())
        .collect()
}

fn client_with_pool(pool: &str) -> String {
    format!(
        "import ballerinax/mysql;\nimport ballerina/sql;\n\nfunction run() returns error? {{\n    mysql:Client c = check new (\"h\", \"u\", \"Str0ng!Pass\", \"db\", 3306, {{}}, {pool});\n}}\n"
    )
}

fn client_with_options(options: &str) -> String {
    format!(
        "import ballerinax/mysql;\n\nfunction run() returns error? {{\n    mysql:Client c = check new (\"h\", \"u\", \"Str0ng!Pass\", \"db\", 3306, {options});\n}}\n"
    )
}

#[test]
fn max_open_connections_below_one_is_invalid() {
    let result = analyze(&client_with_pool("{maxOpenConnections: 0}"));
    assert_eq!(error_codes(&result), vec!["SQL_101"]);
    let result = analyze(&client_with_pool("{maxOpenConnections: -1}"));
    assert_eq!(error_codes(&result), vec!["SQL_101"]);
}

#[test]
fn max_open_connections_at_or_above_one_is_valid() {
    let result = analyze(&client_with_pool("{maxOpenConnections: 1}"));
    assert!(error_codes(&result).is_empty());
    let result = analyze(&client_with_pool("{maxOpenConnections: 25}"));
    assert!(error_codes(&result).is_empty());
}

#[test]
fn min_idle_connections_below_zero_is_invalid() {
    let result = analyze(&client_with_pool("{minIdleConnections: -1}"));
    assert_eq!(error_codes(&result), vec!["SQL_102"]);
    let result = analyze(&client_with_pool("{minIdleConnections: 0}"));
    assert!(error_codes(&result).is_empty());
}

#[test]
fn max_connection_life_time_below_thirty_is_invalid() {
    let result = analyze(&client_with_pool("{maxConnectionLifeTime: 29.5}"));
    assert_eq!(error_codes(&result), vec!["SQL_103"]);
    let result = analyze(&client_with_pool("{maxConnectionLifeTime: 20}"));
    assert_eq!(error_codes(&result), vec!["SQL_103"]);
    let result = analyze(&client_with_pool("{maxConnectionLifeTime: 30}"));
    assert!(error_codes(&result).is_empty());
    let result = analyze(&client_with_pool("{maxConnectionLifeTime: 1800.0}"));
    assert!(error_codes(&result).is_empty());
}

#[test]
fn multiple_pool_violations_each_report() {
    let result = analyze(&client_with_pool(
        "{maxOpenConnections: 0, minIdleConnections: -1, maxConnectionLifeTime: 10}",
    ));
    assert_eq!(error_codes(&result), vec!["SQL_101", "SQL_102", "SQL_103"]);
}

#[test]
fn negative_timeouts_are_invalid() {
    let result = analyze(&client_with_options("{connectTimeout: -1}"));
    assert_eq!(error_codes(&result), vec!["MYSQL_101"]);
    let result = analyze(&client_with_options("{socketTimeout: -0.5}"));
    assert_eq!(error_codes(&result), vec!["MYSQL_101"]);
    let result = analyze(&client_with_options("{connectTimeout: 10, socketTimeout: 0}"));
    assert!(error_codes(&result).is_empty());
}

#[test]
fn inline_failover_config_is_validated() {
    let result = analyze(&client_with_options(
        "{failoverConfig: {timeBeforeRetry: -1, queriesBeforeRetry: -1}}",
    ));
    assert_eq!(error_codes(&result), vec!["MYSQL_101", "MYSQL_101"]);
}

#[test]
fn named_arguments_are_preferred() {
    let result = analyze(
        "import ballerinax/mysql;\n\nfunction run() returns error? {\n    mysql:Client c = check new (host = \"h\", connectionPool = {maxOpenConnections: 0}, options = {connectTimeout: -1});\n}\n",
    );
    assert_eq!(error_codes(&result), vec!["MYSQL_101", "SQL_101"]);
}

#[test]
fn six_positional_arguments_validate_options_only() {
    let result = analyze(&client_with_options("{connectTimeout: -1}"));
    assert_eq!(error_codes(&result), vec!["MYSQL_101"]);
}

#[test]
fn unexpected_arity_is_not_validated() {
    let result = analyze(
        "import ballerinax/mysql;\n\nfunction run() returns error? {\n    mysql:Client c = check new (\"h\", \"u\", \"Str0ng!Pass\", \"db\", {maxOpenConnections: -1});\n}\n",
    );
    assert!(error_codes(&result).is_empty());
}

#[test]
fn explicit_new_is_validated_like_implicit_new() {
    let result = analyze(
        "import ballerinax/mysql;\n\nfunction run() returns error? {\n    mysql:Client c = check new mysql:Client(\"h\", \"u\", \"Str0ng!Pass\", \"db\", 3306, {connectTimeout: -1});\n}\n",
    );
    assert_eq!(error_codes(&result), vec!["MYSQL_101"]);
}

#[test]
fn non_client_construction_is_ignored() {
    let result = analyze(
        "function run() returns error? {\n    Widget w = new (\"h\", \"u\", \"p\", \"db\", 3306, {connectTimeout: -1});\n}\n",
    );
    assert!(error_codes(&result).is_empty());
}

#[test]
fn symbolic_values_are_skipped() {
    // Values originating from variables cannot be statically validated.
    let result = analyze(
        "import ballerinax/mysql;\n\nint limit = -1;\n\nfunction run() returns error? {\n    mysql:Client c = check new (\"h\", \"u\", \"Str0ng!Pass\", \"db\", 3306, {}, {maxOpenConnections: limit});\n}\n",
    );
    assert!(error_codes(&result).is_empty());
}

#[test]
fn existing_compilation_errors_abort_validation() {
    // The wildcard-bound query produces a host inference error; pool
    // validation must not run on a broken compilation.
    let result = analyze(
        "import ballerinax/mysql;\n\nfunction run() returns error? {\n    mysql:Client c = check new (\"h\", \"u\", \"Str0ng!Pass\", \"db\", 3306, {}, {maxOpenConnections: -1});\n    _ = check c->query(`SELECT 1`);\n}\n",
    );
    assert!(error_codes(&result).is_empty());
}

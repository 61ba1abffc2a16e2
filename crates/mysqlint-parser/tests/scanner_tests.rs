//! Token-level tests for the scanner.

use mysqlint_parser::{ScannerState, TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    let (tokens, diagnostics) = ScannerState::new(source).scan_tokens();
    assert!(
        diagnostics.is_empty(),
        "unexpected scan diagnostics: {diagnostics:?}"
    );
    tokens.iter().map(|token| token.kind).collect()
}

#[test]
fn scans_import_declaration() {
    assert_eq!(
        kinds("import ballerinax/mysql as db;"),
        vec![
            TokenKind::ImportKw,
            TokenKind::Ident,
            TokenKind::Slash,
            TokenKind::Ident,
            TokenKind::AsKw,
            TokenKind::Ident,
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn scans_closed_record_delimiters() {
    assert_eq!(
        kinds("record {| int x; |}"),
        vec![
            TokenKind::RecordKw,
            TokenKind::OpenBracePipe,
            TokenKind::Ident,
            TokenKind::Ident,
            TokenKind::Semicolon,
            TokenKind::ClosePipeBrace,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn scans_remote_call_arrow_and_spread() {
    assert_eq!(
        kinds("c->query({...p})"),
        vec![
            TokenKind::Ident,
            TokenKind::RightArrow,
            TokenKind::Ident,
            TokenKind::OpenParen,
            TokenKind::OpenBrace,
            TokenKind::Ellipsis,
            TokenKind::Ident,
            TokenKind::CloseBrace,
            TokenKind::CloseParen,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn minus_and_arrow_are_distinct() {
    assert_eq!(
        kinds("-1 ->"),
        vec![
            TokenKind::Minus,
            TokenKind::IntLiteral,
            TokenKind::RightArrow,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn scans_numbers_strings_and_templates() {
    assert_eq!(
        kinds("3306 29.5 \"pw\" `SELECT 1`"),
        vec![
            TokenKind::IntLiteral,
            TokenKind::DecimalLiteral,
            TokenKind::StringLiteral,
            TokenKind::TemplateLiteral,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn string_token_includes_quotes() {
    let source = "\"secret\"";
    let (tokens, _) = ScannerState::new(source).scan_tokens();
    assert_eq!(tokens[0].text(source), "\"secret\"");
}

#[test]
fn skips_line_comments() {
    assert_eq!(
        kinds("// a comment\nimport ballerina/sql;"),
        vec![
            TokenKind::ImportKw,
            TokenKind::Ident,
            TokenKind::Slash,
            TokenKind::Ident,
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn unterminated_string_reports_diagnostic() {
    let (_, diagnostics) = ScannerState::new("\"oops").scan_tokens();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, "PARSE_002");
}

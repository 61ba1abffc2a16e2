//! Insecure password detection.
//!
//! Inspects the password-bearing argument of client constructions and
//! function calls: named `password`, or the third positional argument.
//! A non-empty string literal must satisfy the complexity rules (length of
//! at least 8 with uppercase, lowercase, digit, and a non-alphanumeric
//! character). Anything the scanner cannot statically read is reported as
//! insecure. Only the first recognized password argument is inspected, and
//! a malformed node shape degrades to "no finding".

use mysqlint_parser::{LiteralKind, NodeId, NodeKind};

use crate::ident::is_client_type;
use crate::pipeline::AnalysisContext;
use crate::rules::RuleRegistry;

const PASSWORD_ARG_NAME: &str = "password";
const PASSWORD_POSITION: usize = 2;

const MIN_PASSWORD_LENGTH: usize = 8;

/// Scan a client construction node.
pub fn analyze_construction(ctx: &mut AnalysisContext<'_>, rules: &RuleRegistry) {
    if !is_client_type(ctx.tree, ctx.model, ctx.node) {
        return;
    }
    let Some(args) = ctx.tree.constructor_args(ctx.node) else {
        return;
    };
    inspect_arguments(ctx, rules, args);
}

/// Scan a function call node.
pub fn analyze_call(ctx: &mut AnalysisContext<'_>, rules: &RuleRegistry) {
    let Some(NodeKind::FunctionCall { args, .. }) = ctx.tree.kind(ctx.node) else {
        return;
    };
    inspect_arguments(ctx, rules, args);
}

/// Find the password argument and classify it. Inspection halts after the
/// first recognized password argument.
fn inspect_arguments(ctx: &mut AnalysisContext<'_>, rules: &RuleRegistry, args: &[NodeId]) {
    let tree = ctx.tree;
    let mut positional = 0usize;
    for &arg in args {
        match tree.kind(arg) {
            Some(NodeKind::NamedArg { name, expr }) if name == PASSWORD_ARG_NAME => {
                classify(ctx, rules, *expr);
                return;
            }
            Some(NodeKind::NamedArg { .. }) => {}
            Some(NodeKind::PositionalArg { expr }) => {
                if positional == PASSWORD_POSITION {
                    classify(ctx, rules, *expr);
                    return;
                }
                positional += 1;
            }
            _ => {}
        }
    }
}

fn classify(ctx: &mut AnalysisContext<'_>, rules: &RuleRegistry, expr: NodeId) {
    let Some(node) = ctx.tree.get(expr) else {
        return;
    };
    let secure = match &node.kind {
        NodeKind::BasicLiteral {
            literal: LiteralKind::Str,
            text,
        } => {
            let password = unquote(text);
            !password.is_empty() && is_strong_password(password)
        }
        // Anything that is not a string literal cannot be proven secure.
        _ => false,
    };
    if !secure {
        ctx.report_issue(rules.use_secure_password(), ctx.tree.span(ctx.node));
    }
}

fn unquote(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(text)
}

fn is_strong_password(password: &str) -> bool {
    password.len() >= MIN_PASSWORD_LENGTH
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| !c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strength_rules() {
        assert!(is_strong_password("Str0ng!Pass"));
        assert!(!is_strong_password("weak"));
        assert!(!is_strong_password("alllowercase1!"));
        assert!(!is_strong_password("ALLUPPERCASE1!"));
        assert!(!is_strong_password("NoDigits!!"));
        assert!(!is_strong_password("NoSpecial1"));
        assert!(!is_strong_password("Sh0r!t"));
    }

    #[test]
    fn unquote_strips_paired_quotes_only() {
        assert_eq!(unquote("\"abc\""), "abc");
        assert_eq!(unquote("\"\""), "");
        assert_eq!(unquote("abc"), "abc");
    }
}

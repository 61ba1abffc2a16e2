//! Static-analysis rule catalog.
//!
//! Rules are the cataloged vulnerability patterns the security scanner can
//! report; an [`Issue`] is one concrete occurrence tied to a source span.
//! The catalog is built once per [`RuleRegistry`] and its serialized form
//! must match the packaged `resources/rules.json` manifest.

use serde::Serialize;

use mysqlint_common::Span;

/// Rule classification. Only vulnerabilities are cataloged today.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RuleKind {
    #[serde(rename = "VULNERABILITY")]
    Vulnerability,
}

/// A cataloged rule: stable numeric id, kind, and description.
#[derive(Clone, Debug, Serialize)]
pub struct Rule {
    pub id: u32,
    pub kind: RuleKind,
    pub description: &'static str,
}

/// Numeric id of the secure-password rule.
pub const USE_SECURE_PASSWORD: u32 = 1;

/// One detected occurrence of a rule violation.
#[derive(Clone, Debug, Serialize)]
pub struct Issue {
    pub rule_id: u32,
    pub span: Span,
}

/// The rule catalog, constructed once at pipeline construction and threaded
/// through call sites.
#[derive(Debug)]
pub struct RuleRegistry {
    rules: Vec<Rule>,
}

impl RuleRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: vec![Rule {
                id: USE_SECURE_PASSWORD,
                kind: RuleKind::Vulnerability,
                description: "A secure password should be used when connecting to a database",
            }],
        }
    }

    #[must_use]
    pub fn all(&self) -> &[Rule] {
        &self.rules
    }

    #[must_use]
    pub fn rule(&self, id: u32) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.id == id)
    }

    #[must_use]
    pub fn use_secure_password(&self) -> &Rule {
        self.rule(USE_SECURE_PASSWORD)
            .unwrap_or(&self.rules[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_contains_secure_password_rule() {
        let registry = RuleRegistry::new();
        let rule = registry.use_secure_password();
        assert_eq!(rule.id, USE_SECURE_PASSWORD);
        assert_eq!(rule.kind, RuleKind::Vulnerability);
    }

    #[test]
    fn unknown_rule_id_is_absent() {
        let registry = RuleRegistry::new();
        assert!(registry.rule(999).is_none());
    }
}

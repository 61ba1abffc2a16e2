//! The fixed diagnostic code table.

use mysqlint_common::DiagnosticSeverity;

/// Diagnostic codes reported by the analyzers.
///
/// SQL-prefixed codes cover connection-pool bound violations, MYSQL_101 the
/// non-negative-value rule for options/failover fields, and MYSQL_901/902
/// the advisory hints for `query`/`queryRow` result types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagnosticCode {
    Sql101,
    Sql102,
    Sql103,
    Mysql101,
    Mysql901,
    Mysql902,
}

impl DiagnosticCode {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            DiagnosticCode::Sql101 => "SQL_101",
            DiagnosticCode::Sql102 => "SQL_102",
            DiagnosticCode::Sql103 => "SQL_103",
            DiagnosticCode::Mysql101 => "MYSQL_101",
            DiagnosticCode::Mysql901 => "MYSQL_901",
            DiagnosticCode::Mysql902 => "MYSQL_902",
        }
    }

    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            DiagnosticCode::Sql101 => "invalid value: expected value is greater than one",
            DiagnosticCode::Sql102 => "invalid value: expected value is greater than zero",
            DiagnosticCode::Sql103 => {
                "invalid value: expected value is greater than or equal to 30"
            }
            DiagnosticCode::Mysql101 => {
                "invalid value: expected value is greater than or equal to zero"
            }
            DiagnosticCode::Mysql901 => {
                "parameter 'rowType' should be explicitly passed when the return data is ignored"
            }
            DiagnosticCode::Mysql902 => {
                "parameter 'returnType' should be explicitly passed when the return data is ignored"
            }
        }
    }

    #[must_use]
    pub const fn severity(self) -> DiagnosticSeverity {
        match self {
            DiagnosticCode::Sql101
            | DiagnosticCode::Sql102
            | DiagnosticCode::Sql103
            | DiagnosticCode::Mysql101 => DiagnosticSeverity::Error,
            DiagnosticCode::Mysql901 | DiagnosticCode::Mysql902 => DiagnosticSeverity::Hint,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_and_severities() {
        assert_eq!(DiagnosticCode::Sql101.code(), "SQL_101");
        assert_eq!(DiagnosticCode::Mysql101.severity(), DiagnosticSeverity::Error);
        assert_eq!(DiagnosticCode::Mysql901.severity(), DiagnosticSeverity::Hint);
        assert_eq!(DiagnosticCode::Mysql902.severity(), DiagnosticSeverity::Hint);
    }
}

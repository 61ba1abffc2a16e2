//! Analyzer error type.

use thiserror::Error;

/// Fatal failure of a single node visit. The pipeline catches these per
/// visit; they never abort the whole scan.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("invalid integer literal `{text}`")]
    InvalidInt {
        text: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("invalid numeric literal `{text}`")]
    InvalidNumber {
        text: String,
        #[source]
        source: std::num::ParseFloatError,
    },
}

//! Extractor error types

use thiserror::Error;

/// Extraction error type
///
/// Extractors are total over well-formed UTF-8 input; these variants exist
/// for the failure-isolation contract: a failing extractor is skipped for
/// the document at hand and the message recorded, while other extractors
/// keep running.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Input the extractor cannot make sense of
    #[error("malformed input: {0}")]
    Malformed(String),

    /// Named extractor failed
    #[error("extractor '{name}' failed: {message}")]
    Failed {
        /// Extractor name
        name: String,
        /// Failure description
        message: String,
    },
}

impl ExtractError {
    /// Create a malformed-input error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    /// Create a named failure
    pub fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Specialized Result type for extraction operations
pub type ExtractResult<T> = Result<T, ExtractError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExtractError::failed("tables", "ragged separator row");
        assert_eq!(err.to_string(), "extractor 'tables' failed: ragged separator row");

        let err = ExtractError::malformed("unterminated fence");
        assert_eq!(err.to_string(), "malformed input: unterminated fence");
    }
}

use thiserror::Error;

/// Errors raised while building classifiers from keyword tables.
///
/// These are startup errors; classification itself never fails.
#[derive(Error, Debug)]
pub enum NlpError {
    #[error("invalid pattern for {intent}: {message}")]
    InvalidPattern { intent: String, message: String },
    #[error("invalid table: {0}")]
    InvalidTable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_pattern() {
        let e = NlpError::InvalidPattern {
            intent: "start_quiz".to_string(),
            message: "unclosed group".to_string(),
        };
        assert_eq!(e.to_string(), "invalid pattern for start_quiz: unclosed group");
    }

    #[test]
    fn test_error_display_invalid_table() {
        let e = NlpError::InvalidTable("duplicate topic key: vpn".to_string());
        assert_eq!(e.to_string(), "invalid table: duplicate topic key: vpn");
    }
}

//! Error handling for the CLI application

use std::fmt;

/// Custom error type for CLI-specific errors
#[derive(Debug)]
pub enum CliError {
    /// File not found or inaccessible
    FileNotFound(String),
    /// Configuration error
    ConfigError(String),
    /// Malformed pool file
    InvalidPool {
        /// 1-based line number
        line: usize,
        /// The offending line
        content: String,
    },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::FileNotFound(path) => write!(f, "File not found: {path}"),
            CliError::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
            CliError::InvalidPool { line, content } => {
                write!(f, "Invalid pool entry at line {line}: '{content}'")
            }
        }
    }
}

impl std::error::Error for CliError {}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, anyhow::Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found_error_display() {
        let error = CliError::FileNotFound("model.txt".to_string());
        assert_eq!(error.to_string(), "File not found: model.txt");
    }

    #[test]
    fn test_config_error_display() {
        let error = CliError::ConfigError("context size must be positive".to_string());
        assert_eq!(
            error.to_string(),
            "Configuration error: context size must be positive"
        );
    }

    #[test]
    fn test_invalid_pool_display() {
        let error = CliError::InvalidPool {
            line: 3,
            content: "x".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid pool entry at line 3: 'x'");
    }

    #[test]
    fn test_downcast_through_anyhow() {
        let failure: CliResult<()> = Err(CliError::FileNotFound("a".to_string()).into());
        let error = failure.unwrap_err();
        assert!(matches!(
            error.downcast_ref::<CliError>(),
            Some(CliError::FileNotFound(_))
        ));
    }
}

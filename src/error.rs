use thiserror::Error;

/// Main error type for getmyancestors
#[derive(Error, Debug)]
pub enum AncestryError {
    /// HTTP transport errors that escaped the retry policy
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// File system / output sink I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Login or session errors
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal graph invariant violated
    #[error("Internal invariant violated: {0}")]
    Invariant(String),
}

/// Convenient Result type using AncestryError
pub type Result<T> = std::result::Result<T, AncestryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AncestryError::Auth("no fssessionid cookie".to_string());
        assert!(err.to_string().contains("Authentication error"));
        assert!(err.to_string().contains("fssessionid"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: AncestryError = io_err.into();
        assert!(matches!(err, AncestryError::Io(_)));
    }

    #[test]
    fn test_invalid_input_display() {
        let err = AncestryError::InvalidInput("no person ID".to_string());
        assert_eq!(err.to_string(), "Invalid input: no person ID");
    }

    #[test]
    fn test_invariant_display() {
        let err = AncestryError::Invariant("person P1 has no number".to_string());
        assert_eq!(
            err.to_string(),
            "Internal invariant violated: person P1 has no number"
        );
    }
}

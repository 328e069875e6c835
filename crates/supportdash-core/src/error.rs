//! Error types for SupportDash

use thiserror::Error;

/// Result type alias using SupportDash's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for SupportDash operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Terminal setup or drawing failed
    #[error("Terminal error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_missing() -> Result<std::fs::File> {
        Ok(std::fs::File::open("/nonexistent/supportdash/terminal")?)
    }

    #[test]
    fn test_io_error_converts() {
        let err = open_missing().unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().starts_with("Terminal error: "));
    }
}

//! Domain error types

use thiserror::Error;

/// Errors that can occur while configuring or driving the spectrum display
#[derive(Error, Debug)]
pub enum IqError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid palette {0}: expected 0 (black), 1 (stepped) or 2 (rainbow)")]
    InvalidPalette(u8),

    #[error("Sample source error: {0}")]
    Source(String),

    #[error("Profile error: {0}")]
    Profile(String),
}

/// Result type alias for iqscope operations
pub type IqResult<T> = Result<T, IqError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_render_with_category_prefix() {
        let err = IqError::Config("size must be positive".into());
        assert_eq!(err.to_string(), "Configuration error: size must be positive");

        let err = IqError::InvalidPalette(7);
        assert!(err.to_string().starts_with("Invalid palette 7"));
    }
}

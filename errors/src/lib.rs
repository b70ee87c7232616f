use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Common error for configuring scanners and scanning templates
#[derive(Debug, Clone, Error, PartialEq, Serialize, Deserialize)]
pub enum TokenError {
    #[error("ConfigError: {0}")]
    ConfigError(ConfigError),
    #[error("ScanError: {0}")]
    ScanError(ScanError),
}

#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigError {
    #[error("Open token must not be empty")]
    EmptyOpenToken,
    #[error("Close token must not be empty")]
    EmptyCloseToken,
}

#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanError {
    #[error("Expression opened with '{0}' is never closed")]
    UnterminatedExpression(String),
    #[error("Expression is empty")]
    EmptyExpression,
    #[error("Undefined property: {0}")]
    UndefinedProperty(String),
}

macro_rules! impl_from_error {
    ($($error:tt),+) => {$(
        impl From<$error> for TokenError {
            fn from(e: $error) -> Self {
                TokenError::$error(e)
            }
        }
    )+};
}

impl_from_error!(ConfigError, ScanError);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_should_wrap_sub_errors() {
        let err: TokenError = ScanError::UndefinedProperty("name".to_string()).into();

        assert_eq!(
            TokenError::ScanError(ScanError::UndefinedProperty("name".to_string())),
            err
        );
        assert_eq!("ScanError: Undefined property: name", err.to_string());
    }

    #[test]
    fn it_should_display_config_errors() {
        let err: TokenError = ConfigError::EmptyCloseToken.into();

        assert_eq!("ConfigError: Close token must not be empty", err.to_string());
    }
}

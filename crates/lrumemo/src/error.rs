//! Error types for lrumemo

use thiserror::Error;

/// Result type alias for lrumemo operations
pub type Result<T> = std::result::Result<T, Error>;

/// Call arguments that cannot be turned into a cache key
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyDerivationError {
    /// Value has no deterministic equality (NaN)
    #[error("Argument is not comparable: {0}")]
    NotComparable(String),

    /// Value has no structural representation
    #[error("Argument of type `{0}` cannot be used as a cache key")]
    Unhashable(String),

    /// Same named argument supplied twice
    #[error("Named argument `{0}` supplied more than once")]
    DuplicateNamedArgument(String),

    /// Same key used twice inside a map argument
    #[error("Map key `{0}` occurs more than once")]
    DuplicateMapKey(String),
}

/// Invalid cache configuration, reported at decoration time
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Capacity must be at least one entry
    #[error("Cache capacity must be greater than 0")]
    ZeroCapacity,
}

/// Error types raised by the cache itself
///
/// Failures of the wrapped function are never folded into this type; they
/// reach the caller as the function's own error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Key derivation error
    #[error("Key derivation error: {0}")]
    KeyDerivation(#[from] KeyDerivationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::from(ConfigError::ZeroCapacity);
        assert_eq!(
            err.to_string(),
            "Configuration error: Cache capacity must be greater than 0"
        );

        let err = Error::from(KeyDerivationError::Unhashable("handle".into()));
        assert_eq!(
            err.to_string(),
            "Key derivation error: Argument of type `handle` cannot be used as a cache key"
        );
    }
}

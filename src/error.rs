//! Error types for the cache facade.

use std::fmt;

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the cache facade.
///
/// All cache operations return `Result<T>` where `Result` is defined as
/// `std::result::Result<T, Error>`. Soft failures are not represented here:
/// an unusable expiry makes `put`/`add` a no-op returning `false`, and a
/// cache miss is `Ok(None)`, never an error.
#[derive(Debug, Clone)]
pub enum Error {
    /// Serialization failed when converting a value to cache bytes.
    ///
    /// This occurs when the value's `Serde` implementation fails.
    SerializationError(String),

    /// Deserialization failed when converting cache bytes to a value.
    ///
    /// This indicates corrupted or malformed data in the cache, or a read
    /// with a type that does not match what was stored.
    ///
    /// **Recovery:** Forget the entry and recompute.
    DeserializationError(String),

    /// Store backend error (Redis, etc).
    ///
    /// This indicates the underlying store is unavailable or returned an
    /// error. It always propagates to the caller unmodified; the facade
    /// never reinterprets a transport failure as a miss.
    ///
    /// Common causes:
    /// - Connection lost
    /// - Network timeout
    /// - Backend protocol error
    BackendError(String),

    /// Operation invoked against a store lacking the capability.
    ///
    /// Raised for `increment`/`decrement` on stores without atomic
    /// counters, and for `Store::add` on stores without a conditional
    /// write primitive. Counters are never emulated client-side.
    NotSupported(String),

    /// Configuration error during store construction.
    ///
    /// Common causes:
    /// - Invalid connection string
    /// - Missing required configuration
    ///
    /// **Recovery:** Fix configuration and restart.
    ConfigError(String),

    /// Generic error with custom message.
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            Error::DeserializationError(msg) => write!(f, "Deserialization error: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::NotSupported(msg) => write!(f, "Not supported: {}", msg),
            Error::ConfigError(msg) => write!(f, "Config error: {}", msg),
            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// Conversions from other error types
// ============================================================================

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            Error::BackendError(e.to_string())
        } else if e.is_syntax() || e.is_data() || e.is_eof() {
            Error::DeserializationError(e.to_string())
        } else {
            Error::SerializationError(e.to_string())
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::BackendError(e.to_string())
    }
}

impl From<String> for Error {
    fn from(e: String) -> Self {
        Error::Other(e)
    }
}

impl From<&str> for Error {
    fn from(e: &str) -> Self {
        Error::Other(e.to_string())
    }
}

#[cfg(feature = "redis")]
impl From<redis::RedisError> for Error {
    fn from(e: redis::RedisError) -> Self {
        Error::BackendError(format!("Redis error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NotSupported("increment".to_string());
        assert_eq!(err.to_string(), "Not supported: increment");
    }

    #[test]
    fn test_error_from_string() {
        let err: Error = "test error".into();
        assert!(matches!(err, Error::Other(_)));
    }

    #[test]
    fn test_error_from_serde_json_data() {
        let err = serde_json::from_slice::<u32>(b"\"text\"").unwrap_err();
        let err: Error = err.into();
        assert!(matches!(err, Error::DeserializationError(_)));
    }
}

//! Result type alias for hybridconn

use super::errors::HybridConnError;

/// Result type alias for hybridconn operations
///
/// # Examples
///
/// ```
/// use hybridconn::domain::result::Result;
/// use hybridconn::domain::errors::HybridConnError;
///
/// fn failing_function() -> Result<()> {
///     Err(HybridConnError::Validation("port: out of range".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, HybridConnError>;

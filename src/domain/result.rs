//! Result type alias for Tombola
//!
//! This module provides a convenient Result type alias that uses TombolaError
//! as the error type.

use super::errors::TombolaError;

/// Result type alias for Tombola operations
///
/// This is a convenience type alias that uses `TombolaError` as the error type.
/// Use this throughout the codebase for fallible operations.
///
/// # Examples
///
/// ```
/// use tombola::domain::result::Result;
/// use tombola::domain::errors::TombolaError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(TombolaError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, TombolaError>;

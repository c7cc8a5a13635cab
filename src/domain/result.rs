//! Result type alias for PiiGuard

use super::errors::PiiGuardError;

/// Result type alias for PiiGuard operations
///
/// # Examples
///
/// ```
/// use piiguard::domain::result::Result;
/// use piiguard::domain::errors::PiiGuardError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(PiiGuardError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, PiiGuardError>;

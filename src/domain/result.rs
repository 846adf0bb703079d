//! Result type alias for Reqport

use super::errors::ReqportError;

/// Result type alias for Reqport operations
///
/// # Examples
///
/// ```
/// use reqport::domain::result::Result;
/// use reqport::domain::errors::ReqportError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(ReqportError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, ReqportError>;

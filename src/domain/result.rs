//! Result type alias for the exporter

use super::errors::{ExporterError, TautulliError};

/// Result type alias for exporter operations
///
/// # Examples
///
/// ```
/// use tautulli_exporter::domain::result::Result;
/// use tautulli_exporter::domain::errors::ExporterError;
///
/// fn failing_function() -> Result<()> {
///     Err(ExporterError::Configuration("missing api key".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, ExporterError>;

/// Result of a single Tautulli API call
pub type ApiResult<T> = std::result::Result<T, TautulliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<u32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }

    #[test]
    fn test_api_result_err() {
        let result: ApiResult<()> = Err(TautulliError::Timeout("30s".to_string()));
        assert!(result.is_err());
    }
}

//! Error types for libreta-core
//!
//! Errors carry a programmatic code, a severity and a details record
//! with suggestions for the person fixing the data.

use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A record's date could not be parsed
    MalformedRecord,
    /// A required entry field is empty
    MissingField,
    /// Validation error
    ValidationError,
    /// Invalid data format
    InvalidFormat,
    /// IO error
    IoError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::MalformedRecord => write!(f, "MALFORMED_RECORD"),
            ErrorCode::MissingField => write!(f, "MISSING_FIELD"),
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ErrorCode::InvalidFormat => write!(f, "INVALID_FORMAT"),
            ErrorCode::IoError => write!(f, "IO_ERROR"),
        }
    }
}

/// Detailed error information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Warning - the caller can correct the input and retry
    Warning,
    /// Error - operation failed
    Error,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
        }
    }
}

/// Main error type for libreta-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Malformed record {id}: date {date:?} {reason}")]
    MalformedRecord {
        id: String,
        date: String,
        reason: String,
    },

    #[error("Missing field: {field}")]
    MissingField { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::MalformedRecord { .. } => ErrorCode::MalformedRecord,
            CoreError::MissingField { .. } => ErrorCode::MissingField,
            CoreError::ValidationError { .. } => ErrorCode::ValidationError,
            CoreError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
            CoreError::IoError(_) => ErrorCode::IoError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::MalformedRecord { .. } => ErrorSeverity::Error,
            CoreError::MissingField { .. } => ErrorSeverity::Warning,
            CoreError::ValidationError { .. } => ErrorSeverity::Warning,
            CoreError::InvalidFormat { .. } => ErrorSeverity::Error,
            CoreError::IoError(_) => ErrorSeverity::Error,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::MalformedRecord { id, date, .. } => {
                details = details.with_detail(serde_json::json!({ "id": id, "date": date }));
                details = details.with_suggestion(
                    "Dates must be written as YYYY-MM-DD.".to_string()
                );
                details = details.with_suggestion(format!(
                    "Fix or remove record '{}' and run the report again.", id
                ));
            }
            CoreError::MissingField { field } => {
                details = details.with_suggestion(format!(
                    "Fill in '{}' before saving the entry.", field
                ));
            }
            CoreError::InvalidFormat { message } => {
                details = details.with_detail(serde_json::json!({ "decode_message": message }));
                details = details.with_suggestion(
                    "The export must be a JSON array of record objects.".to_string()
                );
            }
            _ => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<serde_json::Error> for CoreError {
    fn from(error: serde_json::Error) -> Self {
        CoreError::InvalidFormat {
            message: error.to_string(),
        }
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::MalformedRecord.to_string(), "MALFORMED_RECORD");
        assert_eq!(ErrorCode::MissingField.to_string(), "MISSING_FIELD");
        assert_eq!(ErrorCode::InvalidFormat.to_string(), "INVALID_FORMAT");
    }

    #[test]
    fn test_core_error_code_and_severity() {
        let error = CoreError::MissingField { field: "clientName".to_string() };
        assert_eq!(error.code(), ErrorCode::MissingField);
        assert_eq!(error.severity(), ErrorSeverity::Warning);

        let error = CoreError::from(io::Error::new(io::ErrorKind::NotFound, "gastos.json"));
        assert_eq!(error.code(), ErrorCode::IoError);
        assert_eq!(error.severity(), ErrorSeverity::Error);
    }

    #[test]
    fn test_io_error_keeps_source() {
        use std::error::Error as _;

        let error = CoreError::from(io::Error::new(io::ErrorKind::PermissionDenied, "ingresos.json"));
        assert!(error.to_string().contains("ingresos.json"));
        let source = error.source().expect("io error source");
        assert_eq!(source.to_string(), "ingresos.json");
    }

    #[test]
    fn test_malformed_record_details() {
        let error = CoreError::MalformedRecord {
            id: "abc".to_string(),
            date: "2024-13-40".to_string(),
            reason: "is not a calendar date".to_string(),
        };
        let details = error.to_details();

        assert_eq!(details.code, ErrorCode::MalformedRecord);
        assert!(details.message.contains("abc"));
        assert!(details.message.contains("2024-13-40"));
        assert_eq!(details.details, Some(serde_json::json!({ "id": "abc", "date": "2024-13-40" })));
        assert_eq!(details.suggestions.len(), 2);
    }

    #[test]
    fn test_from_serde_json_error() {
        let err = serde_json::from_str::<Vec<u32>>("{").unwrap_err();
        let error: CoreError = err.into();
        assert_eq!(error.code(), ErrorCode::InvalidFormat);
        assert!(error.to_details().details.is_some());
    }

    #[test]
    fn test_error_details_display() {
        let details = ErrorDetails::new(ErrorCode::ValidationError, "bad".to_string())
            .with_suggestion("try again".to_string());
        let rendered = details.to_string();
        assert!(rendered.starts_with("[VALIDATION_ERROR] bad"));
        assert!(rendered.contains("  - try again"));
    }
}

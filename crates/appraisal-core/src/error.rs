use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AppraisalError {
    #[error("Invalid parameter: {field} — {reason}")]
    InvalidParameter { field: String, reason: String },

    #[error("Invalid discount rate {rate}: rate must be greater than -100%")]
    InvalidRate { rate: Decimal },

    #[error("No internal rate of return: {0}")]
    NoRoot(String),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Numeric overflow in {context}")]
    NumericOverflow { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl AppraisalError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AppraisalError::InvalidParameter {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for AppraisalError {
    fn from(e: serde_json::Error) -> Self {
        AppraisalError::SerializationError(e.to_string())
    }
}

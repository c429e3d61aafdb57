pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "projection")]
pub mod projection;

#[cfg(feature = "metrics")]
pub mod metrics;

#[cfg(feature = "metrics")]
pub mod appraisal;

#[cfg(feature = "extraction")]
pub mod extraction;

#[cfg(feature = "sensitivity")]
pub mod sensitivity;

pub use error::AppraisalError;
pub use types::*;

/// Standard result type for all appraisal operations
pub type AppraisalResult<T> = Result<T, AppraisalError>;

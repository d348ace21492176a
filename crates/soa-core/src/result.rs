//! Result type aliases for the SOA user service.

use crate::SoaError;

/// A specialized `Result` type for SOA operations.
pub type SoaResult<T> = Result<T, SoaError>;

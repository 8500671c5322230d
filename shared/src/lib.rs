//! Shared types for the table-booking service
//!
//! Common types used across crates: unified error codes with HTTP status
//! mapping, the standard API response envelope, and role definitions.

pub mod error;
pub mod response;
pub mod role;

// Re-exports
pub use error::ErrorCode;
pub use response::ApiResponse;
pub use role::Role;

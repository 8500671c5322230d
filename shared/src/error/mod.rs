//! Unified error codes for the booking service
//!
//! Error codes are shared between the server and API clients so that
//! failures stay machine-readable across the wire. See [`codes`] for the
//! full list and [`http`] for the HTTP status mapping. The server crate
//! owns the application error type built on top of these codes.

pub mod codes;
pub mod http;

pub use codes::ErrorCode;

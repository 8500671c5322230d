//! Error code definitions
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Booking errors
//! - 4xxx: Restaurant errors
//! - 5xxx: Review errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Codes serialize as u16 values for compact transport and easy matching
/// in non-Rust clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 6,
    /// Value out of range
    ValueOutOfRange = 7,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 3xxx: Booking ====================
    /// Booking not found
    BookingNotFound = 3001,
    /// Slot capacity exceeded for the requested time
    SlotUnavailable = 3002,
    /// Party size outside the allowed range
    PartySizeOutOfRange = 3003,
    /// Booking date is in the past
    PastDate = 3004,

    // ==================== 4xxx: Restaurant ====================
    /// Restaurant not found
    RestaurantNotFound = 4001,

    // ==================== 5xxx: Review ====================
    /// Review not found
    ReviewNotFound = 5001,
    /// Customer has already reviewed this restaurant
    DuplicateReview = 5002,
    /// Rating outside the allowed range
    RatingOutOfRange = 5003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Notification delivery failed
    NotificationFailed = 9003,
}

impl ErrorCode {
    /// Default human-readable message for this code
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::RequiredField => "Required field missing",
            Self::ValueOutOfRange => "Value out of range",
            Self::NotAuthenticated => "Authentication required",
            Self::InvalidCredentials => "Invalid username or password",
            Self::TokenExpired => "Token expired",
            Self::TokenInvalid => "Invalid token",
            Self::PermissionDenied => "Permission denied",
            Self::RoleRequired => "Role required",
            Self::AdminRequired => "Admin role required",
            Self::BookingNotFound => "Booking not found",
            Self::SlotUnavailable => {
                "Restaurant is not available for the selected time and party size"
            }
            Self::PartySizeOutOfRange => "Party size must be between 1 and 20",
            Self::PastDate => "Cannot book for a past date",
            Self::RestaurantNotFound => "Restaurant not found",
            Self::ReviewNotFound => "Review not found",
            Self::DuplicateReview => "You have already reviewed this restaurant",
            Self::RatingOutOfRange => "Rating must be between 1 and 5",
            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
            Self::NotificationFailed => "Notification delivery failed",
        }
    }

    /// Wire representation, e.g. `E3002`
    pub fn code_str(&self) -> String {
        format!("E{:04}", *self as u16)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code_str(), self.message())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code as u16
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Success),
            1 => Ok(Self::Unknown),
            2 => Ok(Self::ValidationFailed),
            3 => Ok(Self::NotFound),
            4 => Ok(Self::AlreadyExists),
            5 => Ok(Self::InvalidRequest),
            6 => Ok(Self::RequiredField),
            7 => Ok(Self::ValueOutOfRange),
            1001 => Ok(Self::NotAuthenticated),
            1002 => Ok(Self::InvalidCredentials),
            1003 => Ok(Self::TokenExpired),
            1004 => Ok(Self::TokenInvalid),
            2001 => Ok(Self::PermissionDenied),
            2002 => Ok(Self::RoleRequired),
            2003 => Ok(Self::AdminRequired),
            3001 => Ok(Self::BookingNotFound),
            3002 => Ok(Self::SlotUnavailable),
            3003 => Ok(Self::PartySizeOutOfRange),
            3004 => Ok(Self::PastDate),
            4001 => Ok(Self::RestaurantNotFound),
            5001 => Ok(Self::ReviewNotFound),
            5002 => Ok(Self::DuplicateReview),
            5003 => Ok(Self::RatingOutOfRange),
            9001 => Ok(Self::InternalError),
            9002 => Ok(Self::DatabaseError),
            9003 => Ok(Self::NotificationFailed),
            other => Err(format!("unknown error code: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_round_trip() {
        for code in [
            ErrorCode::Success,
            ErrorCode::SlotUnavailable,
            ErrorCode::DuplicateReview,
            ErrorCode::DatabaseError,
        ] {
            let raw: u16 = code.into();
            assert_eq!(ErrorCode::try_from(raw).unwrap(), code);
        }
    }

    #[test]
    fn code_str_format() {
        assert_eq!(ErrorCode::Success.code_str(), "E0000");
        assert_eq!(ErrorCode::SlotUnavailable.code_str(), "E3002");
    }

    #[test]
    fn unknown_code_rejected() {
        assert!(ErrorCode::try_from(42u16).is_err());
    }
}

//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 400 Bad Request - validation and malformed input
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::RequiredField
            | Self::ValueOutOfRange
            | Self::SlotUnavailable
            | Self::PartySizeOutOfRange
            | Self::PastDate
            | Self::RatingOutOfRange
            | Self::DuplicateReview => StatusCode::BAD_REQUEST,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied | Self::RoleRequired | Self::AdminRequired => {
                StatusCode::FORBIDDEN
            }

            // 404 Not Found
            Self::NotFound
            | Self::BookingNotFound
            | Self::RestaurantNotFound
            | Self::ReviewNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists => StatusCode::CONFLICT,

            // 500 Internal Server Error
            Self::Unknown
            | Self::InternalError
            | Self::DatabaseError
            | Self::NotificationFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_failure_is_a_validation_failure() {
        // Overselling a slot is rejected as bad input, not as a conflict
        assert_eq!(
            ErrorCode::SlotUnavailable.http_status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn duplicate_review_is_a_validation_failure() {
        // 重复评价是对请求内容的拒绝，不是资源冲突
        assert_eq!(
            ErrorCode::DuplicateReview.http_status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn permission_maps_to_forbidden() {
        assert_eq!(
            ErrorCode::PermissionDenied.http_status(),
            StatusCode::FORBIDDEN
        );
    }
}

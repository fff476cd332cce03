//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            Self::NotFound | Self::MapNotFound | Self::ItemNotFound => StatusCode::NOT_FOUND,

            Self::AlreadyExists | Self::MapHasItems => StatusCode::CONFLICT,

            Self::InternalError
            | Self::DatabaseError
            | Self::FileStorageFailed => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (validation and rejected uploads)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_status() {
        assert_eq!(ErrorCode::Success.http_status(), StatusCode::OK);
    }

    #[test]
    fn test_not_found_status() {
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::MapNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::ItemNotFound.http_status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_conflict_status() {
        assert_eq!(ErrorCode::MapHasItems.http_status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_asset_rejections_are_bad_request() {
        assert_eq!(
            ErrorCode::UnsupportedFileFormat.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ErrorCode::FileTooLarge.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::EmptyFile.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_system_errors_are_500() {
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::FileStorageFailed.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_is_bad_request() {
        assert_eq!(
            ErrorCode::ValidationFailed.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ErrorCode::RequiredField.http_status(), StatusCode::BAD_REQUEST);
    }
}

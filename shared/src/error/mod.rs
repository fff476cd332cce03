//! Unified error system for the inventory catalog
//!
//! - [`ErrorCode`]: Standardized numeric error codes
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Error type with code, message, and details
//! - [`ApiResponse`]: JSON envelope for error responses
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 60xx-64xx: Catalog errors (maps, items)
//! - 65xx-69xx: Asset errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::new(ErrorCode::MapNotFound);
//! let err = AppError::validation("Coordinates must be numbers")
//!     .with_detail("field", "x_coord");
//! let response = ApiResponse::<()>::error(&err);
//! assert_eq!(response.code, Some(2));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};

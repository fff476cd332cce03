//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement.

use shared::error::{AppError, ErrorCode};
use shared::models::{ItemCreate, ItemUpdate, MapCreate, MapUpdate};

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: map, item
pub const MAX_NAME_LEN: usize = 200;

/// Short labels: color, zone
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Tags, warnings
pub const MAX_NOTE_LEN: usize = 500;

/// Free-form item descriptions
pub const MAX_DESCRIPTION_LEN: usize = 2000;

/// URLs / asset paths
pub const MAX_URL_LEN: usize = 2048;

// ── Primitive checks ────────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::required(field));
    }
    validate_length(value, field, max_len)
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    match value {
        Some(v) => validate_length(v, field, max_len),
        None => Ok(()),
    }
}

fn validate_length(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Coordinates must be finite numbers
pub fn validate_coordinate(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(
            AppError::with_message(ErrorCode::InvalidFormat, format!("{field} must be a finite number"))
                .with_detail("field", field),
        );
    }
    Ok(())
}

pub fn validate_quantity(value: i64) -> Result<(), AppError> {
    if value < 0 {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("quantity must not be negative (got {value})"),
        )
        .with_detail("field", "quantity"));
    }
    Ok(())
}

// ── Entity checks ───────────────────────────────────────────────────

pub fn validate_map_create(data: &MapCreate) -> Result<(), AppError> {
    validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&data.svg_path, "svg_path", MAX_URL_LEN)?;
    validate_optional_text(&data.background_color, "background_color", MAX_SHORT_TEXT_LEN)
}

pub fn validate_map_update(data: &MapUpdate) -> Result<(), AppError> {
    if let Some(name) = &data.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(svg_path) = &data.svg_path {
        validate_required_text(svg_path, "svg_path", MAX_URL_LEN)?;
    }
    if let Some(color) = &data.background_color {
        validate_required_text(color, "background_color", MAX_SHORT_TEXT_LEN)?;
    }
    Ok(())
}

pub fn validate_item_create(data: &ItemCreate) -> Result<(), AppError> {
    validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
    validate_coordinate(data.x_coord, "x_coord")?;
    validate_coordinate(data.y_coord, "y_coord")?;
    validate_quantity(data.quantity)?;
    validate_length(&data.tags, "tags", MAX_NOTE_LEN)?;
    validate_length(&data.color, "color", MAX_SHORT_TEXT_LEN)?;
    validate_length(&data.zone, "zone", MAX_SHORT_TEXT_LEN)?;
    validate_length(&data.warning, "warning", MAX_NOTE_LEN)?;
    validate_length(&data.description, "description", MAX_DESCRIPTION_LEN)?;
    validate_length(&data.link, "link", MAX_URL_LEN)
}

pub fn validate_item_update(data: &ItemUpdate) -> Result<(), AppError> {
    if let Some(name) = &data.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(x) = data.x_coord {
        validate_coordinate(x, "x_coord")?;
    }
    if let Some(y) = data.y_coord {
        validate_coordinate(y, "y_coord")?;
    }
    if let Some(quantity) = data.quantity {
        validate_quantity(quantity)?;
    }
    validate_optional_text(&data.tags, "tags", MAX_NOTE_LEN)?;
    validate_optional_text(&data.color, "color", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&data.zone, "zone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&data.warning, "warning", MAX_NOTE_LEN)?;
    validate_optional_text(&data.description, "description", MAX_DESCRIPTION_LEN)?;
    validate_optional_text(&data.link, "link", MAX_URL_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_required_text_is_required_field() {
        let err = validate_required_text("   ", "name", MAX_NAME_LEN).unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert!(validate_required_text("Drill", "name", MAX_NAME_LEN).is_ok());
    }

    #[test]
    fn length_counts_chars_not_bytes() {
        let umlauts = "ö".repeat(MAX_SHORT_TEXT_LEN);
        assert!(validate_optional_text(&Some(umlauts), "zone", MAX_SHORT_TEXT_LEN).is_ok());
        let too_long = "x".repeat(MAX_NAME_LEN + 1);
        let err = validate_required_text(&too_long, "name", MAX_NAME_LEN).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn coordinates_must_be_finite() {
        assert!(validate_coordinate(12.5, "x_coord").is_ok());
        assert_eq!(
            validate_coordinate(f64::NAN, "x_coord").unwrap_err().code,
            ErrorCode::InvalidFormat
        );
        assert!(validate_coordinate(f64::INFINITY, "y_coord").is_err());
    }

    #[test]
    fn item_create_checks_quantity_and_name() {
        let mut data = ItemCreate::new("Drill", 1, 0.0, 0.0);
        assert!(validate_item_create(&data).is_ok());

        data.quantity = -2;
        assert_eq!(
            validate_item_create(&data).unwrap_err().code,
            ErrorCode::ValueOutOfRange
        );

        let data = ItemCreate::new("", 1, 0.0, 0.0);
        assert_eq!(
            validate_item_create(&data).unwrap_err().code,
            ErrorCode::RequiredField
        );
    }

    #[test]
    fn item_update_rejects_blank_name_but_allows_absent() {
        assert!(validate_item_update(&ItemUpdate::default()).is_ok());
        let patch = ItemUpdate {
            name: Some(" ".into()),
            ..Default::default()
        };
        assert!(validate_item_update(&patch).is_err());
    }

    #[test]
    fn map_update_rejects_blank_svg_path() {
        let patch = MapUpdate {
            svg_path: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(
            validate_map_update(&patch).unwrap_err().code,
            ErrorCode::RequiredField
        );
    }
}

//! Item request bodies
//!
//! `POST /api/items` and `PUT /api/items/{id}` accept a `multipart/form-data`
//! form (text fields plus an optional `image` file), a plain urlencoded form,
//! or a flat JSON object. All of them are normalized into string fields first
//! so required/format checks behave the same for every encoding.

use axum::extract::{FromRequest, Multipart, Request};
use axum::{Form, Json};
use http::StatusCode;
use http::header::CONTENT_TYPE;
use serde_json::Value;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{DEFAULT_ITEM_COLOR, DEFAULT_ITEM_QUANTITY, ItemCreate, ItemUpdate};
use std::collections::HashMap;

use crate::core::ServerState;
use crate::services::ImageUpload;

/// Multipart part carrying the item image
pub const IMAGE_FIELD: &str = "image";

#[derive(Debug, Default)]
pub struct ItemPayload {
    fields: HashMap<String, String>,
    image: Option<ImageUpload>,
}

impl FromRequest<ServerState> for ItemPayload {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &ServerState) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state).await.map_err(|e| {
                AppError::invalid_request(format!("Invalid multipart request: {}", e.body_text()))
            })?;
            Self::from_multipart(multipart).await
        } else if content_type.starts_with("application/json") {
            let Json(object) = Json::<serde_json::Map<String, Value>>::from_request(req, state)
                .await
                .map_err(|e| {
                    AppError::invalid_request(format!("Invalid JSON body: {}", e.body_text()))
                })?;
            Self::from_json(object)
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| {
                    AppError::invalid_request(format!("Invalid form body: {}", e.body_text()))
                })?;
            Ok(Self {
                fields,
                image: None,
            })
        } else {
            Err(AppError::with_message(
                ErrorCode::InvalidRequest,
                "Expected a multipart/form-data, urlencoded form or application/json body",
            ))
        }
    }
}

impl ItemPayload {
    async fn from_multipart(mut multipart: Multipart) -> AppResult<Self> {
        let mut payload = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or_default().to_string();

            if name == IMAGE_FIELD {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await.map_err(multipart_error)?;
                // Browsers send an empty, unnamed part when no file was picked
                if filename.is_empty() && data.is_empty() {
                    continue;
                }
                if filename.is_empty() {
                    return Err(AppError::new(ErrorCode::NoFilename));
                }
                payload.image = Some(ImageUpload {
                    filename,
                    data: data.to_vec(),
                });
            } else if !name.is_empty() {
                let text = field.text().await.map_err(multipart_error)?;
                payload.fields.insert(name, text);
            }
        }

        Ok(payload)
    }

    fn from_json(object: serde_json::Map<String, Value>) -> AppResult<Self> {
        let mut fields = HashMap::with_capacity(object.len());
        for (key, value) in object {
            let text = match value {
                Value::Null => continue,
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(AppError::with_message(
                        ErrorCode::InvalidFormat,
                        format!("{key} must be a scalar value"),
                    )
                    .with_detail("field", key));
                }
            };
            fields.insert(key, text);
        }
        Ok(Self {
            fields,
            image: None,
        })
    }

    /// Fields for a new item; `name`, `x_coord`, `y_coord` and `map_id` are required
    pub fn into_create(self) -> AppResult<(ItemCreate, Option<ImageUpload>)> {
        let f = &self.fields;
        let data = ItemCreate {
            name: required_text(f, "name")?,
            x_coord: required_number(f, "x_coord")?,
            y_coord: required_number(f, "y_coord")?,
            map_id: required_number(f, "map_id")?,
            tags: text(f, "tags").unwrap_or_default(),
            color: text(f, "color")
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ITEM_COLOR.to_string()),
            zone: text(f, "zone").unwrap_or_default(),
            quantity: number(f, "quantity")?.unwrap_or(DEFAULT_ITEM_QUANTITY),
            warning: text(f, "warning").unwrap_or_default(),
            description: text(f, "description").unwrap_or_default(),
            link: text(f, "link").unwrap_or_default(),
        };
        Ok((data, self.image))
    }

    /// Fields present in the request; everything else is left untouched
    pub fn into_update(self) -> AppResult<(ItemUpdate, Option<ImageUpload>)> {
        let f = &self.fields;
        let data = ItemUpdate {
            name: text(f, "name"),
            tags: text(f, "tags"),
            x_coord: number(f, "x_coord")?,
            y_coord: number(f, "y_coord")?,
            map_id: number(f, "map_id")?,
            color: text(f, "color"),
            zone: text(f, "zone"),
            quantity: number(f, "quantity")?,
            warning: text(f, "warning"),
            description: text(f, "description"),
            link: text(f, "link"),
        };
        Ok((data, self.image))
    }
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::with_message(ErrorCode::FileTooLarge, e.body_text())
    } else {
        AppError::invalid_request(format!("Invalid multipart request: {}", e.body_text()))
    }
}

fn text(fields: &HashMap<String, String>, key: &str) -> Option<String> {
    fields.get(key).cloned()
}

fn required_text(fields: &HashMap<String, String>, key: &str) -> AppResult<String> {
    match fields.get(key) {
        Some(v) if !v.trim().is_empty() => Ok(v.clone()),
        _ => Err(AppError::required(key)),
    }
}

/// Parse a numeric field; blank values count as absent
fn number<T: std::str::FromStr>(
    fields: &HashMap<String, String>,
    key: &str,
) -> AppResult<Option<T>> {
    match fields.get(key).map(|v| v.trim()) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse::<T>().map(Some).map_err(|_| {
            AppError::with_message(ErrorCode::InvalidFormat, format!("{key} must be a number"))
                .with_detail("field", key)
                .with_detail("value", raw)
        }),
    }
}

fn required_number<T: std::str::FromStr>(
    fields: &HashMap<String, String>,
    key: &str,
) -> AppResult<T> {
    number(fields, key)?.ok_or_else(|| AppError::required(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> ItemPayload {
        match value {
            Value::Object(map) => ItemPayload::from_json(map).unwrap(),
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn create_from_json_applies_defaults() {
        let (data, image) = payload(json!({
            "name": "Drill",
            "x_coord": 10,
            "y_coord": "20.5",
            "map_id": 1,
            "description": null
        }))
        .into_create()
        .unwrap();

        assert!(image.is_none());
        assert_eq!(data.name, "Drill");
        assert_eq!(data.x_coord, 10.0);
        assert_eq!(data.y_coord, 20.5);
        assert_eq!(data.map_id, 1);
        assert_eq!(data.color, "red");
        assert_eq!(data.quantity, 1);
        assert_eq!(data.description, "");
    }

    #[test]
    fn create_requires_name_and_coordinates() {
        let err = payload(json!({"x_coord": 1, "y_coord": 2, "map_id": 1}))
            .into_create()
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert_eq!(err.details.unwrap().get("field").unwrap(), "name");

        let err = payload(json!({"name": "Drill", "x_coord": "", "y_coord": 2, "map_id": 1}))
            .into_create()
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);

        let err = payload(json!({"name": "Drill", "x_coord": "left", "y_coord": 2, "map_id": 1}))
            .into_create()
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
    }

    #[test]
    fn update_only_carries_present_fields() {
        let (data, _) = payload(json!({"quantity": "5", "zone": "", "unknown": "x"}))
            .into_update()
            .unwrap();
        assert_eq!(data.quantity, Some(5));
        assert_eq!(data.zone.as_deref(), Some(""));
        assert!(data.name.is_none());
        assert!(data.x_coord.is_none());
    }

    #[test]
    fn nested_json_values_are_rejected() {
        let Value::Object(map) = json!({"name": ["a"]}) else {
            unreachable!()
        };
        let err = ItemPayload::from_json(map).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
    }
}

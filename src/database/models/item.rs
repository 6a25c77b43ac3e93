use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{check_length, FieldErrors};

pub const ITEM_NAME_MAX_CHARS: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: i32,
    pub name: String,
    pub is_complete: bool,
    pub user_id: Option<i32>,
}

/// Body of `POST /Item`. The completion flag is accepted but ignored:
/// new items always start incomplete.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_complete: Option<bool>,
}

impl NewItem {
    /// Return the trimmed item name, or the field errors that reject it.
    pub fn validated_name(&self) -> Result<String, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = self.name.as_deref().map(str::trim).unwrap_or_default();

        if name.is_empty() {
            errors.insert("name".to_string(), "This field is required".to_string());
        } else {
            check_length(&mut errors, "name", name, ITEM_NAME_MAX_CHARS);
        }

        if errors.is_empty() {
            Ok(name.to_string())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_camel_case_fields() {
        let item = Item { id: 7, name: "milk".into(), is_complete: false, user_id: Some(3) };
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value, json!({ "id": 7, "name": "milk", "isComplete": false, "userId": 3 }));
    }

    #[test]
    fn missing_or_blank_name_is_rejected() {
        let blank: NewItem = serde_json::from_value(json!({ "name": "   ", "isComplete": true })).unwrap();
        assert!(blank.validated_name().unwrap_err().contains_key("name"));

        let missing: NewItem = serde_json::from_value(json!({ "isComplete": true })).unwrap();
        assert!(missing.validated_name().is_err());
    }

    #[test]
    fn name_length_is_counted_in_characters() {
        let at_limit = NewItem { name: Some("é".repeat(ITEM_NAME_MAX_CHARS)), is_complete: None };
        assert!(at_limit.validated_name().is_ok());

        let over = NewItem { name: Some("x".repeat(ITEM_NAME_MAX_CHARS + 1)), is_complete: None };
        assert!(over.validated_name().is_err());
    }
}

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{check_length, FieldErrors};

pub const USER_NAME_MAX_CHARS: usize = 45;
pub const EMAIL_MAX_CHARS: usize = 45;
/// Upper bound on accepted passwords; Argon2 cost grows with input size.
pub const PASSWORD_MAX_CHARS: usize = 1024;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub user_name: String,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// Body of `POST /register`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Registration input after validation, ready to hash and persist.
#[derive(Debug, Clone)]
pub struct ValidUser {
    pub user_name: String,
    pub email: Option<String>,
    pub password: String,
}

impl NewUser {
    pub fn validate(self) -> Result<ValidUser, FieldErrors> {
        let mut errors = FieldErrors::new();

        let user_name = self.user_name.unwrap_or_default().trim().to_string();
        if user_name.is_empty() {
            errors.insert("userName".to_string(), "This field is required".to_string());
        } else {
            check_length(&mut errors, "userName", &user_name, USER_NAME_MAX_CHARS);
        }

        let email = self
            .email
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());
        if let Some(email) = &email {
            check_length(&mut errors, "email", email, EMAIL_MAX_CHARS);
        }

        let password = self.password.unwrap_or_default();
        if password.is_empty() {
            errors.insert("password".to_string(), "This field is required".to_string());
        } else {
            check_length(&mut errors, "password", &password, PASSWORD_MAX_CHARS);
        }

        if errors.is_empty() {
            Ok(ValidUser { user_name, email, password })
        } else {
            Err(errors)
        }
    }
}

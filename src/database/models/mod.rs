pub mod item;
pub mod user;

pub use item::{Item, NewItem};
pub use user::{NewUser, User, ValidUser};

use std::collections::HashMap;

/// Per-field validation failures, keyed by the wire name of the field.
pub type FieldErrors = HashMap<String, String>;

pub(crate) fn check_length(
    errors: &mut FieldErrors,
    field: &str,
    value: &str,
    max_chars: usize,
) {
    if value.chars().count() > max_chars {
        errors.insert(
            field.to_string(),
            format!("Must be at most {} characters", max_chars),
        );
    }
}

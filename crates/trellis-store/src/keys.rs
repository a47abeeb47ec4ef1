//! S3 key conventions for form documents.
//!
//! Pure string functions defining the canonical object layout.

use uuid::Uuid;

pub fn form(id: Uuid) -> String {
    format!("forms/{id}.json")
}

pub const FORMS_PREFIX: &str = "forms/";

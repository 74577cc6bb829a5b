//! Book model and related types

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppResult;

/// Book as returned by the catalog endpoints.
///
/// Copy counts are owned by the server; `available` never exceeds `copies`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub copies: i64,
    pub available: i64,
    #[serde(default, with = "super::timestamp::option", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
}

/// Create book request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewBook {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub author: String,
    #[validate(length(min = 1))]
    pub isbn: String,
    pub copies: i64,
}

impl NewBook {
    /// Build a request from raw form values.
    ///
    /// Text fields are trimmed and must not be empty; copies follow [`super::parse_copies`].
    pub fn from_form(title: &str, author: &str, isbn: &str, copies: &str) -> AppResult<Self> {
        let book = Self {
            title: title.trim().to_string(),
            author: author.trim().to_string(),
            isbn: isbn.trim().to_string(),
            copies: super::parse_copies(copies),
        };
        book.validate()?;
        Ok(book)
    }
}

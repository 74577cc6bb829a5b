//! Member model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default, with = "super::timestamp::option", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
}

/// Create member request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewMember {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub email: String,
}

impl NewMember {
    pub fn from_form(name: &str, email: &str) -> AppResult<Self> {
        let member = Self {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
        };
        member.validate()?;
        Ok(member)
    }
}

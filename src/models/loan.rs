//! Loan model and related types

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Loan as listed by the API, with the book title and member name denormalized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: i64,
    #[serde(default)]
    pub book_id: Option<i64>,
    #[serde(default)]
    pub member_id: Option<i64>,
    #[serde(default)]
    pub book_title: Option<String>,
    #[serde(default)]
    pub member_name: Option<String>,
    #[serde(with = "super::timestamp")]
    pub issued_at: NaiveDateTime,
    #[serde(default, with = "super::timestamp::option")]
    pub returned_at: Option<NaiveDateTime>,
}

/// Loan lifecycle: an open loan can only move to returned, which is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanStatus {
    Open,
    Returned,
}

impl Loan {
    pub fn status(&self) -> LoanStatus {
        match self.returned_at {
            Some(_) => LoanStatus::Returned,
            None => LoanStatus::Open,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status() == LoanStatus::Open
    }
}

/// Issue loan request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueLoan {
    pub book_id: i64,
    pub member_id: i64,
}

/// Return loan request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnLoan {
    pub loan_id: i64,
}

//! Row descriptions for the list views
//!
//! Each function maps fetched data to what a table or selector should show. Nothing here
//! touches the network or the UI host, so a list view is always fully rebuilt from its data.

use chrono::NaiveDateTime;

use crate::models::{Book, Loan, Member};

/// Shown in place of a missing return timestamp
pub const NOT_RETURNED: &str = "-";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Action attached to a control inside a table row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    DeleteBook(i64),
    ReturnLoan(i64),
}

impl RowAction {
    pub fn label(&self) -> &'static str {
        match self {
            RowAction::DeleteBook(_) => "Delete",
            RowAction::ReturnLoan(_) => "Return",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    /// A clickable control
    Action(RowAction),
    Empty,
}

impl Cell {
    fn text(value: impl ToString) -> Self {
        Cell::Text(value.to_string())
    }

    /// Plain text representation, as printed by text hosts
    pub fn display(&self) -> String {
        match self {
            Cell::Text(text) => text.clone(),
            Cell::Action(action) => format!("[{}]", action.label()),
            Cell::Empty => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// Identity of the record the row shows
    pub key: i64,
    pub cells: Vec<Cell>,
}

impl TableRow {
    pub fn actions(&self) -> impl Iterator<Item = RowAction> + '_ {
        self.cells.iter().filter_map(|cell| match cell {
            Cell::Action(action) => Some(*action),
            _ => None,
        })
    }
}

/// Entry of a selector used by the issue-loan form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

pub const BOOK_COLUMNS: [&str; 6] = ["Title", "Author", "ISBN", "Copies", "Available", ""];
pub const MEMBER_COLUMNS: [&str; 2] = ["Name", "Email"];
pub const LOAN_COLUMNS: [&str; 5] = ["Book", "Member", "Issued", "Returned", ""];

pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

pub fn book_rows(books: &[Book]) -> Vec<TableRow> {
    books
        .iter()
        .map(|b| TableRow {
            key: b.id,
            cells: vec![
                Cell::text(&b.title),
                Cell::text(&b.author),
                Cell::text(&b.isbn),
                Cell::text(b.copies),
                Cell::text(b.available),
                Cell::Action(RowAction::DeleteBook(b.id)),
            ],
        })
        .collect()
}

pub fn member_rows(members: &[Member]) -> Vec<TableRow> {
    members
        .iter()
        .map(|m| TableRow {
            key: m.id,
            cells: vec![Cell::text(&m.name), Cell::text(&m.email)],
        })
        .collect()
}

/// Loan rows; only open loans get a Return control
pub fn loan_rows(loans: &[Loan]) -> Vec<TableRow> {
    loans
        .iter()
        .map(|l| {
            let returned = l
                .returned_at
                .as_ref()
                .map(format_timestamp)
                .unwrap_or_else(|| NOT_RETURNED.to_string());
            let action = if l.is_open() {
                Cell::Action(RowAction::ReturnLoan(l.id))
            } else {
                Cell::Empty
            };
            TableRow {
                key: l.id,
                cells: vec![
                    Cell::text(l.book_title.as_deref().unwrap_or_default()),
                    Cell::text(l.member_name.as_deref().unwrap_or_default()),
                    Cell::text(format_timestamp(&l.issued_at)),
                    Cell::Text(returned),
                    action,
                ],
            }
        })
        .collect()
}

pub fn book_options(books: &[Book]) -> Vec<SelectOption> {
    books
        .iter()
        .map(|b| SelectOption {
            value: b.id.to_string(),
            label: format!("{} ({}/{})", b.title, b.available, b.copies),
        })
        .collect()
}

pub fn member_options(members: &[Member]) -> Vec<SelectOption> {
    members
        .iter()
        .map(|m| SelectOption {
            value: m.id.to_string(),
            label: m.name.clone(),
        })
        .collect()
}

//! Library Desk
//!
//! Circulation client for the library REST API: lists books, members and loans, and
//! issues the create, delete, search, issue and return requests behind the desk forms.
//! Views are described as plain rows by [`view`] and rendered by any [`ui::Ui`] host.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod terminal;
pub mod ui;
pub mod view;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

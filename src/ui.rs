//! UI host abstraction
//!
//! The controller never reaches into a global document: it is handed a [`Ui`] that owns the
//! input fields, tables and selectors it works with. [`MemoryUi`] keeps all of that state
//! in memory and records alerts, which makes it usable both in tests and as the state
//! store of text front ends.

use std::collections::{HashMap, VecDeque};

use crate::view::{SelectOption, TableRow};

/// Text inputs of the desk forms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    BookSearch,
    Title,
    Author,
    Isbn,
    Copies,
    MemberName,
    MemberEmail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Books,
    Members,
    Loans,
}

/// Selectors of the issue-loan form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Select {
    LoanBook,
    LoanMember,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Books,
    Members,
    Loans,
}

impl Tab {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "books" => Some(Tab::Books),
            "members" => Some(Tab::Members),
            "loans" => Some(Tab::Loans),
            _ => None,
        }
    }
}

/// Element references the controller is bound to
pub trait Ui {
    /// Current value of a text input
    fn value(&self, field: Field) -> String;

    fn set_value(&mut self, field: Field, value: &str);

    /// Value of the selected option, empty when nothing is selected
    fn selected(&self, select: Select) -> String;

    /// Replace every row of a table body
    fn replace_rows(&mut self, table: Table, rows: Vec<TableRow>);

    /// Replace every option of a selector
    fn replace_options(&mut self, select: Select, options: Vec<SelectOption>);

    fn show_tab(&mut self, tab: Tab);

    /// Blocking message to the user
    fn alert(&mut self, message: &str);

    /// Blocking yes/no question
    fn confirm(&mut self, message: &str) -> bool;
}

/// In-memory UI state
#[derive(Debug, Default)]
pub struct MemoryUi {
    values: HashMap<Field, String>,
    tables: HashMap<Table, Vec<TableRow>>,
    options: HashMap<Select, Vec<SelectOption>>,
    /// Explicit choices; `None` means an unknown value was chosen and nothing is selected
    selections: HashMap<Select, Option<String>>,
    active_tab: Tab,
    alerts: Vec<String>,
    confirmations: VecDeque<bool>,
}

impl MemoryUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self, table: Table) -> &[TableRow] {
        self.tables.get(&table).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn options(&self, select: Select) -> &[SelectOption] {
        self.options.get(&select).map(Vec::as_slice).unwrap_or_default()
    }

    /// Select an option by value; an unknown value leaves nothing selected
    pub fn select(&mut self, select: Select, value: &str) {
        let known = self.options(select).iter().any(|o| o.value == value);
        self.selections.insert(select, known.then(|| value.to_string()));
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }

    /// Queue the answer to the next confirm prompt; unanswered prompts decline
    pub fn answer_next_confirm(&mut self, answer: bool) {
        self.confirmations.push_back(answer);
    }
}

impl Ui for MemoryUi {
    fn value(&self, field: Field) -> String {
        self.values.get(&field).cloned().unwrap_or_default()
    }

    fn set_value(&mut self, field: Field, value: &str) {
        self.values.insert(field, value.to_string());
    }

    fn selected(&self, select: Select) -> String {
        match self.selections.get(&select) {
            Some(Some(value)) => value.clone(),
            Some(None) => String::new(),
            // Like a native <select>, the first option is selected by default
            None => self
                .options(select)
                .first()
                .map(|o| o.value.clone())
                .unwrap_or_default(),
        }
    }

    fn replace_rows(&mut self, table: Table, rows: Vec<TableRow>) {
        self.tables.insert(table, rows);
    }

    fn replace_options(&mut self, select: Select, options: Vec<SelectOption>) {
        // Rebuilding the options drops a choice that is no longer listed
        let keep = match self.selections.get(&select) {
            Some(Some(current)) => options.iter().any(|o| &o.value == current),
            _ => false,
        };
        if !keep {
            self.selections.remove(&select);
        }
        self.options.insert(select, options);
    }

    fn show_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn confirm(&mut self, _message: &str) -> bool {
        self.confirmations.pop_front().unwrap_or(false)
    }
}

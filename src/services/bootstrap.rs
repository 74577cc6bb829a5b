//! Startup sequencing

use std::fmt;

use crate::{
    error::AppError,
    services::{desk::Desk, gateway::LibraryApi},
    ui::Ui,
};

/// The initial loads, in the order they run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStep {
    Books,
    Members,
    LoanBookSelector,
    LoanMemberSelector,
    Loans,
}

impl LoadStep {
    pub const ORDER: [LoadStep; 5] = [
        LoadStep::Books,
        LoadStep::Members,
        LoadStep::LoanBookSelector,
        LoadStep::LoanMemberSelector,
        LoadStep::Loans,
    ];
}

impl fmt::Display for LoadStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoadStep::Books => "book list",
            LoadStep::Members => "member list",
            LoadStep::LoanBookSelector => "loan book selector",
            LoadStep::LoanMemberSelector => "loan member selector",
            LoadStep::Loans => "loan list",
        };
        f.write_str(name)
    }
}

/// Result of every initial load
#[derive(Debug)]
pub struct StartupReport {
    pub steps: Vec<(LoadStep, Result<(), AppError>)>,
}

impl StartupReport {
    pub fn is_success(&self) -> bool {
        self.steps.iter().all(|(_, result)| result.is_ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (LoadStep, &AppError)> + '_ {
        self.steps
            .iter()
            .filter_map(|(step, result)| result.as_ref().err().map(|e| (*step, e)))
    }
}

impl<A: LibraryApi, U: Ui> Desk<A, U> {
    /// Populate every view once, in [`LoadStep::ORDER`].
    ///
    /// A failed step does not stop the following ones; the report says which failed.
    pub async fn bootstrap(&mut self) -> StartupReport {
        let mut steps = Vec::with_capacity(LoadStep::ORDER.len());
        for step in LoadStep::ORDER {
            let result = match step {
                LoadStep::Books => self.load_books("").await,
                LoadStep::Members => self.load_members().await,
                LoadStep::LoanBookSelector => self.load_books_for_loan().await,
                LoadStep::LoanMemberSelector => self.load_members_for_loan().await,
                LoadStep::Loans => self.load_loans().await,
            };
            if let Err(e) = &result {
                tracing::error!("Failed to load {}: {}", step, e);
            }
            steps.push((step, result));
        }
        StartupReport { steps }
    }
}

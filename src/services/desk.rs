//! Circulation desk controller
//!
//! One [`Desk`] is built per UI and owns both the API handle and the UI it renders into.
//! Loaders fetch a list and rebuild one view from it; `on_*` handlers are what the host
//! calls for user actions. A handler runs its mutation first and then its reloads one at a
//! time, each awaited before the next. Nothing is shared between handlers, so two handlers
//! started back to back race at the network layer.

use crate::{
    error::{AppError, AppResult},
    models::{parse_id, IssueLoan, NewBook, NewMember, ReturnLoan},
    services::gateway::LibraryApi,
    ui::{Field, Select, Tab, Table, Ui},
    view::{self, RowAction},
};

pub const CONFIRM_DELETE_BOOK: &str = "Delete this book?";
pub const SELECT_BOOK_AND_MEMBER: &str = "Select a book and a member";

/// How a user action ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Completed,
    /// Blocked locally before any request was sent
    Rejected,
    /// The user declined the confirmation prompt
    Cancelled,
    /// A request failed; carries the message shown to the user
    Failed(String),
}

pub struct Desk<A, U> {
    pub(crate) api: A,
    pub(crate) ui: U,
}

impl<A: LibraryApi, U: Ui> Desk<A, U> {
    pub fn new(api: A, ui: U) -> Self {
        Self { api, ui }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut U {
        &mut self.ui
    }

    // Loaders

    /// Rebuild the books table; an empty query lists every book
    pub async fn load_books(&mut self, query: &str) -> AppResult<()> {
        let books = self.api.list_books(query).await?;
        self.ui.replace_rows(Table::Books, view::book_rows(&books));
        Ok(())
    }

    pub async fn load_members(&mut self) -> AppResult<()> {
        let members = self.api.list_members().await?;
        self.ui.replace_rows(Table::Members, view::member_rows(&members));
        Ok(())
    }

    pub async fn load_loans(&mut self) -> AppResult<()> {
        let loans = self.api.list_loans().await?;
        self.ui.replace_rows(Table::Loans, view::loan_rows(&loans));
        Ok(())
    }

    /// Rebuild the book selector of the issue-loan form
    pub async fn load_books_for_loan(&mut self) -> AppResult<()> {
        let books = self.api.list_books("").await?;
        self.ui.replace_options(Select::LoanBook, view::book_options(&books));
        Ok(())
    }

    /// Rebuild the member selector of the issue-loan form
    pub async fn load_members_for_loan(&mut self) -> AppResult<()> {
        let members = self.api.list_members().await?;
        self.ui.replace_options(Select::LoanMember, view::member_options(&members));
        Ok(())
    }

    // Handlers

    pub fn on_select_tab(&mut self, tab: Tab) {
        self.ui.show_tab(tab);
    }

    pub async fn on_search_books(&mut self) -> ActionOutcome {
        let query = self.ui.value(Field::BookSearch);
        let result = self.load_books(&query).await;
        self.finish(result)
    }

    pub async fn on_add_book(&mut self) -> ActionOutcome {
        let form = NewBook::from_form(
            &self.ui.value(Field::Title),
            &self.ui.value(Field::Author),
            &self.ui.value(Field::Isbn),
            &self.ui.value(Field::Copies),
        );
        let book = match form {
            Ok(book) => book,
            Err(e) => return self.reject(e),
        };
        let result = self.add_book(&book).await;
        self.finish(result)
    }

    async fn add_book(&mut self, book: &NewBook) -> AppResult<()> {
        let created = self.api.create_book(book).await?;
        tracing::info!("Book {} '{}' added", created.id, created.title);

        for field in [Field::Title, Field::Author, Field::Isbn] {
            self.ui.set_value(field, "");
        }
        self.ui.set_value(Field::Copies, "1");

        self.load_books("").await?;
        self.load_books_for_loan().await
    }

    /// Delete a book after the user confirms
    pub async fn on_delete_book(&mut self, id: i64) -> ActionOutcome {
        if !self.ui.confirm(CONFIRM_DELETE_BOOK) {
            return ActionOutcome::Cancelled;
        }
        let result = self.delete_book(id).await;
        self.finish(result)
    }

    async fn delete_book(&mut self, id: i64) -> AppResult<()> {
        self.api.delete_book(id).await?;
        tracing::info!("Book {} deleted", id);
        self.load_books("").await?;
        self.load_books_for_loan().await
    }

    pub async fn on_add_member(&mut self) -> ActionOutcome {
        let form = NewMember::from_form(
            &self.ui.value(Field::MemberName),
            &self.ui.value(Field::MemberEmail),
        );
        let member = match form {
            Ok(member) => member,
            Err(e) => return self.reject(e),
        };
        let result = self.add_member(&member).await;
        self.finish(result)
    }

    async fn add_member(&mut self, member: &NewMember) -> AppResult<()> {
        let created = self.api.create_member(member).await?;
        tracing::info!("Member {} '{}' added", created.id, created.name);

        self.ui.set_value(Field::MemberName, "");
        self.ui.set_value(Field::MemberEmail, "");

        self.load_members().await?;
        self.load_members_for_loan().await
    }

    /// Issue a loan for the book and member currently selected
    pub async fn on_issue_loan(&mut self) -> ActionOutcome {
        let book_id = parse_id(&self.ui.selected(Select::LoanBook));
        let member_id = parse_id(&self.ui.selected(Select::LoanMember));
        let request = match (book_id, member_id) {
            (Some(book_id), Some(member_id)) => IssueLoan { book_id, member_id },
            _ => return self.reject(AppError::Validation(SELECT_BOOK_AND_MEMBER.to_string())),
        };
        let result = self.issue_loan(request).await;
        self.finish(result)
    }

    async fn issue_loan(&mut self, request: IssueLoan) -> AppResult<()> {
        let loan = self.api.issue_loan(request).await?;
        tracing::info!(
            "Loan {} issued: book {} to member {}",
            loan.id,
            request.book_id,
            request.member_id
        );
        self.refresh_circulation().await
    }

    pub async fn on_return_loan(&mut self, loan_id: i64) -> ActionOutcome {
        let result = self.return_loan(loan_id).await;
        self.finish(result)
    }

    async fn return_loan(&mut self, loan_id: i64) -> AppResult<()> {
        self.api.return_loan(ReturnLoan { loan_id }).await?;
        tracing::info!("Loan {} returned", loan_id);
        self.refresh_circulation().await
    }

    /// Dispatch a click on a table row control
    pub async fn on_table_action(&mut self, action: RowAction) -> ActionOutcome {
        match action {
            RowAction::DeleteBook(id) => self.on_delete_book(id).await,
            RowAction::ReturnLoan(id) => self.on_return_loan(id).await,
        }
    }

    /// Reloads after a loan changes state. Members are not affected by loans and stay as is.
    async fn refresh_circulation(&mut self) -> AppResult<()> {
        self.load_books("").await?;
        self.load_books_for_loan().await?;
        self.load_loans().await
    }

    fn reject(&mut self, error: AppError) -> ActionOutcome {
        self.ui.alert(&error.user_message());
        ActionOutcome::Rejected
    }

    fn finish(&mut self, result: AppResult<()>) -> ActionOutcome {
        match result {
            Ok(()) => ActionOutcome::Completed,
            Err(e) => {
                let message = e.user_message();
                tracing::warn!("Action failed: {}", message);
                self.ui.alert(&message);
                ActionOutcome::Failed(message)
            }
        }
    }
}

//! Desk controller driving the real gateway against the fake API

use library_desk::{
    config::{ApiConfig, AppConfig, LoggingConfig},
    services::{self, ActionOutcome},
    ui::{Field, MemoryUi, Select, Table, Ui},
    view::{Cell, RowAction, NOT_RETURNED},
};

use crate::fake_api::FakeApi;

fn config(base_url: &str) -> AppConfig {
    AppConfig {
        api: ApiConfig {
            base_url: base_url.to_string(),
        },
        logging: LoggingConfig::default(),
    }
}

fn text(cell: &Cell) -> String {
    cell.display()
}

#[tokio::test]
async fn test_bootstrap_against_empty_library() {
    let fake = FakeApi::spawn().await;
    let mut desk = services::connect(&config(&fake.base_url), MemoryUi::new());

    let report = desk.bootstrap().await;
    assert!(report.is_success());
    assert_eq!(
        fake.request_lines(),
        [
            "GET /api/books",
            "GET /api/members",
            "GET /api/books",
            "GET /api/members",
            "GET /api/loans"
        ]
    );
}

#[tokio::test]
async fn test_bootstrap_reports_unreachable_api() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut desk = services::connect(&config(&format!("http://{}", addr)), MemoryUi::new());
    let report = desk.bootstrap().await;
    assert_eq!(report.failures().count(), 5);
}

#[tokio::test]
async fn test_circulation_round_trip() {
    let fake = FakeApi::spawn().await;
    let mut desk = services::connect(&config(&fake.base_url), MemoryUi::new());
    assert!(desk.bootstrap().await.is_success());

    // Add a book
    let ui = desk.ui_mut();
    ui.set_value(Field::Title, "Dune");
    ui.set_value(Field::Author, "Herbert");
    ui.set_value(Field::Isbn, "111");
    ui.set_value(Field::Copies, "3");
    assert_eq!(desk.on_add_book().await, ActionOutcome::Completed);

    let rows = desk.ui().rows(Table::Books);
    assert_eq!(rows.len(), 1);
    assert_eq!(text(&rows[0].cells[3]), "3");
    assert_eq!(text(&rows[0].cells[4]), "3");
    assert_eq!(desk.ui().value(Field::Copies), "1");

    // Add a member
    let ui = desk.ui_mut();
    ui.set_value(Field::MemberName, "Ada");
    ui.set_value(Field::MemberEmail, "ada@example.org");
    assert_eq!(desk.on_add_member().await, ActionOutcome::Completed);
    assert_eq!(desk.ui().options(Select::LoanMember).len(), 1);

    // Issue with the default selections
    fake.clear_requests();
    assert_eq!(desk.on_issue_loan().await, ActionOutcome::Completed);
    assert_eq!(
        fake.request_lines(),
        [
            "POST /api/loans/issue",
            "GET /api/books",
            "GET /api/books",
            "GET /api/loans"
        ]
    );
    assert_eq!(desk.ui().options(Select::LoanBook)[0].label, "Dune (2/3)");

    let loan_row = desk.ui().rows(Table::Loans)[0].clone();
    assert_eq!(text(&loan_row.cells[0]), "Dune");
    assert_eq!(text(&loan_row.cells[1]), "Ada");
    assert_eq!(text(&loan_row.cells[3]), NOT_RETURNED);
    let action = loan_row.actions().next().unwrap();
    assert_eq!(action, RowAction::ReturnLoan(loan_row.key));

    // Return it from the row control
    assert_eq!(desk.on_table_action(action).await, ActionOutcome::Completed);
    let loan_row = &desk.ui().rows(Table::Loans)[0];
    assert_ne!(text(&loan_row.cells[3]), NOT_RETURNED);
    assert_eq!(loan_row.actions().count(), 0);
    assert_eq!(desk.ui().options(Select::LoanBook)[0].label, "Dune (3/3)");
}

#[tokio::test]
async fn test_issue_without_copies_alerts_server_message() {
    let fake = FakeApi::spawn().await;
    let mut desk = services::connect(&config(&fake.base_url), MemoryUi::new());

    let ui = desk.ui_mut();
    ui.set_value(Field::Title, "Dune");
    ui.set_value(Field::Author, "Herbert");
    ui.set_value(Field::Isbn, "111");
    ui.set_value(Field::Copies, "1");
    desk.on_add_book().await;
    let ui = desk.ui_mut();
    ui.set_value(Field::MemberName, "Ada");
    ui.set_value(Field::MemberEmail, "ada@example.org");
    desk.on_add_member().await;

    assert_eq!(desk.on_issue_loan().await, ActionOutcome::Completed);
    let outcome = desk.on_issue_loan().await;
    assert_eq!(
        outcome,
        ActionOutcome::Failed(r#"{"error":"No available copies"}"#.to_string())
    );
    assert_eq!(desk.ui().alerts(), [r#"{"error":"No available copies"}"#]);
}

#[tokio::test]
async fn test_delete_book_through_row_action() {
    let fake = FakeApi::spawn().await;
    let mut desk = services::connect(&config(&fake.base_url), MemoryUi::new());

    let ui = desk.ui_mut();
    ui.set_value(Field::Title, "Dune");
    ui.set_value(Field::Author, "Herbert");
    ui.set_value(Field::Isbn, "111");
    assert_eq!(desk.on_add_book().await, ActionOutcome::Completed);

    let action = desk.ui().rows(Table::Books)[0].actions().next().unwrap();
    desk.ui_mut().answer_next_confirm(true);
    assert_eq!(desk.on_table_action(action).await, ActionOutcome::Completed);

    assert!(desk.ui().rows(Table::Books).is_empty());
    assert!(desk.ui().options(Select::LoanBook).is_empty());
    assert_eq!(desk.ui().selected(Select::LoanBook), "");
}

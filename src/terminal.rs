//! Line-oriented terminal front end
//!
//! [`TerminalUi`] keeps view state in a [`MemoryUi`] and talks to the user through a reader
//! and a writer; [`run`] is the command loop that turns typed commands into desk handlers.

use std::io::{BufRead, Write};

use crate::{
    error::AppResult,
    models::parse_id,
    services::{
        desk::{ActionOutcome, Desk},
        gateway::{Health, LibraryApi},
    },
    ui::{Field, MemoryUi, Select, Tab, Table, Ui},
    view::{self, SelectOption, TableRow},
};

const HELP: &str = "\
Commands:
  tab <books|members|loans>   switch tab and show it
  show                        show the current tab
  books [query]               search books (no query lists all)
  add-book                    add a book
  delete-book <id>            delete a book
  members                     list members
  add-member                  add a member
  loans                       list loans
  issue                       issue a loan
  return <loan id>            return a loan
  health                      check the API
  help                        show this help
  quit                        leave";

pub struct TerminalUi<R, W> {
    state: MemoryUi,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalUi<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            state: MemoryUi::new(),
            input,
            output,
        }
    }

    pub fn state(&self) -> &MemoryUi {
        &self.state
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Read one trimmed line; `None` at end of input
    pub fn read_line(&mut self) -> AppResult<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub fn prompt(&mut self, label: &str) -> AppResult<Option<String>> {
        write!(self.output, "{}: ", label)?;
        self.output.flush()?;
        self.read_line()
    }

    pub fn print(&mut self, text: &str) -> AppResult<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    /// Print the tables of the active tab
    pub fn show_active(&mut self) -> AppResult<()> {
        let text = match self.state.active_tab() {
            Tab::Books => render_table(&view::BOOK_COLUMNS, self.state.rows(Table::Books)),
            Tab::Members => render_table(&view::MEMBER_COLUMNS, self.state.rows(Table::Members)),
            Tab::Loans => {
                let mut text = render_table(&view::LOAN_COLUMNS, self.state.rows(Table::Loans));
                text.push('\n');
                text.push_str(&render_options("Books", self.state.options(Select::LoanBook)));
                text.push_str(&render_options("Members", self.state.options(Select::LoanMember)));
                text
            }
        };
        self.print(text.trim_end())
    }

    /// Ask the user to pick one option of a selector; blank keeps the current choice
    fn choose(&mut self, select: Select, label: &str) -> AppResult<Option<()>> {
        let listing = render_options(label, self.state.options(select));
        self.print(listing.trim_end())?;
        let current = self.state.selected(select);
        let Some(answer) = self.prompt(&format!("{} [{}]", label, current))? else {
            return Ok(None);
        };
        if !answer.is_empty() {
            self.state.select(select, &answer);
        }
        Ok(Some(()))
    }
}

impl<R: BufRead, W: Write> Ui for TerminalUi<R, W> {
    fn value(&self, field: Field) -> String {
        self.state.value(field)
    }

    fn set_value(&mut self, field: Field, value: &str) {
        self.state.set_value(field, value);
    }

    fn selected(&self, select: Select) -> String {
        self.state.selected(select)
    }

    fn replace_rows(&mut self, table: Table, rows: Vec<TableRow>) {
        self.state.replace_rows(table, rows);
    }

    fn replace_options(&mut self, select: Select, options: Vec<SelectOption>) {
        self.state.replace_options(select, options);
    }

    fn show_tab(&mut self, tab: Tab) {
        self.state.show_tab(tab);
    }

    fn alert(&mut self, message: &str) {
        if let Err(e) = writeln!(self.output, "! {}", message) {
            tracing::error!("Cannot write alert: {}", e);
        }
    }

    fn confirm(&mut self, message: &str) -> bool {
        match self.prompt(&format!("{} [y/N]", message)) {
            Ok(Some(answer)) => matches!(answer.to_lowercase().as_str(), "y" | "yes"),
            Ok(None) => false,
            Err(e) => {
                tracing::error!("Cannot read confirmation: {}", e);
                false
            }
        }
    }
}

/// Render rows as an aligned text table, with the record identity as first column
pub fn render_table(columns: &[&str], rows: &[TableRow]) -> String {
    let mut grid: Vec<Vec<String>> = Vec::with_capacity(rows.len() + 1);
    grid.push(
        std::iter::once("ID".to_string())
            .chain(columns.iter().map(|c| c.to_string()))
            .collect(),
    );
    for row in rows {
        grid.push(
            std::iter::once(row.key.to_string())
                .chain(row.cells.iter().map(|c| c.display()))
                .collect(),
        );
    }

    let width_count = grid.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..width_count)
        .map(|i| {
            grid.iter()
                .filter_map(|line| line.get(i))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for line in &grid {
        let padded: Vec<String> = line
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect();
        out.push_str(padded.join("  ").trim_end());
        out.push('\n');
    }
    if rows.is_empty() {
        out.push_str("(empty)\n");
    }
    out
}

fn render_options(label: &str, options: &[SelectOption]) -> String {
    let mut out = format!("{}:\n", label);
    if options.is_empty() {
        out.push_str("  (none)\n");
    }
    for option in options {
        out.push_str(&format!("  {:>4}  {}\n", option.value, option.label));
    }
    out
}

/// Read commands until `quit` or end of input
pub async fn run<A, R, W>(desk: &mut Desk<A, TerminalUi<R, W>>) -> AppResult<()>
where
    A: LibraryApi,
    R: BufRead,
    W: Write,
{
    desk.ui_mut().print("Type 'help' for the list of commands.")?;
    loop {
        let Some(line) = desk.ui_mut().prompt("desk")? else {
            break;
        };
        let (command, argument) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line.as_str(), ""),
        };

        match command {
            "" => {}
            "quit" | "exit" => break,
            "help" => desk.ui_mut().print(HELP)?,
            "show" => desk.ui_mut().show_active()?,
            "tab" => match Tab::parse(argument) {
                Some(tab) => {
                    desk.on_select_tab(tab);
                    desk.ui_mut().show_active()?;
                }
                None => desk.ui_mut().print("Unknown tab")?,
            },
            "books" => {
                desk.ui_mut().set_value(Field::BookSearch, argument);
                desk.on_select_tab(Tab::Books);
                if desk.on_search_books().await == ActionOutcome::Completed {
                    desk.ui_mut().show_active()?;
                }
            }
            "add-book" => {
                let fields = [
                    (Field::Title, "Title"),
                    (Field::Author, "Author"),
                    (Field::Isbn, "ISBN"),
                    (Field::Copies, "Copies"),
                ];
                if !fill_form(desk.ui_mut(), &fields)? {
                    break;
                }
                desk.on_select_tab(Tab::Books);
                if desk.on_add_book().await == ActionOutcome::Completed {
                    desk.ui_mut().show_active()?;
                }
            }
            "delete-book" => match parse_id(argument) {
                Some(id) => {
                    desk.on_select_tab(Tab::Books);
                    if desk.on_delete_book(id).await == ActionOutcome::Completed {
                        desk.ui_mut().show_active()?;
                    }
                }
                None => desk.ui_mut().print("Usage: delete-book <id>")?,
            },
            "members" => {
                desk.on_select_tab(Tab::Members);
                let result = desk.load_members().await;
                show_or_alert(desk, result)?;
            }
            "add-member" => {
                let fields = [(Field::MemberName, "Name"), (Field::MemberEmail, "Email")];
                if !fill_form(desk.ui_mut(), &fields)? {
                    break;
                }
                desk.on_select_tab(Tab::Members);
                if desk.on_add_member().await == ActionOutcome::Completed {
                    desk.ui_mut().show_active()?;
                }
            }
            "loans" => {
                desk.on_select_tab(Tab::Loans);
                let result = desk.load_loans().await;
                show_or_alert(desk, result)?;
            }
            "issue" => {
                let ui = desk.ui_mut();
                if ui.choose(Select::LoanBook, "Book")?.is_none()
                    || ui.choose(Select::LoanMember, "Member")?.is_none()
                {
                    break;
                }
                desk.on_select_tab(Tab::Loans);
                if desk.on_issue_loan().await == ActionOutcome::Completed {
                    desk.ui_mut().show_active()?;
                }
            }
            "return" => match parse_id(argument) {
                Some(id) => {
                    desk.on_select_tab(Tab::Loans);
                    if desk.on_return_loan(id).await == ActionOutcome::Completed {
                        desk.ui_mut().show_active()?;
                    }
                }
                None => desk.ui_mut().print("Usage: return <loan id>")?,
            },
            "health" => match check_health(desk).await {
                Ok(health) => desk.ui_mut().print(&format!("API status: {}", health.status))?,
                Err(e) => desk.ui_mut().alert(&e.user_message()),
            },
            other => desk
                .ui_mut()
                .print(&format!("Unknown command '{}', type 'help'", other))?,
        }
    }
    Ok(())
}

async fn check_health<A: LibraryApi, U>(desk: &Desk<A, U>) -> AppResult<Health> {
    desk.api.health().await
}

/// Prompt for each field of a form; `false` when input ended midway
fn fill_form<R: BufRead, W: Write>(ui: &mut TerminalUi<R, W>, fields: &[(Field, &str)]) -> AppResult<bool> {
    for (field, label) in fields {
        match ui.prompt(label)? {
            Some(value) => ui.set_value(*field, &value),
            None => return Ok(false),
        }
    }
    Ok(true)
}

fn show_or_alert<A, R, W>(desk: &mut Desk<A, TerminalUi<R, W>>, result: AppResult<()>) -> AppResult<()>
where
    A: LibraryApi,
    R: BufRead,
    W: Write,
{
    match result {
        Ok(()) => desk.ui_mut().show_active(),
        Err(e) => {
            desk.ui_mut().alert(&e.user_message());
            Ok(())
        }
    }
}

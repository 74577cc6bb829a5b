//! In-memory stand-in for the library REST API, served by axum on an ephemeral port

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{NaiveDateTime, Utc};
use serde_json::{json, Value};

type ApiResult = Result<(StatusCode, Json<Value>), (StatusCode, String)>;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Method and URI, e.g. `GET /api/books?q=dune`
    pub line: String,
    pub content_type: Option<String>,
}

struct FakeBook {
    id: i64,
    title: String,
    author: String,
    isbn: String,
    copies: i64,
}

struct FakeMember {
    id: i64,
    name: String,
    email: String,
}

struct FakeLoan {
    id: i64,
    book_id: i64,
    member_id: i64,
    issued_at: NaiveDateTime,
    returned_at: Option<NaiveDateTime>,
}

#[derive(Default)]
pub struct FakeLibrary {
    books: Vec<FakeBook>,
    members: Vec<FakeMember>,
    loans: Vec<FakeLoan>,
    next_id: i64,
    pub requests: Vec<RecordedRequest>,
}

pub type Shared = Arc<Mutex<FakeLibrary>>;

pub struct FakeApi {
    pub base_url: String,
    pub state: Shared,
}

impl FakeApi {
    /// Start a fresh fake on 127.0.0.1 with an OS-assigned port
    pub async fn spawn() -> Self {
        let state = Shared::default();
        let app = router(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn request_lines(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.line).collect()
    }

    pub fn clear_requests(&self) {
        self.state.lock().unwrap().requests.clear();
    }
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/books", get(list_books).post(create_book))
        .route("/api/books/:id", delete(delete_book))
        .route("/api/members", get(list_members).post(create_member))
        .route("/api/loans", get(list_loans))
        .route("/api/loans/issue", post(issue_loan))
        .route("/api/loans/return", post(return_loan))
        .route("/api/broken", get(broken))
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state)
}

async fn record(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let recorded = RecordedRequest {
        line: format!("{} {}", request.method(), request.uri()),
        content_type: request
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    };
    state.lock().unwrap().requests.push(recorded);
    next.run(request).await
}

fn timestamp(value: &NaiveDateTime) -> String {
    value.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

fn bad_request(message: &str) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, json!({ "error": message }).to_string())
}

impl FakeLibrary {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn book_json(&self, book: &FakeBook) -> Value {
        let active = self
            .loans
            .iter()
            .filter(|l| l.book_id == book.id && l.returned_at.is_none())
            .count() as i64;
        json!({
            "id": book.id,
            "title": book.title,
            "author": book.author,
            "isbn": book.isbn,
            "copies": book.copies,
            "available": (book.copies - active).max(0),
        })
    }

    fn loan_json(&self, loan: &FakeLoan) -> Value {
        let title = self.books.iter().find(|b| b.id == loan.book_id).map(|b| b.title.clone());
        let name = self.members.iter().find(|m| m.id == loan.member_id).map(|m| m.name.clone());
        json!({
            "id": loan.id,
            "book_id": loan.book_id,
            "member_id": loan.member_id,
            "issued_at": timestamp(&loan.issued_at),
            "returned_at": loan.returned_at.as_ref().map(timestamp),
            "book_title": title,
            "member_name": name,
        })
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn broken() -> StatusCode {
    StatusCode::SERVICE_UNAVAILABLE
}

async fn list_books(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let library = state.lock().unwrap();
    let q = params.get("q").map(|q| q.trim().to_lowercase()).unwrap_or_default();
    let books: Vec<Value> = library
        .books
        .iter()
        .rev()
        .filter(|b| {
            q.is_empty()
                || b.title.to_lowercase().contains(&q)
                || b.author.to_lowercase().contains(&q)
                || b.isbn.to_lowercase().contains(&q)
        })
        .map(|b| library.book_json(b))
        .collect();
    Json(Value::Array(books))
}

async fn create_book(State(state): State<Shared>, Json(body): Json<Value>) -> ApiResult {
    let mut library = state.lock().unwrap();
    let text = |key: &str| body[key].as_str().map(str::trim).unwrap_or_default().to_string();
    let (title, author, isbn) = (text("title"), text("author"), text("isbn"));
    if title.is_empty() || author.is_empty() || isbn.is_empty() {
        return Err(bad_request("Missing or empty field"));
    }
    if library.books.iter().any(|b| b.isbn == isbn) {
        return Err(bad_request("ISBN already exists"));
    }
    let id = library.next_id();
    let book = FakeBook {
        id,
        title,
        author,
        isbn,
        copies: body["copies"].as_i64().unwrap_or(1),
    };
    let created = library.book_json(&book);
    library.books.push(book);
    Ok((StatusCode::CREATED, Json(created)))
}

async fn delete_book(State(state): State<Shared>, Path(id): Path<i64>) -> StatusCode {
    let mut library = state.lock().unwrap();
    let before = library.books.len();
    library.books.retain(|b| b.id != id);
    if library.books.len() == before {
        return StatusCode::NOT_FOUND;
    }
    library.loans.retain(|l| l.book_id != id);
    StatusCode::NO_CONTENT
}

async fn list_members(State(state): State<Shared>) -> Json<Value> {
    let library = state.lock().unwrap();
    let members: Vec<Value> = library
        .members
        .iter()
        .rev()
        .map(|m| json!({ "id": m.id, "name": m.name, "email": m.email }))
        .collect();
    Json(Value::Array(members))
}

async fn create_member(State(state): State<Shared>, Json(body): Json<Value>) -> ApiResult {
    let mut library = state.lock().unwrap();
    let name = body["name"].as_str().map(str::trim).unwrap_or_default().to_string();
    let email = body["email"].as_str().map(str::trim).unwrap_or_default().to_string();
    if name.is_empty() || email.is_empty() {
        return Err(bad_request("Missing or empty field"));
    }
    if library.members.iter().any(|m| m.email == email) {
        return Err(bad_request("Email already exists"));
    }
    let id = library.next_id();
    let created = json!({ "id": id, "name": name, "email": email });
    library.members.push(FakeMember { id, name, email });
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_loans(State(state): State<Shared>) -> Json<Value> {
    let library = state.lock().unwrap();
    let loans: Vec<Value> = library.loans.iter().rev().map(|l| library.loan_json(l)).collect();
    Json(Value::Array(loans))
}

async fn issue_loan(State(state): State<Shared>, Json(body): Json<Value>) -> ApiResult {
    let mut library = state.lock().unwrap();
    let (Some(book_id), Some(member_id)) = (body["book_id"].as_i64(), body["member_id"].as_i64()) else {
        return Err(bad_request("Missing field"));
    };
    let Some(copies) = library.books.iter().find(|b| b.id == book_id).map(|b| b.copies) else {
        return Err(bad_request("Invalid book or member"));
    };
    if !library.members.iter().any(|m| m.id == member_id) {
        return Err(bad_request("Invalid book or member"));
    }
    let active = library
        .loans
        .iter()
        .filter(|l| l.book_id == book_id && l.returned_at.is_none())
        .count() as i64;
    if active >= copies {
        return Err(bad_request("No available copies"));
    }
    let id = library.next_id();
    library.loans.push(FakeLoan {
        id,
        book_id,
        member_id,
        issued_at: Utc::now().naive_utc(),
        returned_at: None,
    });
    let created = library.loan_json(library.loans.last().unwrap());
    Ok((StatusCode::CREATED, Json(created)))
}

async fn return_loan(State(state): State<Shared>, Json(body): Json<Value>) -> ApiResult {
    let mut library = state.lock().unwrap();
    let Some(loan_id) = body["loan_id"].as_i64() else {
        return Err(bad_request("Missing field: loan_id"));
    };
    let Some(index) = library.loans.iter().position(|l| l.id == loan_id) else {
        return Err((StatusCode::NOT_FOUND, json!({ "error": "Loan not found" }).to_string()));
    };
    if library.loans[index].returned_at.is_some() {
        return Err(bad_request("Loan already returned"));
    }
    library.loans[index].returned_at = Some(Utc::now().naive_utc());
    let updated = library.loan_json(&library.loans[index]);
    Ok((StatusCode::OK, Json(updated)))
}

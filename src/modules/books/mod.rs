pub mod models;
pub mod store;
pub mod views;

use std::sync::Arc;

use askama::Template;
use async_trait::async_trait;
use axum::{
    extract::{Form, Path, State},
    response::{Html, Redirect},
    routing::{get, post},
    Router,
};

use bookrack_http::error::AppError;
use bookrack_kernel::{InitCtx, Migration, Module};

use models::{BookForm, NewBook};
use store::SharedStore;
use views::IndexTemplate;

/// Books module: the catalog listing, the create pipeline, and deletion.
pub struct BooksModule {
    store: SharedStore,
}

impl BooksModule {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(list_books))
            .route("/books", post(create_book))
            .route("/books/delete/{id}", post(delete_book))
            .with_state(self.store.clone())
    }

    fn migrations(&self) -> Vec<Migration> {
        // Unique index on isbn: a create that loses the check-then-insert
        // race fails here instead of inserting a duplicate.
        vec![Migration {
            id: "001_init",
            up: r#"
                DEFINE TABLE book SCHEMAFULL;
                DEFINE FIELD title     ON book TYPE string ASSERT $value != "";
                DEFINE FIELD author    ON book TYPE string ASSERT $value != "";
                DEFINE FIELD rating    ON book TYPE number ASSERT $value >= 0 AND $value <= 5;
                DEFINE FIELD review    ON book TYPE option<string>;
                DEFINE FIELD date_read ON book TYPE option<string>;
                DEFINE FIELD isbn      ON book TYPE string ASSERT $value != "";
                DEFINE FIELD cover_url ON book TYPE string;
                DEFINE INDEX book_isbn_unique ON book FIELDS isbn UNIQUE;
                "#,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Listing page: all books sorted by rating descending.
async fn list_books(State(store): State<SharedStore>) -> Result<Html<String>, AppError> {
    let books = store.find_all_by_rating_desc().await.map_err(|err| {
        tracing::error!(error = %err, "error fetching books");
        AppError::store("Error fetching books.")
    })?;

    let page = IndexTemplate { books: &books };
    let html = page.render().map_err(anyhow::Error::from)?;
    Ok(Html(html))
}

/// Create a book: validation pipeline, ISBN uniqueness check, persist,
/// redirect to the listing.
async fn create_book(
    State(store): State<SharedStore>,
    Form(form): Form<BookForm>,
) -> Result<Redirect, AppError> {
    let draft = form.validate()?;

    let existing = store.find_by_isbn(&draft.isbn).await.map_err(|err| {
        tracing::error!(error = %err, isbn = %draft.isbn, "error checking for existing ISBN");
        AppError::store(err.to_string())
    })?;
    if existing.is_some() {
        return Err(AppError::duplicate_isbn(
            "A book with this ISBN already exists.",
        ));
    }

    let book = NewBook::from_draft(draft);
    let created = store.insert(book).await.map_err(|err| {
        tracing::error!(error = %err, "error adding book");
        AppError::store(err.to_string())
    })?;

    tracing::info!(id = %created.id, isbn = %created.isbn, "book added");
    Ok(Redirect::to("/"))
}

/// Delete a book by identifier. A missing record is treated as success.
async fn delete_book(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    store.delete_by_id(&id).await.map_err(|err| {
        tracing::error!(error = %err, id = %id, "error deleting book");
        AppError::store("Error deleting book.")
    })?;

    Ok(Redirect::to("/"))
}

/// Create a new instance of the books module
pub fn create_module(store: SharedStore) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store))
}

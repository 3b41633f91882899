//! Persistence gateway for the book collection.
//!
//! `SurrealBookStore` is the production implementation over the shared
//! document store handle; `MemoryBookStore` backs the tests.

use std::cmp::Ordering;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use surrealdb::engine::any::Any;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;
use uuid::Uuid;

use super::models::{Book, NewBook};

/// Shared store handle injected into handlers.
pub type SharedStore = Arc<dyn BookStore>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Surreal(#[from] surrealdb::Error),

    #[error("{0}")]
    Unavailable(String),
}

/// Persistence operations over the book collection.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// All books ordered by rating descending. Tie order is whatever the
    /// store returns.
    async fn find_all_by_rating_desc(&self) -> Result<Vec<Book>, StoreError>;

    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>, StoreError>;

    /// Insert a new book, returning the record with its assigned identifier.
    async fn insert(&self, book: NewBook) -> Result<Book, StoreError>;

    /// Delete by identifier. Deleting a missing record is a no-op.
    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError>;
}

const TABLE: &str = "book";

/// Wire representation of a book record in SurrealDB.
#[derive(Debug, Serialize, Deserialize)]
struct BookRecord {
    id: RecordId,
    title: String,
    author: String,
    rating: f64,
    #[serde(default)]
    review: Option<String>,
    #[serde(default)]
    date_read: Option<NaiveDate>,
    isbn: String,
    cover_url: String,
}

impl From<BookRecord> for Book {
    fn from(record: BookRecord) -> Self {
        Self {
            id: record.id.key().to_string(),
            title: record.title,
            author: record.author,
            rating: record.rating,
            review: record.review,
            date_read: record.date_read,
            isbn: record.isbn,
            cover_url: record.cover_url,
        }
    }
}

/// SurrealDB-backed book store sharing the process-wide connection.
pub struct SurrealBookStore {
    db: Surreal<Any>,
}

impl SurrealBookStore {
    pub fn new(db: Surreal<Any>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookStore for SurrealBookStore {
    async fn find_all_by_rating_desc(&self) -> Result<Vec<Book>, StoreError> {
        let mut response = self
            .db
            .query("SELECT * FROM book ORDER BY rating DESC")
            .await?;
        let records: Vec<BookRecord> = response.take(0)?;
        Ok(records.into_iter().map(Book::from).collect())
    }

    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>, StoreError> {
        let mut response = self
            .db
            .query("SELECT * FROM book WHERE isbn = $isbn LIMIT 1")
            .bind(("isbn", isbn.to_string()))
            .await?;
        let record: Option<BookRecord> = response.take(0)?;
        Ok(record.map(Book::from))
    }

    async fn insert(&self, book: NewBook) -> Result<Book, StoreError> {
        let created: Option<BookRecord> = self.db.create(TABLE).content(book).await?;
        let record = created
            .ok_or_else(|| StoreError::Unavailable("store returned no record on insert".into()))?;
        Ok(record.into())
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        let _removed: Option<BookRecord> = self.db.delete((TABLE, id.to_string())).await?;
        Ok(())
    }
}

/// In-memory book store used as a test substitute.
#[derive(Default)]
pub struct MemoryBookStore {
    books: Mutex<Vec<Book>>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn find_all_by_rating_desc(&self) -> Result<Vec<Book>, StoreError> {
        let mut books = self.books.lock().expect("book store mutex poisoned").clone();
        // Stable sort keeps insertion order for equal ratings
        books.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal));
        Ok(books)
    }

    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>, StoreError> {
        let books = self.books.lock().expect("book store mutex poisoned");
        Ok(books.iter().find(|book| book.isbn == isbn).cloned())
    }

    async fn insert(&self, book: NewBook) -> Result<Book, StoreError> {
        let book = Book {
            id: Uuid::new_v4().to_string(),
            title: book.title,
            author: book.author,
            rating: book.rating,
            review: book.review,
            date_read: book.date_read,
            isbn: book.isbn,
            cover_url: book.cover_url,
        };

        let mut books = self.books.lock().expect("book store mutex poisoned");
        books.push(book.clone());
        Ok(book)
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        let mut books = self.books.lock().expect("book store mutex poisoned");
        books.retain(|book| book.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_book(title: &str, rating: f64, isbn: &str) -> NewBook {
        NewBook {
            title: title.to_string(),
            author: "Author".to_string(),
            rating,
            review: None,
            date_read: None,
            isbn: isbn.to_string(),
            cover_url: super::super::models::cover_url_for(isbn),
        }
    }

    #[tokio::test]
    async fn listing_is_sorted_by_rating_descending() {
        let store = MemoryBookStore::new();
        store.insert(new_book("Middling", 3.0, "isbn-1")).await.unwrap();
        store.insert(new_book("Great", 5.0, "isbn-2")).await.unwrap();
        store.insert(new_book("Fine", 4.0, "isbn-3")).await.unwrap();

        let titles: Vec<String> = store
            .find_all_by_rating_desc()
            .await
            .unwrap()
            .into_iter()
            .map(|book| book.title)
            .collect();

        assert_eq!(titles, vec!["Great", "Fine", "Middling"]);
    }

    #[tokio::test]
    async fn equal_ratings_keep_insertion_order() {
        let store = MemoryBookStore::new();
        store.insert(new_book("First", 4.0, "isbn-1")).await.unwrap();
        store.insert(new_book("Second", 4.0, "isbn-2")).await.unwrap();

        let titles: Vec<String> = store
            .find_all_by_rating_desc()
            .await
            .unwrap()
            .into_iter()
            .map(|book| book.title)
            .collect();

        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[tokio::test]
    async fn find_by_isbn_returns_the_matching_book() {
        let store = MemoryBookStore::new();
        store.insert(new_book("Dune", 5.0, "9780441013593")).await.unwrap();

        let found = store.find_by_isbn("9780441013593").await.unwrap();
        assert_eq!(found.map(|book| book.title), Some("Dune".to_string()));

        assert!(store.find_by_isbn("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn deleting_a_missing_id_leaves_the_collection_unchanged() {
        let store = MemoryBookStore::new();
        store.insert(new_book("Dune", 5.0, "9780441013593")).await.unwrap();

        store.delete_by_id("no-such-id").await.unwrap();

        assert_eq!(store.find_all_by_rating_desc().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn deleting_an_existing_id_removes_the_book() {
        let store = MemoryBookStore::new();
        let book = store.insert(new_book("Dune", 5.0, "9780441013593")).await.unwrap();

        store.delete_by_id(&book.id).await.unwrap();

        assert!(store.find_all_by_rating_desc().await.unwrap().is_empty());
    }
}

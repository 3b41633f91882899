//! Template rendering for the books pages.

use askama::Template;

use super::models::Book;

/// Listing page with the add-book form and per-book delete buttons.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate<'a> {
    pub books: &'a [Book],
}

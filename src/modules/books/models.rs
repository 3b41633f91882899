use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A book review as stored in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    /// Opaque store-assigned identifier, used only for deletion
    pub id: String,
    pub title: String,
    pub author: String,
    /// Rating in [0,5], halves allowed
    pub rating: f64,
    pub review: Option<String>,
    pub date_read: Option<NaiveDate>,
    pub isbn: String,
    /// Derived from the ISBN at creation, never user-supplied
    pub cover_url: String,
}

/// A validated book ready for insertion, before the store assigns an id.
#[derive(Debug, Clone, Serialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub rating: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_read: Option<NaiveDate>,
    pub isbn: String,
    pub cover_url: String,
}

impl NewBook {
    /// Build the insertable record from a validated draft, deriving the
    /// cover URL from the ISBN.
    pub fn from_draft(draft: BookDraft) -> Self {
        let cover_url = cover_url_for(&draft.isbn);
        Self {
            title: draft.title,
            author: draft.author,
            rating: draft.rating,
            review: draft.review,
            date_read: draft.date_read,
            isbn: draft.isbn,
            cover_url,
        }
    }
}

/// Derive the cover image link for an ISBN. The ISBN is interpolated
/// literally; nothing verifies that an image exists at the address.
pub fn cover_url_for(isbn: &str) -> String {
    format!("https://covers.openlibrary.org/b/isbn/{isbn}-L.jpg")
}

/// Raw form fields as submitted by the browser, parsed once at the
/// boundary. Every field is optional here; the validation pipeline decides
/// what is required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookForm {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub review: Option<String>,
    #[serde(default)]
    pub date_read: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
}

/// A form that passed validation, with normalized field values.
#[derive(Debug, Clone, PartialEq)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub rating: f64,
    pub review: Option<String>,
    pub date_read: Option<NaiveDate>,
    pub isbn: String,
}

/// Closed enumeration of create-pipeline rejections. The `Display` output
/// of each variant is the exact user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title, Author, and ISBN are required.")]
    MissingRequired,

    #[error("Rating must be a number between 0 and 5.")]
    RatingOutOfRange,

    #[error("Invalid date format.")]
    InvalidDate,
}

impl From<ValidationError> for bookrack_http::error::AppError {
    fn from(err: ValidationError) -> Self {
        Self::validation(err.to_string())
    }
}

impl BookForm {
    /// Run the validation pipeline, short-circuiting on the first failure.
    ///
    /// Order matters and is part of the contract: presence of the required
    /// fields, then rating coercion, then date normalization. ISBN
    /// uniqueness is checked separately against the store.
    pub fn validate(self) -> Result<BookDraft, ValidationError> {
        let title = self.title.as_deref().unwrap_or("").trim();
        let author = self.author.as_deref().unwrap_or("").trim();
        let isbn = self.isbn.as_deref().unwrap_or("").trim();

        if title.is_empty() || author.is_empty() || isbn.is_empty() {
            return Err(ValidationError::MissingRequired);
        }

        let rating: f64 = self
            .rating
            .as_deref()
            .unwrap_or("")
            .trim()
            .parse()
            .map_err(|_| ValidationError::RatingOutOfRange)?;
        // NaN fails the range check as well
        if !(0.0..=5.0).contains(&rating) {
            return Err(ValidationError::RatingOutOfRange);
        }

        let date_read = match self.date_read.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|_| ValidationError::InvalidDate)?,
            ),
        };

        let review = self
            .review
            .map(|review| review.trim().to_string())
            .filter(|review| !review.is_empty());

        Ok(BookDraft {
            title: title.to_string(),
            author: author.to_string(),
            rating,
            review,
            date_read,
            isbn: isbn.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dune_form() -> BookForm {
        BookForm {
            title: Some("Dune".to_string()),
            author: Some("Herbert".to_string()),
            rating: Some("5".to_string()),
            review: None,
            date_read: None,
            isbn: Some("9780441013593".to_string()),
        }
    }

    #[test]
    fn valid_form_produces_draft() {
        let draft = dune_form().validate().unwrap();

        assert_eq!(
            draft,
            BookDraft {
                title: "Dune".to_string(),
                author: "Herbert".to_string(),
                rating: 5.0,
                review: None,
                date_read: None,
                isbn: "9780441013593".to_string(),
            }
        );
    }

    #[test]
    fn required_fields_are_trimmed_before_the_presence_check() {
        let form = BookForm {
            title: Some("   ".to_string()),
            ..dune_form()
        };
        assert_eq!(form.validate(), Err(ValidationError::MissingRequired));

        let form = BookForm {
            author: None,
            ..dune_form()
        };
        assert_eq!(form.validate(), Err(ValidationError::MissingRequired));

        let form = BookForm {
            isbn: Some(String::new()),
            ..dune_form()
        };
        assert_eq!(form.validate(), Err(ValidationError::MissingRequired));
    }

    #[test]
    fn presence_check_runs_before_rating_coercion() {
        let form = BookForm {
            title: None,
            rating: Some("not-a-number".to_string()),
            ..dune_form()
        };
        assert_eq!(form.validate(), Err(ValidationError::MissingRequired));
    }

    #[test]
    fn non_numeric_rating_is_rejected() {
        let form = BookForm {
            rating: Some("abc".to_string()),
            ..dune_form()
        };
        assert_eq!(form.validate(), Err(ValidationError::RatingOutOfRange));
    }

    #[test]
    fn out_of_range_rating_is_rejected() {
        for raw in ["7", "-1", "5.01", "NaN"] {
            let form = BookForm {
                rating: Some(raw.to_string()),
                ..dune_form()
            };
            assert_eq!(
                form.validate(),
                Err(ValidationError::RatingOutOfRange),
                "rating {raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn range_bounds_are_inclusive() {
        for raw in ["0", "5", "4.5"] {
            let form = BookForm {
                rating: Some(raw.to_string()),
                ..dune_form()
            };
            assert!(form.validate().is_ok(), "rating {raw:?} should be accepted");
        }
    }

    #[test]
    fn unparseable_date_is_rejected() {
        for raw in ["not-a-date", "2024-02-30", "05/01/2024"] {
            let form = BookForm {
                date_read: Some(raw.to_string()),
                ..dune_form()
            };
            assert_eq!(
                form.validate(),
                Err(ValidationError::InvalidDate),
                "date {raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn absent_or_blank_date_is_stored_as_none() {
        let draft = dune_form().validate().unwrap();
        assert_eq!(draft.date_read, None);

        let form = BookForm {
            date_read: Some("  ".to_string()),
            ..dune_form()
        };
        assert_eq!(form.validate().unwrap().date_read, None);

        let form = BookForm {
            date_read: Some("2024-01-05".to_string()),
            ..dune_form()
        };
        assert_eq!(
            form.validate().unwrap().date_read,
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
    }

    #[test]
    fn validation_messages_match_the_user_facing_text() {
        assert_eq!(
            ValidationError::MissingRequired.to_string(),
            "Title, Author, and ISBN are required."
        );
        assert_eq!(
            ValidationError::RatingOutOfRange.to_string(),
            "Rating must be a number between 0 and 5."
        );
        assert_eq!(
            ValidationError::InvalidDate.to_string(),
            "Invalid date format."
        );
    }

    #[test]
    fn cover_url_applies_the_fixed_template() {
        assert_eq!(
            cover_url_for("9780441013593"),
            "https://covers.openlibrary.org/b/isbn/9780441013593-L.jpg"
        );
    }

    #[test]
    fn new_book_derives_cover_url_from_the_draft_isbn() {
        let book = NewBook::from_draft(dune_form().validate().unwrap());
        assert_eq!(
            book.cover_url,
            "https://covers.openlibrary.org/b/isbn/9780441013593-L.jpg"
        );
    }
}

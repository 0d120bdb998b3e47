use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::{IntoParams, ToSchema};

// --- Catalog Entities (Mapped to Database) ---

/// Author
///
/// A catalogued author from the `authors` table. Books reference authors but do
/// not own them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Author {
    pub id: i32,
    pub name: String,
}

/// Publisher
///
/// A catalogued publisher from the `publishers` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Publisher {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub phone: String,
}

/// Book
///
/// A catalogued book with its resolved author and publisher. Either reference
/// may be absent; when present it always points at a stored entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: Option<Author>,
    pub publisher: Option<Publisher>,
}

/// BookRow
///
/// Flat row produced by joining `books` with `authors` and `publishers`.
/// Only used by the Postgres repository before folding into a `Book`.
#[derive(Debug, Clone, FromRow)]
pub struct BookRow {
    pub id: i32,
    pub title: String,
    pub author_id: Option<i32>,
    pub author_name: Option<String>,
    pub publisher_id: Option<i32>,
    pub publisher_name: Option<String>,
    pub publisher_address: Option<String>,
    pub publisher_phone: Option<String>,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        let author = row.author_id.map(|id| Author {
            id,
            name: row.author_name.unwrap_or_default(),
        });
        let publisher = row.publisher_id.map(|id| Publisher {
            id,
            name: row.publisher_name.unwrap_or_default(),
            address: row.publisher_address.unwrap_or_default(),
            phone: row.publisher_phone.unwrap_or_default(),
        });
        Book {
            id: row.id,
            title: row.title,
            author,
            publisher,
        }
    }
}

// --- Nested References ---

/// AuthorInput
///
/// An author as supplied by a client inside a book payload. Only `id` is used
/// to resolve an existing author; `name` matters only when a book creation has
/// to create the author.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct AuthorInput {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub name: String,
}

/// PublisherInput
///
/// A publisher as supplied by a client inside a book payload. Same resolution
/// rules as `AuthorInput`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct PublisherInput {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
}

// --- Request Payloads (Input Schemas) ---

/// UpdateAuthorRequest
///
/// Body of `PUT /author/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateAuthorRequest {
    pub name: String,
}

/// UpdatePublisherRequest
///
/// Body of `PUT /publisher/{id}`. All three fields replace the stored values;
/// omitted address or phone become empty strings.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdatePublisherRequest {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
}

/// UpdateBookRequest
///
/// Body of `PUT /book/{id}`. A missing or null `author`/`publisher` leaves the
/// stored reference alone.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateBookRequest {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<PublisherInput>,
}

/// CreateAuthorParams
///
/// Query parameters of `POST /author`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CreateAuthorParams {
    /// Name of the new author.
    pub name: String,
}

/// CreatePublisherParams
///
/// Query parameters of `POST /publisher`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CreatePublisherParams {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
}

/// CreateBookParams
///
/// Query parameters of `POST /book`. The nested author and publisher are
/// flattened into prefixed parameters; an author is considered supplied when
/// either `author_id` or `author_name` is present (same for the publisher).
#[derive(Debug, Clone, Deserialize, IntoParams, Default)]
#[into_params(parameter_in = Query)]
pub struct CreateBookParams {
    pub title: String,
    pub author_id: Option<i32>,
    pub author_name: Option<String>,
    pub publisher_id: Option<i32>,
    pub publisher_name: Option<String>,
    pub publisher_address: Option<String>,
    pub publisher_phone: Option<String>,
}

impl CreateBookParams {
    pub fn author(&self) -> Option<AuthorInput> {
        if self.author_id.is_none() && self.author_name.is_none() {
            return None;
        }
        Some(AuthorInput {
            id: self.author_id,
            name: self.author_name.clone().unwrap_or_default(),
        })
    }

    pub fn publisher(&self) -> Option<PublisherInput> {
        if self.publisher_id.is_none()
            && self.publisher_name.is_none()
            && self.publisher_address.is_none()
            && self.publisher_phone.is_none()
        {
            return None;
        }
        Some(PublisherInput {
            id: self.publisher_id,
            name: self.publisher_name.clone().unwrap_or_default(),
            address: self.publisher_address.clone().unwrap_or_default(),
            phone: self.publisher_phone.clone().unwrap_or_default(),
        })
    }
}

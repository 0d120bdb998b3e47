use crate::{
    AppState,
    error::{CatalogError, CatalogResult, ErrorResponse},
    models::{
        Author, AuthorInput, Book, CreateAuthorParams, CreateBookParams, CreatePublisherParams,
        Publisher, PublisherInput, UpdateAuthorRequest, UpdateBookRequest, UpdatePublisherRequest,
    },
    repository::Repository,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

// --- Lookup Helpers ---

async fn require_author(repo: &dyn Repository, id: i32) -> CatalogResult<Author> {
    repo.get_author(id)
        .await?
        .ok_or_else(|| CatalogError::not_found("Author not found"))
}

async fn require_book(repo: &dyn Repository, id: i32) -> CatalogResult<Book> {
    repo.get_book(id)
        .await?
        .ok_or_else(|| CatalogError::not_found("Book not found"))
}

async fn require_publisher(repo: &dyn Repository, id: i32) -> CatalogResult<Publisher> {
    repo.get_publisher(id)
        .await?
        .ok_or_else(|| CatalogError::not_found("Publisher not found"))
}

// --- Reference Resolution ---

/// Resolves a nested author of a book update to the stored author. An input
/// without an id can never match.
async fn resolve_author(repo: &dyn Repository, input: &AuthorInput) -> CatalogResult<Author> {
    match input.id {
        Some(id) => require_author(repo, id).await,
        None => Err(CatalogError::not_found("Author not found")),
    }
}

async fn resolve_publisher(
    repo: &dyn Repository,
    input: &PublisherInput,
) -> CatalogResult<Publisher> {
    match input.id {
        Some(id) => require_publisher(repo, id).await,
        None => Err(CatalogError::not_found("Publisher not found")),
    }
}

/// Create-or-reuse: the stored author wins when the id exists, otherwise a new
/// author is created from the input's name.
async fn find_or_create_author(
    repo: &dyn Repository,
    input: &AuthorInput,
) -> CatalogResult<Author> {
    if let Some(id) = input.id {
        if let Some(author) = repo.get_author(id).await? {
            tracing::debug!(author_id = id, "reusing stored author");
            return Ok(author);
        }
    }
    let author = repo.create_author(&input.name).await?;
    tracing::debug!(requested_id = ?input.id, author_id = author.id, "created missing author");
    Ok(author)
}

async fn find_or_create_publisher(
    repo: &dyn Repository,
    input: &PublisherInput,
) -> CatalogResult<Publisher> {
    if let Some(id) = input.id {
        if let Some(publisher) = repo.get_publisher(id).await? {
            tracing::debug!(publisher_id = id, "reusing stored publisher");
            return Ok(publisher);
        }
    }
    let publisher = repo
        .create_publisher(&input.name, &input.address, &input.phone)
        .await?;
    tracing::debug!(
        requested_id = ?input.id,
        publisher_id = publisher.id,
        "created missing publisher"
    );
    Ok(publisher)
}

// --- Listing ---

#[utoipa::path(
    get,
    path = "/authors",
    responses((status = 200, description = "All authors", body = [Author]))
)]
pub async fn list_authors(State(state): State<AppState>) -> CatalogResult<Json<Vec<Author>>> {
    Ok(Json(state.repo.get_all_authors().await?))
}

#[utoipa::path(
    get,
    path = "/books",
    responses((status = 200, description = "All books", body = [Book]))
)]
pub async fn list_books(State(state): State<AppState>) -> CatalogResult<Json<Vec<Book>>> {
    Ok(Json(state.repo.get_all_books().await?))
}

#[utoipa::path(
    get,
    path = "/publishers",
    responses((status = 200, description = "All publishers", body = [Publisher]))
)]
pub async fn list_publishers(State(state): State<AppState>) -> CatalogResult<Json<Vec<Publisher>>> {
    Ok(Json(state.repo.get_all_publishers().await?))
}

// --- Single Lookups ---

#[utoipa::path(
    get,
    path = "/author/{id}",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Found", body = Author),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> CatalogResult<Json<Author>> {
    Ok(Json(require_author(state.repo.as_ref(), id).await?))
}

#[utoipa::path(
    get,
    path = "/book/{id}",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Found", body = Book),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> CatalogResult<Json<Book>> {
    Ok(Json(require_book(state.repo.as_ref(), id).await?))
}

#[utoipa::path(
    get,
    path = "/publisher/{id}",
    params(("id" = i32, Path, description = "Publisher ID")),
    responses(
        (status = 200, description = "Found", body = Publisher),
        (status = 404, description = "Publisher not found", body = ErrorResponse)
    )
)]
pub async fn get_publisher(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> CatalogResult<Json<Publisher>> {
    Ok(Json(require_publisher(state.repo.as_ref(), id).await?))
}

// --- Updates ---

/// update_author
///
/// Overwrites the author's name. The response is read back from the repository
/// rather than echoing the mutated value.
#[utoipa::path(
    put,
    path = "/author/{id}",
    params(("id" = i32, Path, description = "Author ID")),
    request_body = UpdateAuthorRequest,
    responses(
        (status = 200, description = "Updated", body = Author),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateAuthorRequest>,
) -> CatalogResult<Json<Author>> {
    let repo = state.repo.as_ref();
    let mut author = require_author(repo, id).await?;
    author.name = payload.name;
    repo.update_author(&author).await?;
    tracing::info!(author_id = id, "author updated");
    Ok(Json(require_author(repo, id).await?))
}

/// update_publisher
///
/// Overwrites name, address and phone, then returns the stored publisher.
#[utoipa::path(
    put,
    path = "/publisher/{id}",
    params(("id" = i32, Path, description = "Publisher ID")),
    request_body = UpdatePublisherRequest,
    responses(
        (status = 200, description = "Updated", body = Publisher),
        (status = 404, description = "Publisher not found", body = ErrorResponse)
    )
)]
pub async fn update_publisher(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdatePublisherRequest>,
) -> CatalogResult<Json<Publisher>> {
    let repo = state.repo.as_ref();
    let mut publisher = require_publisher(repo, id).await?;
    publisher.name = payload.name;
    publisher.address = payload.address;
    publisher.phone = payload.phone;
    repo.update_publisher(&publisher).await?;
    tracing::info!(publisher_id = id, "publisher updated");
    Ok(Json(require_publisher(repo, id).await?))
}

/// update_book
///
/// Replaces the title and, when supplied, the author and publisher. A supplied
/// reference must name a stored entity by id; the stored entity is linked and
/// any other fields of the input are ignored. A missing reference keeps the
/// book's current one. Both references are resolved before anything is
/// written, so a failed lookup leaves the book untouched.
#[utoipa::path(
    put,
    path = "/book/{id}",
    params(("id" = i32, Path, description = "Book ID")),
    request_body = UpdateBookRequest,
    responses(
        (status = 200, description = "Updated", body = Book),
        (status = 404, description = "Book, author or publisher not found", body = ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateBookRequest>,
) -> CatalogResult<Json<Book>> {
    let repo = state.repo.as_ref();
    let mut book = require_book(repo, id).await?;

    if let Some(input) = &payload.author {
        book.author = Some(resolve_author(repo, input).await?);
    }
    if let Some(input) = &payload.publisher {
        book.publisher = Some(resolve_publisher(repo, input).await?);
    }
    book.title = payload.title;

    repo.update_book(&book).await?;
    tracing::info!(book_id = id, "book updated");
    Ok(Json(require_book(repo, id).await?))
}

// --- Creation ---

#[utoipa::path(
    post,
    path = "/author",
    params(CreateAuthorParams),
    responses((status = 201, description = "Created", body = Author))
)]
pub async fn create_author(
    State(state): State<AppState>,
    Query(params): Query<CreateAuthorParams>,
) -> CatalogResult<(StatusCode, Json<Author>)> {
    let author = state.repo.create_author(&params.name).await?;
    tracing::info!(author_id = author.id, "author created");
    Ok((StatusCode::CREATED, Json(author)))
}

#[utoipa::path(
    post,
    path = "/publisher",
    params(CreatePublisherParams),
    responses((status = 201, description = "Created", body = Publisher))
)]
pub async fn create_publisher(
    State(state): State<AppState>,
    Query(params): Query<CreatePublisherParams>,
) -> CatalogResult<(StatusCode, Json<Publisher>)> {
    let publisher = state
        .repo
        .create_publisher(&params.name, &params.address, &params.phone)
        .await?;
    tracing::info!(publisher_id = publisher.id, "publisher created");
    Ok((StatusCode::CREATED, Json(publisher)))
}

/// create_book
///
/// Creates a book, linking the author and publisher with create-or-reuse:
/// an id that exists reuses the stored entity unchanged, anything else creates
/// a new one from the supplied fields.
#[utoipa::path(
    post,
    path = "/book",
    params(CreateBookParams),
    responses((status = 201, description = "Created", body = Book))
)]
pub async fn create_book(
    State(state): State<AppState>,
    Query(params): Query<CreateBookParams>,
) -> CatalogResult<(StatusCode, Json<Book>)> {
    let repo = state.repo.as_ref();

    let author = match params.author() {
        Some(input) => Some(find_or_create_author(repo, &input).await?),
        None => None,
    };
    let publisher = match params.publisher() {
        Some(input) => Some(find_or_create_publisher(repo, &input).await?),
        None => None,
    };

    let book = repo
        .create_book(&params.title, author.as_ref(), publisher.as_ref())
        .await?;
    tracing::info!(book_id = book.id, "book created");
    Ok((StatusCode::CREATED, Json(book)))
}

// --- Deletion ---
// Deleting an unknown id succeeds without touching anything.

#[utoipa::path(
    delete,
    path = "/author/{id}",
    params(("id" = i32, Path, description = "Author ID")),
    responses((status = 204, description = "Deleted or absent"))
)]
pub async fn delete_author(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> CatalogResult<StatusCode> {
    if let Some(author) = state.repo.get_author(id).await? {
        state.repo.delete_author(&author).await?;
        tracing::info!(author_id = id, "author deleted");
    }
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/publisher/{id}",
    params(("id" = i32, Path, description = "Publisher ID")),
    responses((status = 204, description = "Deleted or absent"))
)]
pub async fn delete_publisher(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> CatalogResult<StatusCode> {
    if let Some(publisher) = state.repo.get_publisher(id).await? {
        state.repo.delete_publisher(&publisher).await?;
        tracing::info!(publisher_id = id, "publisher deleted");
    }
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/book/{id}",
    params(("id" = i32, Path, description = "Book ID")),
    responses((status = 204, description = "Deleted or absent"))
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> CatalogResult<StatusCode> {
    if let Some(book) = state.repo.get_book(id).await? {
        state.repo.delete_book(&book).await?;
        tracing::info!(book_id = id, "book deleted");
    }
    Ok(StatusCode::NO_CONTENT)
}

use crate::{
    error::CatalogResult,
    models::{Author, Book, BookRow, Publisher},
};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

pub mod memory;

pub use memory::MemoryRepository;

/// Repository Trait
///
/// The persistence contract the catalog handlers are written against. Every
/// method may fail with an internal error; lookups report absence with `None`
/// and leave it to the caller to decide whether that is an error.
///
/// **Send + Sync + async_trait** are required to make the trait object (`Arc<dyn Repository>`)
/// shareable across Axum's asynchronous task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Listing ---
    // Full sets, ordered by id.
    async fn get_all_authors(&self) -> CatalogResult<Vec<Author>>;
    async fn get_all_books(&self) -> CatalogResult<Vec<Book>>;
    async fn get_all_publishers(&self) -> CatalogResult<Vec<Publisher>>;

    // --- Single Lookups ---
    async fn get_author(&self, id: i32) -> CatalogResult<Option<Author>>;
    async fn get_book(&self, id: i32) -> CatalogResult<Option<Book>>;
    async fn get_publisher(&self, id: i32) -> CatalogResult<Option<Publisher>>;

    // --- Creation ---
    async fn create_author(&self, name: &str) -> CatalogResult<Author>;
    async fn create_publisher(&self, name: &str, address: &str, phone: &str)
    -> CatalogResult<Publisher>;
    /// The author and publisher, when given, must already be stored.
    async fn create_book(
        &self,
        title: &str,
        author: Option<&Author>,
        publisher: Option<&Publisher>,
    ) -> CatalogResult<Book>;

    // --- Updates ---
    // Persist every mutable field of the entity identified by its id.
    async fn update_author(&self, author: &Author) -> CatalogResult<()>;
    async fn update_publisher(&self, publisher: &Publisher) -> CatalogResult<()>;
    async fn update_book(&self, book: &Book) -> CatalogResult<()>;

    // --- Deletion ---
    /// Books referencing a deleted author or publisher lose that reference.
    async fn delete_author(&self, author: &Author) -> CatalogResult<()>;
    async fn delete_publisher(&self, publisher: &Publisher) -> CatalogResult<()>;
    async fn delete_book(&self, book: &Book) -> CatalogResult<()>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

const SELECT_BOOKS: &str = r#"
    SELECT
        b.id, b.title,
        a.id AS author_id, a.name AS author_name,
        p.id AS publisher_id, p.name AS publisher_name,
        p.address AS publisher_address, p.phone AS publisher_phone
    FROM books b
    LEFT JOIN authors a ON b.author_id = a.id
    LEFT JOIN publishers p ON b.publisher_id = p.id
"#;

/// PostgresRepository
///
/// The `Repository` implementation backed by PostgreSQL.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> CatalogResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn get_all_authors(&self) -> CatalogResult<Vec<Author>> {
        let authors = sqlx::query_as::<_, Author>("SELECT id, name FROM authors ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(authors)
    }

    /// get_all_books
    ///
    /// Joins authors and publishers so each book comes back with its references resolved.
    async fn get_all_books(&self) -> CatalogResult<Vec<Book>> {
        let query = format!("{SELECT_BOOKS} ORDER BY b.id");
        let rows = sqlx::query_as::<_, BookRow>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn get_all_publishers(&self) -> CatalogResult<Vec<Publisher>> {
        let publishers = sqlx::query_as::<_, Publisher>(
            "SELECT id, name, address, phone FROM publishers ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(publishers)
    }

    async fn get_author(&self, id: i32) -> CatalogResult<Option<Author>> {
        let author = sqlx::query_as::<_, Author>("SELECT id, name FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(author)
    }

    async fn get_book(&self, id: i32) -> CatalogResult<Option<Book>> {
        let query = format!("{SELECT_BOOKS} WHERE b.id = $1");
        let row = sqlx::query_as::<_, BookRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Book::from))
    }

    async fn get_publisher(&self, id: i32) -> CatalogResult<Option<Publisher>> {
        let publisher = sqlx::query_as::<_, Publisher>(
            "SELECT id, name, address, phone FROM publishers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(publisher)
    }

    async fn create_author(&self, name: &str) -> CatalogResult<Author> {
        let author = sqlx::query_as::<_, Author>(
            "INSERT INTO authors (name) VALUES ($1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(author)
    }

    async fn create_publisher(
        &self,
        name: &str,
        address: &str,
        phone: &str,
    ) -> CatalogResult<Publisher> {
        let publisher = sqlx::query_as::<_, Publisher>(
            r#"INSERT INTO publishers (name, address, phone) VALUES ($1, $2, $3)
               RETURNING id, name, address, phone"#,
        )
        .bind(name)
        .bind(address)
        .bind(phone)
        .fetch_one(&self.pool)
        .await?;
        Ok(publisher)
    }

    /// create_book
    ///
    /// Inserts the book row and assembles the result from the inserted id and
    /// the already-stored references.
    async fn create_book(
        &self,
        title: &str,
        author: Option<&Author>,
        publisher: Option<&Publisher>,
    ) -> CatalogResult<Book> {
        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO books (title, author_id, publisher_id) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(title)
        .bind(author.map(|a| a.id))
        .bind(publisher.map(|p| p.id))
        .fetch_one(&self.pool)
        .await?;

        Ok(Book {
            id,
            title: title.to_string(),
            author: author.cloned(),
            publisher: publisher.cloned(),
        })
    }

    async fn update_author(&self, author: &Author) -> CatalogResult<()> {
        sqlx::query("UPDATE authors SET name = $1 WHERE id = $2")
            .bind(&author.name)
            .bind(author.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_publisher(&self, publisher: &Publisher) -> CatalogResult<()> {
        sqlx::query("UPDATE publishers SET name = $1, address = $2, phone = $3 WHERE id = $4")
            .bind(&publisher.name)
            .bind(&publisher.address)
            .bind(&publisher.phone)
            .bind(publisher.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_book(&self, book: &Book) -> CatalogResult<()> {
        sqlx::query("UPDATE books SET title = $1, author_id = $2, publisher_id = $3 WHERE id = $4")
            .bind(&book.title)
            .bind(book.author.as_ref().map(|a| a.id))
            .bind(book.publisher.as_ref().map(|p| p.id))
            .bind(book.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_author(&self, author: &Author) -> CatalogResult<()> {
        sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(author.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_publisher(&self, publisher: &Publisher) -> CatalogResult<()> {
        sqlx::query("DELETE FROM publishers WHERE id = $1")
            .bind(publisher.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_book(&self, book: &Book) -> CatalogResult<()> {
        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(book.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

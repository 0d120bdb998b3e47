use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    error::{CatalogError, CatalogResult},
    models::{Author, Book, Publisher},
    repository::Repository,
};

/// Book as held in memory: references are kept by id and resolved on read,
/// so renaming an author shows up in every book that points at it.
#[derive(Debug, Clone)]
struct BookRecord {
    id: i32,
    title: String,
    author_id: Option<i32>,
    publisher_id: Option<i32>,
}

#[derive(Debug, Default)]
struct Tables {
    authors: BTreeMap<i32, Author>,
    publishers: BTreeMap<i32, Publisher>,
    books: BTreeMap<i32, BookRecord>,
    last_author_id: i32,
    last_publisher_id: i32,
    last_book_id: i32,
}

impl Tables {
    fn resolve(&self, record: &BookRecord) -> Book {
        Book {
            id: record.id,
            title: record.title.clone(),
            author: record
                .author_id
                .and_then(|id| self.authors.get(&id))
                .cloned(),
            publisher: record
                .publisher_id
                .and_then(|id| self.publishers.get(&id))
                .cloned(),
        }
    }

    fn check_references(
        &self,
        author_id: Option<i32>,
        publisher_id: Option<i32>,
    ) -> CatalogResult<()> {
        if let Some(id) = author_id {
            if !self.authors.contains_key(&id) {
                return Err(CatalogError::Internal(format!(
                    "book references missing author {id}"
                )));
            }
        }
        if let Some(id) = publisher_id {
            if !self.publishers.contains_key(&id) {
                return Err(CatalogError::Internal(format!(
                    "book references missing publisher {id}"
                )));
            }
        }
        Ok(())
    }
}

/// In-memory implementation of the catalog repository.
///
/// Ids are assigned sequentially starting at 1 and never reused. Mirrors the
/// Postgres schema's foreign keys: a book may only point at stored entities,
/// and deleting an author or publisher clears the references to it.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
}

impl MemoryRepository {
    /// Creates a new empty memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn get_all_authors(&self) -> CatalogResult<Vec<Author>> {
        let tables = self.tables.read().await;
        Ok(tables.authors.values().cloned().collect())
    }

    async fn get_all_books(&self) -> CatalogResult<Vec<Book>> {
        let tables = self.tables.read().await;
        Ok(tables.books.values().map(|b| tables.resolve(b)).collect())
    }

    async fn get_all_publishers(&self) -> CatalogResult<Vec<Publisher>> {
        let tables = self.tables.read().await;
        Ok(tables.publishers.values().cloned().collect())
    }

    async fn get_author(&self, id: i32) -> CatalogResult<Option<Author>> {
        Ok(self.tables.read().await.authors.get(&id).cloned())
    }

    async fn get_book(&self, id: i32) -> CatalogResult<Option<Book>> {
        let tables = self.tables.read().await;
        Ok(tables.books.get(&id).map(|b| tables.resolve(b)))
    }

    async fn get_publisher(&self, id: i32) -> CatalogResult<Option<Publisher>> {
        Ok(self.tables.read().await.publishers.get(&id).cloned())
    }

    async fn create_author(&self, name: &str) -> CatalogResult<Author> {
        let mut tables = self.tables.write().await;
        tables.last_author_id += 1;
        let author = Author {
            id: tables.last_author_id,
            name: name.to_string(),
        };
        tables.authors.insert(author.id, author.clone());
        Ok(author)
    }

    async fn create_publisher(
        &self,
        name: &str,
        address: &str,
        phone: &str,
    ) -> CatalogResult<Publisher> {
        let mut tables = self.tables.write().await;
        tables.last_publisher_id += 1;
        let publisher = Publisher {
            id: tables.last_publisher_id,
            name: name.to_string(),
            address: address.to_string(),
            phone: phone.to_string(),
        };
        tables.publishers.insert(publisher.id, publisher.clone());
        Ok(publisher)
    }

    async fn create_book(
        &self,
        title: &str,
        author: Option<&Author>,
        publisher: Option<&Publisher>,
    ) -> CatalogResult<Book> {
        let mut tables = self.tables.write().await;
        let author_id = author.map(|a| a.id);
        let publisher_id = publisher.map(|p| p.id);
        tables.check_references(author_id, publisher_id)?;

        tables.last_book_id += 1;
        let record = BookRecord {
            id: tables.last_book_id,
            title: title.to_string(),
            author_id,
            publisher_id,
        };
        let book = tables.resolve(&record);
        tables.books.insert(record.id, record);
        Ok(book)
    }

    async fn update_author(&self, author: &Author) -> CatalogResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(stored) = tables.authors.get_mut(&author.id) {
            stored.name = author.name.clone();
        }
        Ok(())
    }

    async fn update_publisher(&self, publisher: &Publisher) -> CatalogResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(stored) = tables.publishers.get_mut(&publisher.id) {
            stored.name = publisher.name.clone();
            stored.address = publisher.address.clone();
            stored.phone = publisher.phone.clone();
        }
        Ok(())
    }

    async fn update_book(&self, book: &Book) -> CatalogResult<()> {
        let mut tables = self.tables.write().await;
        let author_id = book.author.as_ref().map(|a| a.id);
        let publisher_id = book.publisher.as_ref().map(|p| p.id);
        tables.check_references(author_id, publisher_id)?;

        if let Some(stored) = tables.books.get_mut(&book.id) {
            stored.title = book.title.clone();
            stored.author_id = author_id;
            stored.publisher_id = publisher_id;
        }
        Ok(())
    }

    async fn delete_author(&self, author: &Author) -> CatalogResult<()> {
        let mut tables = self.tables.write().await;
        if tables.authors.remove(&author.id).is_some() {
            for book in tables.books.values_mut() {
                if book.author_id == Some(author.id) {
                    book.author_id = None;
                }
            }
        }
        Ok(())
    }

    async fn delete_publisher(&self, publisher: &Publisher) -> CatalogResult<()> {
        let mut tables = self.tables.write().await;
        if tables.publishers.remove(&publisher.id).is_some() {
            for book in tables.books.values_mut() {
                if book.publisher_id == Some(publisher.id) {
                    book.publisher_id = None;
                }
            }
        }
        Ok(())
    }

    async fn delete_book(&self, book: &Book) -> CatalogResult<()> {
        self.tables.write().await.books.remove(&book.id);
        Ok(())
    }
}

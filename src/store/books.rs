//! Book operations on the entity store

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookQuery, CreateBook, UpdateBook},
        borrow::BorrowStatus,
    },
};

use super::Store;

impl Store {
    pub fn books_list(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        let tables = self.read()?;
        Ok(tables
            .books
            .iter()
            .filter(|b| query.category.map_or(true, |c| b.category_id == c))
            .filter(|b| query.available.map_or(true, |a| b.available == a))
            .cloned()
            .collect())
    }

    pub fn books_get(&self, id: i32) -> AppResult<Book> {
        self.read()?
            .books
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    pub fn books_by_category(&self, category_id: i32) -> AppResult<Vec<Book>> {
        let tables = self.read()?;
        Ok(tables
            .books
            .iter()
            .filter(|b| b.category_id == category_id)
            .cloned()
            .collect())
    }

    /// Add a book. The referenced category must exist; new books are
    /// available until a borrow claims them.
    pub fn books_add(&self, book: CreateBook) -> AppResult<Book> {
        let mut tables = self.write()?;
        if !tables.categories.iter().any(|c| c.id == book.category_id) {
            return Err(AppError::Validation(format!(
                "Category {} does not exist",
                book.category_id
            )));
        }

        let id = tables.next_book_id();
        let book = Book {
            id,
            name: book.name,
            author: book.author,
            description: book.description,
            price: book.price,
            category_id: book.category_id,
            available: true,
        };
        tables.books.push(book.clone());
        Ok(book)
    }

    pub fn books_update(&self, id: i32, update: UpdateBook) -> AppResult<Book> {
        let mut tables = self.write()?;

        if let Some(category_id) = update.category_id {
            if !tables.categories.iter().any(|c| c.id == category_id) {
                return Err(AppError::Validation(format!(
                    "Category {} does not exist",
                    category_id
                )));
            }
        }

        let book = tables
            .books
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        if let Some(name) = update.name {
            book.name = name;
        }
        if let Some(author) = update.author {
            book.author = author;
        }
        if let Some(description) = update.description {
            book.description = description;
        }
        if let Some(price) = update.price {
            book.price = price;
        }
        if let Some(category_id) = update.category_id {
            book.category_id = category_id;
        }
        Ok(book.clone())
    }

    /// Delete a book. Refused while an active borrow references it, which
    /// keeps the availability invariant meaningful.
    pub fn books_delete(&self, id: i32) -> AppResult<()> {
        let mut tables = self.write()?;
        if !tables.books.iter().any(|b| b.id == id) {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        let borrowed = tables
            .borrows
            .iter()
            .any(|r| r.book_id == id && r.status == BorrowStatus::Active);
        if borrowed {
            return Err(AppError::BookBorrowed(id));
        }

        tables.books.retain(|b| b.id != id);
        Ok(())
    }
}

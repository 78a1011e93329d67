//! Catalog management service for categories and books

use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        book::{Book, BookQuery, CreateBook, UpdateBook},
        category::{Category, CategoryWithCount, CreateCategory, UpdateCategory},
    },
    store::Store,
};

#[derive(Clone)]
pub struct CatalogService {
    store: Store,
}

impl CatalogService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn list_categories(&self) -> AppResult<Vec<CategoryWithCount>> {
        self.store.categories_list_with_counts()
    }

    pub fn get_category(&self, id: i32) -> AppResult<Category> {
        self.store.categories_get(id)
    }

    pub fn create_category(&self, category: CreateCategory) -> AppResult<Category> {
        category.validate()?;
        self.store.categories_add(category)
    }

    pub fn update_category(&self, id: i32, category: UpdateCategory) -> AppResult<Category> {
        category.validate()?;
        self.store.categories_update(id, category)
    }

    /// Delete a category. Fails with `CategoryHasBooks` while referenced;
    /// the store enforces this whatever the client showed the operator.
    pub fn delete_category(&self, id: i32) -> AppResult<()> {
        self.store.categories_delete(id)
    }

    pub fn list_books(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        self.store.books_list(query)
    }

    pub fn get_book(&self, id: i32) -> AppResult<Book> {
        self.store.books_get(id)
    }

    pub fn books_by_category(&self, category_id: i32) -> AppResult<Vec<Book>> {
        // Surface a proper not-found for a dangling category id
        self.store.categories_get(category_id)?;
        self.store.books_by_category(category_id)
    }

    pub fn create_book(&self, book: CreateBook) -> AppResult<Book> {
        book.validate()?;
        self.store.books_add(book)
    }

    pub fn update_book(&self, id: i32, book: UpdateBook) -> AppResult<Book> {
        book.validate()?;
        self.store.books_update(id, book)
    }

    pub fn delete_book(&self, id: i32) -> AppResult<()> {
        self.store.books_delete(id)
    }
}

//! In-memory entity store.
//!
//! All four collections live behind a single `RwLock`, so every mutation,
//! including the borrow transaction that touches a record and a book, is
//! one lock-holding critical section. Multiple operator clients can hit the
//! API concurrently without ever observing a record without its availability
//! flip, or two borrows of the same book.

pub mod books;
pub mod borrows;
pub mod categories;
pub mod seed;
pub mod users;

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{
    error::{AppError, AppResult},
    models::{Book, BorrowRecord, Category, User},
};

/// The four entity collections plus the id high-water marks
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Tables {
    pub categories: Vec<Category>,
    pub books: Vec<Book>,
    pub users: Vec<User>,
    pub borrows: Vec<BorrowRecord>,
    next_ids: NextIds,
}

/// Per-collection id counters. Ids are strictly greater than every id ever
/// allocated for the collection, so deleting the highest row does not cause
/// its id to be handed out again.
#[derive(Debug, Clone, Copy, PartialEq)]
struct NextIds {
    category: i32,
    book: i32,
    user: i32,
    borrow: i32,
}

impl Default for NextIds {
    fn default() -> Self {
        Self {
            category: 1,
            book: 1,
            user: 1,
            borrow: 1,
        }
    }
}

/// Allocate the next id: at least one past the current high-water mark and
/// strictly greater than every existing id at call time.
fn allocate(next: &mut i32, max_existing: i32) -> i32 {
    let id = (*next).max(max_existing + 1);
    *next = id + 1;
    id
}

impl Tables {
    pub(crate) fn next_category_id(&mut self) -> i32 {
        let max = self.categories.iter().map(|c| c.id).max().unwrap_or(0);
        allocate(&mut self.next_ids.category, max)
    }

    pub(crate) fn next_book_id(&mut self) -> i32 {
        let max = self.books.iter().map(|b| b.id).max().unwrap_or(0);
        allocate(&mut self.next_ids.book, max)
    }

    pub(crate) fn next_user_id(&mut self) -> i32 {
        let max = self.users.iter().map(|u| u.id).max().unwrap_or(0);
        allocate(&mut self.next_ids.user, max)
    }

    pub(crate) fn next_borrow_id(&mut self) -> i32 {
        let max = self.borrows.iter().map(|r| r.id).max().unwrap_or(0);
        allocate(&mut self.next_ids.borrow, max)
    }
}

/// Handle to the shared entity store
#[derive(Clone, Default)]
pub struct Store {
    inner: Arc<RwLock<Tables>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn read(&self) -> AppResult<RwLockReadGuard<'_, Tables>> {
        self.inner
            .read()
            .map_err(|_| AppError::Internal("entity store lock poisoned".to_string()))
    }

    pub(crate) fn write(&self) -> AppResult<RwLockWriteGuard<'_, Tables>> {
        self.inner
            .write()
            .map_err(|_| AppError::Internal("entity store lock poisoned".to_string()))
    }

    /// Full copy of the tables, for seeding checks and test assertions
    pub fn snapshot(&self) -> AppResult<Tables> {
        Ok(self.read()?.clone())
    }
}

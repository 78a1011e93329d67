//! Borrow record operations on the entity store.
//!
//! `borrows_create` and `borrows_return` are the only writers of a book's
//! `available` flag. Each runs under the store write lock from first
//! precondition to last write, so the record and the flag always change
//! together: a book is unavailable exactly while an active record
//! references it.

use chrono::{DateTime, Utc};

use crate::{
    error::{AppError, AppResult},
    models::borrow::{BorrowRecord, BorrowStatus, UpdateBorrow},
};

use super::Store;

impl Store {
    pub fn borrows_list(&self) -> AppResult<Vec<BorrowRecord>> {
        Ok(self.read()?.borrows.clone())
    }

    pub fn borrows_get(&self, id: i32) -> AppResult<BorrowRecord> {
        self.read()?
            .borrows
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Borrow record with id {} not found", id)))
    }

    pub fn borrows_by_user(&self, user_id: i32) -> AppResult<Vec<BorrowRecord>> {
        let tables = self.read()?;
        Ok(tables
            .borrows
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    /// The borrow transaction. Preconditions in order: the book exists and
    /// is available, the user exists. On success the record is appended with
    /// `status=active` and the book flips to unavailable in the same
    /// critical section.
    pub fn borrows_create(
        &self,
        user_id: i32,
        book_id: i32,
        borrow_date: DateTime<Utc>,
        return_date: DateTime<Utc>,
        price: f64,
    ) -> AppResult<BorrowRecord> {
        let mut tables = self.write()?;

        // An absent book is as unavailable as a borrowed one.
        let available = tables
            .books
            .iter()
            .find(|b| b.id == book_id)
            .map(|b| b.available)
            .unwrap_or(false);
        if !available {
            return Err(AppError::BookUnavailable(book_id));
        }

        if !tables.users.iter().any(|u| u.id == user_id) {
            return Err(AppError::UnknownUser(user_id));
        }

        let id = tables.next_borrow_id();
        let record = BorrowRecord {
            id,
            user_id,
            book_id,
            borrow_date,
            return_date,
            price,
            status: BorrowStatus::Active,
        };
        tables.borrows.push(record.clone());
        if let Some(book) = tables.books.iter_mut().find(|b| b.id == book_id) {
            book.available = false;
        }
        Ok(record)
    }

    /// The return transaction: closes an active record and hands the book
    /// back to the catalog in the same critical section.
    pub fn borrows_return(&self, id: i32) -> AppResult<BorrowRecord> {
        let mut tables = self.write()?;

        let record = tables
            .borrows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Borrow record with id {} not found", id)))?;

        if record.status == BorrowStatus::Returned {
            return Err(AppError::AlreadyReturned(id));
        }

        record.status = BorrowStatus::Returned;
        let record = record.clone();
        if let Some(book) = tables.books.iter_mut().find(|b| b.id == record.book_id) {
            book.available = true;
        }
        Ok(record)
    }

    /// Merge a partial update (due-date extension, price correction) into a
    /// record. The transactional status is not touched here.
    pub fn borrows_update(&self, id: i32, update: UpdateBorrow) -> AppResult<BorrowRecord> {
        let mut tables = self.write()?;
        let record = tables
            .borrows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Borrow record with id {} not found", id)))?;

        if let Some(return_date) = update.return_date {
            if return_date <= record.borrow_date {
                return Err(AppError::Validation(
                    "return date must be after the borrow date".to_string(),
                ));
            }
            record.return_date = return_date;
        }
        if let Some(price) = update.price {
            record.price = price;
        }
        Ok(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        book::CreateBook,
        category::CreateCategory,
        user::Role,
    };
    use crate::store::users::NewUser;
    use chrono::Duration;

    fn seeded_store() -> Store {
        let store = Store::new();
        store
            .categories_add(CreateCategory {
                name: "Spiritual".to_string(),
                color: "#2196F3".to_string(),
                description: String::new(),
            })
            .unwrap();
        for name in ["The Life of Prayer", "The Holy Spirit"] {
            store
                .books_add(CreateBook {
                    name: name.to_string(),
                    author: "Fr. Matta".to_string(),
                    description: String::new(),
                    price: 50.0,
                    category_id: 1,
                })
                .unwrap();
        }
        store
            .users_add(NewUser {
                name: "Mina".to_string(),
                age: 22,
                email: "mina@mail.com".to_string(),
                password_hash: "hash".to_string(),
                phone: "0100000000".to_string(),
                main_church: "Cathedral".to_string(),
                father_of_confession: "Fr. Yousef".to_string(),
                role: Role::User,
            })
            .unwrap();
        store
    }

    fn dates() -> (DateTime<Utc>, DateTime<Utc>) {
        let borrow: DateTime<Utc> = "2024-01-10T00:00:00Z".parse().unwrap();
        (borrow, borrow + Duration::days(14))
    }

    /// A book is unavailable iff an active record references it.
    fn availability_invariant_holds(store: &Store) -> bool {
        let tables = store.snapshot().unwrap();
        tables.books.iter().all(|book| {
            let active = tables
                .borrows
                .iter()
                .any(|r| r.book_id == book.id && r.status == BorrowStatus::Active);
            book.available == !active
        })
    }

    #[test]
    fn successful_borrow_creates_record_and_flips_availability() {
        let store = seeded_store();
        let (borrow_date, return_date) = dates();

        let record = store
            .borrows_create(1, 1, borrow_date, return_date, 60.0)
            .unwrap();

        assert_eq!(record.id, 1);
        assert_eq!(record.status, BorrowStatus::Active);
        assert_eq!(record.price, 60.0);
        assert!(!store.books_get(1).unwrap().available);
        assert!(availability_invariant_holds(&store));
    }

    #[test]
    fn borrowing_an_unavailable_book_fails_without_mutation() {
        let store = seeded_store();
        let (borrow_date, return_date) = dates();
        store
            .borrows_create(1, 1, borrow_date, return_date, 60.0)
            .unwrap();

        let before = store.snapshot().unwrap();
        let err = store
            .borrows_create(1, 1, borrow_date, return_date, 60.0)
            .unwrap_err();

        assert!(matches!(err, AppError::BookUnavailable(1)));
        assert_eq!(store.snapshot().unwrap(), before);
    }

    #[test]
    fn borrowing_a_missing_book_reports_unavailable() {
        let store = seeded_store();
        let (borrow_date, return_date) = dates();
        let before = store.snapshot().unwrap();

        let err = store
            .borrows_create(1, 99, borrow_date, return_date, 60.0)
            .unwrap_err();

        assert!(matches!(err, AppError::BookUnavailable(99)));
        assert_eq!(store.snapshot().unwrap(), before);
    }

    #[test]
    fn borrowing_with_unknown_user_fails_without_mutation() {
        let store = seeded_store();
        let (borrow_date, return_date) = dates();
        let before = store.snapshot().unwrap();

        let err = store
            .borrows_create(99, 1, borrow_date, return_date, 60.0)
            .unwrap_err();

        assert!(matches!(err, AppError::UnknownUser(99)));
        assert_eq!(store.snapshot().unwrap(), before);
        assert!(store.books_get(1).unwrap().available);
    }

    #[test]
    fn return_restores_availability_exactly_once() {
        let store = seeded_store();
        let (borrow_date, return_date) = dates();
        let record = store
            .borrows_create(1, 2, borrow_date, return_date, 70.0)
            .unwrap();

        let returned = store.borrows_return(record.id).unwrap();
        assert_eq!(returned.status, BorrowStatus::Returned);
        assert!(store.books_get(2).unwrap().available);
        assert!(availability_invariant_holds(&store));

        let err = store.borrows_return(record.id).unwrap_err();
        assert!(matches!(err, AppError::AlreadyReturned(id) if id == record.id));
    }

    #[test]
    fn book_can_be_borrowed_again_after_return() {
        let store = seeded_store();
        let (borrow_date, return_date) = dates();
        let first = store
            .borrows_create(1, 1, borrow_date, return_date, 50.0)
            .unwrap();
        store.borrows_return(first.id).unwrap();

        let second = store
            .borrows_create(1, 1, borrow_date, return_date, 50.0)
            .unwrap();
        assert!(second.id > first.id);
        assert!(availability_invariant_holds(&store));
    }

    #[test]
    fn update_extends_due_date_but_rejects_inverted_window() {
        let store = seeded_store();
        let (borrow_date, return_date) = dates();
        let record = store
            .borrows_create(1, 1, borrow_date, return_date, 50.0)
            .unwrap();

        let extended = store
            .borrows_update(
                record.id,
                UpdateBorrow {
                    return_date: Some(return_date + Duration::days(7)),
                    price: None,
                },
            )
            .unwrap();
        assert_eq!(extended.return_date, return_date + Duration::days(7));

        let err = store
            .borrows_update(
                record.id,
                UpdateBorrow {
                    return_date: Some(borrow_date - Duration::days(1)),
                    price: None,
                },
            )
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn history_filters_by_user() {
        let store = seeded_store();
        let (borrow_date, return_date) = dates();
        store
            .borrows_create(1, 1, borrow_date, return_date, 50.0)
            .unwrap();
        store
            .borrows_create(1, 2, borrow_date, return_date, 70.0)
            .unwrap();

        assert_eq!(store.borrows_by_user(1).unwrap().len(), 2);
        assert!(store.borrows_by_user(2).unwrap().is_empty());
    }
}

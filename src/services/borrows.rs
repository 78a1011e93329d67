//! Borrow transaction service.
//!
//! Validates the loan window, runs the atomic borrow/return transactions on
//! the store, and sends the member confirmation. Listings are derived
//! against a caller-supplied `now` so every record in one response is
//! classified against the same clock reading.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        borrow::{BorrowDetails, BorrowHistory, BorrowRecord, UpdateBorrow},
        BookShort, UserShort,
    },
    store::Store,
};

use super::notifications::BorrowNotifier;

#[derive(Clone)]
pub struct BorrowsService {
    store: Store,
    notifier: Arc<dyn BorrowNotifier>,
}

impl BorrowsService {
    pub fn new(store: Store, notifier: Arc<dyn BorrowNotifier>) -> Self {
        Self { store, notifier }
    }

    /// Create a borrow record and flip the book to unavailable, then confirm
    /// to the member. The confirmation is fire-and-forget: a delivery
    /// failure is logged and the committed transaction stands.
    pub async fn create_borrow(
        &self,
        user_id: i32,
        book_id: i32,
        borrow_date: DateTime<Utc>,
        return_date: DateTime<Utc>,
        price: f64,
    ) -> AppResult<BorrowRecord> {
        if price < 0.0 {
            return Err(AppError::Validation(
                "price must not be negative".to_string(),
            ));
        }
        if return_date <= borrow_date {
            return Err(AppError::Validation(
                "return date must be after the borrow date".to_string(),
            ));
        }

        let record = self
            .store
            .borrows_create(user_id, book_id, borrow_date, return_date, price)?;

        // Both lookups succeed: the transaction just validated them.
        let user = self.store.users_get(user_id)?;
        let book = self.store.books_get(book_id)?;

        let due_display = record.return_date.format("%d/%m/%Y").to_string();
        if let Err(e) = self
            .notifier
            .send_borrow_confirmation(&user.name, &user.email, &book.name, &due_display)
            .await
        {
            tracing::warn!(
                borrow_id = record.id,
                error = %e,
                "borrow confirmation could not be delivered"
            );
        }

        Ok(record)
    }

    /// Close an active record and restore the book's availability
    pub fn return_borrow(&self, id: i32) -> AppResult<BorrowRecord> {
        self.store.borrows_return(id)
    }

    pub fn update_borrow(&self, id: i32, update: UpdateBorrow) -> AppResult<BorrowRecord> {
        update.validate()?;
        self.store.borrows_update(id, update)
    }

    pub fn get_borrow(&self, id: i32) -> AppResult<BorrowRecord> {
        self.store.borrows_get(id)
    }

    /// A user's borrow history, joined with book summaries, classified
    /// against `now` and bucketed into active/completed.
    pub fn user_history(&self, user_id: i32, now: DateTime<Utc>) -> AppResult<BorrowHistory> {
        // Verify the user exists before filtering an empty history for them
        self.store.users_get(user_id)?;

        let details = self
            .store
            .borrows_by_user(user_id)?
            .into_iter()
            .map(|record| {
                let book = self.store.books_get(record.book_id).ok();
                Ok(BorrowDetails::derive(
                    record,
                    book.as_ref().map(BookShort::from),
                    None,
                    now,
                ))
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(BorrowHistory::bucket(details))
    }

    /// Every borrow record with user and book joined, for the operator's
    /// overview
    pub fn list_all(&self, now: DateTime<Utc>) -> AppResult<Vec<BorrowDetails>> {
        self.store
            .borrows_list()?
            .into_iter()
            .map(|record| {
                let book = self.store.books_get(record.book_id).ok();
                let user = self.store.users_get(record.user_id).ok();
                Ok(BorrowDetails::derive(
                    record,
                    book.as_ref().map(BookShort::from),
                    user.as_ref().map(UserShort::from),
                    now,
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{
            book::CreateBook,
            borrow::BorrowStatus,
            category::CreateCategory,
            user::Role,
        },
        services::notifications::MockBorrowNotifier,
        store::users::NewUser,
    };
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
        store
            .books_add(CreateBook {
                name: "The Life of Prayer".to_string(),
                author: "Fr. Matta".to_string(),
                description: String::new(),
                price: 50.0,
                category_id: 1,
            })
            .unwrap();
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

    fn now() -> DateTime<Utc> {
        "2024-01-10T00:00:00Z".parse().unwrap()
    }

    #[tokio::test]
    async fn successful_borrow_notifies_exactly_once() {
        let store = seeded_store();
        let mut notifier = MockBorrowNotifier::new();
        notifier
            .expect_send_borrow_confirmation()
            .times(1)
            .withf(|user, email, book, due| {
                user == "Mina"
                    && email == "mina@mail.com"
                    && book == "The Life of Prayer"
                    && due == "24/01/2024"
            })
            .returning(|_, _, _, _| Ok(()));

        let service = BorrowsService::new(store.clone(), Arc::new(notifier));
        let record = service
            .create_borrow(1, 1, now(), now() + Duration::days(14), 60.0)
            .await
            .unwrap();

        assert_eq!(record.status, BorrowStatus::Active);
        assert!(!store.books_get(1).unwrap().available);
    }

    #[tokio::test]
    async fn notification_failure_does_not_fail_the_transaction() {
        let store = seeded_store();
        let mut notifier = MockBorrowNotifier::new();
        notifier
            .expect_send_borrow_confirmation()
            .times(1)
            .returning(|_, _, _, _| Err(AppError::Internal("smtp down".to_string())));

        let service = BorrowsService::new(store.clone(), Arc::new(notifier));
        let record = service
            .create_borrow(1, 1, now(), now() + Duration::days(14), 60.0)
            .await
            .unwrap();

        assert_eq!(store.borrows_get(record.id).unwrap().status, BorrowStatus::Active);
    }

    #[tokio::test]
    async fn failed_preconditions_never_notify() {
        let store = seeded_store();
        let mut notifier = MockBorrowNotifier::new();
        notifier.expect_send_borrow_confirmation().times(0);

        let service = BorrowsService::new(store, Arc::new(notifier));

        // Unknown user
        assert!(matches!(
            service
                .create_borrow(99, 1, now(), now() + Duration::days(14), 60.0)
                .await
                .unwrap_err(),
            AppError::UnknownUser(99)
        ));

        // Inverted loan window
        assert!(matches!(
            service
                .create_borrow(1, 1, now(), now() - Duration::days(1), 60.0)
                .await
                .unwrap_err(),
            AppError::Validation(_)
        ));

        // Negative price
        assert!(matches!(
            service
                .create_borrow(1, 1, now(), now() + Duration::days(14), -5.0)
                .await
                .unwrap_err(),
            AppError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn history_is_bucketed_against_the_supplied_clock() {
        let store = seeded_store();
        let mut notifier = MockBorrowNotifier::new();
        notifier
            .expect_send_borrow_confirmation()
            .returning(|_, _, _, _| Ok(()));
        let service = BorrowsService::new(store, Arc::new(notifier));

        let record = service
            .create_borrow(1, 1, now(), now() + Duration::days(14), 60.0)
            .await
            .unwrap();

        let mid = service.user_history(1, now() + Duration::days(7)).unwrap();
        assert_eq!(mid.total, 1);
        assert_eq!(mid.active.len(), 1);
        let details = &mid.active[0];
        assert_eq!(details.record.id, record.id);
        assert_eq!(details.book.as_ref().unwrap().name, "The Life of Prayer");
        assert!((details.progress - 0.5).abs() < 1e-9);

        let late = service.user_history(1, now() + Duration::days(15)).unwrap();
        assert_eq!(late.active.len(), 0);
        assert_eq!(late.completed.len(), 1);

        assert!(matches!(
            service.user_history(42, now()).unwrap_err(),
            AppError::UnknownUser(42)
        ));
    }
}

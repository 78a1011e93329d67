//! Borrow record model and time-based status derivation.
//!
//! The stored [`BorrowStatus`] is transactional only (written by the borrow
//! and return transactions). The display lifecycle (remaining time, elapsed
//! fraction, urgency bucket) is always recomputed from
//! `(borrow_date, return_date, now)` with `now` supplied by the caller, so
//! every function here is pure and deterministic.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::book::BookShort;
use super::user::UserShort;

/// Transactional state of a borrow record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BorrowStatus {
    Active,
    Returned,
}

/// Borrow record linking one user to one book for a bounded time window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRecord {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub borrow_date: DateTime<Utc>,
    /// Due date; always after `borrow_date`
    pub return_date: DateTime<Utc>,
    pub price: f64,
    pub status: BorrowStatus,
}

/// Derived urgency phase of an active borrow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum BorrowPhase {
    Active,
    DueSoon,
    DueVerySoon,
    Expired,
}

/// Countdown until the due date, floored per component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TimeRemaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl TimeRemaining {
    pub const ZERO: TimeRemaining = TimeRemaining {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// True once the due date has passed (or less than a second remains).
    /// Drives the active/completed bucketing of the history view.
    pub fn is_elapsed(&self) -> bool {
        self.days == 0 && self.hours == 0 && self.minutes == 0 && self.seconds == 0
    }

    /// Whole hours remaining, the unit the urgency thresholds are stated in
    pub fn total_hours(&self) -> i64 {
        self.days * 24 + self.hours
    }

    /// Human-readable countdown for notifications and display
    pub fn display(&self) -> String {
        if self.is_elapsed() {
            "elapsed".to_string()
        } else if self.days > 0 {
            format!("{} days {} hours", self.days, self.hours)
        } else if self.hours > 0 {
            format!("{} hours {} minutes", self.hours, self.minutes)
        } else {
            format!("{} minutes {} seconds", self.minutes, self.seconds)
        }
    }
}

/// Countdown from `now` to `return_date`, clamped to zero once the due date
/// has passed. Never negative.
pub fn time_remaining(return_date: DateTime<Utc>, now: DateTime<Utc>) -> TimeRemaining {
    let difference = return_date.signed_duration_since(now);
    if difference <= Duration::zero() {
        return TimeRemaining::ZERO;
    }

    let secs = difference.num_seconds();
    TimeRemaining {
        days: secs / 86_400,
        hours: (secs % 86_400) / 3_600,
        minutes: (secs % 3_600) / 60,
        seconds: secs % 60,
    }
}

/// Elapsed fraction of the loan window in `[0, 1]`, clamped at both ends.
/// A window of zero or negative length yields 1.0 rather than dividing.
pub fn progress_fraction(
    borrow_date: DateTime<Utc>,
    return_date: DateTime<Utc>,
    now: DateTime<Utc>,
) -> f64 {
    let total = return_date.signed_duration_since(borrow_date).num_milliseconds();
    if total <= 0 {
        return 1.0;
    }
    let elapsed = now.signed_duration_since(borrow_date).num_milliseconds();
    (elapsed as f64 / total as f64).clamp(0.0, 1.0)
}

/// Urgency classification on whole hours remaining, inclusive at each
/// boundary: `<= 0` Expired, `<= 24` DueVerySoon, `<= 72` DueSoon.
pub fn classify(return_date: DateTime<Utc>, now: DateTime<Utc>) -> BorrowPhase {
    let total_hours = time_remaining(return_date, now).total_hours();

    if total_hours <= 0 {
        BorrowPhase::Expired
    } else if total_hours <= 24 {
        BorrowPhase::DueVerySoon
    } else if total_hours <= 72 {
        BorrowPhase::DueSoon
    } else {
        BorrowPhase::Active
    }
}

/// Borrow record enriched with joined entities and the derived lifecycle,
/// computed against a single `now` for the whole listing
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowDetails {
    #[serde(flatten)]
    pub record: BorrowRecord,
    /// Absent when the book was deleted after the record was closed
    pub book: Option<BookShort>,
    /// Absent in per-user listings where the user is implied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserShort>,
    pub phase: BorrowPhase,
    pub time_remaining: TimeRemaining,
    pub progress: f64,
    pub remaining_display: String,
}

impl BorrowDetails {
    pub fn derive(
        record: BorrowRecord,
        book: Option<BookShort>,
        user: Option<UserShort>,
        now: DateTime<Utc>,
    ) -> Self {
        let remaining = time_remaining(record.return_date, now);
        Self {
            phase: classify(record.return_date, now),
            time_remaining: remaining,
            progress: progress_fraction(record.borrow_date, record.return_date, now),
            remaining_display: remaining.display(),
            record,
            book,
            user,
        }
    }

    /// A record belongs in the "active" bucket while it is still open and
    /// time remains on the clock; everything else is "completed".
    pub fn is_active_bucket(&self) -> bool {
        self.record.status == BorrowStatus::Active && !self.time_remaining.is_elapsed()
    }
}

/// Per-user borrow history, bucketed for display
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowHistory {
    pub total: usize,
    pub active: Vec<BorrowDetails>,
    pub completed: Vec<BorrowDetails>,
}

impl BorrowHistory {
    pub fn bucket(details: Vec<BorrowDetails>) -> Self {
        let total = details.len();
        let (active, completed) = details.into_iter().partition(BorrowDetails::is_active_bucket);
        Self {
            total,
            active,
            completed,
        }
    }
}

/// Partial borrow update: due-date extension or price correction. The stored
/// status is not editable here; it only moves through the return transaction.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBorrow {
    pub return_date: Option<DateTime<Utc>>,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: Option<f64>,
}

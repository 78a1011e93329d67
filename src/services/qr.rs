//! QR identity exchange.
//!
//! A member's badge is a self-contained JSON payload; the operator's scanner
//! posts the raw text back for validation. Decoding is a total function:
//! any input maps to the validated identity or to one of the distinct
//! failure kinds (malformed, unknown user, expired), each with its own
//! retry affordance on the scanner screen.

use chrono::{DateTime, Duration, Utc};

use crate::{
    config::BorrowsConfig,
    error::{AppError, AppResult},
    models::qr::QrPayload,
    store::Store,
};

#[derive(Clone)]
pub struct QrService {
    store: Store,
    max_age: Duration,
}

impl QrService {
    pub fn new(store: Store, config: &BorrowsConfig) -> Self {
        Self {
            store,
            max_age: Duration::hours(config.qr_max_age_hours),
        }
    }

    /// Encode the badge payload for a user, stamped at `now`
    pub fn badge(&self, user_id: i32, now: DateTime<Utc>) -> AppResult<QrPayload> {
        let user = self.store.users_get(user_id)?;
        Ok(QrPayload::for_user(&user, now.timestamp_millis()))
    }

    /// Decode and validate scanned badge text. Checks run in order and
    /// short-circuit: payload shape, membership, freshness.
    pub fn scan(&self, raw: &str, now: DateTime<Utc>) -> AppResult<QrPayload> {
        let payload: QrPayload = serde_json::from_str(raw)
            .map_err(|e| AppError::MalformedPayload(e.to_string()))?;

        if payload.user_id <= 0 {
            return Err(AppError::MalformedPayload(
                "userId must be a positive id".to_string(),
            ));
        }
        if payload.name.is_empty() || payload.email.is_empty() {
            return Err(AppError::MalformedPayload(
                "name and email are required".to_string(),
            ));
        }

        self.store.users_get(payload.user_id)?;

        if payload.age_ms(now.timestamp_millis()) > self.max_age.num_milliseconds() {
            return Err(AppError::ExpiredPayload);
        }

        Ok(payload)
    }
}

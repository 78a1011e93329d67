//! QR badge payload.
//!
//! The payload is the only externally consumed wire format: a self-contained
//! JSON object a member renders as a QR code and an operator's scanner reads
//! back. It must round-trip exactly, timestamp aside.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::user::User;

/// Identity payload embedded in a member's QR badge. `timestamp` is epoch
/// milliseconds at encode time and bounds the badge's validity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QrPayload {
    pub user_id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub main_church: String,
    pub father_of_confession: String,
    pub timestamp: i64,
}

impl QrPayload {
    /// Build a badge for `user`, stamped at `now_ms`
    pub fn for_user(user: &User, now_ms: i64) -> Self {
        Self {
            user_id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            main_church: user.main_church.clone(),
            father_of_confession: user.father_of_confession.clone(),
            timestamp: now_ms,
        }
    }

    /// Age of the badge relative to `now_ms`, in milliseconds
    pub fn age_ms(&self, now_ms: i64) -> i64 {
        now_ms - self.timestamp
    }
}

/// Scan request carrying the raw text read from a QR code
#[derive(Debug, Deserialize, ToSchema)]
pub struct ScanRequest {
    /// Raw QR code content, expected to be the JSON payload
    pub data: String,
}

//! Book model and related types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Catalog book. Each row is exactly one physical copy; `available` is the
/// whole inventory model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub id: i32,
    pub name: String,
    pub author: String,
    pub description: String,
    pub price: f64,
    /// Referenced category id (wire name `category`, as the mobile client expects)
    #[serde(rename = "category")]
    pub category_id: i32,
    pub available: bool,
}

/// Short book form embedded in borrow listings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookShort {
    pub id: i32,
    pub name: String,
    pub author: String,
    #[serde(rename = "category")]
    pub category_id: i32,
}

impl From<&Book> for BookShort {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            name: book.name.clone(),
            author: book.author.clone(),
            category_id: book.category_id,
        }
    }
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "author is required"))]
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: f64,
    #[serde(rename = "category")]
    pub category_id: i32,
}

/// Update book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: Option<f64>,
    #[serde(rename = "category")]
    pub category_id: Option<i32>,
}

/// Book list query parameters
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct BookQuery {
    /// Restrict to one category
    pub category: Option<i32>,
    /// Restrict to books that may currently be borrowed
    pub available: Option<bool>,
}

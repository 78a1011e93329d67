//! Category model and related types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Book category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: i32,
    pub name: String,
    /// Color token used by the client for the category chip
    pub color: String,
    pub description: String,
}

/// Create category request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategory {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "color is required"))]
    pub color: String,
    #[serde(default)]
    pub description: String,
}

/// Update category request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCategory {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
}

/// Category with the number of books referencing it
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWithCount {
    #[serde(flatten)]
    pub category: Category,
    pub book_count: usize,
}

//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, borrows, categories, health, qr, settings, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Kanisa Library API",
        version = "0.3.0",
        description = "Church Library Management REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::signup,
        auth::logout,
        auth::me,
        auth::session,
        // Categories
        categories::list_categories,
        categories::get_category,
        categories::list_category_books,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::update_role,
        // Borrows
        borrows::create_borrow,
        borrows::return_borrow,
        borrows::update_borrow,
        borrows::list_borrows,
        borrows::get_user_borrows,
        // QR
        qr::badge,
        qr::scan,
        // Settings
        settings::get_theme,
        settings::update_theme,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::SessionResponse,
            // Categories
            crate::models::category::Category,
            crate::models::category::CategoryWithCount,
            crate::models::category::CreateCategory,
            crate::models::category::UpdateCategory,
            // Books
            crate::models::book::Book,
            crate::models::book::BookShort,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            // Users
            crate::models::user::User,
            crate::models::user::UserShort,
            crate::models::user::SessionUser,
            crate::models::user::Role,
            crate::models::user::SignupRequest,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            crate::models::user::UpdateRole,
            // Borrows
            borrows::CreateBorrowRequest,
            borrows::BorrowResponse,
            crate::models::borrow::BorrowRecord,
            crate::models::borrow::BorrowStatus,
            crate::models::borrow::BorrowPhase,
            crate::models::borrow::BorrowDetails,
            crate::models::borrow::BorrowHistory,
            crate::models::borrow::TimeRemaining,
            crate::models::borrow::UpdateBorrow,
            // QR
            crate::models::qr::QrPayload,
            crate::models::qr::ScanRequest,
            // Settings
            crate::storage::ThemePreference,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "categories", description = "Category management"),
        (name = "books", description = "Book catalog management"),
        (name = "users", description = "User management"),
        (name = "borrows", description = "Borrow and return workflow"),
        (name = "qr", description = "QR badge exchange"),
        (name = "settings", description = "Client preferences")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

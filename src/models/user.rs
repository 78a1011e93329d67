//! User model and related types

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// User roles. `Admin` gates every administrative capability (catalog writes,
/// user management, the scanner flow).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Library member or administrator.
///
/// The password holds the argon2 hash and never crosses the wire in either
/// direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub name: String,
    pub age: u32,
    pub email: String,
    #[serde(skip)]
    pub password: Option<String>,
    pub phone: String,
    pub main_church: String,
    pub father_of_confession: String,
    pub role: Role,
}

/// Session snapshot of a user, persisted to the local preference store.
/// Carrying no password field keeps credentials out of the preference file
/// by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: i32,
    pub name: String,
    pub age: u32,
    pub email: String,
    pub phone: String,
    pub main_church: String,
    pub father_of_confession: String,
    pub role: Role,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            age: user.age,
            email: user.email.clone(),
            phone: user.phone.clone(),
            main_church: user.main_church.clone(),
            father_of_confession: user.father_of_confession.clone(),
            role: user.role,
        }
    }
}

/// Short user form embedded in borrow listings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserShort {
    pub id: i32,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserShort {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Self-service signup request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(range(min = 1, message = "age must be positive"))]
    pub age: u32,
    #[validate(email(message = "malformed email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "passwords do not match"))]
    pub confirm_password: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub main_church: String,
    #[serde(default)]
    pub father_of_confession: String,
}

/// Administrator create-user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(range(min = 1, message = "age must be positive"))]
    pub age: u32,
    #[validate(email(message = "malformed email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub main_church: String,
    #[serde(default)]
    pub father_of_confession: String,
    pub role: Role,
}

/// Update user request. Role is deliberately absent: it is immutable through
/// profile updates and only changes via the dedicated role endpoint.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(range(min = 1, message = "age must be positive"))]
    pub age: Option<u32>,
    #[validate(email(message = "malformed email address"))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: Option<String>,
    pub phone: Option<String>,
    pub main_church: Option<String>,
    pub father_of_confession: Option<String>,
}

/// Update role request (admin only)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRole {
    pub role: Role,
}

/// JWT claims carried by the bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    /// User email
    pub sub: String,
    pub user_id: i32,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Encode the claims into a signed JWT
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Decode and verify a JWT into claims
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        decode::<UserClaims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> AppResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Administrator privileges required".to_string(),
            ))
        }
    }

    /// Allow a user to act on their own record, or an admin on any record
    pub fn require_self_or_admin(&self, user_id: i32) -> AppResult<()> {
        if self.user_id == user_id || self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Cannot access another user's data".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: Role) -> UserClaims {
        UserClaims {
            sub: "mina@mail.com".to_string(),
            user_id: 1,
            role,
            exp: 4102444800, // far future
            iat: 0,
        }
    }

    #[test]
    fn token_round_trip() {
        let claims = claims(Role::Admin);
        let token = claims.create_token("secret").unwrap();
        let decoded = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(decoded.user_id, 1);
        assert_eq!(decoded.role, Role::Admin);
        assert_eq!(decoded.sub, "mina@mail.com");
    }

    #[test]
    fn token_rejects_wrong_secret() {
        let token = claims(Role::User).create_token("secret").unwrap();
        assert!(UserClaims::from_token(&token, "other").is_err());
    }

    #[test]
    fn self_or_admin_gate() {
        let user = claims(Role::User);
        assert!(user.require_self_or_admin(1).is_ok());
        assert!(user.require_self_or_admin(2).is_err());
        assert!(claims(Role::Admin).require_self_or_admin(2).is_ok());
    }

    #[test]
    fn user_json_never_contains_password() {
        let user = User {
            id: 1,
            name: "Mina".to_string(),
            age: 22,
            email: "mina@mail.com".to_string(),
            password: Some("$argon2id$...".to_string()),
            phone: "0100000000".to_string(),
            main_church: "Cathedral".to_string(),
            father_of_confession: "Fr. Yousef".to_string(),
            role: Role::User,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"mainChurch\""));
        assert!(json.contains("\"fatherOfConfession\""));
    }
}

//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{
        CreateUser, Role, SessionUser, SignupRequest, UpdateUser, User, UserClaims,
    },
    storage::PrefsStore,
    store::{users::NewUser, Store},
};

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored Argon2 hash
pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[derive(Clone)]
pub struct UsersService {
    store: Store,
    config: AuthConfig,
    prefs: PrefsStore,
}

impl UsersService {
    pub fn new(store: Store, config: AuthConfig, prefs: PrefsStore) -> Self {
        Self {
            store,
            config,
            prefs,
        }
    }

    /// Authenticate by email and password, returning a JWT and the user.
    /// The session snapshot is persisted so the client can restore it on
    /// next launch.
    pub fn authenticate(&self, email: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .store
            .users_get_by_email(email)?
            .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

        let hash = user
            .password
            .as_deref()
            .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;
        if !verify_password(hash, password)? {
            return Err(AppError::Authentication(
                "Invalid email or password".to_string(),
            ));
        }

        let token = self.create_token_for_user(&user)?;
        self.prefs.set_current_user(Some(SessionUser::from(&user)))?;
        Ok((token, user))
    }

    /// Clear the persisted session
    pub fn logout(&self) -> AppResult<()> {
        self.prefs.set_current_user(None)
    }

    /// The persisted session the client restores on launch, if any
    pub fn session(&self) -> AppResult<Option<SessionUser>> {
        self.prefs.current_user()
    }

    /// Create JWT claims for a user
    fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.email.clone(),
            user_id: user.id,
            role: user.role,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Self-service signup. Always creates a regular member; promoting to
    /// operator is a separate administrative action.
    pub fn signup(&self, request: SignupRequest) -> AppResult<User> {
        request.validate()?;

        self.store.users_add(NewUser {
            name: request.name,
            age: request.age,
            email: request.email,
            password_hash: hash_password(&request.password)?,
            phone: request.phone,
            main_church: request.main_church,
            father_of_confession: request.father_of_confession,
            role: Role::User,
        })
    }

    /// Create a user with an explicit role (admin only)
    pub fn create_user(&self, request: CreateUser) -> AppResult<User> {
        request.validate()?;

        self.store.users_add(NewUser {
            name: request.name,
            age: request.age,
            email: request.email,
            password_hash: hash_password(&request.password)?,
            phone: request.phone,
            main_church: request.main_church,
            father_of_confession: request.father_of_confession,
            role: request.role,
        })
    }

    /// Update a user. When the updated user is the one in the persisted
    /// session, the stored snapshot is refreshed to the merged record.
    pub fn update_user(&self, id: i32, update: UpdateUser) -> AppResult<User> {
        update.validate()?;

        let password_hash = match update.password.as_deref() {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };

        let updated = self.store.users_update(id, update, password_hash)?;

        if let Some(session) = self.prefs.current_user()? {
            if session.id == id {
                self.prefs
                    .set_current_user(Some(SessionUser::from(&updated)))?;
            }
        }

        Ok(updated)
    }

    /// Change a user's role (admin only)
    pub fn set_role(&self, id: i32, role: Role) -> AppResult<User> {
        let updated = self.store.users_set_role(id, role)?;
        if let Some(session) = self.prefs.current_user()? {
            if session.id == id {
                self.prefs
                    .set_current_user(Some(SessionUser::from(&updated)))?;
            }
        }
        Ok(updated)
    }

    pub fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.store.users_get(id)
    }

    pub fn list(&self) -> AppResult<Vec<User>> {
        self.store.users_list()
    }
}

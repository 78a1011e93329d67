//! User operations on the entity store

use crate::{
    error::{AppError, AppResult},
    models::user::{Role, UpdateUser, User},
};

use super::Store;

/// Fields needed to insert a user; the password is already hashed by the
/// service layer.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub age: u32,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub main_church: String,
    pub father_of_confession: String,
    pub role: Role,
}

impl Store {
    pub fn users_list(&self) -> AppResult<Vec<User>> {
        Ok(self.read()?.users.clone())
    }

    pub fn users_get(&self, id: i32) -> AppResult<User> {
        self.read()?
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(AppError::UnknownUser(id))
    }

    pub fn users_get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .read()?
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    pub fn users_email_exists(&self, email: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        Ok(self
            .read()?
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(email) && Some(u.id) != exclude_id))
    }

    pub fn users_add(&self, user: NewUser) -> AppResult<User> {
        let mut tables = self.write()?;
        if tables
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let id = tables.next_user_id();
        let user = User {
            id,
            name: user.name,
            age: user.age,
            email: user.email,
            password: Some(user.password_hash),
            phone: user.phone,
            main_church: user.main_church,
            father_of_confession: user.father_of_confession,
            role: user.role,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    /// Merge a partial update into the user. `password_hash` replaces the
    /// stored hash when present; role changes go through `users_set_role`.
    pub fn users_update(
        &self,
        id: i32,
        update: UpdateUser,
        password_hash: Option<String>,
    ) -> AppResult<User> {
        let mut tables = self.write()?;

        if let Some(ref email) = update.email {
            if tables
                .users
                .iter()
                .any(|u| u.email.eq_ignore_ascii_case(email) && u.id != id)
            {
                return Err(AppError::Conflict("Email already registered".to_string()));
            }
        }

        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(AppError::UnknownUser(id))?;

        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(age) = update.age {
            user.age = age;
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(phone) = update.phone {
            user.phone = phone;
        }
        if let Some(main_church) = update.main_church {
            user.main_church = main_church;
        }
        if let Some(father_of_confession) = update.father_of_confession {
            user.father_of_confession = father_of_confession;
        }
        if let Some(hash) = password_hash {
            user.password = Some(hash);
        }
        Ok(user.clone())
    }

    pub fn users_set_role(&self, id: i32, role: Role) -> AppResult<User> {
        let mut tables = self.write()?;
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(AppError::UnknownUser(id))?;
        user.role = role;
        Ok(user.clone())
    }
}

//! Demo catalog seeding for development deployments.
//!
//! Mirrors the pilot parish dataset: four categories, five books, three
//! members, and a short borrow history with one loan still running so the
//! countdown screens have something to show.

use chrono::{DateTime, Duration, Utc};

use crate::{
    error::AppResult,
    models::{
        book::CreateBook,
        category::CreateCategory,
        user::Role,
    },
    services::users::hash_password,
};

use super::{users::NewUser, Store};

impl Store {
    /// Populate an empty store with the demo dataset. Dates are laid out
    /// relative to `now` so one loan is mid-flight and one is history.
    pub fn seed_demo_data(&self, now: DateTime<Utc>) -> AppResult<()> {
        let categories = [
            ("روحيات", "#2196F3", "كتب روحية"),
            ("لاهوت", "#F44336", "كتب لاهوتية"),
            ("تاريخ الكنيسة", "#4CAF50", "كتب تاريخ الكنيسة"),
            ("سير القديسين", "#9C27B0", "سير وحياة القديسين"),
        ];
        for (name, color, description) in categories {
            self.categories_add(CreateCategory {
                name: name.to_string(),
                color: color.to_string(),
                description: description.to_string(),
            })?;
        }

        let books = [
            ("حياة الصلاة", "ابونا متى", "تعليم عن الصلاة", 50.0, 1),
            ("مدخل في اللاهوت", "ابونا شنودة", "مقدمة في اللاهوت", 70.0, 2),
            ("الروح القدس", "ابونا بيشوي", "عن عمل الروح القدس", 60.0, 1),
            ("تاريخ الكنيسة القبطية", "د. رمزي", "تاريخ شامل للكنيسة القبطية", 80.0, 3),
            ("حياة القديس الأنبا أنطونيوس", "القديس أثناسيوس", "سيرة أبو الرهبان", 45.0, 4),
        ];
        for (name, author, description, price, category_id) in books {
            self.books_add(CreateBook {
                name: name.to_string(),
                author: author.to_string(),
                description: description.to_string(),
                price,
                category_id,
            })?;
        }

        let users = [
            ("مينا", 22, "mina@mail.com", "123456", "0100000000", "الكاتدرائية", "ابونا يوسف", Role::User),
            ("جرجس", 30, "george@mail.com", "admin123", "0101111111", "مارمرقس", "ابونا بطرس", Role::Admin),
            ("مريم", 25, "mary@mail.com", "123456", "0102222222", "العذراء", "ابونا يوحنا", Role::User),
        ];
        for (name, age, email, password, phone, main_church, father_of_confession, role) in users {
            self.users_add(NewUser {
                name: name.to_string(),
                age,
                email: email.to_string(),
                password_hash: hash_password(password)?,
                phone: phone.to_string(),
                main_church: main_church.to_string(),
                father_of_confession: father_of_confession.to_string(),
                role,
            })?;
        }

        // A closed loan from last month and one still on the clock.
        let closed = self.borrows_create(
            1,
            1,
            now - Duration::days(30),
            now - Duration::days(16),
            50.0,
        )?;
        self.borrows_return(closed.id)?;

        self.borrows_create(1, 3, now - Duration::days(5), now + Duration::days(9), 60.0)?;

        Ok(())
    }
}

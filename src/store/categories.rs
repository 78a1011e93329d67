//! Category operations on the entity store

use crate::{
    error::{AppError, AppResult},
    models::category::{Category, CategoryWithCount, CreateCategory, UpdateCategory},
};

use super::Store;

impl Store {
    pub fn categories_list(&self) -> AppResult<Vec<Category>> {
        Ok(self.read()?.categories.clone())
    }

    /// Categories with the number of books referencing each, for the
    /// management screen and its delete affordance
    pub fn categories_list_with_counts(&self) -> AppResult<Vec<CategoryWithCount>> {
        let tables = self.read()?;
        Ok(tables
            .categories
            .iter()
            .map(|category| CategoryWithCount {
                book_count: tables
                    .books
                    .iter()
                    .filter(|b| b.category_id == category.id)
                    .count(),
                category: category.clone(),
            })
            .collect())
    }

    pub fn categories_get(&self, id: i32) -> AppResult<Category> {
        self.read()?
            .categories
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Category with id {} not found", id)))
    }

    pub fn categories_add(&self, category: CreateCategory) -> AppResult<Category> {
        let mut tables = self.write()?;
        let id = tables.next_category_id();
        let category = Category {
            id,
            name: category.name,
            color: category.color,
            description: category.description,
        };
        tables.categories.push(category.clone());
        Ok(category)
    }

    pub fn categories_update(&self, id: i32, update: UpdateCategory) -> AppResult<Category> {
        let mut tables = self.write()?;
        let category = tables
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Category with id {} not found", id)))?;

        if let Some(name) = update.name {
            category.name = name;
        }
        if let Some(color) = update.color {
            category.color = color;
        }
        if let Some(description) = update.description {
            category.description = description;
        }
        Ok(category.clone())
    }

    /// Delete a category. Refused while any book references it; the store is
    /// the final authority on this invariant, whatever the caller checked.
    pub fn categories_delete(&self, id: i32) -> AppResult<()> {
        let mut tables = self.write()?;
        if !tables.categories.iter().any(|c| c.id == id) {
            return Err(AppError::NotFound(format!(
                "Category with id {} not found",
                id
            )));
        }

        let book_count = tables.books.iter().filter(|b| b.category_id == id).count();
        if book_count > 0 {
            return Err(AppError::CategoryHasBooks {
                category_id: id,
                book_count,
            });
        }

        tables.categories.retain(|c| c.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::book::CreateBook;

    fn store_with_category() -> (Store, Category) {
        let store = Store::new();
        let category = store
            .categories_add(CreateCategory {
                name: "Spiritual".to_string(),
                color: "#2196F3".to_string(),
                description: "Spiritual books".to_string(),
            })
            .unwrap();
        (store, category)
    }

    #[test]
    fn update_merges_partial_fields() {
        let (store, category) = store_with_category();
        let updated = store
            .categories_update(
                category.id,
                UpdateCategory {
                    name: None,
                    color: Some("#FFFFFF".to_string()),
                    description: None,
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Spiritual");
        assert_eq!(updated.color, "#FFFFFF");
        assert_eq!(updated.description, "Spiritual books");
    }

    #[test]
    fn delete_is_refused_while_books_reference_it() {
        let (store, category) = store_with_category();
        store
            .books_add(CreateBook {
                name: "The Life of Prayer".to_string(),
                author: "Fr. Matta".to_string(),
                description: String::new(),
                price: 50.0,
                category_id: category.id,
            })
            .unwrap();

        let err = store.categories_delete(category.id).unwrap_err();
        assert!(matches!(
            err,
            AppError::CategoryHasBooks {
                category_id,
                book_count: 1
            } if category_id == category.id
        ));
        // The category is still there
        assert!(store.categories_get(category.id).is_ok());
    }

    #[test]
    fn delete_succeeds_once_unreferenced() {
        let (store, category) = store_with_category();
        store.categories_delete(category.id).unwrap();
        assert!(store.categories_get(category.id).is_err());
    }
}

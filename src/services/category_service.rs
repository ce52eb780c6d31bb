use sea_orm::*;
use tracing::info;

use crate::database::entities::categories;
use crate::errors::{DirectoryError, DirectoryResult};
use crate::services::validation::ValidationService;

/// Service for managing dish/restaurant categories
#[derive(Clone)]
pub struct CategoryService {
    db: DatabaseConnection,
}

impl CategoryService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> DirectoryResult<Vec<categories::Model>> {
        categories::Entity::find()
            .order_by_asc(categories::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| DirectoryError::from_db("list categories", e))
    }

    pub async fn get(&self, id: i32) -> DirectoryResult<categories::Model> {
        categories::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| DirectoryError::from_db("get category", e))?
            .ok_or(DirectoryError::not_found("category", id))
    }

    pub async fn create(&self, name: &str) -> DirectoryResult<categories::Model> {
        let name = ValidationService::validate_text("name", name)?;

        let category = categories::ActiveModel {
            name: Set(name),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| DirectoryError::from_db("create category", e))?;

        info!("Created category {} ({})", category.name, category.id);
        Ok(category)
    }

    pub async fn update(&self, id: i32, name: &str) -> DirectoryResult<categories::Model> {
        let name = ValidationService::validate_text("name", name)?;

        let mut category: categories::ActiveModel = self.get(id).await?.into();
        category.name = Set(name);

        category
            .update(&self.db)
            .await
            .map_err(|e| DirectoryError::from_db("update category", e))
    }

    /// Delete a category. Fails with a conflict while dishes still use it.
    pub async fn delete(&self, id: i32) -> DirectoryResult<()> {
        let result = categories::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| DirectoryError::from_db("delete category", e))?;

        if result.rows_affected == 0 {
            return Err(DirectoryError::not_found("category", id));
        }

        info!("Deleted category {}", id);
        Ok(())
    }
}

use async_trait::async_trait;

use crate::domain::category::errors::CategoryError;
use crate::domain::category::models::Category;
use crate::domain::category::models::CategoryId;
use crate::domain::category::models::CategoryName;

/// Port for category domain service operations.
#[async_trait]
pub trait CategoryServicePort: Send + Sync + 'static {
    /// Create a category, serialized per name by the creation guard.
    ///
    /// # Errors
    /// * `NameAlreadyExists` - A category with this name exists
    /// * `DatabaseError` - Database operation failed
    async fn create_category(&self, name: CategoryName) -> Result<Category, CategoryError>;

    /// All categories, ordered by name.
    async fn list_categories(&self) -> Result<Vec<Category>, CategoryError>;

    /// # Errors
    /// * `NotFound` - Category does not exist
    async fn get_category(&self, id: &CategoryId) -> Result<Category, CategoryError>;

    /// # Errors
    /// * `NotFound` - Category does not exist
    async fn get_category_by_name(&self, name: &CategoryName) -> Result<Category, CategoryError>;

    /// Rename a category, guarded on the new name.
    ///
    /// # Errors
    /// * `NotFound` - Category does not exist
    /// * `SameName` - New name equals the current one
    /// * `NameAlreadyExists` - Another category has the new name
    async fn rename_category(
        &self,
        id: &CategoryId,
        name: CategoryName,
    ) -> Result<Category, CategoryError>;

    /// # Errors
    /// * `NotFound` - Category does not exist
    async fn delete_category(&self, id: &CategoryId) -> Result<(), CategoryError>;
}

/// Persistence operations for category aggregate.
#[async_trait]
pub trait CategoryRepository: Send + Sync + 'static {
    /// # Errors
    /// * `NameAlreadyExists` - Unique name constraint violated
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, category: Category) -> Result<Category, CategoryError>;

    async fn find_by_id(&self, id: &CategoryId) -> Result<Option<Category>, CategoryError>;

    async fn find_by_name(&self, name: &CategoryName) -> Result<Option<Category>, CategoryError>;

    async fn exists_by_name(&self, name: &CategoryName) -> Result<bool, CategoryError>;

    async fn list_all(&self) -> Result<Vec<Category>, CategoryError>;

    /// # Errors
    /// * `NotFound` - Category does not exist
    /// * `NameAlreadyExists` - Unique name constraint violated
    async fn update(&self, category: Category) -> Result<Category, CategoryError>;

    /// # Errors
    /// * `NotFound` - Category does not exist
    async fn delete(&self, id: &CategoryId) -> Result<(), CategoryError>;
}

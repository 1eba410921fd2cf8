use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::category::errors::CategoryError;
use crate::domain::category::models::Category;
use crate::domain::category::models::CategoryId;
use crate::domain::category::models::CategoryName;
use crate::domain::category::ports::CategoryRepository;
use crate::domain::category::ports::CategoryServicePort;
use crate::domain::guard::CreationGuard;

pub struct CategoryService<CR>
where
    CR: CategoryRepository,
{
    repository: Arc<CR>,
    guard: Arc<CreationGuard>,
}

impl<CR> CategoryService<CR>
where
    CR: CategoryRepository,
{
    pub fn new(repository: Arc<CR>, guard: Arc<CreationGuard>) -> Self {
        Self { repository, guard }
    }
}

#[async_trait]
impl<CR> CategoryServicePort for CategoryService<CR>
where
    CR: CategoryRepository,
{
    async fn create_category(&self, name: CategoryName) -> Result<Category, CategoryError> {
        let key = Category::natural_key(&name);
        let now = Utc::now();
        let category = Category {
            id: CategoryId::new(),
            name: name.clone(),
            created_at: now,
            updated_at: now,
        };

        let created = self
            .guard
            .guarded_create(
                &key,
                || self.repository.exists_by_name(&name),
                || self.repository.create(category),
            )
            .await?;

        tracing::info!(category_id = %created.id, name = %created.name, "Category created");

        Ok(created)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, CategoryError> {
        self.repository.list_all().await
    }

    async fn get_category(&self, id: &CategoryId) -> Result<Category, CategoryError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(CategoryError::NotFound(format!("id {}", id)))
    }

    async fn get_category_by_name(&self, name: &CategoryName) -> Result<Category, CategoryError> {
        self.repository
            .find_by_name(name)
            .await?
            .ok_or(CategoryError::NotFound(format!("name {}", name)))
    }

    async fn rename_category(
        &self,
        id: &CategoryId,
        name: CategoryName,
    ) -> Result<Category, CategoryError> {
        let mut category = self.get_category(id).await?;

        if category.name == name {
            return Err(CategoryError::SameName(name.to_string()));
        }

        let key = Category::natural_key(&name);
        category.name = name.clone();
        category.updated_at = Utc::now();

        let renamed = self
            .guard
            .guarded_create(
                &key,
                || self.repository.exists_by_name(&name),
                || self.repository.update(category),
            )
            .await?;

        tracing::info!(category_id = %renamed.id, name = %renamed.name, "Category renamed");

        Ok(renamed)
    }

    async fn delete_category(&self, id: &CategoryId) -> Result<(), CategoryError> {
        self.repository.delete(id).await?;
        tracing::info!(category_id = %id, "Category deleted");
        Ok(())
    }
}

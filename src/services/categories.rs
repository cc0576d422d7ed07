use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::{category, item},
    errors::ServiceError,
    events::EventSender,
};

/// Service managing item categories.
#[derive(Clone)]
pub struct CategoryService {
    db_pool: Arc<DbPool>,
    #[allow(dead_code)]
    event_sender: Arc<EventSender>,
}

impl CategoryService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self), fields(code = %code))]
    pub async fn create_category(
        &self,
        code: String,
        name: String,
        description: Option<String>,
    ) -> Result<category::Model, ServiceError> {
        let db = self.db_pool.as_ref();
        self.check_code_unique(None, &code).await?;

        let record = category::Model {
            id: Uuid::new_v4(),
            code,
            name,
            description,
            deleted_at: None,
            created_at: Utc::now(),
            updated_at: None,
        };
        validator::Validate::validate(&record)?;

        let created = category::ActiveModel::from(record).insert(db).await?;
        info!(category_id = %created.id, "Category created");
        Ok(created)
    }

    pub async fn get_category(&self, id: Uuid) -> Result<category::Model, ServiceError> {
        category::Entity::find_by_id(id)
            .filter(category::Column::DeletedAt.is_null())
            .one(self.db_pool.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Category {} not found", id)))
    }

    pub async fn list_categories(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<category::Model>, u64), ServiceError> {
        let paginator = category::Entity::find()
            .filter(category::Column::DeletedAt.is_null())
            .order_by_asc(category::Column::Code)
            .paginate(self.db_pool.as_ref(), limit);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((rows, total))
    }

    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn update_category(
        &self,
        id: Uuid,
        code: Option<String>,
        name: Option<String>,
        description: Option<Option<String>>,
    ) -> Result<category::Model, ServiceError> {
        let db = self.db_pool.as_ref();
        let record = self.get_category(id).await?;

        if let Some(new_code) = &code {
            if new_code != &record.code {
                self.check_code_unique(Some(id), new_code).await?;
            }
        }

        let mut active: category::ActiveModel = record.into();
        if let Some(code) = code {
            active.code = Set(code);
        }
        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(description) = description {
            active.description = Set(description);
        }
        active.updated_at = Set(Some(Utc::now()));

        Ok(active.update(db).await?)
    }

    /// Soft-deletes a category. A category that still has items, live or
    /// trashed, cannot be deleted.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn delete_category(&self, id: Uuid) -> Result<category::Model, ServiceError> {
        let db = self.db_pool.as_ref();
        let record = self.get_category(id).await?;

        let in_use = item::Entity::find()
            .filter(item::Column::CategoryId.eq(id))
            .one(db)
            .await?;
        if in_use.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Category {} has associated items and cannot be deleted",
                id
            )));
        }

        let mut active: category::ActiveModel = record.into();
        active.deleted_at = Set(Some(Utc::now()));
        active.updated_at = Set(Some(Utc::now()));
        let deleted = active.update(db).await?;
        info!(category_id = %id, "Category soft-deleted");
        Ok(deleted)
    }

    /// Restores a soft-deleted category.
    pub async fn restore_category(&self, id: Uuid) -> Result<category::Model, ServiceError> {
        let db = self.db_pool.as_ref();
        let record = category::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Category {} not found", id)))?;

        if record.deleted_at.is_none() {
            return Err(ServiceError::Conflict(format!(
                "Category {} is not deleted",
                id
            )));
        }

        let mut active: category::ActiveModel = record.into();
        active.deleted_at = Set(None);
        active.updated_at = Set(Some(Utc::now()));
        Ok(active.update(db).await?)
    }

    async fn check_code_unique(
        &self,
        exclude_id: Option<Uuid>,
        code: &str,
    ) -> Result<(), ServiceError> {
        let mut query = category::Entity::find().filter(category::Column::Code.eq(code));
        if let Some(id) = exclude_id {
            query = query.filter(category::Column::Id.ne(id));
        }
        if query.one(self.db_pool.as_ref()).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Category code '{}' is already in use",
                code
            )));
        }
        Ok(())
    }
}

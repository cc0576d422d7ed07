use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::{item, location},
    errors::ServiceError,
    events::EventSender,
};

/// Service managing physical locations.
#[derive(Clone)]
pub struct LocationService {
    db_pool: Arc<DbPool>,
    #[allow(dead_code)]
    event_sender: Arc<EventSender>,
}

impl LocationService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self), fields(code = %code))]
    pub async fn create_location(
        &self,
        code: String,
        name: String,
        building: Option<String>,
        room: Option<String>,
    ) -> Result<location::Model, ServiceError> {
        let db = self.db_pool.as_ref();
        self.check_code_unique(None, &code).await?;

        let record = location::Model {
            id: Uuid::new_v4(),
            code,
            name,
            building,
            room,
            deleted_at: None,
            created_at: Utc::now(),
            updated_at: None,
        };
        validator::Validate::validate(&record)?;

        let created = location::ActiveModel::from(record).insert(db).await?;
        info!(location_id = %created.id, "Location created");
        Ok(created)
    }

    pub async fn get_location(&self, id: Uuid) -> Result<location::Model, ServiceError> {
        location::Entity::find_by_id(id)
            .filter(location::Column::DeletedAt.is_null())
            .one(self.db_pool.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Location {} not found", id)))
    }

    pub async fn list_locations(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<location::Model>, u64), ServiceError> {
        let paginator = location::Entity::find()
            .filter(location::Column::DeletedAt.is_null())
            .order_by_asc(location::Column::Code)
            .paginate(self.db_pool.as_ref(), limit);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((rows, total))
    }

    #[instrument(skip(self), fields(location_id = %id))]
    pub async fn update_location(
        &self,
        id: Uuid,
        code: Option<String>,
        name: Option<String>,
        building: Option<Option<String>>,
        room: Option<Option<String>>,
    ) -> Result<location::Model, ServiceError> {
        let db = self.db_pool.as_ref();
        let record = self.get_location(id).await?;

        if let Some(new_code) = &code {
            if new_code != &record.code {
                self.check_code_unique(Some(id), new_code).await?;
            }
        }

        let mut active: location::ActiveModel = record.into();
        if let Some(code) = code {
            active.code = Set(code);
        }
        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(building) = building {
            active.building = Set(building);
        }
        if let Some(room) = room {
            active.room = Set(room);
        }
        active.updated_at = Set(Some(Utc::now()));

        Ok(active.update(db).await?)
    }

    /// Soft-deletes a location that no item occupies.
    #[instrument(skip(self), fields(location_id = %id))]
    pub async fn delete_location(&self, id: Uuid) -> Result<location::Model, ServiceError> {
        let db = self.db_pool.as_ref();
        let record = self.get_location(id).await?;

        let in_use = item::Entity::find()
            .filter(item::Column::LocationId.eq(id))
            .one(db)
            .await?;
        if in_use.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Location {} has associated items and cannot be deleted",
                id
            )));
        }

        let mut active: location::ActiveModel = record.into();
        active.deleted_at = Set(Some(Utc::now()));
        active.updated_at = Set(Some(Utc::now()));
        let deleted = active.update(db).await?;
        info!(location_id = %id, "Location soft-deleted");
        Ok(deleted)
    }

    async fn check_code_unique(
        &self,
        exclude_id: Option<Uuid>,
        code: &str,
    ) -> Result<(), ServiceError> {
        let mut query = location::Entity::find().filter(location::Column::Code.eq(code));
        if let Some(id) = exclude_id {
            query = query.filter(location::Column::Id.ne(id));
        }
        if query.one(self.db_pool.as_ref()).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Location code '{}' is already in use",
                code
            )));
        }
        Ok(())
    }
}

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::{
        assignment::{self, AssignmentStatus},
        item::{self, ItemCondition, ItemStatus},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Fields accepted at item intake.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub property_number: String,
    pub serial_number: Option<String>,
    pub barcode: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub condition: ItemCondition,
    pub acquisition_cost: rust_decimal::Decimal,
    pub acquisition_date: chrono::DateTime<Utc>,
    pub warranty_expiry: Option<chrono::DateTime<Utc>>,
    pub category_id: Uuid,
    pub location_id: Uuid,
}

/// Fields accepted on item update; absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ItemChanges {
    pub property_number: Option<String>,
    pub serial_number: Option<Option<String>>,
    pub barcode: Option<Option<String>>,
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub condition: Option<ItemCondition>,
    pub location_id: Option<Uuid>,
    pub warranty_expiry: Option<Option<chrono::DateTime<Utc>>>,
}

/// Service managing the asset register.
#[derive(Clone)]
pub struct ItemService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl ItemService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Registers a new item. Property number, serial number and barcode
    /// must be unique across the whole table, trashed rows included.
    #[instrument(skip(self, input), fields(property_number = %input.property_number))]
    pub async fn create_item(&self, input: NewItem) -> Result<item::Model, ServiceError> {
        let db = self.db_pool.as_ref();

        self.check_unique(None, &input.property_number, input.serial_number.as_deref(), input.barcode.as_deref())
            .await?;

        let now = Utc::now();
        let record = item::Model {
            id: Uuid::new_v4(),
            property_number: input.property_number,
            serial_number: input.serial_number,
            barcode: input.barcode,
            qr_code: None,
            name: input.name,
            description: input.description,
            status: ItemStatus::Available,
            condition: input.condition,
            acquisition_cost: input.acquisition_cost,
            acquisition_date: input.acquisition_date,
            warranty_expiry: input.warranty_expiry,
            category_id: input.category_id,
            location_id: input.location_id,
            deleted_at: None,
            created_at: now,
            updated_at: None,
        };

        validator::Validate::validate(&record)?;
        record
            .validate_warranty_window()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let created = item::ActiveModel::from(record).insert(db).await?;

        info!(item_id = %created.id, "Item registered");
        self.event_sender
            .send(Event::ItemCreated(created.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(created)
    }

    /// Applies changes to a live item, re-checking uniqueness against
    /// every other row.
    #[instrument(skip(self, changes), fields(item_id = %item_id))]
    pub async fn update_item(
        &self,
        item_id: Uuid,
        changes: ItemChanges,
    ) -> Result<item::Model, ServiceError> {
        let db = self.db_pool.as_ref();
        let record = self.get_item(item_id).await?;

        let property_number = changes
            .property_number
            .clone()
            .unwrap_or_else(|| record.property_number.clone());
        let serial_number = match &changes.serial_number {
            Some(v) => v.clone(),
            None => record.serial_number.clone(),
        };
        let barcode = match &changes.barcode {
            Some(v) => v.clone(),
            None => record.barcode.clone(),
        };

        self.check_unique(
            Some(item_id),
            &property_number,
            serial_number.as_deref(),
            barcode.as_deref(),
        )
        .await?;

        let acquisition_date = record.acquisition_date;
        let mut active: item::ActiveModel = record.into();
        active.property_number = Set(property_number);
        active.serial_number = Set(serial_number);
        active.barcode = Set(barcode);
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(condition) = changes.condition {
            active.condition = Set(condition);
        }
        if let Some(location_id) = changes.location_id {
            active.location_id = Set(location_id);
        }
        if let Some(warranty) = changes.warranty_expiry {
            if let Some(expiry) = warranty {
                if expiry <= acquisition_date {
                    return Err(ServiceError::ValidationError(
                        "warranty_expiry must be strictly after acquisition_date".to_string(),
                    ));
                }
            }
            active.warranty_expiry = Set(warranty);
        }
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(db).await?;

        self.event_sender
            .send(Event::ItemUpdated(updated.id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(updated)
    }

    /// Fetches a live item by id.
    pub async fn get_item(&self, item_id: Uuid) -> Result<item::Model, ServiceError> {
        item::Entity::find_by_id(item_id)
            .filter(item::Column::DeletedAt.is_null())
            .one(self.db_pool.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Item {} not found", item_id)))
    }

    /// Fetches an item regardless of its soft-delete state.
    pub async fn get_item_with_trashed(&self, item_id: Uuid) -> Result<item::Model, ServiceError> {
        item::Entity::find_by_id(item_id)
            .one(self.db_pool.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Item {} not found", item_id)))
    }

    /// Lists live items, newest first, optionally filtered by status.
    pub async fn list_items(
        &self,
        page: u64,
        limit: u64,
        status: Option<ItemStatus>,
    ) -> Result<(Vec<item::Model>, u64), ServiceError> {
        let db = self.db_pool.as_ref();

        let mut query = item::Entity::find().filter(item::Column::DeletedAt.is_null());
        if let Some(status) = status {
            query = query.filter(item::Column::Status.eq(status));
        }

        let paginator = query
            .order_by_desc(item::Column::CreatedAt)
            .paginate(db, limit);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((items, total))
    }

    /// Soft-deletes an item. Items with a live assignment cannot be
    /// removed from the register.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn delete_item(&self, item_id: Uuid) -> Result<item::Model, ServiceError> {
        let db = self.db_pool.as_ref();
        let record = self.get_item(item_id).await?;

        let live = assignment::Entity::find()
            .filter(assignment::Column::ItemId.eq(item_id))
            .filter(assignment::Column::Status.is_in([
                AssignmentStatus::Pending,
                AssignmentStatus::Approved,
                AssignmentStatus::Active,
            ]))
            .one(db)
            .await?;
        if live.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Item {} has a live assignment and cannot be deleted",
                item_id
            )));
        }

        let mut active: item::ActiveModel = record.into();
        active.deleted_at = Set(Some(Utc::now()));
        active.updated_at = Set(Some(Utc::now()));
        let deleted = active.update(db).await?;

        info!(item_id = %item_id, "Item soft-deleted");
        self.event_sender
            .send(Event::ItemDeleted(item_id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(deleted)
    }

    /// Restores a soft-deleted item; its status is preserved as it was.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn restore_item(&self, item_id: Uuid) -> Result<item::Model, ServiceError> {
        let db = self.db_pool.as_ref();
        let record = self.get_item_with_trashed(item_id).await?;

        if record.deleted_at.is_none() {
            return Err(ServiceError::Conflict(format!(
                "Item {} is not deleted",
                item_id
            )));
        }

        let mut active: item::ActiveModel = record.into();
        active.deleted_at = Set(None);
        active.updated_at = Set(Some(Utc::now()));
        let restored = active.update(db).await?;

        info!(item_id = %item_id, "Item restored");
        self.event_sender
            .send(Event::ItemRestored(item_id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(restored)
    }

    /// Derives the item's QR payload if absent. Idempotent: an item that
    /// already has one gets it back unchanged.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn generate_qr(&self, item_id: Uuid) -> Result<item::Model, ServiceError> {
        let db = self.db_pool.as_ref();
        let record = self.get_item(item_id).await?;

        if record.qr_code.is_some() {
            return Ok(record);
        }

        let payload = qr_payload(&record.property_number);
        let mut active: item::ActiveModel = record.into();
        active.qr_code = Set(Some(payload));
        active.updated_at = Set(Some(Utc::now()));
        let updated = active.update(db).await?;

        self.event_sender
            .send(Event::ItemQrGenerated(item_id))
            .await
            .map_err(ServiceError::EventError)?;

        Ok(updated)
    }

    async fn check_unique(
        &self,
        exclude_id: Option<Uuid>,
        property_number: &str,
        serial_number: Option<&str>,
        barcode: Option<&str>,
    ) -> Result<(), ServiceError> {
        let db = self.db_pool.as_ref();

        let mut checks: Vec<(item::Column, String, &str)> = vec![(
            item::Column::PropertyNumber,
            property_number.to_string(),
            "property_number",
        )];
        if let Some(serial) = serial_number {
            checks.push((item::Column::SerialNumber, serial.to_string(), "serial_number"));
        }
        if let Some(code) = barcode {
            checks.push((item::Column::Barcode, code.to_string(), "barcode"));
        }

        for (column, value, field) in checks {
            let mut query = item::Entity::find().filter(column.eq(value.clone()));
            if let Some(id) = exclude_id {
                query = query.filter(item::Column::Id.ne(id));
            }
            if query.one(db).await?.is_some() {
                return Err(ServiceError::Conflict(format!(
                    "{} '{}' is already in use",
                    field, value
                )));
            }
        }

        Ok(())
    }
}

/// Stable QR payload derived from the property number.
pub fn qr_payload(property_number: &str) -> String {
    format!("custodia:item:{}", property_number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qr_payload_is_deterministic() {
        assert_eq!(qr_payload("PN-1"), "custodia:item:PN-1");
        assert_eq!(qr_payload("PN-1"), qr_payload("PN-1"));
    }
}

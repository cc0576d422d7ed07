use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Enum representing the possible statuses of an item.
///
/// Item status is never set directly by callers; it is mutated only as a
/// side effect of assignment, maintenance and disposal transitions.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    #[sea_orm(string_value = "available")]
    Available,
    #[sea_orm(string_value = "assigned")]
    Assigned,
    #[sea_orm(string_value = "under_maintenance")]
    UnderMaintenance,
    #[sea_orm(string_value = "pending_disposal")]
    PendingDisposal,
    #[sea_orm(string_value = "disposed")]
    Disposed,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Available => "available",
            ItemStatus::Assigned => "assigned",
            ItemStatus::UnderMaintenance => "under_maintenance",
            ItemStatus::PendingDisposal => "pending_disposal",
            ItemStatus::Disposed => "disposed",
        }
    }

    /// Disposed items are out of every workflow for good.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ItemStatus::Disposed)
    }
}

/// Physical condition of an item, recorded at intake and updated on
/// return inspection and maintenance completion.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum ItemCondition {
    #[sea_orm(string_value = "excellent")]
    Excellent,
    #[sea_orm(string_value = "good")]
    Good,
    #[sea_orm(string_value = "fair")]
    Fair,
    #[sea_orm(string_value = "poor")]
    Poor,
    #[sea_orm(string_value = "damaged")]
    Damaged,
}

impl ItemCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemCondition::Excellent => "excellent",
            ItemCondition::Good => "good",
            ItemCondition::Fair => "fair",
            ItemCondition::Poor => "poor",
            ItemCondition::Damaged => "damaged",
        }
    }
}

/// The `items` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Institutional property number; unique across live and trashed rows.
    #[sea_orm(unique)]
    #[validate(length(min = 1, max = 64, message = "Property number must be 1-64 characters"))]
    pub property_number: String,

    #[validate(length(max = 100, message = "Serial number too long"))]
    pub serial_number: Option<String>,

    #[validate(length(max = 100, message = "Barcode too long"))]
    pub barcode: Option<String>,

    /// Derived QR payload; generated once and then stable.
    pub qr_code: Option<String>,

    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description too long"))]
    pub description: Option<String>,

    pub status: ItemStatus,
    pub condition: ItemCondition,

    #[validate(custom = "validate_decimal_non_negative")]
    pub acquisition_cost: Decimal,

    pub acquisition_date: DateTime<Utc>,

    /// Must be strictly after the acquisition date when present.
    pub warranty_expiry: Option<DateTime<Utc>>,

    pub category_id: Uuid,
    pub location_id: Uuid,

    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Category,

    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::LocationId",
        to = "super::location::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Location,

    #[sea_orm(has_many = "super::assignment::Entity")]
    Assignments,

    #[sea_orm(has_many = "super::maintenance::Entity")]
    MaintenanceRecords,

    #[sea_orm(has_many = "super::disposal::Entity")]
    Disposals,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl Related<super::assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignments.def()
    }
}

impl Related<super::maintenance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MaintenanceRecords.def()
    }
}

impl Related<super::disposal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Disposals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Whether the item can enter a new assignment.
    pub fn is_available(&self) -> bool {
        self.status == ItemStatus::Available && !self.is_deleted()
    }

    /// Validates the warranty window against the acquisition date.
    pub fn validate_warranty_window(&self) -> Result<(), ValidationError> {
        if let Some(expiry) = self.warranty_expiry {
            if expiry <= self.acquisition_date {
                return Err(ValidationError::new(
                    "warranty_expiry must be strictly after acquisition_date",
                ));
            }
        }
        Ok(())
    }
}

fn validate_decimal_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(ValidationError::new("Amount must be non-negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn sample_item() -> Model {
        let now = Utc::now();
        Model {
            id: Uuid::new_v4(),
            property_number: "PN-2024-0001".to_string(),
            serial_number: Some("SN-9001".to_string()),
            barcode: None,
            qr_code: None,
            name: "Dell Latitude 7440".to_string(),
            description: None,
            status: ItemStatus::Available,
            condition: ItemCondition::Good,
            acquisition_cost: dec!(1299.00),
            acquisition_date: now,
            warranty_expiry: Some(now + Duration::days(365)),
            category_id: Uuid::new_v4(),
            location_id: Uuid::new_v4(),
            deleted_at: None,
            created_at: now,
            updated_at: None,
        }
    }

    #[test]
    fn valid_item_passes_validation() {
        let item = sample_item();
        assert!(item.validate().is_ok());
        assert!(item.validate_warranty_window().is_ok());
        assert!(item.is_available());
    }

    #[test]
    fn negative_cost_fails_validation() {
        let mut item = sample_item();
        item.acquisition_cost = dec!(-1.00);
        let err = item.validate().unwrap_err();
        assert!(err.field_errors().contains_key("acquisition_cost"));
    }

    #[test]
    fn warranty_before_acquisition_is_rejected() {
        let mut item = sample_item();
        item.warranty_expiry = Some(item.acquisition_date - Duration::days(1));
        assert!(item.validate_warranty_window().is_err());
    }

    #[test]
    fn soft_deleted_item_is_not_available() {
        let mut item = sample_item();
        item.deleted_at = Some(Utc::now());
        assert!(!item.is_available());
    }

    #[test]
    fn disposed_is_the_only_terminal_status() {
        assert!(ItemStatus::Disposed.is_terminal());
        assert!(!ItemStatus::Available.is_terminal());
        assert!(!ItemStatus::PendingDisposal.is_terminal());
    }
}

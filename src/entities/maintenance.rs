use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::item::{ItemCondition, ItemStatus};

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "scheduled")]
    Scheduled,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl MaintenanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceStatus::Pending => "pending",
            MaintenanceStatus::Scheduled => "scheduled",
            MaintenanceStatus::InProgress => "in_progress",
            MaintenanceStatus::Completed => "completed",
            MaintenanceStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, MaintenanceStatus::Completed | MaintenanceStatus::Cancelled)
    }

    /// Work progresses strictly forward; cancellation exits from any
    /// non-terminal status.
    pub fn can_transition_to(&self, next: &MaintenanceStatus) -> bool {
        use MaintenanceStatus::*;
        match (self, next) {
            (Pending, Scheduled) => true,
            (Scheduled, InProgress) => true,
            (InProgress, Completed) => true,
            (from, Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceType {
    #[sea_orm(string_value = "preventive")]
    Preventive,
    #[sea_orm(string_value = "corrective")]
    Corrective,
    #[sea_orm(string_value = "inspection")]
    Inspection,
    #[sea_orm(string_value = "calibration")]
    Calibration,
}

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum MaintenancePriority {
    #[sea_orm(string_value = "low")]
    Low,
    #[sea_orm(string_value = "medium")]
    Medium,
    #[sea_orm(string_value = "high")]
    High,
    #[sea_orm(string_value = "urgent")]
    Urgent,
}

/// The `maintenance_records` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "maintenance_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub item_id: Uuid,

    pub status: MaintenanceStatus,
    pub maintenance_type: MaintenanceType,
    pub priority: MaintenancePriority,

    #[validate(length(min = 1, max = 1000, message = "Description must be 1-1000 characters"))]
    pub description: String,

    /// Strictly in the future at scheduling time.
    pub scheduled_date: Option<DateTime<Utc>>,

    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,

    /// Whole hours between start and completion.
    pub actual_duration_hours: Option<i32>,

    #[validate(custom = "validate_optional_decimal_non_negative")]
    pub cost: Option<Decimal>,

    /// Item state snapshotted when work starts, restored on cancellation.
    pub pre_status: Option<ItemStatus>,
    pub pre_condition: Option<ItemCondition>,

    pub requested_by: Uuid,
    pub assigned_to: Option<Uuid>,
    pub approved_by: Option<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::item::Entity",
        from = "Column::ItemId",
        to = "super::item::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Item,
}

impl Related<super::item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

fn validate_optional_decimal_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(ValidationError::new("Amount must be non-negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(MaintenanceStatus::Pending, MaintenanceStatus::Scheduled, true)]
    #[test_case(MaintenanceStatus::Pending, MaintenanceStatus::InProgress, false)]
    #[test_case(MaintenanceStatus::Pending, MaintenanceStatus::Cancelled, true)]
    #[test_case(MaintenanceStatus::Scheduled, MaintenanceStatus::InProgress, true)]
    #[test_case(MaintenanceStatus::Scheduled, MaintenanceStatus::Completed, false)]
    #[test_case(MaintenanceStatus::Scheduled, MaintenanceStatus::Cancelled, true)]
    #[test_case(MaintenanceStatus::InProgress, MaintenanceStatus::Completed, true)]
    #[test_case(MaintenanceStatus::InProgress, MaintenanceStatus::Cancelled, true)]
    #[test_case(MaintenanceStatus::Completed, MaintenanceStatus::Cancelled, false)]
    #[test_case(MaintenanceStatus::Cancelled, MaintenanceStatus::Scheduled, false)]
    fn transition_table(from: MaintenanceStatus, to: MaintenanceStatus, allowed: bool) {
        assert_eq!(from.can_transition_to(&to), allowed);
    }
}

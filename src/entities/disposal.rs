use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum DisposalStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "executed")]
    Executed,
}

impl DisposalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisposalStatus::Pending => "pending",
            DisposalStatus::Approved => "approved",
            DisposalStatus::Rejected => "rejected",
            DisposalStatus::Executed => "executed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DisposalStatus::Rejected | DisposalStatus::Executed)
    }

    /// Execution is only reachable through approval; there is no shortcut
    /// from pending.
    pub fn can_transition_to(&self, next: &DisposalStatus) -> bool {
        use DisposalStatus::*;
        matches!(
            (self, next),
            (Pending, Approved) | (Pending, Rejected) | (Approved, Executed)
        )
    }

    /// Statuses that count as "live" for the one-disposal-per-item check.
    pub fn is_live(&self) -> bool {
        matches!(self, DisposalStatus::Pending | DisposalStatus::Approved)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum DisposalMethod {
    #[sea_orm(string_value = "sale")]
    Sale,
    #[sea_orm(string_value = "donation")]
    Donation,
    #[sea_orm(string_value = "recycling")]
    Recycling,
    #[sea_orm(string_value = "destruction")]
    Destruction,
    #[sea_orm(string_value = "transfer")]
    Transfer,
}

/// The `disposals` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "disposals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub item_id: Uuid,

    pub status: DisposalStatus,

    #[validate(length(min = 1, max = 1000, message = "Reason must be 1-1000 characters"))]
    pub reason: String,

    pub disposal_method: DisposalMethod,

    /// Sale or transfer proceeds recorded at execution.
    #[validate(custom = "validate_optional_decimal_non_negative")]
    pub proceeds: Option<Decimal>,

    pub requested_by: Uuid,
    pub requested_at: DateTime<Utc>,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_by: Option<Uuid>,
    pub rejected_at: Option<DateTime<Utc>>,

    #[validate(length(max = 1000, message = "Rejection reason too long"))]
    pub rejection_reason: Option<String>,

    pub executed_by: Option<Uuid>,
    pub executed_at: Option<DateTime<Utc>>,

    #[validate(length(max = 1000, message = "Notes too long"))]
    pub notes: Option<String>,

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
    use strum::IntoEnumIterator;
    use test_case::test_case;

    #[test_case(DisposalStatus::Pending, DisposalStatus::Approved, true)]
    #[test_case(DisposalStatus::Pending, DisposalStatus::Rejected, true)]
    #[test_case(DisposalStatus::Pending, DisposalStatus::Executed, false)]
    #[test_case(DisposalStatus::Approved, DisposalStatus::Executed, true)]
    #[test_case(DisposalStatus::Approved, DisposalStatus::Rejected, false)]
    #[test_case(DisposalStatus::Rejected, DisposalStatus::Executed, false)]
    #[test_case(DisposalStatus::Executed, DisposalStatus::Executed, false)]
    fn transition_table(from: DisposalStatus, to: DisposalStatus, allowed: bool) {
        assert_eq!(from.can_transition_to(&to), allowed);
    }

    #[test]
    fn executed_is_unreachable_except_from_approved() {
        for status in DisposalStatus::iter() {
            let reachable = status.can_transition_to(&DisposalStatus::Executed);
            assert_eq!(reachable, status == DisposalStatus::Approved);
        }
    }
}

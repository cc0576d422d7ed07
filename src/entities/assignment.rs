use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Enum representing the possible statuses of an assignment.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "returned")]
    Returned,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl AssignmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Pending => "pending",
            AssignmentStatus::Approved => "approved",
            AssignmentStatus::Active => "active",
            AssignmentStatus::Returned => "returned",
            AssignmentStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AssignmentStatus::Returned | AssignmentStatus::Cancelled)
    }

    /// The assignment transition table. Returning happens through the
    /// return flow, which is why `Active -> Returned` is the only path in.
    pub fn can_transition_to(&self, next: &AssignmentStatus) -> bool {
        use AssignmentStatus::*;
        matches!(
            (self, next),
            (Pending, Approved)
                | (Pending, Cancelled)
                | (Approved, Active)
                | (Approved, Cancelled)
                | (Active, Returned)
                | (Active, Cancelled)
        )
    }

    /// Statuses that count as "live" for the one-assignment-per-item check.
    pub fn is_live(&self) -> bool {
        !self.is_terminal()
    }
}

/// The `assignments` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub item_id: Uuid,

    /// The custodian receiving the item.
    pub user_id: Uuid,

    /// The actor who created the assignment.
    pub assigned_by: Uuid,

    pub status: AssignmentStatus,

    pub assigned_date: DateTime<Utc>,

    /// When set, a return after this instant is late.
    pub due_date: Option<DateTime<Utc>>,

    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub activated_at: Option<DateTime<Utc>>,
    pub returned_date: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,

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

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Custodian,

    #[sea_orm(has_many = "super::item_return::Entity")]
    Returns,
}

impl Related<super::item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

impl Related<super::item_return::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Returns.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(AssignmentStatus::Pending, AssignmentStatus::Approved, true)]
    #[test_case(AssignmentStatus::Pending, AssignmentStatus::Cancelled, true)]
    #[test_case(AssignmentStatus::Pending, AssignmentStatus::Active, false)]
    #[test_case(AssignmentStatus::Pending, AssignmentStatus::Returned, false)]
    #[test_case(AssignmentStatus::Approved, AssignmentStatus::Active, true)]
    #[test_case(AssignmentStatus::Approved, AssignmentStatus::Cancelled, true)]
    #[test_case(AssignmentStatus::Approved, AssignmentStatus::Returned, false)]
    #[test_case(AssignmentStatus::Active, AssignmentStatus::Returned, true)]
    #[test_case(AssignmentStatus::Active, AssignmentStatus::Cancelled, true)]
    #[test_case(AssignmentStatus::Active, AssignmentStatus::Approved, false)]
    #[test_case(AssignmentStatus::Returned, AssignmentStatus::Active, false)]
    #[test_case(AssignmentStatus::Returned, AssignmentStatus::Cancelled, false)]
    #[test_case(AssignmentStatus::Cancelled, AssignmentStatus::Approved, false)]
    fn transition_table(from: AssignmentStatus, to: AssignmentStatus, allowed: bool) {
        assert_eq!(from.can_transition_to(&to), allowed);
    }

    #[test]
    fn terminal_statuses_are_not_live() {
        use strum::IntoEnumIterator;
        for status in AssignmentStatus::iter() {
            assert_eq!(status.is_live(), !status.is_terminal());
        }
    }
}

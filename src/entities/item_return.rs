use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::item::ItemCondition;

/// Enum representing the possible statuses of a return inspection.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum ReturnStatus {
    #[sea_orm(string_value = "pending_inspection")]
    PendingInspection,
    #[sea_orm(string_value = "inspected")]
    Inspected,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl ReturnStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnStatus::PendingInspection => "pending_inspection",
            ReturnStatus::Inspected => "inspected",
            ReturnStatus::Approved => "approved",
            ReturnStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ReturnStatus::Approved | ReturnStatus::Rejected)
    }

    pub fn can_transition_to(&self, next: &ReturnStatus) -> bool {
        use ReturnStatus::*;
        matches!(
            (self, next),
            (PendingInspection, Inspected) | (Inspected, Approved) | (Inspected, Rejected)
        )
    }
}

/// The `item_returns` table. One row per return initiated against an
/// assignment; created in `pending_inspection` by the return flow.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "item_returns")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub assignment_id: Uuid,

    pub status: ReturnStatus,

    pub return_date: DateTime<Utc>,

    /// Recorded during inspection; absent until then.
    pub condition_on_return: Option<ItemCondition>,

    pub is_damaged: bool,
    pub is_late: bool,
    pub days_late: i32,

    #[validate(custom = "validate_decimal_non_negative")]
    pub penalty_amount: Decimal,

    pub inspected_by: Option<Uuid>,
    pub inspected_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,

    #[validate(length(max = 1000, message = "Notes too long"))]
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignment::Entity",
        from = "Column::AssignmentId",
        to = "super::assignment::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Assignment,
}

impl Related<super::assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Compares the return date against the assignment due date and flags
    /// lateness when the return is strictly later (whole calendar days).
    ///
    /// An already-set late flag is never cleared by recomputation, even if
    /// the dates would no longer qualify.
    pub fn compute_lateness(&mut self, due_date: Option<DateTime<Utc>>) {
        let Some(due) = due_date else { return };
        let days = (self.return_date.date_naive() - due.date_naive()).num_days();
        if self.return_date > due && days > 0 {
            self.is_late = true;
            self.days_late = days as i32;
        }
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
    use chrono::TimeZone;
    use test_case::test_case;

    fn return_on(date: DateTime<Utc>) -> Model {
        Model {
            id: Uuid::new_v4(),
            assignment_id: Uuid::new_v4(),
            status: ReturnStatus::PendingInspection,
            return_date: date,
            condition_on_return: None,
            is_damaged: false,
            is_late: false,
            days_late: 0,
            penalty_amount: Decimal::ZERO,
            inspected_by: None,
            inspected_at: None,
            reviewed_by: None,
            reviewed_at: None,
            notes: None,
            created_at: date,
            updated_at: None,
        }
    }

    #[test]
    fn five_days_after_due_date_is_five_days_late() {
        let due = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
        let returned = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let mut ret = return_on(returned);

        ret.compute_lateness(Some(due));

        assert!(ret.is_late);
        assert_eq!(ret.days_late, 5);
    }

    #[test]
    fn on_time_return_is_not_late() {
        let due = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
        let mut ret = return_on(due);

        ret.compute_lateness(Some(due));

        assert!(!ret.is_late);
        assert_eq!(ret.days_late, 0);
    }

    #[test]
    fn missing_due_date_never_flags_late() {
        let mut ret = return_on(Utc::now());
        ret.compute_lateness(None);
        assert!(!ret.is_late);
    }

    #[test]
    fn recomputation_never_clears_the_late_flag() {
        let due = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let mut ret = return_on(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
        ret.compute_lateness(Some(due));
        assert!(ret.is_late);

        // Recompute against a later due date that would make it on time.
        let relaxed = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        ret.compute_lateness(Some(relaxed));
        assert!(ret.is_late, "late flag must survive recomputation");
        assert_eq!(ret.days_late, 5);
    }

    #[test_case(ReturnStatus::PendingInspection, ReturnStatus::Inspected, true)]
    #[test_case(ReturnStatus::PendingInspection, ReturnStatus::Approved, false)]
    #[test_case(ReturnStatus::PendingInspection, ReturnStatus::Rejected, false)]
    #[test_case(ReturnStatus::Inspected, ReturnStatus::Approved, true)]
    #[test_case(ReturnStatus::Inspected, ReturnStatus::Rejected, true)]
    #[test_case(ReturnStatus::Approved, ReturnStatus::Rejected, false)]
    #[test_case(ReturnStatus::Rejected, ReturnStatus::Inspected, false)]
    fn transition_table(from: ReturnStatus, to: ReturnStatus, allowed: bool) {
        assert_eq!(from.can_transition_to(&to), allowed);
    }
}

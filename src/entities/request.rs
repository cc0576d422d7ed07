use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Enum representing the possible statuses of a workflow request.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "under_review")]
    UnderReview,
    #[sea_orm(string_value = "changes_requested")]
    ChangesRequested,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::UnderReview => "under_review",
            RequestStatus::ChangesRequested => "changes_requested",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Completed => "completed",
            RequestStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RequestStatus::Rejected | RequestStatus::Completed | RequestStatus::Cancelled
        )
    }

    /// Owner edits are only possible before review settles the request.
    /// Editing a changes_requested request moves it back to pending.
    pub fn allows_edit(&self) -> bool {
        matches!(self, RequestStatus::Pending | RequestStatus::ChangesRequested)
    }

    /// Review verdicts (approve/reject/request changes) are accepted from
    /// these statuses.
    pub fn allows_review(&self) -> bool {
        matches!(
            self,
            RequestStatus::Pending | RequestStatus::UnderReview | RequestStatus::ChangesRequested
        )
    }

    /// Cancellation is blocked only once completed or already cancelled;
    /// a rejected request can still be cancelled.
    pub fn allows_cancel(&self) -> bool {
        !matches!(self, RequestStatus::Completed | RequestStatus::Cancelled)
    }

    pub fn can_transition_to(&self, next: &RequestStatus) -> bool {
        use RequestStatus::*;
        match (self, next) {
            (Pending, UnderReview)
            | (Pending, ChangesRequested)
            | (Pending, Approved)
            | (Pending, Rejected) => true,
            (UnderReview, Approved)
            | (UnderReview, Rejected)
            | (UnderReview, ChangesRequested) => true,
            (ChangesRequested, Pending) | (ChangesRequested, UnderReview) => true,
            (Approved, Completed) => true,
            (from, Cancelled) => from.allows_cancel(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    #[sea_orm(string_value = "assignment")]
    Assignment,
    #[sea_orm(string_value = "purchase")]
    Purchase,
    #[sea_orm(string_value = "disposal")]
    Disposal,
    #[sea_orm(string_value = "maintenance")]
    Maintenance,
    #[sea_orm(string_value = "transfer")]
    Transfer,
}

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum RequestPriority {
    #[sea_orm(string_value = "low")]
    Low,
    #[sea_orm(string_value = "medium")]
    Medium,
    #[sea_orm(string_value = "high")]
    High,
    #[sea_orm(string_value = "urgent")]
    Urgent,
}

/// The `requests` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// The owner: the user who submitted the request.
    pub user_id: Uuid,

    pub request_type: RequestType,

    /// Present for item-scoped request types (assignment, disposal,
    /// maintenance, transfer); absent for purchases.
    pub item_id: Option<Uuid>,

    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 2000, message = "Description must be 1-2000 characters"))]
    pub description: String,

    pub priority: RequestPriority,
    pub status: RequestStatus,

    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,

    #[validate(length(max = 1000, message = "Review notes too long"))]
    pub review_notes: Option<String>,

    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Owner,

    #[sea_orm(has_many = "super::request_comment::Entity")]
    Comments,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::request_comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;
    use test_case::test_case;

    #[test_case(RequestStatus::Pending, RequestStatus::UnderReview, true)]
    #[test_case(RequestStatus::Pending, RequestStatus::Approved, true)]
    #[test_case(RequestStatus::Pending, RequestStatus::Rejected, true)]
    #[test_case(RequestStatus::Pending, RequestStatus::ChangesRequested, true)]
    #[test_case(RequestStatus::Pending, RequestStatus::Completed, false)]
    #[test_case(RequestStatus::UnderReview, RequestStatus::Approved, true)]
    #[test_case(RequestStatus::UnderReview, RequestStatus::Rejected, true)]
    #[test_case(RequestStatus::UnderReview, RequestStatus::ChangesRequested, true)]
    #[test_case(RequestStatus::UnderReview, RequestStatus::Completed, false)]
    #[test_case(RequestStatus::ChangesRequested, RequestStatus::Pending, true)]
    #[test_case(RequestStatus::ChangesRequested, RequestStatus::UnderReview, true)]
    #[test_case(RequestStatus::ChangesRequested, RequestStatus::Approved, false)]
    #[test_case(RequestStatus::Approved, RequestStatus::Completed, true)]
    #[test_case(RequestStatus::Approved, RequestStatus::Rejected, false)]
    #[test_case(RequestStatus::Completed, RequestStatus::Cancelled, false)]
    #[test_case(RequestStatus::Cancelled, RequestStatus::Cancelled, false)]
    #[test_case(RequestStatus::Rejected, RequestStatus::Cancelled, true)]
    fn transition_table(from: RequestStatus, to: RequestStatus, allowed: bool) {
        assert_eq!(from.can_transition_to(&to), allowed);
    }

    #[test]
    fn edit_review_cancel_windows() {
        for status in RequestStatus::iter() {
            assert_eq!(
                status.allows_edit(),
                matches!(status, RequestStatus::Pending | RequestStatus::ChangesRequested)
            );
            assert_eq!(
                status.allows_cancel(),
                !matches!(status, RequestStatus::Completed | RequestStatus::Cancelled)
            );
        }
        assert!(RequestStatus::UnderReview.allows_review());
        assert!(!RequestStatus::Approved.allows_review());
        assert!(!RequestStatus::Rejected.allows_review());
    }
}

//! The permission gate.
//!
//! `authorize` is the single entry point lifecycle commands use for the
//! permission precondition. Owner-path authorization exists only for
//! request edit/cancel; everything else is permission-gated, never
//! ownership-gated.

use uuid::Uuid;

use super::rbac::permission_matches;
use super::AuthUser;
use crate::entities::request;
use crate::errors::ServiceError;

/// Hard stop unless the actor holds a permission implying `required`.
pub fn authorize(actor: &AuthUser, required: &str) -> Result<(), ServiceError> {
    if actor.has_permission(required) {
        Ok(())
    } else {
        Err(ServiceError::Forbidden(format!(
            "requires permission {}",
            required
        )))
    }
}

/// Owner-path variant: the owner of the resource may act even without the
/// permission. Used only by request edit/cancel.
pub fn authorize_owner_or(
    actor: &AuthUser,
    owner_id: Uuid,
    required: &str,
) -> Result<(), ServiceError> {
    if actor.id == owner_id || actor.has_permission(required) {
        Ok(())
    } else {
        Err(ServiceError::Forbidden(format!(
            "requires ownership or permission {}",
            required
        )))
    }
}

/// Whether `actor` may currently edit `req`. Combines the status window
/// with the owner-path rule; exposed for the presentation boundary.
pub fn can_edit_request(req: &request::Model, actor: &AuthUser) -> bool {
    req.status.allows_edit()
        && (actor.id == req.user_id || actor.has_permission(super::consts::REQUESTS_UPDATE))
}

/// Whether `actor` may currently review `req`. Review is permission-only;
/// there is no owner path.
pub fn can_review_request(req: &request::Model, actor: &AuthUser) -> bool {
    req.status.allows_review() && actor.has_permission(super::consts::REQUESTS_REVIEW)
}

/// Whether `actor` may currently cancel `req`.
pub fn can_cancel_request(req: &request::Model, actor: &AuthUser) -> bool {
    req.status.allows_cancel()
        && (actor.id == req.user_id || actor.has_permission(super::consts::REQUESTS_CANCEL))
}

/// Whether `actor` may read internal comments on requests.
pub fn can_read_internal_comments(actor: &AuthUser) -> bool {
    actor.has_permission(super::consts::REQUESTS_REVIEW)
}

impl AuthUser {
    /// Check a required permission against the actor's resolved grants,
    /// honoring wildcard implication.
    pub fn has_permission(&self, required: &str) -> bool {
        self.permissions
            .iter()
            .any(|granted| permission_matches(granted, required))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::request::{RequestPriority, RequestStatus, RequestType};
    use assert_matches::assert_matches;
    use chrono::Utc;

    fn actor_with(perms: &[&str]) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            name: "Test Actor".to_string(),
            email: "actor@example.com".to_string(),
            role: "custodian".to_string(),
            permissions: perms.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn request_owned_by(owner: Uuid, status: RequestStatus) -> request::Model {
        request::Model {
            id: Uuid::new_v4(),
            user_id: owner,
            request_type: RequestType::Purchase,
            item_id: None,
            title: "Monitor".to_string(),
            description: "27-inch monitor".to_string(),
            priority: RequestPriority::Medium,
            status,
            reviewed_by: None,
            reviewed_at: None,
            review_notes: None,
            completed_at: None,
            cancelled_at: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn authorize_denies_without_grant() {
        let actor = actor_with(&["items:read"]);
        assert_matches!(
            authorize(&actor, "disposals:execute"),
            Err(ServiceError::Forbidden(_))
        );
        assert!(authorize(&actor, "items:read").is_ok());
    }

    #[test]
    fn wildcard_grant_authorizes() {
        let actor = actor_with(&["admin:*"]);
        assert!(authorize(&actor, "disposals:execute").is_ok());
    }

    #[test]
    fn owner_may_edit_pending_request_without_permission() {
        let actor = actor_with(&[]);
        let req = request_owned_by(actor.id, RequestStatus::Pending);
        assert!(can_edit_request(&req, &actor));
    }

    #[test]
    fn non_owner_without_permission_may_not_edit_any_status() {
        let actor = actor_with(&[]);
        for status in [
            RequestStatus::Pending,
            RequestStatus::ChangesRequested,
            RequestStatus::UnderReview,
            RequestStatus::Approved,
        ] {
            let req = request_owned_by(Uuid::new_v4(), status);
            assert!(!can_edit_request(&req, &actor));
        }
    }

    #[test]
    fn edit_window_closes_after_review_settles() {
        let actor = actor_with(&[]);
        let req = request_owned_by(actor.id, RequestStatus::Approved);
        assert!(!can_edit_request(&req, &actor));
    }

    #[test]
    fn review_has_no_owner_path() {
        let actor = actor_with(&[]);
        let req = request_owned_by(actor.id, RequestStatus::Pending);
        assert!(!can_review_request(&req, &actor));

        let reviewer = actor_with(&["requests:review"]);
        assert!(can_review_request(&req, &reviewer));
    }

    #[test]
    fn cancel_blocked_only_when_completed_or_cancelled() {
        let actor = actor_with(&[]);
        let open = request_owned_by(actor.id, RequestStatus::Rejected);
        assert!(can_cancel_request(&open, &actor));

        let done = request_owned_by(actor.id, RequestStatus::Completed);
        assert!(!can_cancel_request(&done, &actor));
    }
}

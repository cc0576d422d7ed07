/*!
 * # Permissions Module
 *
 * Defines the granular permission strings for every resource and action
 * in the system. Permission names are `resource:action`; a trailing `*`
 * action grants every action on the resource.
 */

use lazy_static::lazy_static;
use std::collections::HashMap;

/// Permission definition
#[derive(Debug, Clone)]
pub struct Permission {
    pub name: String,
    pub description: String,
    pub resource_type: String,
    pub action: String,
}

/// Permission actions
pub struct Actions;

impl Actions {
    pub const READ: &'static str = "read";
    pub const CREATE: &'static str = "create";
    pub const UPDATE: &'static str = "update";
    pub const DELETE: &'static str = "delete";
    pub const ALL: &'static str = "*";
}

/// Resource types
pub struct Resources;

impl Resources {
    pub const ITEMS: &'static str = "items";
    pub const CATEGORIES: &'static str = "categories";
    pub const LOCATIONS: &'static str = "locations";
    pub const ASSIGNMENTS: &'static str = "assignments";
    pub const RETURNS: &'static str = "returns";
    pub const MAINTENANCE: &'static str = "maintenance";
    pub const DISPOSALS: &'static str = "disposals";
    pub const REQUESTS: &'static str = "requests";
    pub const REPORTS: &'static str = "reports";
    pub const USERS: &'static str = "users";
    pub const ROLES: &'static str = "roles";
    pub const ADMIN: &'static str = "admin";
}

/// Common permission string constants for compile-time safety
pub mod consts {
    // Items
    pub const ITEMS_READ: &str = "items:read";
    pub const ITEMS_CREATE: &str = "items:create";
    pub const ITEMS_UPDATE: &str = "items:update";
    pub const ITEMS_DELETE: &str = "items:delete";
    pub const ITEMS_RESTORE: &str = "items:restore";

    // Categories / locations
    pub const CATEGORIES_READ: &str = "categories:read";
    pub const CATEGORIES_CREATE: &str = "categories:create";
    pub const CATEGORIES_UPDATE: &str = "categories:update";
    pub const CATEGORIES_DELETE: &str = "categories:delete";
    pub const LOCATIONS_READ: &str = "locations:read";
    pub const LOCATIONS_CREATE: &str = "locations:create";
    pub const LOCATIONS_UPDATE: &str = "locations:update";
    pub const LOCATIONS_DELETE: &str = "locations:delete";

    // Assignments
    pub const ASSIGNMENTS_READ: &str = "assignments:read";
    pub const ASSIGNMENTS_CREATE: &str = "assignments:create";
    pub const ASSIGNMENTS_APPROVE: &str = "assignments:approve";
    pub const ASSIGNMENTS_ACTIVATE: &str = "assignments:activate";
    pub const ASSIGNMENTS_CANCEL: &str = "assignments:cancel";
    pub const ASSIGNMENTS_RETURN: &str = "assignments:return";

    // Return inspections
    pub const RETURNS_READ: &str = "returns:read";
    pub const RETURNS_INSPECT: &str = "returns:inspect";
    pub const RETURNS_APPROVE: &str = "returns:approve";
    pub const RETURNS_REJECT: &str = "returns:reject";

    // Maintenance
    pub const MAINTENANCE_READ: &str = "maintenance:read";
    pub const MAINTENANCE_CREATE: &str = "maintenance:create";
    pub const MAINTENANCE_SCHEDULE: &str = "maintenance:schedule";
    pub const MAINTENANCE_START: &str = "maintenance:start";
    pub const MAINTENANCE_COMPLETE: &str = "maintenance:complete";
    pub const MAINTENANCE_CANCEL: &str = "maintenance:cancel";

    // Disposals
    pub const DISPOSALS_READ: &str = "disposals:read";
    pub const DISPOSALS_CREATE: &str = "disposals:create";
    pub const DISPOSALS_APPROVE: &str = "disposals:approve";
    pub const DISPOSALS_REJECT: &str = "disposals:reject";
    pub const DISPOSALS_EXECUTE: &str = "disposals:execute";

    // Requests
    pub const REQUESTS_READ: &str = "requests:read";
    pub const REQUESTS_CREATE: &str = "requests:create";
    pub const REQUESTS_UPDATE: &str = "requests:update";
    pub const REQUESTS_REVIEW: &str = "requests:review";
    pub const REQUESTS_COMPLETE: &str = "requests:complete";
    pub const REQUESTS_CANCEL: &str = "requests:cancel";
    pub const REQUESTS_COMMENT: &str = "requests:comment";

    // Reports
    pub const REPORTS_READ: &str = "reports:read";
    pub const REPORTS_EXPORT: &str = "reports:export";

    // Administration
    pub const USERS_READ: &str = "users:read";
    pub const USERS_CREATE: &str = "users:create";
    pub const USERS_UPDATE: &str = "users:update";
    pub const USERS_DELETE: &str = "users:delete";
    pub const ROLES_READ: &str = "roles:read";
    pub const ROLES_ASSIGN: &str = "roles:assign";
    pub const ADMIN_ALL: &str = "admin:*";
}

/// Format a permission string
pub fn format_permission(resource: &str, action: &str) -> String {
    format!("{}:{}", resource, action)
}

// Descriptive catalog of every permission. This is static data for
// introspection endpoints and seeding, not the authorization policy; the
// role mapping lives in `RoleRegistry`.
lazy_static! {
    pub static ref PERMISSIONS: HashMap<String, Permission> = {
        let mut perms = HashMap::new();

        let mut add = |resource: &str, action: &str, description: &str| {
            let name = format_permission(resource, action);
            perms.insert(
                name.clone(),
                Permission {
                    name,
                    description: description.to_string(),
                    resource_type: resource.to_string(),
                    action: action.to_string(),
                },
            );
        };

        // Items
        add(Resources::ITEMS, Actions::READ, "View items");
        add(Resources::ITEMS, Actions::CREATE, "Register new items");
        add(Resources::ITEMS, Actions::UPDATE, "Update item records");
        add(Resources::ITEMS, Actions::DELETE, "Soft-delete items");
        add(Resources::ITEMS, "restore", "Restore soft-deleted items");
        add(Resources::ITEMS, Actions::ALL, "Full control over items");

        // Categories
        add(Resources::CATEGORIES, Actions::READ, "View categories");
        add(Resources::CATEGORIES, Actions::CREATE, "Create categories");
        add(Resources::CATEGORIES, Actions::UPDATE, "Update categories");
        add(Resources::CATEGORIES, Actions::DELETE, "Delete categories");
        add(Resources::CATEGORIES, Actions::ALL, "Full control over categories");

        // Locations
        add(Resources::LOCATIONS, Actions::READ, "View locations");
        add(Resources::LOCATIONS, Actions::CREATE, "Create locations");
        add(Resources::LOCATIONS, Actions::UPDATE, "Update locations");
        add(Resources::LOCATIONS, Actions::DELETE, "Delete locations");
        add(Resources::LOCATIONS, Actions::ALL, "Full control over locations");

        // Assignments
        add(Resources::ASSIGNMENTS, Actions::READ, "View assignments");
        add(Resources::ASSIGNMENTS, Actions::CREATE, "Create assignments");
        add(Resources::ASSIGNMENTS, "approve", "Approve assignments");
        add(Resources::ASSIGNMENTS, "activate", "Hand over approved assignments");
        add(Resources::ASSIGNMENTS, "cancel", "Cancel assignments");
        add(Resources::ASSIGNMENTS, "return", "Record item returns");
        add(Resources::ASSIGNMENTS, Actions::ALL, "Full control over assignments");

        // Returns
        add(Resources::RETURNS, Actions::READ, "View return inspections");
        add(Resources::RETURNS, "inspect", "Inspect returned items");
        add(Resources::RETURNS, "approve", "Approve inspected returns");
        add(Resources::RETURNS, "reject", "Reject inspected returns");
        add(Resources::RETURNS, Actions::ALL, "Full control over returns");

        // Maintenance
        add(Resources::MAINTENANCE, Actions::READ, "View maintenance records");
        add(Resources::MAINTENANCE, Actions::CREATE, "Request maintenance");
        add(Resources::MAINTENANCE, "schedule", "Schedule maintenance work");
        add(Resources::MAINTENANCE, "start", "Start maintenance work");
        add(Resources::MAINTENANCE, "complete", "Complete maintenance work");
        add(Resources::MAINTENANCE, "cancel", "Cancel maintenance work");
        add(Resources::MAINTENANCE, Actions::ALL, "Full control over maintenance");

        // Disposals
        add(Resources::DISPOSALS, Actions::READ, "View disposals");
        add(Resources::DISPOSALS, Actions::CREATE, "Request disposals");
        add(Resources::DISPOSALS, "approve", "Approve disposals");
        add(Resources::DISPOSALS, "reject", "Reject disposals");
        add(Resources::DISPOSALS, "execute", "Execute approved disposals");
        add(Resources::DISPOSALS, Actions::ALL, "Full control over disposals");

        // Requests
        add(Resources::REQUESTS, Actions::READ, "View requests");
        add(Resources::REQUESTS, Actions::CREATE, "Submit requests");
        add(Resources::REQUESTS, Actions::UPDATE, "Edit requests");
        add(Resources::REQUESTS, "review", "Review requests");
        add(Resources::REQUESTS, "complete", "Complete approved requests");
        add(Resources::REQUESTS, "cancel", "Cancel requests");
        add(Resources::REQUESTS, "comment", "Comment on requests");
        add(Resources::REQUESTS, Actions::ALL, "Full control over requests");

        // Reports
        add(Resources::REPORTS, Actions::READ, "View reports");
        add(Resources::REPORTS, "export", "Export reports");
        add(Resources::REPORTS, Actions::ALL, "Full control over reports");

        // Administration
        add(Resources::USERS, Actions::READ, "View users");
        add(Resources::USERS, Actions::CREATE, "Create users");
        add(Resources::USERS, Actions::UPDATE, "Update users");
        add(Resources::USERS, Actions::DELETE, "Deactivate users");
        add(Resources::USERS, Actions::ALL, "Full control over users");
        add(Resources::ROLES, Actions::READ, "View roles");
        add(Resources::ROLES, "assign", "Assign roles to users");
        add(Resources::ROLES, Actions::ALL, "Full control over roles");
        add(Resources::ADMIN, Actions::ALL, "Full administrator access");

        perms
    };
}

/// Service for inspecting the permission catalog.
#[derive(Clone, Default)]
pub struct PermissionCatalog;

impl PermissionCatalog {
    pub fn new() -> Self {
        Self
    }

    pub fn get_permission(&self, name: &str) -> Option<&Permission> {
        PERMISSIONS.get(name)
    }

    pub fn get_all_permissions(&self) -> Vec<&Permission> {
        PERMISSIONS.values().collect()
    }

    pub fn get_resource_permissions(&self, resource: &str) -> Vec<&Permission> {
        PERMISSIONS
            .values()
            .filter(|p| p.resource_type == resource)
            .collect()
    }

    pub fn permission_exists(&self, name: &str) -> bool {
        PERMISSIONS.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_covers_every_lifecycle_permission() {
        let catalog = PermissionCatalog::new();
        for name in [
            consts::ITEMS_CREATE,
            consts::ASSIGNMENTS_APPROVE,
            consts::RETURNS_INSPECT,
            consts::MAINTENANCE_COMPLETE,
            consts::DISPOSALS_EXECUTE,
            consts::REQUESTS_REVIEW,
            consts::ADMIN_ALL,
        ] {
            assert!(catalog.permission_exists(name), "missing {}", name);
        }
    }

    #[test]
    fn resource_filter_groups_permissions() {
        let catalog = PermissionCatalog::new();
        let disposals = catalog.get_resource_permissions(Resources::DISPOSALS);
        assert!(disposals.len() >= 5);
        assert!(disposals.iter().all(|p| p.resource_type == "disposals"));
    }
}

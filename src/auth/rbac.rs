/*!
 * # Role-Based Access Control (RBAC) Module
 *
 * Defines the built-in roles and their permission grants. The registry is
 * constructed once at startup and passed by reference through `AppState`;
 * there is deliberately no process-global mapping.
 */

use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Role definition with associated permissions
#[derive(Debug, Clone)]
pub struct Role {
    pub name: String,
    pub description: String,
    pub permissions: Vec<String>,
}

impl Role {
    fn new(name: &str, description: &str, permissions: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Explicit role -> permission mapping, built at startup.
#[derive(Debug, Clone)]
pub struct RoleRegistry {
    roles: HashMap<String, Role>,
}

impl RoleRegistry {
    /// The ten built-in roles.
    pub fn builtin() -> Self {
        let mut roles = HashMap::new();

        let mut insert = |role: Role| {
            roles.insert(role.name.clone(), role);
        };

        insert(Role::new(
            "admin",
            "Administrator with full access",
            &["admin:*"],
        ));

        insert(Role::new(
            "asset_manager",
            "Manages the asset register and custody workflows end to end",
            &[
                "items:*",
                "categories:*",
                "locations:*",
                "assignments:*",
                "returns:*",
                "maintenance:read",
                "maintenance:create",
                "disposals:read",
                "disposals:create",
                "requests:read",
                "requests:review",
                "requests:complete",
                "requests:comment",
                "reports:read",
                "reports:export",
            ],
        ));

        insert(Role::new(
            "department_head",
            "Reviews and decides requests raised within a department",
            &[
                "items:read",
                "assignments:read",
                "assignments:approve",
                "assignments:cancel",
                "requests:read",
                "requests:review",
                "requests:comment",
                "reports:read",
            ],
        ));

        insert(Role::new(
            "custodian",
            "Standard employee holding assigned items",
            &[
                "items:read",
                "assignments:read",
                "requests:read",
                "requests:create",
                "requests:comment",
            ],
        ));

        insert(Role::new(
            "maintenance_tech",
            "Executes scheduled maintenance work",
            &[
                "items:read",
                "maintenance:read",
                "maintenance:schedule",
                "maintenance:start",
                "maintenance:complete",
                "maintenance:cancel",
            ],
        ));

        insert(Role::new(
            "inspector",
            "Inspects and settles item returns",
            &[
                "items:read",
                "assignments:read",
                "assignments:return",
                "returns:*",
            ],
        ));

        insert(Role::new(
            "disposal_officer",
            "Decides and executes disposals",
            &[
                "items:read",
                "disposals:*",
                "reports:read",
            ],
        ));

        insert(Role::new(
            "procurement_officer",
            "Handles purchase requests and item intake",
            &[
                "items:read",
                "items:create",
                "items:update",
                "categories:read",
                "locations:read",
                "requests:read",
                "requests:review",
                "requests:complete",
                "requests:comment",
            ],
        ));

        insert(Role::new(
            "auditor",
            "Read-only access to every record",
            &[
                "items:read",
                "categories:read",
                "locations:read",
                "assignments:read",
                "returns:read",
                "maintenance:read",
                "disposals:read",
                "requests:read",
                "reports:read",
            ],
        ));

        insert(Role::new(
            "api",
            "Machine-to-machine read access",
            &["items:read", "assignments:read", "reports:read"],
        ));

        Self { roles }
    }

    pub fn get_role(&self, role_name: &str) -> Option<&Role> {
        self.roles.get(role_name)
    }

    pub fn all_roles(&self) -> Vec<&Role> {
        self.roles.values().collect()
    }

    /// Get all permissions for a role
    pub fn role_permissions(&self, role_name: &str) -> Vec<String> {
        match self.roles.get(role_name) {
            Some(role) => role.permissions.clone(),
            None => {
                warn!("Role not found: {}", role_name);
                vec![]
            }
        }
    }

    /// Union of permissions across several roles.
    pub fn permissions_for_roles(&self, role_names: &[String]) -> HashSet<String> {
        let mut permissions = HashSet::new();
        for role_name in role_names {
            if let Some(role) = self.roles.get(role_name) {
                for perm in &role.permissions {
                    permissions.insert(perm.clone());
                }
            }
        }
        permissions
    }
}

/// Check if a granted permission satisfies a required permission.
///
/// Supports `resource:*` and `admin:*` wildcards plus the global `*`.
pub fn permission_matches(granted: &str, required: &str) -> bool {
    if granted == required {
        return true;
    }

    if granted == "*" || granted == "admin:*" {
        return true;
    }

    if let Some(prefix) = granted.strip_suffix(":*") {
        if let Some((resource, _)) = required.split_once(':') {
            if resource == prefix {
                return true;
            }
        }
    }

    false
}

//! Well-known permission and role names seeded at startup.

pub const SYSTEM_ADMIN: &str = "SYSTEM_ADMIN";
pub const USERS_CREATE: &str = "USERS_CREATE";
pub const USERS_VIEW: &str = "USERS_VIEW";
pub const USERS_UNLOCK: &str = "USERS_UNLOCK";
pub const USERS_ACTIVATE: &str = "USERS_ACTIVATE";
pub const USERS_CHANGE_PWD: &str = "USERS_CHANGE_PWD";
pub const USERS_ASSIGN_TO_ROLE: &str = "USERS_ASSIGN_TO_ROLE";
pub const ROLES_VIEW: &str = "ROLES_VIEW";
pub const MANAGE_ROLES: &str = "MANAGE_ROLES";
pub const VIEW_PERMISSION: &str = "VIEW_PERMISSION";
pub const MANAGE_PERMISSION: &str = "MANAGE_PERMISSION";
pub const PERMISSION_ASSIGN_TO_ROLE: &str = "PERMISSION_ASSIGN_TO_ROLE";

/// Every permission in seed order.
pub const ALL: [&str; 12] = [
    SYSTEM_ADMIN,
    USERS_CREATE,
    USERS_VIEW,
    USERS_UNLOCK,
    USERS_ACTIVATE,
    USERS_CHANGE_PWD,
    USERS_ASSIGN_TO_ROLE,
    ROLES_VIEW,
    MANAGE_ROLES,
    VIEW_PERMISSION,
    MANAGE_PERMISSION,
    PERMISSION_ASSIGN_TO_ROLE,
];

pub const ROLE_SYSTEM_ADMIN: &str = "System Admin";
pub const ROLE_ADMIN: &str = "Admin";
pub const ROLE_CUSTOMER: &str = "Customer";
pub const ROLE_GUEST: &str = "Guest";

/// Role assigned to self-registered principals.
pub const DEFAULT_SIGNUP_ROLE: &str = ROLE_CUSTOMER;

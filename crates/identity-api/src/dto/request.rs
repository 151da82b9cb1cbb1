//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address used as the login identifier.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// Client device identifier.
    #[validate(length(min = 1, max = 255, message = "Device id is required"))]
    pub device_id: String,
}

/// Token refresh request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshRequest {
    /// Refresh secret from the previous login or refresh.
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Logout request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LogoutRequest {
    /// Device to log out of.
    #[validate(length(min = 1, message = "Device id is required"))]
    pub device_id: String,
}

/// Self-registration request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    /// Username.
    #[validate(length(min = 3, max = 100))]
    pub username: String,
    /// Given name.
    #[validate(length(min = 1, max = 100))]
    pub firstname: String,
    /// Family name.
    #[validate(length(min = 1, max = 100))]
    pub lastname: String,
    /// Email.
    #[validate(email)]
    pub email: String,
    /// Password; strength is checked by the password policy.
    #[validate(length(min = 1))]
    pub password: String,
}

/// Enable or disable a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetEnabledRequest {
    /// New enabled flag.
    pub enabled: bool,
}

/// Assign a role to a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignRoleRequest {
    /// Role identifier.
    pub role_id: i32,
}

/// Administrator-created user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Username.
    #[validate(length(min = 3, max = 100))]
    pub username: String,
    /// Given name.
    #[validate(length(min = 1, max = 100))]
    pub firstname: String,
    /// Family name.
    #[validate(length(min = 1, max = 100))]
    pub lastname: String,
    /// Email.
    #[validate(email)]
    pub email: String,
    /// Initial password; strength is checked by the password policy.
    #[validate(length(min = 1))]
    pub password: String,
    /// Roles granted together with the insert.
    #[serde(default)]
    pub roles: Vec<i32>,
}

/// Profile update for an existing user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    /// Username.
    #[validate(length(min = 3, max = 100))]
    pub username: String,
    /// Given name.
    #[validate(length(min = 1, max = 100))]
    pub firstname: String,
    /// Family name.
    #[validate(length(min = 1, max = 100))]
    pub lastname: String,
    /// Email.
    #[validate(email)]
    pub email: String,
}

/// New password for a user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SetPasswordRequest {
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Role or permission name and description.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NamedEntryRequest {
    /// Unique name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
}

/// Permissions to grant to a role.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GrantPermissionsRequest {
    /// Permission identifiers.
    #[validate(length(min = 1, message = "At least one permission is required"))]
    pub permissions: Vec<i32>,
}

//! Idempotent seed data: permissions, default roles and the system admin.

use sqlx::PgPool;
use tracing::info;

use identity_core::error::AppError;
use identity_core::result::AppResult;
use identity_entity::permission::names;
use identity_entity::user::CreatePrincipal;

use crate::repositories::{PgCredentialStore, store_error};
use crate::traits::CredentialStore;

/// A role created at startup together with the permissions it grants.
#[derive(Debug, Clone)]
pub struct RoleGrant {
    /// Role name.
    pub name: &'static str,
    /// Role description.
    pub description: &'static str,
    /// Names of granted permissions.
    pub permissions: Vec<&'static str>,
}

/// The default role graph.
///
/// "System Admin" holds every permission, "Admin" every permission except
/// `SYSTEM_ADMIN`, and "Customer" and "Guest" hold none.
pub fn default_roles() -> Vec<RoleGrant> {
    vec![
        RoleGrant {
            name: names::ROLE_SYSTEM_ADMIN,
            description: "System Admin Role",
            permissions: names::ALL.to_vec(),
        },
        RoleGrant {
            name: names::ROLE_ADMIN,
            description: "Generic Admin Role",
            permissions: names::ALL
                .iter()
                .copied()
                .filter(|p| *p != names::SYSTEM_ADMIN)
                .collect(),
        },
        RoleGrant {
            name: names::ROLE_CUSTOMER,
            description: "Customer Role",
            permissions: vec![],
        },
        RoleGrant {
            name: names::ROLE_GUEST,
            description: "Guest Role",
            permissions: vec![],
        },
    ]
}

/// Seed permissions, roles and (optionally) a system administrator.
///
/// Safe to run on every start; existing rows are left untouched.
pub async fn run_seed(pool: &PgPool, admin: Option<CreatePrincipal>) -> AppResult<()> {
    let mut tx = pool
        .begin()
        .await
        .map_err(store_error("Failed to begin seed transaction"))?;

    for permission in names::ALL {
        sqlx::query("INSERT INTO permissions (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(permission)
            .execute(&mut *tx)
            .await
            .map_err(store_error("Failed to seed permission"))?;
    }

    for grant in default_roles() {
        let granted: Vec<String> = grant.permissions.iter().map(|p| p.to_string()).collect();

        sqlx::query(
            "INSERT INTO roles (name, description) VALUES ($1, $2) \
             ON CONFLICT (name) DO NOTHING",
        )
        .bind(grant.name)
        .bind(grant.description)
        .execute(&mut *tx)
        .await
        .map_err(store_error("Failed to seed role"))?;

        sqlx::query(
            "INSERT INTO role_permissions (role_id, permission_id) \
             SELECT r.id, p.id FROM roles r CROSS JOIN permissions p \
             WHERE r.name = $1 AND p.name = ANY($2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(grant.name)
        .bind(&granted)
        .execute(&mut *tx)
        .await
        .map_err(store_error("Failed to seed role permissions"))?;
    }

    tx.commit()
        .await
        .map_err(store_error("Failed to commit seed transaction"))?;

    info!("Seeded permissions and default roles");

    if let Some(admin) = admin {
        seed_admin(pool, admin).await?;
    }
    Ok(())
}

async fn seed_admin(pool: &PgPool, mut admin: CreatePrincipal) -> AppResult<()> {
    let store = PgCredentialStore::new(pool.clone());
    if store.find_by_email(&admin.email).await?.is_some() {
        return Ok(());
    }

    let role = store
        .find_role_by_name(names::ROLE_SYSTEM_ADMIN)
        .await?
        .ok_or_else(|| AppError::internal("System Admin role missing after seeding"))?;
    admin.role_ids = vec![role.id];

    let email = admin.email.clone();
    let principal = store.create_principal(admin).await?;

    info!(user_id = %principal.id, email = %email, "Seeded system administrator");
    Ok(())
}

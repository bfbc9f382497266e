//! Caller identity and capability checks.
//!
//! The services never issue or verify tokens; an upstream gateway
//! authenticates the user and forwards an identity assertion (user id +
//! role). Every role-gated operation calls [`require_role`] at the top of
//! the transition instead of sprinkling role comparisons across call sites.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Platform role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Subadmin,
    Collector,
    Client,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Subadmin => "subadmin",
            Role::Collector => "collector",
            Role::Client => "client",
        }
    }

    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "subadmin" => Some(Role::Subadmin),
            "collector" => Some(Role::Collector),
            "client" => Some(Role::Client),
            _ => None,
        }
    }

    /// Office roles may validate payments and approve requests.
    pub fn is_office(&self) -> bool {
        matches!(self, Role::Admin | Role::Subadmin)
    }
}

/// Roles allowed to perform office-side review and approval operations.
pub const OFFICE_ROLES: &[Role] = &[Role::Admin, Role::Subadmin];

/// Identity assertion for the caller of an operation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: Uuid, role: Role) -> Self {
        Self { user_id, role }
    }
}

/// Fail with `Forbidden` unless the actor holds one of the allowed roles.
pub fn require_role(actor: &Actor, allowed: &[Role]) -> Result<(), AppError> {
    if allowed.contains(&actor.role) {
        Ok(())
    } else {
        Err(AppError::Forbidden(anyhow::anyhow!(
            "role '{}' is not allowed to perform this operation",
            actor.role.as_str()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn office_roles_pass_collector_fails() {
        let admin = Actor::new(Uuid::new_v4(), Role::Admin);
        let collector = Actor::new(Uuid::new_v4(), Role::Collector);

        assert!(require_role(&admin, OFFICE_ROLES).is_ok());
        assert!(matches!(
            require_role(&collector, OFFICE_ROLES),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn role_round_trips_through_strings() {
        for role in [Role::Admin, Role::Subadmin, Role::Collector, Role::Client] {
            assert_eq!(Role::from_string(role.as_str()), Some(role));
        }
        assert_eq!(Role::from_string("superuser"), None);
    }
}

//! Identity roles and per-route role allow-lists.
//!
//! Roles are a closed set. Route permissions are expressed as a [`RoleSet`]
//! and checked with an exhaustive match, never by comparing strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// The role carried by every identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Staff,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Student, Role::Staff, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Staff => "staff",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "staff" => Ok(Role::Staff),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("a role allow-list must name at least one role")]
pub struct EmptyRoleSet;

/// A non-empty set of roles permitted on a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoleSet {
    student: bool,
    staff: bool,
    admin: bool,
}

impl RoleSet {
    pub const ADMIN_ONLY: RoleSet = RoleSet {
        student: false,
        staff: false,
        admin: true,
    };

    pub const STAFF_AND_ADMIN: RoleSet = RoleSet {
        student: false,
        staff: true,
        admin: true,
    };

    pub const ANY: RoleSet = RoleSet {
        student: true,
        staff: true,
        admin: true,
    };

    pub fn new(roles: &[Role]) -> Result<Self, EmptyRoleSet> {
        if roles.is_empty() {
            return Err(EmptyRoleSet);
        }

        let mut set = RoleSet {
            student: false,
            staff: false,
            admin: false,
        };
        for role in roles {
            match role {
                Role::Student => set.student = true,
                Role::Staff => set.staff = true,
                Role::Admin => set.admin = true,
            }
        }
        Ok(set)
    }

    pub fn contains(&self, role: Role) -> bool {
        match role {
            Role::Student => self.student,
            Role::Staff => self.staff,
            Role::Admin => self.admin,
        }
    }

    pub fn roles(&self) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| self.contains(*role))
            .collect()
    }
}

impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.roles().iter().map(Role::as_str).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert!("superuser".parse::<Role>().is_err());
        assert!("Admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Staff).unwrap(), r#""staff""#);
        let role: Role = serde_json::from_str(r#""student""#).unwrap();
        assert_eq!(role, Role::Student);
    }

    #[test]
    fn test_empty_role_set_rejected() {
        assert_eq!(RoleSet::new(&[]), Err(EmptyRoleSet));
    }

    #[test]
    fn test_role_set_membership() {
        let set = RoleSet::new(&[Role::Staff, Role::Admin]).unwrap();
        assert_eq!(set, RoleSet::STAFF_AND_ADMIN);
        assert!(set.contains(Role::Admin));
        assert!(set.contains(Role::Staff));
        assert!(!set.contains(Role::Student));
    }

    #[test]
    fn test_admin_only() {
        assert!(RoleSet::ADMIN_ONLY.contains(Role::Admin));
        assert!(!RoleSet::ADMIN_ONLY.contains(Role::Staff));
        assert!(!RoleSet::ADMIN_ONLY.contains(Role::Student));
    }

    #[test]
    fn test_any_contains_everything() {
        for role in Role::ALL {
            assert!(RoleSet::ANY.contains(role));
        }
    }

    #[test]
    fn test_role_set_display() {
        assert_eq!(RoleSet::STAFF_AND_ADMIN.to_string(), "{staff, admin}");
        assert_eq!(RoleSet::ADMIN_ONLY.roles(), vec![Role::Admin]);
    }
}

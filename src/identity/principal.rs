use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Role carried by every authenticated actor. Exactly one per principal;
/// determines both visibility over the request collection and which routes
/// the authorization gate admits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Resident,
    Employee,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Resident => "resident",
            Role::Employee => "employee",
            Role::Admin => "admin",
        }
    }
}

/// Public entry point for unauthenticated visitors.
pub const PUBLIC_ENTRY: &str = "/";

/// Canonical landing page per role. Single source of truth consumed by the
/// authorization gate and any top-level redirect logic, so the mapping
/// cannot drift between call sites.
pub fn home_path(role: Role) -> &'static str {
    match role {
        Role::Admin => "/admin",
        Role::Employee => "/employee",
        Role::Resident => "/resident",
    }
}

/// Authenticated actor. Never carries the secret credential; the session
/// manager strips it before the principal is returned or persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Principal {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub role: Role,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Category ids this principal handles; meaningful only for employees.
    #[serde(default)]
    pub assigned_categories: BTreeSet<String>,
}

impl Default for Role {
    fn default() -> Self {
        Role::Resident
    }
}

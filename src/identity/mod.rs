//! Central identity and session management for the request-tracker core.
//! Keep the public surface thin and split implementation across sub-modules.

mod authorizer;
mod principal;
mod provider;
mod session;

pub use authorizer::{evaluate, Access};
pub use principal::{home_path, Principal, Role, PUBLIC_ENTRY};
pub use provider::{
    hash_secret, verify_secret, AccountRecord, CredentialStore, MemoryCredentialStore, RegisterData,
};
pub use session::{
    FileSessionStore, MemorySessionStore, RoleMarker, SessionManager, SessionStore, SESSION_TTL_DAYS,
};

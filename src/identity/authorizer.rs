use crate::tprintln;

use super::principal::{home_path, Principal, Role, PUBLIC_ENTRY};

/// Outcome of an admission check. Total: every (principal, required roles)
/// pair maps to exactly one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Session restoration still in flight; show a neutral waiting state.
    Pending,
    Admit,
    /// Denied, with the path the consumer should redirect to.
    Deny { target: String },
}

/// Admission check for a route or action guarded by a role set.
/// No principal lands on the public entry point; a principal with the wrong
/// role lands on its own canonical home.
pub fn evaluate(principal: Option<&Principal>, required: &[Role], path: &str, restoring: bool) -> Access {
    if restoring {
        return Access::Pending;
    }
    let Some(p) = principal else {
        tprintln!("authz.deny path={} target={}", path, PUBLIC_ENTRY);
        return Access::Deny { target: PUBLIC_ENTRY.to_string() };
    };
    if !required.contains(&p.role) {
        let target = home_path(p.role);
        tprintln!("authz.deny path={} user={} target={}", path, p.username, target);
        return Access::Deny { target: target.to_string() };
    }
    Access::Admit
}

//! Session establishment, persistence and teardown.
//!
//! The manager writes two values through the `SessionStore` collaborator: the
//! principal blob and a separate role marker with a bounded expiry.
//! Restoration cross-checks the two; a role disagreement means the persisted
//! state cannot be trusted and invalidates the whole session.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::tprintln;

use super::principal::{Principal, Role};
use super::provider::{hash_secret, verify_secret, AccountRecord, CredentialStore, RegisterData};

/// Upper bound on how long persisted session state stays valid.
pub const SESSION_TTL_DAYS: i64 = 7;

// Simulated round-trip of the future networked backend.
const SIMULATED_LATENCY: Duration = Duration::from_millis(1000);

/// Role marker persisted separately from the principal blob. The double-write
/// is an integrity check: authorization-relevant role data is never trusted
/// from a single persisted value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleMarker {
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

/// Persistence collaborator for session state. Writes are best-effort;
/// `clear` drops both values so a half-cleared session cannot be observed.
pub trait SessionStore: Send + Sync {
    fn load_principal(&self) -> Option<Principal>;
    fn store_principal(&self, principal: &Principal);
    fn load_marker(&self) -> Option<RoleMarker>;
    fn store_marker(&self, marker: &RoleMarker);
    fn clear(&self);
}

#[derive(Default)]
struct Slots {
    principal: Option<Principal>,
    marker: Option<RoleMarker>,
}

/// In-memory session store; state dies with the process.
#[derive(Default)]
pub struct MemorySessionStore {
    slots: Mutex<Slots>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load_principal(&self) -> Option<Principal> {
        self.slots.lock().principal.clone()
    }

    fn store_principal(&self, principal: &Principal) {
        self.slots.lock().principal = Some(principal.clone());
    }

    fn load_marker(&self) -> Option<RoleMarker> {
        self.slots.lock().marker.clone()
    }

    fn store_marker(&self, marker: &RoleMarker) {
        self.slots.lock().marker = Some(marker.clone());
    }

    fn clear(&self) {
        let mut slots = self.slots.lock();
        slots.principal = None;
        slots.marker = None;
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Option<T> {
    std::fs::read_to_string(path).ok().and_then(|s| serde_json::from_str(&s).ok())
}

fn write_json<T: Serialize>(path: &Path, val: &T) {
    // Best-effort write; a failed write surfaces as a missing session on restore
    if let Ok(text) = serde_json::to_string_pretty(val) {
        let _ = std::fs::write(path, text);
    }
}

/// File-backed session store: principal blob and role marker as two separate
/// JSON files under a root directory, so session state survives a restart.
pub struct FileSessionStore {
    root: PathBuf,
}

impl FileSessionStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root).ok();
        Self { root }
    }

    fn principal_path(&self) -> PathBuf {
        self.root.join("principal.json")
    }

    fn marker_path(&self) -> PathBuf {
        self.root.join("role_marker.json")
    }
}

impl SessionStore for FileSessionStore {
    fn load_principal(&self) -> Option<Principal> {
        read_json(&self.principal_path())
    }

    fn store_principal(&self, principal: &Principal) {
        write_json(&self.principal_path(), principal);
    }

    fn load_marker(&self) -> Option<RoleMarker> {
        read_json(&self.marker_path())
    }

    fn store_marker(&self, marker: &RoleMarker) {
        write_json(&self.marker_path(), marker);
    }

    fn clear(&self) {
        let _ = std::fs::remove_file(self.principal_path());
        let _ = std::fs::remove_file(self.marker_path());
    }
}

/// Authenticates credentials, derives a role-tagged principal, persists and
/// restores session state, and terminates sessions. Owns no global state;
/// consumers hold the manager (or a context wrapping it) explicitly.
pub struct SessionManager {
    credentials: Arc<dyn CredentialStore>,
    store: Arc<dyn SessionStore>,
    /// Modeled backend latency for login/register; tests shrink this.
    pub latency: Duration,
    loading: AtomicBool,
    last_error: RwLock<Option<CoreError>>,
}

impl SessionManager {
    pub fn new(credentials: Arc<dyn CredentialStore>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            credentials,
            store,
            latency: SIMULATED_LATENCY,
            // Restoration has not run yet, so the gate reports Pending until
            // the first restore_session completes.
            loading: AtomicBool::new(true),
            last_error: RwLock::new(None),
        }
    }

    /// Busy flag observable by consumers; also feeds the gate's Pending state.
    pub fn loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Most recent operation failure, overwritten at the start of the next one.
    pub fn last_error(&self) -> Option<CoreError> {
        self.last_error.read().clone()
    }

    fn begin_op(&self) {
        self.loading.store(true, Ordering::SeqCst);
        *self.last_error.write() = None;
    }

    fn finish_op(&self, err: Option<CoreError>) {
        *self.last_error.write() = err;
        self.loading.store(false, Ordering::SeqCst);
    }

    /// Load a previously persisted session, cross-checking the principal blob
    /// against the role marker. Tamper and expiry both self-heal: the stores
    /// are cleared and None is returned, nothing is raised.
    pub fn restore_session(&self) -> Option<Principal> {
        *self.last_error.write() = None;
        let restored = match (self.store.load_principal(), self.store.load_marker()) {
            (Some(principal), Some(marker)) => {
                if marker.expires_at <= Utc::now() {
                    self.store.clear();
                    tprintln!("session.restore expired user={}", principal.username);
                    None
                } else if principal.role != marker.role {
                    // The two persisted values disagree on the role: treat the
                    // session as tampered and invalidate both together.
                    self.store.clear();
                    *self.last_error.write() =
                        Some(CoreError::session_tampered("role marker does not match stored principal"));
                    tprintln!("session.restore tampered user={}", principal.username);
                    None
                } else {
                    tprintln!("session.restore user={} role={}", principal.username, principal.role.as_str());
                    Some(principal)
                }
            }
            _ => None,
        };
        self.loading.store(false, Ordering::SeqCst);
        restored
    }

    pub async fn login(&self, username: &str, secret: &str) -> CoreResult<Principal> {
        self.begin_op();
        let out = self.login_inner(username, secret).await;
        self.finish_op(out.as_ref().err().cloned());
        out
    }

    async fn login_inner(&self, username: &str, secret: &str) -> CoreResult<Principal> {
        tokio::time::sleep(self.latency).await;
        let record = self
            .credentials
            .find_by_username(username)
            .filter(|r| verify_secret(&r.secret_hash, secret))
            .ok_or_else(|| CoreError::invalid_credentials("no account matches these credentials"))?;
        let principal = record.to_principal();
        self.persist(&principal);
        tprintln!("session.login user={} role={}", principal.username, principal.role.as_str());
        Ok(principal)
    }

    pub async fn register(&self, data: RegisterData) -> CoreResult<Principal> {
        self.begin_op();
        let out = self.register_inner(data).await;
        self.finish_op(out.as_ref().err().cloned());
        out
    }

    async fn register_inner(&self, data: RegisterData) -> CoreResult<Principal> {
        tokio::time::sleep(self.latency).await;
        if self.credentials.find_by_username(&data.username).is_some() {
            return Err(CoreError::username_taken("username already exists"));
        }
        // Registration never creates staff or admin accounts.
        let record = AccountRecord {
            id: format!("user-{}", Uuid::new_v4()),
            username: data.username,
            secret_hash: hash_secret(&data.secret)?,
            role: Role::Resident,
            full_name: data.full_name,
            district: data.district,
            email: data.email,
            phone: data.phone,
            assigned_categories: Default::default(),
        };
        self.credentials.insert(record.clone())?;
        let principal = record.to_principal();
        // Auto-login after registration
        self.persist(&principal);
        tprintln!("session.register user={} id={}", principal.username, principal.id);
        Ok(principal)
    }

    /// Clear persisted session state; safe to call with no session active.
    pub fn logout(&self) {
        self.store.clear();
        tprintln!("session.logout");
    }

    // Last login wins: any existing persisted session is overwritten.
    fn persist(&self, principal: &Principal) {
        let marker = RoleMarker {
            role: principal.role,
            expires_at: Utc::now() + chrono::Duration::days(SESSION_TTL_DAYS),
        };
        self.store.store_principal(principal);
        self.store.store_marker(&marker);
    }
}

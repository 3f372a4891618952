use anyhow::{anyhow, Result};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use parking_lot::RwLock;
use password_hash::{PasswordHash, SaltString};
use std::collections::BTreeSet;

use super::principal::{Principal, Role};

/// Account record as the credential store yields it. The secret is held as an
/// Argon2 PHC string; plaintext never lives in the store.
#[derive(Debug, Clone)]
pub struct AccountRecord {
    pub id: String,
    pub username: String,
    pub secret_hash: String,
    pub role: Role,
    pub full_name: String,
    pub district: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub assigned_categories: BTreeSet<String>,
}

impl AccountRecord {
    /// Project the authorization-relevant fields into a principal. The secret
    /// hash stays behind in the store.
    pub fn to_principal(&self) -> Principal {
        Principal {
            id: self.id.clone(),
            username: self.username.clone(),
            full_name: self.full_name.clone(),
            role: self.role,
            district: self.district.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            assigned_categories: self.assigned_categories.clone(),
        }
    }
}

/// Registration payload. Registration only ever creates resident accounts.
#[derive(Debug, Clone)]
pub struct RegisterData {
    pub username: String,
    pub secret: String,
    pub full_name: String,
    pub district: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Credential store collaborator, keyed by username.
pub trait CredentialStore: Send + Sync {
    fn find_by_username(&self, username: &str) -> Option<AccountRecord>;
    fn insert(&self, record: AccountRecord) -> Result<()>;
}

/// In-memory credential store for tests and single-process deployments.
pub struct MemoryCredentialStore {
    accounts: RwLock<Vec<AccountRecord>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self { accounts: RwLock::new(Vec::new()) }
    }

    pub fn with_accounts(accounts: Vec<AccountRecord>) -> Self {
        Self { accounts: RwLock::new(accounts) }
    }
}

impl Default for MemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn find_by_username(&self, username: &str) -> Option<AccountRecord> {
        self.accounts.read().iter().find(|a| a.username == username).cloned()
    }

    fn insert(&self, record: AccountRecord) -> Result<()> {
        let mut accounts = self.accounts.write();
        if accounts.iter().any(|a| a.username == record.username) {
            return Err(anyhow!("username already exists"));
        }
        accounts.push(record);
        Ok(())
    }
}

pub fn hash_secret(secret: &str) -> Result<String> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| anyhow!(e.to_string()))?;
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| anyhow!(e.to_string()))?;
    let argon2 = Argon2::default();
    let phc = argon2.hash_password(secret.as_bytes(), &salt).map_err(|e| anyhow!(e.to_string()))?.to_string();
    Ok(phc)
}

pub fn verify_secret(hash: &str, secret: &str) -> bool {
    if let Ok(parsed) = PasswordHash::new(hash) {
        let argon2 = Argon2::default();
        argon2.verify_password(secret.as_bytes(), &parsed).is_ok()
    } else { false }
}

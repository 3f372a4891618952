use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Open,
    Closed,
}

/// One entry in a request's thread. Immutable once created; threads are
/// append-only and insertion order is chronological order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub id: String,
    pub request_id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub sender_role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
}

/// Resident-filed service ticket. Created with exactly one seed message and
/// never observed with an empty thread.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Request {
    pub id: String,
    pub resident_id: String,
    pub resident_name: String,
    pub category_id: String,
    pub category_name: String,
    pub subject: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    /// Refreshed on every message append or status change; never runs behind
    /// created_at.
    pub updated_at: DateTime<Utc>,
    /// Fixed at creation (created_at + the SLA window) and never mutated.
    pub deadline: DateTime<Utc>,
    pub messages: Vec<Message>,
}

impl Request {
    pub fn is_open(&self) -> bool {
        self.status == RequestStatus::Open
    }
}

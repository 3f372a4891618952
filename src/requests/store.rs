//! Canonical request collection and the lifecycle engine.
//!
//! One store owns the collection per process/session. Visibility is a
//! projection recomputed from canonical state on every read, and the active
//! request is a derived view keyed by id, so no mutation path can leave a
//! stale copy behind. All mutations of an existing request go through one
//! shared path that holds the write lock for the whole read-modify-write.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::identity::{Principal, Role};

use super::catalog::{Category, CategoryCatalog};
use super::types::{Message, Request, RequestStatus};

/// Days granted to resolve a request; the deadline is fixed at creation.
pub const SLA_DAYS: i64 = 30;

// Simulated round-trip of the future networked backend.
const SIMULATED_LATENCY: Duration = Duration::from_millis(1000);

#[derive(Default)]
struct Inner {
    /// Canonical collection, most-recent-first.
    requests: Vec<Request>,
    /// Id of the consumer-selected request; the view itself is derived.
    active_id: Option<String>,
}

pub struct RequestStore {
    catalog: Arc<dyn CategoryCatalog>,
    inner: RwLock<Inner>,
    /// Modeled backend latency for create/close; tests shrink this.
    pub latency: Duration,
    last_error: RwLock<Option<CoreError>>,
}

impl RequestStore {
    pub fn new(catalog: Arc<dyn CategoryCatalog>) -> Self {
        Self {
            catalog,
            inner: RwLock::new(Inner::default()),
            latency: SIMULATED_LATENCY,
            last_error: RwLock::new(None),
        }
    }

    /// Hydrate the canonical collection, e.g. from a backend snapshot at
    /// startup. Replaces the collection and drops the active selection.
    pub fn load(&self, requests: Vec<Request>) {
        let mut inner = self.inner.write();
        inner.requests = requests;
        inner.active_id = None;
    }

    pub fn categories(&self) -> Vec<Category> {
        self.catalog.categories()
    }

    /// Most recent command failure, overwritten at the start of the next one.
    pub fn last_error(&self) -> Option<CoreError> {
        self.last_error.read().clone()
    }

    /// Role-scoped projection over the canonical collection, recomputed on
    /// every call. Residents see their own requests, employees the categories
    /// assigned to them, admins everything.
    pub fn visible_requests(&self, principal: Option<&Principal>) -> Vec<Request> {
        let Some(p) = principal else {
            return Vec::new();
        };
        let inner = self.inner.read();
        inner.requests.iter().filter(|r| Self::visible_to(p, r)).cloned().collect()
    }

    fn visible_to(principal: &Principal, request: &Request) -> bool {
        match principal.role {
            Role::Resident => request.resident_id == principal.id,
            Role::Employee => principal.assigned_categories.contains(&request.category_id),
            Role::Admin => true,
        }
    }

    /// Derived view of the selected request, always read from canonical
    /// state. None when nothing is selected or the selection no longer
    /// resolves.
    pub fn active_request(&self) -> Option<Request> {
        let inner = self.inner.read();
        let id = inner.active_id.as_deref()?;
        inner.requests.iter().find(|r| r.id == id).cloned()
    }

    /// Pure selection; the canonical collection is untouched.
    pub fn set_active_request(&self, request: Option<&Request>) {
        self.inner.write().active_id = request.map(|r| r.id.clone());
    }

    pub async fn create_request(
        &self,
        principal: &Principal,
        category_id: &str,
        subject: &str,
        initial_message: &str,
    ) -> CoreResult<Request> {
        *self.last_error.write() = None;
        tokio::time::sleep(self.latency).await;
        let Some(category) = self.catalog.find(category_id) else {
            let err = CoreError::category_not_found(format!("unknown category '{}'", category_id));
            *self.last_error.write() = Some(err.clone());
            return Err(err);
        };
        let now = Utc::now();
        let request_id = format!("req-{}", Uuid::new_v4());
        let seed = Message {
            id: format!("msg-{}", Uuid::new_v4()),
            request_id: request_id.clone(),
            sender_id: principal.id.clone(),
            sender_name: principal.full_name.clone(),
            sender_role: principal.role,
            content: initial_message.to_string(),
            timestamp: now,
            is_read: false,
        };
        let request = Request {
            id: request_id,
            resident_id: principal.id.clone(),
            resident_name: principal.full_name.clone(),
            category_id: category.id,
            category_name: category.name,
            subject: subject.to_string(),
            status: RequestStatus::Open,
            created_at: now,
            updated_at: now,
            deadline: now + chrono::Duration::days(SLA_DAYS),
            messages: vec![seed],
        };
        {
            let mut inner = self.inner.write();
            // Most-recent-first ordering is part of the store's contract.
            inner.requests.insert(0, request.clone());
        }
        debug!(
            target: "civium::requests",
            "create_request id={} category={} resident={}",
            request.id, request.category_id, request.resident_id
        );
        Ok(request)
    }

    /// Append a message to a request's thread. No-op when the principal is
    /// absent, the id does not resolve, or the request is already closed
    /// (closed threads are sealed).
    pub fn send_message(&self, principal: Option<&Principal>, request_id: &str, content: &str) {
        let Some(p) = principal else {
            return;
        };
        let now = Utc::now();
        let appended = self.with_request(request_id, |request| {
            if request.status == RequestStatus::Closed {
                return false;
            }
            // Clamp against clock regression so thread order stays chronological.
            let ts = request.messages.last().map(|m| m.timestamp.max(now)).unwrap_or(now);
            request.messages.push(Message {
                id: format!("msg-{}", Uuid::new_v4()),
                request_id: request.id.clone(),
                sender_id: p.id.clone(),
                sender_name: p.full_name.clone(),
                sender_role: p.role,
                content: content.to_string(),
                timestamp: ts,
                is_read: false,
            });
            request.updated_at = ts.max(request.updated_at);
            true
        });
        match appended {
            Some(true) => {
                debug!(target: "civium::requests", "send_message request={} sender={}", request_id, p.id)
            }
            Some(false) => {
                debug!(target: "civium::requests", "send_message dropped, request closed request={}", request_id)
            }
            None => debug!(target: "civium::requests", "send_message dropped, unknown request={}", request_id),
        }
    }

    /// Close a request. `closed` is terminal: re-closing is a full no-op so
    /// updated_at keeps meaning "last substantive change". Unresolvable ids
    /// are ignored.
    pub async fn close_request(&self, request_id: &str) {
        *self.last_error.write() = None;
        tokio::time::sleep(self.latency).await;
        let closed = self.with_request(request_id, |request| {
            if request.status == RequestStatus::Closed {
                return false;
            }
            request.status = RequestStatus::Closed;
            request.updated_at = Utc::now().max(request.updated_at);
            true
        });
        match closed {
            Some(true) => debug!(target: "civium::requests", "close_request request={}", request_id),
            Some(false) => debug!(target: "civium::requests", "close_request already closed request={}", request_id),
            None => debug!(target: "civium::requests", "close_request unknown request={}", request_id),
        }
    }

    // Single mutation path for existing requests: applies `f` to the
    // canonical entry under one write lock, so a racing close and append
    // serialize into one of the two valid orderings. The active view needs
    // no patching because it is derived from canonical state by id.
    fn with_request<T>(&self, request_id: &str, f: impl FnOnce(&mut Request) -> T) -> Option<T> {
        let mut inner = self.inner.write();
        let request = inner.requests.iter_mut().find(|r| r.id == request_id)?;
        Some(f(request))
    }
}

//! Request store and lifecycle engine: the canonical request collection,
//! role-scoped visibility and the open -> closed state machine with its
//! message-thread invariants.

mod catalog;
mod store;
mod types;

pub use catalog::{Category, CategoryCatalog, StaticCatalog};
pub use store::{RequestStore, SLA_DAYS};
pub use types::{Message, Request, RequestStatus};

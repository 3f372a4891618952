//! Visibility projection tests: the role-scoped filter over the canonical
//! request collection, exercised per role against a mixed request set.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use civium::identity::{Principal, Role};
use civium::requests::{Category, RequestStore, StaticCatalog};

fn principal(id: &str, name: &str, role: Role, cats: &[&str]) -> Principal {
    Principal {
        id: id.into(),
        username: id.into(),
        full_name: name.into(),
        role,
        district: None,
        email: None,
        phone: None,
        assigned_categories: cats.iter().map(|c| c.to_string()).collect(),
    }
}

/// Store seeded with requests from two residents across three categories.
async fn seeded_store() -> Result<RequestStore> {
    let catalog = Arc::new(StaticCatalog::new(vec![
        Category { id: "roads".into(), name: "Roads".into() },
        Category { id: "water".into(), name: "Water Supply".into() },
        Category { id: "waste".into(), name: "Waste Collection".into() },
    ]));
    let mut store = RequestStore::new(catalog);
    store.latency = Duration::from_millis(2);

    let alice = principal("user-1", "Alice Ward", Role::Resident, &[]);
    let bob = principal("user-2", "Bob Lang", Role::Resident, &[]);
    store.create_request(&alice, "roads", "Pothole", "Deep pothole").await?;
    store.create_request(&alice, "water", "Low pressure", "Trickle upstairs").await?;
    store.create_request(&bob, "roads", "Cracked curb", "Corner of 5th").await?;
    store.create_request(&bob, "waste", "Missed pickup", "Bin untouched").await?;
    Ok(store)
}

#[tokio::test]
async fn resident_sees_exactly_their_own_requests() -> Result<()> {
    let store = seeded_store().await?;
    let alice = principal("user-1", "Alice Ward", Role::Resident, &[]);

    let visible = store.visible_requests(Some(&alice));
    assert_eq!(visible.len(), 2);
    assert!(visible.iter().all(|r| r.resident_id == "user-1"));
    Ok(())
}

#[tokio::test]
async fn employee_sees_only_assigned_categories() -> Result<()> {
    let store = seeded_store().await?;
    let eve = principal("user-5", "Eve Ops", Role::Employee, &["roads"]);

    let visible = store.visible_requests(Some(&eve));
    assert_eq!(visible.len(), 2);
    assert!(visible.iter().all(|r| r.category_id == "roads"));
    Ok(())
}

#[tokio::test]
async fn employee_with_no_assignments_sees_nothing() -> Result<()> {
    let store = seeded_store().await?;
    let idle = principal("user-6", "Idle Ops", Role::Employee, &[]);
    assert!(store.visible_requests(Some(&idle)).is_empty());
    Ok(())
}

#[tokio::test]
async fn admin_sees_the_whole_collection() -> Result<()> {
    let store = seeded_store().await?;
    let admin = principal("user-0", "Root", Role::Admin, &[]);
    assert_eq!(store.visible_requests(Some(&admin)).len(), 4);
    Ok(())
}

#[tokio::test]
async fn no_principal_sees_nothing() -> Result<()> {
    let store = seeded_store().await?;
    assert!(store.visible_requests(None).is_empty());
    Ok(())
}

#[tokio::test]
async fn projection_is_recomputed_from_canonical_state() -> Result<()> {
    let store = seeded_store().await?;
    let eve = principal("user-5", "Eve Ops", Role::Employee, &["roads", "waste"]);

    assert_eq!(store.visible_requests(Some(&eve)).len(), 3);

    // A new request in an assigned category appears on the next read.
    let carol = principal("user-3", "Carol Novak", Role::Resident, &[]);
    store.create_request(&carol, "waste", "Overflowing bin", "Park entrance").await?;
    assert_eq!(store.visible_requests(Some(&eve)).len(), 4);
    Ok(())
}

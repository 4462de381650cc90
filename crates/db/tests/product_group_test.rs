//! Product groups and their suppliers.

mod common;

use mizan_core::DomainError;
use mizan_core::catalog::CreateProductGroupInput;
use mizan_db::entities::products;
use mizan_db::{ProductGroupRepository, ServiceError};
use mizan_shared::types::{ProductGroupId, SupplierId};
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};

fn group(name: &str, suppliers: &[i64], primary: Option<i64>) -> CreateProductGroupInput {
    CreateProductGroupInput {
        name: name.to_string(),
        description: None,
        supplier_ids: suppliers.iter().copied().map(SupplierId::new).collect(),
        primary_supplier_id: primary.map(SupplierId::new),
    }
}

#[tokio::test]
async fn test_create_links_suppliers_once() {
    let db = common::setup().await;
    let s1 = common::supplier(&db, "Acme").await;
    let s2 = common::supplier(&db, "Globex").await;
    let repo = ProductGroupRepository::new(db.clone());

    let created = repo
        .create_group(group("Ceramics", &[s1.id, s2.id, s1.id], Some(s2.id)))
        .await
        .unwrap();

    let links: Vec<(i64, bool)> = created
        .suppliers
        .iter()
        .map(|l| (l.supplier_id, l.is_primary))
        .collect();
    assert_eq!(links, vec![(s1.id, false), (s2.id, true)]);
    assert_eq!(created.group.primary_supplier_id, Some(s2.id));
}

#[tokio::test]
async fn test_duplicate_name_conflicts() {
    let db = common::setup().await;
    let repo = ProductGroupRepository::new(db.clone());
    repo.create_group(group("Ceramics", &[], None)).await.unwrap();

    let err = repo
        .create_group(group("Ceramics", &[], None))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::Conflict(_))));
}

#[tokio::test]
async fn test_unknown_supplier_writes_nothing() {
    let db = common::setup().await;
    let repo = ProductGroupRepository::new(db.clone());

    let err = repo
        .create_group(group("Ceramics", &[77], None))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::NotFound { entity: "supplier", id: 77 })
    ));
    assert_eq!(
        mizan_db::entities::product_groups::Entity::find()
            .count(&db)
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn test_set_suppliers_replaces_links() {
    let db = common::setup().await;
    let s1 = common::supplier(&db, "Acme").await;
    let s2 = common::supplier(&db, "Globex").await;
    let repo = ProductGroupRepository::new(db.clone());
    let created = repo
        .create_group(group("Ceramics", &[s1.id], Some(s1.id)))
        .await
        .unwrap();
    let group_id = ProductGroupId::new(created.group.id);

    repo.set_suppliers(group_id, &[SupplierId::new(s2.id)], None)
        .await
        .unwrap();

    let loaded = repo.find(group_id).await.unwrap();
    assert_eq!(loaded.suppliers.len(), 1);
    assert_eq!(loaded.suppliers[0].supplier_id, s2.id);
    assert_eq!(loaded.group.primary_supplier_id, None);
}

#[tokio::test]
async fn test_group_with_products_cannot_be_deleted() {
    let db = common::setup().await;
    let repo = ProductGroupRepository::new(db.clone());
    let created = repo
        .create_group(group("Ceramics", &[], None))
        .await
        .unwrap();
    let group_id = ProductGroupId::new(created.group.id);

    let product = common::product(&db, "TILE").await;
    let mut active: products::ActiveModel = product.into();
    active.group_id = Set(Some(created.group.id));
    let product = active.update(&db).await.unwrap();

    let err = repo.delete_group(group_id).await.unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::Conflict(_))));

    products::Entity::delete_by_id(product.id)
        .exec(&db)
        .await
        .unwrap();
    repo.delete_group(group_id).await.unwrap();
    assert!(matches!(
        repo.find(group_id).await.unwrap_err(),
        ServiceError::Domain(DomainError::NotFound { .. })
    ));
}

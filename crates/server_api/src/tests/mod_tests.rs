use super::*;
use std::collections::HashSet;

use anyhow::anyhow;
use async_trait::async_trait;

struct BrokenStore;

#[async_trait]
impl ProductStore for BrokenStore {
    async fn list(&self) -> anyhow::Result<Vec<Product>> {
        Err(anyhow!("store offline"))
    }

    async fn create(&self, _new: NewProduct) -> anyhow::Result<Product> {
        Err(anyhow!("store offline"))
    }

    async fn update(
        &self,
        _id: ProductId,
        _patch: ProductPatch,
    ) -> anyhow::Result<Option<Product>> {
        Err(anyhow!("store offline"))
    }

    async fn reset(&self) -> anyhow::Result<()> {
        Err(anyhow!("store offline"))
    }
}

#[tokio::test]
async fn list_returns_seed_in_insertion_order_without_mutating() {
    let ctx = ApiContext::seeded();
    let first = list_products(&ctx).await.expect("list");
    let second = list_products(&ctx).await.expect("list");
    assert_eq!(first, default_seed());
    assert_eq!(first, second);
}

#[tokio::test]
async fn create_appends_with_fresh_id() {
    let ctx = ApiContext::seeded();
    let created = create_product(&ctx, NewProduct::new("C", 9.99, 3))
        .await
        .expect("create");
    assert_eq!(
        created,
        Product {
            id: ProductId(3),
            name: "C".into(),
            price: 9.99,
            stock: 3,
        }
    );

    let listed = list_products(&ctx).await.expect("list");
    assert_eq!(listed.len(), 3);
    assert_eq!(listed.last(), Some(&created));
}

#[tokio::test]
async fn partial_update_changes_only_supplied_fields() {
    let ctx = ApiContext::seeded();
    let updated = update_product(
        &ctx,
        ProductId(2),
        ProductPatch {
            price: Some(39.99),
            ..ProductPatch::default()
        },
    )
    .await
    .expect("update");
    assert_eq!(updated.price, 39.99);
    assert_eq!(updated.name, "Product B");
    assert_eq!(updated.stock, 8);

    let listed = list_products(&ctx).await.expect("list");
    assert_eq!(listed[1], updated);
}

#[tokio::test]
async fn update_unknown_id_reports_not_found() {
    let ctx = ApiContext::seeded();
    let err = update_product(&ctx, ProductId(99), ProductPatch::stock(1))
        .await
        .expect_err("should fail");
    assert_eq!(err.code, ErrorCode::NotFound);
    assert_eq!(err.message, "product 99 not found");
}

#[tokio::test]
async fn concurrent_creates_never_share_an_id() {
    let ctx = ApiContext::seeded();
    let creates = (0..64).map(|i| {
        let ctx = ctx.clone();
        tokio::spawn(async move {
            create_product(&ctx, NewProduct::new(format!("item-{i}"), 1.0, i))
                .await
                .expect("create")
        })
    });
    let created = futures::future::join_all(creates).await;

    let ids: HashSet<ProductId> = created
        .into_iter()
        .map(|joined| joined.expect("join").id)
        .collect();
    assert_eq!(ids.len(), 64);
    assert!(!ids.contains(&ProductId(1)) && !ids.contains(&ProductId(2)));
    assert_eq!(list_products(&ctx).await.expect("list").len(), 66);
}

#[tokio::test]
async fn separate_contexts_do_not_share_state() {
    let a = ApiContext::seeded();
    let b = ApiContext::seeded();
    create_product(&a, NewProduct::new("only-in-a", 1.0, 1))
        .await
        .expect("create");
    reset_catalog(&b).await.expect("reset");

    assert_eq!(list_products(&a).await.expect("list").len(), 3);
    assert_eq!(list_products(&b).await.expect("list"), default_seed());
}

#[tokio::test]
async fn store_failures_surface_as_internal_errors() {
    let ctx = ApiContext::new(Arc::new(BrokenStore));
    let err = list_products(&ctx).await.expect_err("should fail");
    assert_eq!(err.code, ErrorCode::Internal);
    assert_eq!(err.message, "store offline");
}

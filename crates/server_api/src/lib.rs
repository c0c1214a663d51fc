use std::sync::Arc;

use shared::{
    domain::{NewProduct, Product, ProductId, ProductPatch},
    error::{ApiError, ErrorCode},
};
use tracing::{debug, info, warn};

mod store;

pub use store::{default_seed, InMemoryProductStore, ProductStore};

/// Handle on the authoritative product list. Cloning shares the same store.
#[derive(Clone)]
pub struct ApiContext {
    pub store: Arc<dyn ProductStore>,
}

impl ApiContext {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    pub fn seeded() -> Self {
        Self::new(Arc::new(InMemoryProductStore::seeded()))
    }

    pub fn empty() -> Self {
        Self::new(Arc::new(InMemoryProductStore::empty()))
    }
}

pub async fn list_products(ctx: &ApiContext) -> Result<Vec<Product>, ApiError> {
    let products = ctx.store.list().await.map_err(internal)?;
    debug!(count = products.len(), "listed products");
    Ok(products)
}

pub async fn create_product(ctx: &ApiContext, new: NewProduct) -> Result<Product, ApiError> {
    let product = ctx.store.create(new).await.map_err(internal)?;
    info!(product_id = %product.id, name = %product.name, "product created");
    Ok(product)
}

pub async fn update_product(
    ctx: &ApiContext,
    id: ProductId,
    patch: ProductPatch,
) -> Result<Product, ApiError> {
    let updated = ctx.store.update(id, patch).await.map_err(internal)?;
    match updated {
        Some(product) => {
            info!(product_id = %id, stock = product.stock, "product updated");
            Ok(product)
        }
        None => {
            warn!(product_id = %id, "update for unknown product");
            Err(ApiError::new(
                ErrorCode::NotFound,
                format!("product {id} not found"),
            ))
        }
    }
}

pub async fn reset_catalog(ctx: &ApiContext) -> Result<(), ApiError> {
    ctx.store.reset().await.map_err(internal)?;
    info!("catalog reset to seed");
    Ok(())
}

fn internal(err: anyhow::Error) -> ApiError {
    ApiError::new(ErrorCode::Internal, err.to_string())
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;

use anyhow::Result;
use async_trait::async_trait;
use shared::domain::{NewProduct, Product, ProductId, ProductPatch};
use tokio::sync::Mutex;

/// Storage seam for the catalog. Every method is one atomic read-modify-write.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Product>>;
    async fn create(&self, new: NewProduct) -> Result<Product>;
    /// Returns `None` when no product has `id`.
    async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<Option<Product>>;
    async fn reset(&self) -> Result<()>;
}

pub fn default_seed() -> Vec<Product> {
    vec![
        Product {
            id: ProductId(1),
            name: "Product A".to_string(),
            price: 29.99,
            stock: 15,
        },
        Product {
            id: ProductId(2),
            name: "Product B".to_string(),
            price: 49.99,
            stock: 8,
        },
    ]
}

struct CatalogState {
    products: Vec<Product>,
    next_id: i64,
}

impl CatalogState {
    fn from_seed(seed: &[Product]) -> Self {
        let next_id = seed.iter().map(|p| p.id.0).max().unwrap_or(0) + 1;
        Self {
            products: seed.to_vec(),
            next_id,
        }
    }
}

pub struct InMemoryProductStore {
    seed: Vec<Product>,
    state: Mutex<CatalogState>,
}

impl InMemoryProductStore {
    pub fn with_seed(seed: Vec<Product>) -> Self {
        let state = CatalogState::from_seed(&seed);
        Self {
            seed,
            state: Mutex::new(state),
        }
    }

    pub fn seeded() -> Self {
        Self::with_seed(default_seed())
    }

    pub fn empty() -> Self {
        Self::with_seed(Vec::new())
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn list(&self) -> Result<Vec<Product>> {
        let guard = self.state.lock().await;
        Ok(guard.products.clone())
    }

    async fn create(&self, new: NewProduct) -> Result<Product> {
        let mut guard = self.state.lock().await;
        let id = ProductId(guard.next_id);
        guard.next_id += 1;
        let product = Product::from_new(id, new);
        guard.products.push(product.clone());
        Ok(product)
    }

    async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<Option<Product>> {
        let mut guard = self.state.lock().await;
        let Some(product) = guard.products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        product.apply(patch);
        Ok(Some(product.clone()))
    }

    async fn reset(&self) -> Result<()> {
        let mut guard = self.state.lock().await;
        *guard = CatalogState::from_seed(&self.seed);
        Ok(())
    }
}

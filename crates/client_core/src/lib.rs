//! Client-side mirror of the product catalog.
//!
//! [`ProductMirror`] keeps a local copy of the server's product list together
//! with the `loading`/`error` flags a UI renders. Local products change only
//! after the server confirms a request; a failed request leaves them as they
//! were and records a human-readable message instead.

use std::sync::atomic::{AtomicUsize, Ordering};

use shared::domain::{NewProduct, Product, ProductId, ProductPatch};
use tokio::sync::watch;
use tracing::{info, warn};

pub mod error;
pub mod transport;

pub use error::ClientError;
pub use transport::{CatalogTransport, HttpCatalogTransport};

const FETCH_FALLBACK_MESSAGE: &str = "failed to load products";
const ADD_FALLBACK_MESSAGE: &str = "failed to add product";
const UPDATE_STOCK_FALLBACK_MESSAGE: &str = "failed to update stock";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSnapshot {
    pub products: Vec<Product>,
    pub loading: bool,
    pub error: Option<String>,
}

pub struct ProductMirror<T: CatalogTransport> {
    transport: T,
    state: watch::Sender<CatalogSnapshot>,
    // Only touched inside `send_modify`, so it moves in lockstep with `loading`.
    in_flight: AtomicUsize,
}

impl ProductMirror<HttpCatalogTransport> {
    pub fn connect(server_url: &str) -> Result<Self, ClientError> {
        Ok(Self::new(HttpCatalogTransport::new(server_url)?))
    }
}

impl<T: CatalogTransport> ProductMirror<T> {
    pub fn new(transport: T) -> Self {
        let (state, _) = watch::channel(CatalogSnapshot::default());
        Self {
            transport,
            state,
            in_flight: AtomicUsize::new(0),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Receiver that is notified after every state change.
    pub fn subscribe(&self) -> watch::Receiver<CatalogSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> CatalogSnapshot {
        self.state.borrow().clone()
    }

    pub fn products(&self) -> Vec<Product> {
        self.state.borrow().products.clone()
    }

    pub fn product_by_id(&self, id: ProductId) -> Option<Product> {
        self.state
            .borrow()
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn has_error(&self) -> bool {
        self.state.borrow().error.is_some()
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    /// Replaces the local list with the server's on success.
    pub async fn fetch_all(&self) -> Result<(), ClientError> {
        let _loading = self.begin_action();
        match self.transport.list_products().await {
            Ok(products) => {
                info!(count = products.len(), "catalog fetched");
                self.state.send_modify(|s| s.products = products);
                Ok(())
            }
            Err(err) => {
                self.record_failure(&err, FETCH_FALLBACK_MESSAGE);
                Err(err)
            }
        }
    }

    /// Appends the product the server created, carrying its assigned id.
    pub async fn add_product(&self, new: NewProduct) -> Result<Product, ClientError> {
        let _loading = self.begin_action();
        match self.transport.create_product(&new).await {
            Ok(created) => {
                info!(product_id = %created.id, "product added");
                let appended = created.clone();
                self.state.send_modify(|s| s.products.push(appended));
                Ok(created)
            }
            Err(err) => {
                self.record_failure(&err, ADD_FALLBACK_MESSAGE);
                Err(err)
            }
        }
    }

    /// Sends `{stock}` for a product already present locally. On success only
    /// the local `stock` field changes; the rest of the local record is kept.
    ///
    /// An id missing from the local list fails with
    /// [`ClientError::UnknownProduct`] before any request is made and leaves the
    /// state untouched.
    pub async fn update_stock(&self, id: ProductId, stock: i64) -> Result<Product, ClientError> {
        if self.product_by_id(id).is_none() {
            warn!(product_id = %id, "stock update for product missing from local catalog");
            return Err(ClientError::UnknownProduct(id));
        }

        let _loading = self.begin_action();
        match self
            .transport
            .update_product(id, &ProductPatch::stock(stock))
            .await
        {
            Ok(updated) => {
                info!(product_id = %id, stock, "stock updated");
                self.state.send_modify(|s| {
                    if let Some(product) = s.products.iter_mut().find(|p| p.id == id) {
                        product.stock = stock;
                    }
                });
                Ok(updated)
            }
            Err(err) => {
                self.record_failure(&err, UPDATE_STOCK_FALLBACK_MESSAGE);
                Err(err)
            }
        }
    }

    fn begin_action(&self) -> LoadingGuard<'_, T> {
        self.state.send_modify(|s| {
            self.in_flight.fetch_add(1, Ordering::Relaxed);
            s.loading = true;
            s.error = None;
        });
        LoadingGuard { mirror: self }
    }

    fn record_failure(&self, err: &ClientError, fallback: &str) {
        let message = failure_message(err, fallback);
        warn!(%message, "catalog action failed");
        self.state.send_modify(|s| s.error = Some(message));
    }
}

/// Clears `loading` once the last in-flight action finishes, including when
/// the action's future is dropped before completing.
struct LoadingGuard<'a, T: CatalogTransport> {
    mirror: &'a ProductMirror<T>,
}

impl<T: CatalogTransport> Drop for LoadingGuard<'_, T> {
    fn drop(&mut self) {
        let in_flight = &self.mirror.in_flight;
        self.mirror.state.send_modify(|s| {
            let remaining = in_flight.fetch_sub(1, Ordering::Relaxed) - 1;
            s.loading = remaining > 0;
        });
    }
}

fn failure_message(err: &ClientError, fallback: &str) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

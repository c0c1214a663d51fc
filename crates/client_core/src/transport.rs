use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{NewProduct, Product, ProductId, ProductPatch},
    error::{ApiError, ErrorCode},
    protocol::{product_route, products_route},
};
use tracing::debug;
use url::Url;

use crate::error::ClientError;

/// Network boundary between the mirror and the catalog service.
#[async_trait]
pub trait CatalogTransport: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>, ClientError>;
    async fn create_product(&self, new: &NewProduct) -> Result<Product, ClientError>;
    async fn update_product(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, ClientError>;
}

#[async_trait]
impl<T> CatalogTransport for Arc<T>
where
    T: CatalogTransport + ?Sized,
{
    async fn list_products(&self) -> Result<Vec<Product>, ClientError> {
        (**self).list_products().await
    }

    async fn create_product(&self, new: &NewProduct) -> Result<Product, ClientError> {
        (**self).create_product(new).await
    }

    async fn update_product(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, ClientError> {
        (**self).update_product(id, patch).await
    }
}

pub struct HttpCatalogTransport {
    http: Client,
    base_url: Url,
}

impl HttpCatalogTransport {
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, server_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(server_url).map_err(|source| ClientError::InvalidUrl {
            url: server_url.to_string(),
            source,
        })?;
        Ok(Self { http, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|source| ClientError::InvalidUrl {
                url: format!("{}{path}", self.base_url),
                source,
            })
    }
}

#[async_trait]
impl CatalogTransport for HttpCatalogTransport {
    async fn list_products(&self) -> Result<Vec<Product>, ClientError> {
        let url = self.endpoint(products_route())?;
        debug!(%url, "GET products");
        let response = self.http.get(url).send().await?;
        decode(response).await
    }

    async fn create_product(&self, new: &NewProduct) -> Result<Product, ClientError> {
        let url = self.endpoint(products_route())?;
        debug!(%url, name = %new.name, "POST product");
        let response = self.http.post(url).json(new).send().await?;
        decode(response).await
    }

    async fn update_product(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, ClientError> {
        let url = self.endpoint(&product_route(id))?;
        debug!(%url, "PATCH product");
        let response = self.http.patch(url).json(patch).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let err = serde_json::from_str::<ApiError>(&body).unwrap_or_else(|_| {
        ApiError::new(ErrorCode::Internal, format!("server responded with {status}"))
    });
    Err(ClientError::Api(err))
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;

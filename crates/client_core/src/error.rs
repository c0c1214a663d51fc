use shared::{
    domain::ProductId,
    error::{ApiError, ErrorCode},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with an error body.
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid server url '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    /// Raised before any request is sent: the id is absent from the local mirror.
    #[error("product {0} is not in the local catalog")]
    UnknownProduct(ProductId),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        match self {
            ClientError::Api(err) => err.code == ErrorCode::NotFound,
            ClientError::UnknownProduct(_) => true,
            _ => false,
        }
    }

    pub fn is_route_not_found(&self) -> bool {
        matches!(self, ClientError::Api(err) if err.code == ErrorCode::RouteNotFound)
    }
}

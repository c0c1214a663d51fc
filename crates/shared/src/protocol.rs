use crate::domain::ProductId;

const PRODUCTS_ROUTE: &str = "/api/products";

pub fn products_route() -> &'static str {
    PRODUCTS_ROUTE
}

pub fn product_route(id: ProductId) -> String {
    format!("{PRODUCTS_ROUTE}/{}", id.0)
}

/// Parses the `{id}` segment of `/api/products/{id}`. Anything that is not a
/// plain integer is treated as an unmatched route, not as a missing product.
pub fn parse_product_id(segment: &str) -> Option<ProductId> {
    segment.trim().parse::<i64>().ok().map(ProductId)
}

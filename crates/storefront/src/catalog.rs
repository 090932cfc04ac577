//! Read-only catalog listings.
//!
//! Nothing here is cached; every call is one request. Failures are returned
//! to the caller and never published as notices.

use tracing::instrument;

use threadline_core::{CategoryId, Product, ProductId};

use crate::api::{ApiClient, ApiError, Transport};
use crate::config::CatalogLimits;

/// Product listings, search and lookup.
pub struct Catalog<T> {
    api: ApiClient<T>,
    limits: CatalogLimits,
}

impl<T: Transport> Catalog<T> {
    #[must_use]
    pub const fn new(api: ApiClient<T>, limits: CatalogLimits) -> Self {
        Self { api, limits }
    }

    /// Featured products for the home page.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the call fails.
    #[instrument(skip(self))]
    pub async fn featured(&self) -> Result<Vec<Product>, ApiError> {
        self.api.featured_products(self.limits.featured).await
    }

    /// The new arrivals strip. Served by the featured endpoint with a
    /// smaller limit.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the call fails.
    #[instrument(skip(self))]
    pub async fn new_arrivals(&self) -> Result<Vec<Product>, ApiError> {
        self.api.featured_products(self.limits.new_arrivals).await
    }

    /// One page of the full catalog. Pages are zero-based.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the call fails.
    #[instrument(skip(self))]
    pub async fn page(&self, page: u32) -> Result<Vec<Product>, ApiError> {
        let limit = self.limits.page_size;
        self.api
            .all_products(limit, page.saturating_mul(limit))
            .await
    }

    /// A single product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the product does not exist or the call fails.
    #[instrument(skip(self))]
    pub async fn product(&self, id: ProductId) -> Result<Product, ApiError> {
        self.api.product(id).await
    }

    /// Keyword search. A blank keyword returns nothing without a request.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the call fails.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        keyword: &str,
        category_id: Option<CategoryId>,
    ) -> Result<Vec<Product>, ApiError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Ok(Vec::new());
        }

        self.api
            .search_products(keyword, category_id, self.limits.page_size)
            .await
    }
}

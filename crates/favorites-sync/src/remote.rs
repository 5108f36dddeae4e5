//! Remote favorites source.

use async_trait::async_trait;
use vitrine_api::{ApiResult, StorefrontClient};
use vitrine_catalog::FavoriteProduct;

/// The remote, authoritative favorites collection.
///
/// A trait seam so tests can inject a recording or failing remote;
/// production wires in [`StorefrontClient`].
#[async_trait]
pub trait RemoteFavorites: Send + Sync {
    /// Fetch the remote collection.
    async fn list(&self, access_token: &str) -> ApiResult<Vec<FavoriteProduct>>;

    /// Add a product id to the remote collection.
    async fn add(&self, product_id: &str, access_token: &str) -> ApiResult<()>;

    /// Remove a product id from the remote collection.
    async fn remove(&self, product_id: &str, access_token: &str) -> ApiResult<()>;

    /// Empty the remote collection.
    async fn clear(&self, access_token: &str) -> ApiResult<()>;
}

#[async_trait]
impl RemoteFavorites for StorefrontClient {
    async fn list(&self, access_token: &str) -> ApiResult<Vec<FavoriteProduct>> {
        self.fetch_favorites(access_token).await
    }

    async fn add(&self, product_id: &str, access_token: &str) -> ApiResult<()> {
        self.add_favorite(product_id, access_token).await
    }

    async fn remove(&self, product_id: &str, access_token: &str) -> ApiResult<()> {
        self.remove_favorite(product_id, access_token).await
    }

    async fn clear(&self, access_token: &str) -> ApiResult<()> {
        self.clear_favorites(access_token).await
    }
}

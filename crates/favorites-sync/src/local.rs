//! Local favorites mirror.

use std::sync::Arc;

use tracing::warn;
use vitrine_catalog::{FavoriteProduct, Product};
use vitrine_storage::{KeyValueStore, StorageError, StorageKeys, StorageResult};

/// Favorites persisted as an ordered JSON array under a fixed key.
///
/// The mirror is only written when a remote call did not complete; it is
/// the degraded-mode source, not a cache of the remote collection.
#[derive(Clone)]
pub struct FavoritesMirror {
    store: Arc<dyn KeyValueStore>,
}

impl FavoritesMirror {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Read the mirrored collection. A missing key reads as empty; a
    /// corrupt blob is discarded rather than wedging every later mutation.
    pub async fn list(&self) -> StorageResult<Vec<FavoriteProduct>> {
        match self.store.get(StorageKeys::FAVORITES_MIRROR).await? {
            Some(json) => match serde_json::from_str(&json) {
                Ok(items) => Ok(items),
                Err(e) => {
                    warn!(error = %e, "favorites mirror is corrupt, treating as empty");
                    Ok(Vec::new())
                }
            },
            None => Ok(Vec::new()),
        }
    }

    /// Add a product to the mirror. Adding an id already present is a
    /// no-op.
    pub async fn add(&self, product: &Product) -> StorageResult<()> {
        let mut items = self.list().await?;
        if items.iter().any(|f| f.product.id == product.id) {
            return Ok(());
        }

        items.push(FavoriteProduct::new(product.clone()));
        self.persist(&items).await
    }

    /// Filter a product id out of the mirror.
    pub async fn remove(&self, product_id: &str) -> StorageResult<()> {
        let mut items = self.list().await?;
        let before = items.len();
        items.retain(|f| f.product.id != product_id);
        if items.len() == before {
            return Ok(());
        }

        self.persist(&items).await
    }

    /// Empty the mirror.
    pub async fn clear(&self) -> StorageResult<()> {
        let _ = self.store.remove(StorageKeys::FAVORITES_MIRROR).await?;
        Ok(())
    }

    async fn persist(&self, items: &[FavoriteProduct]) -> StorageResult<()> {
        let json =
            serde_json::to_string(items).map_err(|e| StorageError::Encoding(e.to_string()))?;
        self.store.set(StorageKeys::FAVORITES_MIRROR, &json).await
    }
}

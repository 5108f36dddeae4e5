//! Remote specials endpoint with a local deterministic fallback.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use tracing::warn;
use vitrine_api::{ApiResult, StorefrontClient};
use vitrine_catalog::Product;

use crate::selector::select_daily_specials;

/// Catalog read operations the specials service depends on.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Today's specials as computed by the backend.
    async fn daily_specials(&self) -> ApiResult<Vec<Product>>;

    /// The full product catalog.
    async fn all_products(&self) -> ApiResult<Vec<Product>>;
}

#[async_trait]
impl CatalogSource for StorefrontClient {
    async fn daily_specials(&self) -> ApiResult<Vec<Product>> {
        self.fetch_daily_specials().await
    }

    async fn all_products(&self) -> ApiResult<Vec<Product>> {
        self.fetch_products().await
    }
}

/// Daily specials with a remote-first strategy: prefer the backend's
/// selection, recompute locally from the full catalog when the backend
/// cannot answer. An error surfaces only when both sources fail.
pub struct DailySpecialsService {
    catalog: Arc<dyn CatalogSource>,
}

impl DailySpecialsService {
    /// Create a service over the given catalog source.
    pub fn new(catalog: Arc<dyn CatalogSource>) -> Self {
        Self { catalog }
    }

    /// Specials for the local calendar date.
    pub async fn specials_for_today(&self) -> ApiResult<Vec<Product>> {
        self.specials_for(Local::now().date_naive()).await
    }

    /// Specials for an explicit date.
    pub async fn specials_for(&self, date: NaiveDate) -> ApiResult<Vec<Product>> {
        match self.catalog.daily_specials().await {
            Ok(specials) => Ok(specials),
            Err(e) => {
                warn!(error = %e, "specials endpoint unavailable, selecting locally");
                let products = self.catalog.all_products().await?;
                Ok(select_daily_specials(&products, date))
            }
        }
    }
}

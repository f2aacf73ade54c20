//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;
use tracing::debug;

use crate::config::StorefrontConfig;
use crate::db::{ProductRepository, RepositoryError};
use crate::models::Product;

/// How long the home page catalog listing is reused.
const CATALOG_CACHE_TTL: Duration = Duration::from_secs(60);

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    catalog: Cache<(), Arc<Vec<Product>>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let catalog = Cache::builder()
            .max_capacity(1)
            .time_to_live(CATALOG_CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                catalog,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// The full catalog for the home page, cached for a minute.
    ///
    /// Cart and checkout pages read product rows directly instead.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the catalog has to be reloaded and the
    /// query fails.
    pub async fn catalog(&self) -> Result<Arc<Vec<Product>>, RepositoryError> {
        if let Some(products) = self.inner.catalog.get(&()).await {
            debug!("Cache hit for catalog");
            return Ok(products);
        }

        let products = Arc::new(ProductRepository::new(self.pool()).list_all().await?);
        self.inner.catalog.insert((), Arc::clone(&products)).await;
        Ok(products)
    }
}

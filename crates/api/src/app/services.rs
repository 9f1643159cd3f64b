//! Service wiring: picks a store backend from configuration.

use std::sync::Arc;

use beerstock_infra::{
    AppConfig, BeerStore, InMemoryBeerStore, PostgresBeerStore, StockManager, StoreResult,
};

/// Store-agnostic stock manager shared by every handler.
pub type SharedStockManager = StockManager<Arc<dyn BeerStore>>;

pub struct AppServices {
    stock: SharedStockManager,
}

impl AppServices {
    pub fn new(store: Arc<dyn BeerStore>, adjust_retries: u32) -> Self {
        Self {
            stock: StockManager::with_retries(store, adjust_retries),
        }
    }

    /// Fresh in-memory backend; used by tests and when no database is configured.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryBeerStore::new()), AppConfig::default().adjust_retries)
    }

    pub fn stock(&self) -> &SharedStockManager {
        &self.stock
    }
}

pub async fn build_services(config: &AppConfig) -> StoreResult<AppServices> {
    let store: Arc<dyn BeerStore> = match config.database_url.as_deref() {
        Some(url) => {
            tracing::info!("using postgres beer store");
            Arc::new(PostgresBeerStore::connect(url).await?)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory beer store (data is lost on restart)");
            Arc::new(InMemoryBeerStore::new())
        }
    };

    Ok(AppServices::new(store, config.adjust_retries))
}

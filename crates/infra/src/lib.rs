//! Infrastructure layer: persistence, stock orchestration, configuration.

pub mod config;
pub mod stock_manager;
pub mod store;

pub use config::AppConfig;
pub use stock_manager::StockManager;
pub use store::{BeerStore, InMemoryBeerStore, PostgresBeerStore, StoreError, StoreResult};

//! Beer persistence abstractions.
//!
//! Production (Postgres) and test/dev (in-memory) backends implement the same
//! [`BeerStore`] capability set, so the stock manager never knows which one it
//! is talking to.

pub mod in_memory;
pub mod postgres;

use std::sync::Arc;

use thiserror::Error;

use beerstock_core::{BeerId, DomainError};
use beerstock_inventory::{Beer, NewBeer};

pub use in_memory::InMemoryBeerStore;
pub use postgres::PostgresBeerStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Unique constraint on `name` rejected an insert.
    #[error("name already taken: {0}")]
    DuplicateName(String),

    /// Anything else the backend could not do (connection, decoding, poisoning).
    #[error("store backend error: {0}")]
    Backend(String),
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateName(name) => DomainError::duplicate_name(name),
            StoreError::Backend(msg) => DomainError::store(msg),
        }
    }
}

/// Keyed beer storage: by id and by unique name.
#[async_trait::async_trait]
pub trait BeerStore: Send + Sync {
    async fn find_by_id(&self, id: BeerId) -> StoreResult<Option<Beer>>;

    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Beer>>;

    /// Every stored beer in the backend's iteration order (ascending id).
    async fn find_all(&self) -> StoreResult<Vec<Beer>>;

    /// Insert a new record and hand back the stored beer with its assigned id.
    ///
    /// Must fail with [`StoreError::DuplicateName`] if the name is taken, even
    /// when a concurrent insert won the race after the caller's own check.
    async fn save(&self, beer: NewBeer) -> StoreResult<Beer>;

    /// Remove a record. Returns `false` if there was nothing to remove.
    async fn delete_by_id(&self, id: BeerId) -> StoreResult<bool>;

    /// Atomically set `quantity` to `new` iff it is currently `expected`.
    ///
    /// Returns `None` when the record is gone or another writer changed the
    /// quantity in between.
    async fn compare_and_set_quantity(
        &self,
        id: BeerId,
        expected: i64,
        new: i64,
    ) -> StoreResult<Option<Beer>>;
}

#[async_trait::async_trait]
impl<S> BeerStore for Arc<S>
where
    S: BeerStore + ?Sized,
{
    async fn find_by_id(&self, id: BeerId) -> StoreResult<Option<Beer>> {
        (**self).find_by_id(id).await
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Beer>> {
        (**self).find_by_name(name).await
    }

    async fn find_all(&self) -> StoreResult<Vec<Beer>> {
        (**self).find_all().await
    }

    async fn save(&self, beer: NewBeer) -> StoreResult<Beer> {
        (**self).save(beer).await
    }

    async fn delete_by_id(&self, id: BeerId) -> StoreResult<bool> {
        (**self).delete_by_id(id).await
    }

    async fn compare_and_set_quantity(
        &self,
        id: BeerId,
        expected: i64,
        new: i64,
    ) -> StoreResult<Option<Beer>> {
        (**self).compare_and_set_quantity(id, expected, new).await
    }
}

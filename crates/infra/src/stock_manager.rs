//! Stock manager: existence/uniqueness checks and bounded stock adjustments
//! on top of any [`BeerStore`].

use tracing::{debug, info, warn};

use beerstock_core::{BeerId, DomainError, DomainResult};
use beerstock_inventory::{Adjustment, Beer, NewBeer};

use crate::store::BeerStore;

/// Default number of extra attempts after losing a quantity race.
pub const DEFAULT_ADJUST_RETRIES: u32 = 3;

#[derive(Debug)]
pub struct StockManager<S> {
    store: S,
    adjust_retries: u32,
}

impl<S> StockManager<S>
where
    S: BeerStore,
{
    pub fn new(store: S) -> Self {
        Self::with_retries(store, DEFAULT_ADJUST_RETRIES)
    }

    pub fn with_retries(store: S, adjust_retries: u32) -> Self {
        Self {
            store,
            adjust_retries,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register a new beer. Names are unique.
    pub async fn create(&self, candidate: NewBeer) -> DomainResult<Beer> {
        candidate.validate()?;

        if self.store.find_by_name(&candidate.name).await?.is_some() {
            warn!(name = %candidate.name, "rejected duplicate beer name");
            return Err(DomainError::duplicate_name(candidate.name));
        }

        let beer = self.store.save(candidate).await?;
        info!(id = %beer.id, name = %beer.name, quantity = beer.quantity, max = beer.max, "beer registered");
        Ok(beer)
    }

    pub async fn find_by_name(&self, name: &str) -> DomainResult<Beer> {
        debug!(name, "looking up beer by name");
        self.store
            .find_by_name(name)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("name {name}")))
    }

    pub async fn find_by_id(&self, id: BeerId) -> DomainResult<Beer> {
        debug!(%id, "looking up beer by id");
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("id {id}")))
    }

    pub async fn list_all(&self) -> DomainResult<Vec<Beer>> {
        Ok(self.store.find_all().await?)
    }

    pub async fn delete_by_id(&self, id: BeerId) -> DomainResult<()> {
        self.find_by_id(id).await?;

        if !self.store.delete_by_id(id).await? {
            // Deleted by someone else between the lookup and our delete.
            return Err(DomainError::not_found(format!("id {id}")));
        }

        info!(%id, "beer deleted");
        Ok(())
    }

    pub async fn increment(&self, id: BeerId, amount: i64) -> DomainResult<Beer> {
        self.adjust(id, Adjustment::Increment(amount)).await
    }

    pub async fn decrement(&self, id: BeerId, amount: i64) -> DomainResult<Beer> {
        self.adjust(id, Adjustment::Decrement(amount)).await
    }

    /// Optimistic read-modify-write: fetch, compute, validate the bound, then
    /// compare-and-set. A lost race re-reads and re-validates.
    async fn adjust(&self, id: BeerId, adjustment: Adjustment) -> DomainResult<Beer> {
        for attempt in 0..=self.adjust_retries {
            let current = self.find_by_id(id).await?;

            let updated = current.adjusted(adjustment).inspect_err(|e| {
                warn!(%id, ?adjustment, error = %e, "stock adjustment rejected");
            })?;

            if let Some(stored) = self
                .store
                .compare_and_set_quantity(id, current.quantity, updated.quantity)
                .await?
            {
                info!(%id, ?adjustment, from = current.quantity, to = stored.quantity, "stock adjusted");
                return Ok(stored);
            }

            debug!(%id, attempt, "quantity changed concurrently; retrying");
        }

        warn!(%id, retries = self.adjust_retries, "giving up on contended stock adjustment");
        Err(DomainError::conflict(format!(
            "beer {id} was modified concurrently; retry the request"
        )))
    }
}

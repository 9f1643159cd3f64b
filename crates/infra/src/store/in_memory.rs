use std::collections::BTreeMap;
use std::sync::RwLock;

use beerstock_core::{BeerId, Entity};
use beerstock_inventory::{Beer, NewBeer};

use super::{BeerStore, StoreError, StoreResult};

#[derive(Debug, Default)]
struct Rows {
    last_id: i64,
    by_id: BTreeMap<BeerId, Beer>,
}

/// In-memory beer store for tests/dev.
///
/// Ids are handed out sequentially starting at 1 and never reused. Iteration
/// order is ascending id.
#[derive(Debug, Default)]
pub struct InMemoryBeerStore {
    inner: RwLock<Rows>,
}

impl InMemoryBeerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("in-memory store lock poisoned".to_string())
}

#[async_trait::async_trait]
impl BeerStore for InMemoryBeerStore {
    async fn find_by_id(&self, id: BeerId) -> StoreResult<Option<Beer>> {
        let rows = self.inner.read().map_err(|_| poisoned())?;
        Ok(rows.by_id.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Beer>> {
        let rows = self.inner.read().map_err(|_| poisoned())?;
        Ok(rows.by_id.values().find(|b| b.name == name).cloned())
    }

    async fn find_all(&self) -> StoreResult<Vec<Beer>> {
        let rows = self.inner.read().map_err(|_| poisoned())?;
        Ok(rows.by_id.values().cloned().collect())
    }

    async fn save(&self, beer: NewBeer) -> StoreResult<Beer> {
        let mut rows = self.inner.write().map_err(|_| poisoned())?;

        if rows.by_id.values().any(|b| b.name == beer.name) {
            return Err(StoreError::DuplicateName(beer.name));
        }

        rows.last_id += 1;
        let stored = beer.into_beer(BeerId::new(rows.last_id));
        rows.by_id.insert(stored.id(), stored.clone());
        Ok(stored)
    }

    async fn delete_by_id(&self, id: BeerId) -> StoreResult<bool> {
        let mut rows = self.inner.write().map_err(|_| poisoned())?;
        Ok(rows.by_id.remove(&id).is_some())
    }

    async fn compare_and_set_quantity(
        &self,
        id: BeerId,
        expected: i64,
        new: i64,
    ) -> StoreResult<Option<Beer>> {
        let mut rows = self.inner.write().map_err(|_| poisoned())?;
        match rows.by_id.get_mut(&id) {
            Some(beer) if beer.quantity == expected => {
                beer.quantity = new;
                Ok(Some(beer.clone()))
            }
            _ => Ok(None),
        }
    }
}

//! Postgres-backed beer store.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `DuplicateName` (insert only) |
//! | Database (check constraint violation) | `23514` | `Backend` |
//! | Anything else | N/A | `Backend` |
//!
//! ## Atomic adjustments
//!
//! `compare_and_set_quantity` is a single conditional `UPDATE … WHERE quantity
//! = $expected`, so two writers adjusting the same row can never both commit
//! against the same starting value.

use std::sync::Arc;

use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::instrument;

use beerstock_core::BeerId;
use beerstock_inventory::{Beer, BeerType, NewBeer};

use super::{BeerStore, StoreError, StoreResult};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS beers (
    id           BIGSERIAL PRIMARY KEY,
    name         VARCHAR(200) NOT NULL UNIQUE,
    brand        VARCHAR(200) NOT NULL,
    category     TEXT,
    max_quantity BIGINT NOT NULL CHECK (max_quantity > 0),
    quantity     BIGINT NOT NULL,
    beer_type    TEXT NOT NULL,
    CHECK (quantity >= 0 AND quantity <= max_quantity)
)
"#;

const COLUMNS: &str = "id, name, brand, category, max_quantity, quantity, beer_type";

/// Postgres-backed beer store.
///
/// `Send + Sync`; all access goes through the SQLx connection pool.
#[derive(Debug, Clone)]
pub struct PostgresBeerStore {
    pool: Arc<PgPool>,
}

impl PostgresBeerStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Open a pool against `database_url` and make sure the schema exists.
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Idempotent schema creation.
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::query(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("migrate", e))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl BeerStore for PostgresBeerStore {
    #[instrument(skip(self), err)]
    async fn find_by_id(&self, id: BeerId) -> StoreResult<Option<Beer>> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM beers WHERE id = $1"))
            .bind(id.get())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_id", e))?;

        row.as_ref().map(beer_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Beer>> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM beers WHERE name = $1"))
            .bind(name)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_name", e))?;

        row.as_ref().map(beer_from_row).transpose()
    }

    #[instrument(skip(self), err)]
    async fn find_all(&self) -> StoreResult<Vec<Beer>> {
        let rows = sqlx::query(&format!("SELECT {COLUMNS} FROM beers ORDER BY id ASC"))
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_all", e))?;

        rows.iter().map(beer_from_row).collect()
    }

    #[instrument(skip(self, beer), fields(name = %beer.name), err)]
    async fn save(&self, beer: NewBeer) -> StoreResult<Beer> {
        let row = sqlx::query(
            r#"
            INSERT INTO beers (name, brand, category, max_quantity, quantity, beer_type)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&beer.name)
        .bind(&beer.brand)
        .bind(beer.category.as_deref())
        .bind(beer.max)
        .bind(beer.quantity)
        .bind(beer.beer_type.as_str())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::DuplicateName(beer.name.clone())
            } else {
                map_sqlx_error("save", e)
            }
        })?;

        let id: i64 = row
            .try_get("id")
            .map_err(|e| map_sqlx_error("save", e))?;
        Ok(beer.into_beer(BeerId::new(id)))
    }

    #[instrument(skip(self), err)]
    async fn delete_by_id(&self, id: BeerId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM beers WHERE id = $1")
            .bind(id.get())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_by_id", e))?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), err)]
    async fn compare_and_set_quantity(
        &self,
        id: BeerId,
        expected: i64,
        new: i64,
    ) -> StoreResult<Option<Beer>> {
        let row = sqlx::query(&format!(
            "UPDATE beers SET quantity = $3 WHERE id = $1 AND quantity = $2 RETURNING {COLUMNS}"
        ))
        .bind(id.get())
        .bind(expected)
        .bind(new)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("compare_and_set_quantity", e))?;

        row.as_ref().map(beer_from_row).transpose()
    }
}

fn beer_from_row(row: &PgRow) -> StoreResult<Beer> {
    let decode = |e: sqlx::Error| StoreError::Backend(format!("failed to decode beer row: {e}"));

    let beer_type: String = row.try_get("beer_type").map_err(decode)?;
    let beer_type: BeerType = beer_type
        .parse()
        .map_err(|e| StoreError::Backend(format!("failed to decode beer row: {e}")))?;

    Ok(Beer {
        id: BeerId::new(row.try_get("id").map_err(decode)?),
        name: row.try_get("name").map_err(decode)?,
        brand: row.try_get("brand").map_err(decode)?,
        category: row.try_get("category").map_err(decode)?,
        max: row.try_get("max_quantity").map_err(decode)?,
        quantity: row.try_get("quantity").map_err(decode)?,
        beer_type,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("23505"),
        _ => false,
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => StoreError::Backend(format!(
            "database error in {}: {}",
            operation,
            db_err.message()
        )),
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {}", operation))
        }
        _ => StoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}

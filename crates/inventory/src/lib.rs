//! Beer stock domain module.
//!
//! Business rules for the beer inventory, implemented purely as deterministic
//! domain logic (no IO, no HTTP, no storage).

pub mod beer;

pub use beer::{
    Adjustment, Beer, BeerType, NewBeer, MAX_CAPACITY, MAX_INITIAL_QUANTITY, MAX_TEXT_LEN,
};

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use beerstock_core::{BeerId, DomainError, DomainResult, Entity};

/// Longest accepted `name` / `brand`, in characters.
pub const MAX_TEXT_LEN: usize = 200;

/// Largest accepted stock capacity (`max`).
pub const MAX_CAPACITY: i64 = 500;

/// Largest quantity accepted when a beer is first registered.
pub const MAX_INITIAL_QUANTITY: i64 = 100;

/// Style of beer. Informational only; no rule depends on it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BeerType {
    Lager,
    Malzbier,
    Witbier,
    Weiss,
    Ale,
    Ipa,
    Stout,
}

impl BeerType {
    pub const ALL: [BeerType; 7] = [
        BeerType::Lager,
        BeerType::Malzbier,
        BeerType::Witbier,
        BeerType::Weiss,
        BeerType::Ale,
        BeerType::Ipa,
        BeerType::Stout,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BeerType::Lager => "LAGER",
            BeerType::Malzbier => "MALZBIER",
            BeerType::Witbier => "WITBIER",
            BeerType::Weiss => "WEISS",
            BeerType::Ale => "ALE",
            BeerType::Ipa => "IPA",
            BeerType::Stout => "STOUT",
        }
    }
}

impl core::fmt::Display for BeerType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BeerType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BeerType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DomainError::validation(format!("unknown beer type: {s}")))
    }
}

/// A beer as stored: identity plus stock level.
///
/// Invariant: `0 <= quantity <= max` for every stored record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Beer {
    pub id: BeerId,
    pub name: String,
    pub brand: String,
    pub category: Option<String>,
    pub max: i64,
    pub quantity: i64,
    pub beer_type: BeerType,
}

impl Entity for Beer {
    type Id = BeerId;

    fn id(&self) -> BeerId {
        self.id
    }
}

/// Candidate for registration: a beer without a store-assigned id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBeer {
    pub name: String,
    pub brand: String,
    pub category: Option<String>,
    pub max: i64,
    pub quantity: i64,
    pub beer_type: BeerType,
}

impl NewBeer {
    /// Check field limits and the stock invariant before anything is persisted.
    pub fn validate(&self) -> DomainResult<()> {
        ensure_text("name", &self.name)?;
        ensure_text("brand", &self.brand)?;

        if !(1..=MAX_CAPACITY).contains(&self.max) {
            return Err(DomainError::validation(format!(
                "max must be between 1 and {MAX_CAPACITY}"
            )));
        }
        if !(0..=MAX_INITIAL_QUANTITY).contains(&self.quantity) {
            return Err(DomainError::validation(format!(
                "quantity must be between 0 and {MAX_INITIAL_QUANTITY}"
            )));
        }
        if self.quantity > self.max {
            return Err(DomainError::validation("quantity cannot exceed max"));
        }
        Ok(())
    }

    /// Attach the id handed out by the store.
    pub fn into_beer(self, id: BeerId) -> Beer {
        Beer {
            id,
            name: self.name,
            brand: self.brand,
            category: self.category,
            max: self.max,
            quantity: self.quantity,
            beer_type: self.beer_type,
        }
    }
}

fn ensure_text(field: &str, value: &str) -> DomainResult<()> {
    let len = value.trim().chars().count();
    if len == 0 {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    if len > MAX_TEXT_LEN {
        return Err(DomainError::validation(format!(
            "{field} cannot be longer than {MAX_TEXT_LEN} characters"
        )));
    }
    Ok(())
}

/// A requested change to a beer's stock level.
///
/// Increment amounts are used as given. Decrement amounts are normalized to
/// their absolute value, so `Decrement(-5)` and `Decrement(5)` both remove 5.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Adjustment {
    Increment(i64),
    Decrement(i64),
}

impl Adjustment {
    pub fn requested(self) -> i64 {
        match self {
            Adjustment::Increment(a) | Adjustment::Decrement(a) => a,
        }
    }

    /// Prospective quantity, or `None` on arithmetic overflow.
    fn apply_to(self, current: i64) -> Option<i64> {
        match self {
            Adjustment::Increment(a) => current.checked_add(a),
            Adjustment::Decrement(a) => a.checked_abs().and_then(|a| current.checked_sub(a)),
        }
    }
}

impl Beer {
    /// Bounded adjustment: compute the new quantity and reject it outright if
    /// it leaves `[0, max]`. Never clamps; `self` is left untouched.
    pub fn adjusted(&self, adjustment: Adjustment) -> DomainResult<Beer> {
        let exceeded = |attempted: i64| DomainError::CapacityExceeded {
            id: self.id.get(),
            requested: adjustment.requested(),
            attempted,
            max: self.max,
        };

        let attempted = match adjustment.apply_to(self.quantity) {
            Some(q) => q,
            None => {
                let saturated = match adjustment {
                    Adjustment::Increment(a) if a >= 0 => i64::MAX,
                    _ => i64::MIN,
                };
                return Err(exceeded(saturated));
            }
        };

        if !(0..=self.max).contains(&attempted) {
            return Err(exceeded(attempted));
        }

        Ok(Beer {
            quantity: attempted,
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_beer(quantity: i64, max: i64) -> Beer {
        Beer {
            id: BeerId::new(1),
            name: "Brahma".to_string(),
            brand: "Ambev".to_string(),
            category: None,
            max,
            quantity,
            beer_type: BeerType::Lager,
        }
    }

    fn test_new_beer() -> NewBeer {
        NewBeer {
            name: "Brahma".to_string(),
            brand: "Ambev".to_string(),
            category: Some("pilsen".to_string()),
            max: 50,
            quantity: 10,
            beer_type: BeerType::Lager,
        }
    }

    #[test]
    fn increment_up_to_max_is_accepted() {
        let beer = test_beer(10, 50);
        let updated = beer.adjusted(Adjustment::Increment(40)).unwrap();
        assert_eq!(updated.quantity, 50);
        assert_eq!(beer.quantity, 10);
    }

    #[test]
    fn increment_past_max_is_rejected() {
        let beer = test_beer(10, 50);
        let err = beer.adjusted(Adjustment::Increment(45)).unwrap_err();
        assert_eq!(
            err,
            DomainError::CapacityExceeded {
                id: 1,
                requested: 45,
                attempted: 55,
                max: 50,
            }
        );
    }

    #[test]
    fn decrement_to_zero_is_accepted() {
        let beer = test_beer(10, 50);
        let updated = beer.adjusted(Adjustment::Decrement(10)).unwrap();
        assert_eq!(updated.quantity, 0);
    }

    #[test]
    fn decrement_below_zero_is_rejected() {
        let beer = test_beer(10, 50);
        let err = beer.adjusted(Adjustment::Decrement(20)).unwrap_err();
        match err {
            DomainError::CapacityExceeded { attempted, .. } => assert_eq!(attempted, -10),
            _ => panic!("Expected CapacityExceeded for negative stock"),
        }
    }

    #[test]
    fn decrement_uses_absolute_amount() {
        let beer = test_beer(10, 50);
        let updated = beer.adjusted(Adjustment::Decrement(-4)).unwrap();
        assert_eq!(updated.quantity, 6);
    }

    #[test]
    fn negative_increment_cannot_break_the_floor() {
        let beer = test_beer(3, 50);
        let err = beer.adjusted(Adjustment::Increment(-5)).unwrap_err();
        assert!(matches!(err, DomainError::CapacityExceeded { .. }));
    }

    #[test]
    fn overflowing_increment_is_rejected() {
        let beer = test_beer(10, 50);
        let err = beer.adjusted(Adjustment::Increment(i64::MAX)).unwrap_err();
        match err {
            DomainError::CapacityExceeded { attempted, .. } => assert_eq!(attempted, i64::MAX),
            _ => panic!("Expected CapacityExceeded on overflow"),
        }
        assert!(beer.adjusted(Adjustment::Decrement(i64::MIN)).is_err());
    }

    #[test]
    fn valid_new_beer_passes_validation() {
        assert!(test_new_beer().validate().is_ok());
    }

    #[test]
    fn new_beer_rejects_blank_name() {
        let candidate = NewBeer {
            name: "   ".to_string(),
            ..test_new_beer()
        };
        match candidate.validate().unwrap_err() {
            DomainError::Validation(msg) => assert!(msg.contains("name")),
            _ => panic!("Expected Validation error for empty name"),
        }
    }

    #[test]
    fn new_beer_rejects_overlong_brand() {
        let candidate = NewBeer {
            brand: "x".repeat(MAX_TEXT_LEN + 1),
            ..test_new_beer()
        };
        assert!(matches!(candidate.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn new_beer_rejects_quantity_above_max() {
        let candidate = NewBeer {
            max: 5,
            quantity: 6,
            ..test_new_beer()
        };
        assert!(matches!(candidate.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn new_beer_rejects_non_positive_max() {
        let candidate = NewBeer {
            max: 0,
            quantity: 0,
            ..test_new_beer()
        };
        assert!(matches!(candidate.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn beer_type_parses_case_insensitively() {
        assert_eq!("ipa".parse::<BeerType>().unwrap(), BeerType::Ipa);
        assert_eq!("STOUT".parse::<BeerType>().unwrap(), BeerType::Stout);
        assert!("pilsner".parse::<BeerType>().is_err());
    }

    #[test]
    fn beer_type_serializes_as_upper_case_name() {
        for t in BeerType::ALL {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
        }
    }

    #[test]
    fn into_beer_keeps_all_fields() {
        let candidate = test_new_beer();
        let beer = candidate.clone().into_beer(BeerId::new(9));
        assert_eq!(beer.id(), BeerId::new(9));
        assert_eq!(beer.name, candidate.name);
        assert_eq!(beer.category, candidate.category);
        assert_eq!(beer.beer_type, candidate.beer_type);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 512,
                ..ProptestConfig::default()
            })]

            /// Property: increment fails iff current + a > max.
            #[test]
            fn increment_fails_iff_above_max(
                (max, quantity) in (1i64..=500).prop_flat_map(|m| (Just(m), 0..=m)),
                amount in 0i64..1_000
            ) {
                let beer = test_beer(quantity, max);
                let result = beer.adjusted(Adjustment::Increment(amount));
                prop_assert_eq!(result.is_err(), quantity + amount > max);
            }

            /// Property: decrement fails iff current - |a| < 0.
            #[test]
            fn decrement_fails_iff_below_zero(
                (max, quantity) in (1i64..=500).prop_flat_map(|m| (Just(m), 0..=m)),
                amount in -1_000i64..1_000
            ) {
                let beer = test_beer(quantity, max);
                let result = beer.adjusted(Adjustment::Decrement(amount));
                prop_assert_eq!(result.is_err(), quantity - amount.abs() < 0);
            }

            /// Property: increment then decrement by the same amount is the identity
            /// when no bound is crossed.
            #[test]
            fn increment_and_decrement_are_inverse(
                (max, quantity, amount) in (1i64..=500)
                    .prop_flat_map(|m| (Just(m), 0..=m))
                    .prop_flat_map(|(m, q)| (Just(m), Just(q), 0..=(m - q)))
            ) {
                let beer = test_beer(quantity, max);
                let up = beer.adjusted(Adjustment::Increment(amount)).unwrap();
                let down = up.adjusted(Adjustment::Decrement(amount)).unwrap();
                prop_assert_eq!(down, beer);
            }

            /// Property: every accepted adjustment keeps 0 <= quantity <= max.
            #[test]
            fn accepted_adjustments_preserve_bounds(
                (max, quantity) in (1i64..=500).prop_flat_map(|m| (Just(m), 0..=m)),
                amount in -1_000i64..1_000,
                increment in any::<bool>()
            ) {
                let beer = test_beer(quantity, max);
                let adjustment = if increment {
                    Adjustment::Increment(amount)
                } else {
                    Adjustment::Decrement(amount)
                };
                if let Ok(updated) = beer.adjusted(adjustment) {
                    prop_assert!(updated.quantity >= 0);
                    prop_assert!(updated.quantity <= updated.max);
                }
            }
        }
    }
}

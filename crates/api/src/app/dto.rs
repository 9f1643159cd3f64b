//! Wire payloads and the translation to/from stored beers.
//!
//! Translation is pure field shuffling; every rule about what a valid beer is
//! lives in the domain crate.

use serde::{Deserialize, Serialize};

use beerstock_core::{BeerId, DomainError};
use beerstock_inventory::{Beer, BeerType, NewBeer};

/// JSON shape of a beer, both inbound (create) and outbound (every response).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeerDto {
    /// Ignored on create; always present on responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub brand: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub max: i64,
    pub quantity: i64,
    #[serde(rename = "type")]
    pub beer_type: BeerType,
}

/// Body of the increment/decrement endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityRequest {
    pub quantity: i64,
}

impl BeerDto {
    /// Creation candidate; any client-supplied `id` is dropped.
    pub fn into_new_beer(self) -> NewBeer {
        NewBeer {
            name: self.name,
            brand: self.brand,
            category: self.category,
            max: self.max,
            quantity: self.quantity,
            beer_type: self.beer_type,
        }
    }
}

impl From<Beer> for BeerDto {
    fn from(beer: Beer) -> Self {
        Self {
            id: Some(beer.id.get()),
            name: beer.name,
            brand: beer.brand,
            category: beer.category,
            max: beer.max,
            quantity: beer.quantity,
            beer_type: beer.beer_type,
        }
    }
}

impl TryFrom<BeerDto> for Beer {
    type Error = DomainError;

    fn try_from(dto: BeerDto) -> Result<Self, Self::Error> {
        let id = dto
            .id
            .ok_or_else(|| DomainError::validation("stored beer payload must carry an id"))?;
        Ok(Beer {
            id: BeerId::new(id),
            name: dto.name,
            brand: dto.brand,
            category: dto.category,
            max: dto.max,
            quantity: dto.quantity,
            beer_type: dto.beer_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_beer() -> Beer {
        Beer {
            id: BeerId::new(1),
            name: "Brahma".to_string(),
            brand: "Ambev".to_string(),
            category: Some("pilsen".to_string()),
            max: 50,
            quantity: 10,
            beer_type: BeerType::Lager,
        }
    }

    #[test]
    fn beer_survives_a_trip_through_the_wire_shape() {
        let beer = test_beer();
        let dto = BeerDto::from(beer.clone());
        let json = serde_json::to_value(&dto).unwrap();
        let back: BeerDto = serde_json::from_value(json).unwrap();
        assert_eq!(Beer::try_from(back).unwrap(), beer);
    }

    #[test]
    fn serialized_shape_uses_type_key_and_upper_case_value() {
        let json = serde_json::to_value(BeerDto::from(test_beer())).unwrap();
        assert_eq!(
            json,
            json!({
                "id": 1,
                "name": "Brahma",
                "brand": "Ambev",
                "category": "pilsen",
                "max": 50,
                "quantity": 10,
                "type": "LAGER",
            })
        );
    }

    #[test]
    fn create_payload_without_id_or_category_is_accepted() {
        let dto: BeerDto = serde_json::from_value(json!({
            "name": "Skol",
            "brand": "Ambev",
            "max": 100,
            "quantity": 20,
            "type": "IPA",
        }))
        .unwrap();
        let candidate = dto.into_new_beer();
        assert_eq!(candidate.name, "Skol");
        assert_eq!(candidate.category, None);
        assert_eq!(candidate.beer_type, BeerType::Ipa);
    }

    #[test]
    fn missing_required_field_fails_to_parse() {
        let res = serde_json::from_value::<BeerDto>(json!({
            "brand": "Ambev",
            "max": 100,
            "quantity": 20,
            "type": "IPA",
        }));
        assert!(res.is_err());
    }

    #[test]
    fn unknown_type_fails_to_parse() {
        let res = serde_json::from_value::<BeerDto>(json!({
            "name": "Skol",
            "brand": "Ambev",
            "max": 100,
            "quantity": 20,
            "type": "PILSNER",
        }));
        assert!(res.is_err());
    }

    #[test]
    fn client_supplied_id_is_ignored_on_create() {
        let mut dto = BeerDto::from(test_beer());
        dto.id = Some(999);
        let candidate = dto.into_new_beer();
        assert_eq!(candidate.into_beer(BeerId::new(3)).id, BeerId::new(3));
    }
}

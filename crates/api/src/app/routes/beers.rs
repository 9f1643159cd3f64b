use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};

use beerstock_core::BeerId;

use crate::app::dto::{BeerDto, QuantityRequest};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

type ApiResult<T> = Result<T, ApiError>;

/// Routes under `/api/v1/beers`.
///
/// `/:key` is a beer name for GET and a numeric id for DELETE/PATCH; the
/// router requires one parameter name per path position.
pub fn router() -> Router {
    Router::new()
        .route("/", get(list_beers).post(create_beer))
        .route("/id/:id", get(get_beer_by_id))
        .route("/:key", get(get_beer_by_name).delete(delete_beer))
        .route("/:key/increment", patch(increment_stock))
        .route("/:key/decrement", patch(decrement_stock))
}

fn parse_id(raw: &str) -> ApiResult<BeerId> {
    raw.parse().map_err(|_| ApiError::InvalidId(raw.to_string()))
}

pub async fn create_beer(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<BeerDto>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(body) = body?;
    let created = services.stock().create(body.into_new_beer()).await?;
    Ok((StatusCode::CREATED, Json(BeerDto::from(created))))
}

pub async fn list_beers(
    Extension(services): Extension<Arc<AppServices>>,
) -> ApiResult<Json<Vec<BeerDto>>> {
    let beers = services.stock().list_all().await?;
    Ok(Json(beers.into_iter().map(BeerDto::from).collect()))
}

pub async fn get_beer_by_name(
    Extension(services): Extension<Arc<AppServices>>,
    Path(name): Path<String>,
) -> ApiResult<Json<BeerDto>> {
    let beer = services.stock().find_by_name(&name).await?;
    Ok(Json(beer.into()))
}

pub async fn get_beer_by_id(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> ApiResult<Json<BeerDto>> {
    let beer = services.stock().find_by_id(parse_id(&id)?).await?;
    Ok(Json(beer.into()))
}

pub async fn delete_beer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    services.stock().delete_by_id(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn increment_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<QuantityRequest>, JsonRejection>,
) -> ApiResult<Json<BeerDto>> {
    let id = parse_id(&id)?;
    let Json(body) = body?;
    let beer = services.stock().increment(id, body.quantity).await?;
    Ok(Json(beer.into()))
}

pub async fn decrement_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<QuantityRequest>, JsonRejection>,
) -> ApiResult<Json<BeerDto>> {
    let id = parse_id(&id)?;
    let Json(body) = body?;
    let beer = services.stock().decrement(id, body.quantity).await?;
    Ok(Json(beer.into()))
}

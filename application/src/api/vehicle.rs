//! `Car`-related REST API definitions.

use axum::{
    extract::{Path, Query as QueryParams, State},
    Json,
};
use common::DateRange;
use serde::{Deserialize, Serialize};
use service::{command, domain, query, read, Command as _};

use crate::{api, define_error, AsError, Error, Service};

/// A car of the fleet.
#[derive(Debug, Serialize)]
pub struct Car {
    /// Unique identifier of this `Car`.
    id: domain::vehicle::Id,

    /// Name (make) of this `Car`.
    name: String,

    /// Model of this `Car`.
    model: String,

    /// Color of this `Car`.
    color: String,

    /// Year this `Car` was manufactured.
    year: u16,

    /// License plate of this `Car`.
    license_plate: String,

    /// Kind of this `Car`.
    kind: String,

    /// Price of renting this `Car` for one day.
    daily_rate: String,

    /// Price of buying this `Car` outright.
    price: String,

    /// Indicator whether this `Car` is presently claimable.
    is_available: bool,

    /// Indicator whether this `Car` is listed for sale.
    for_sale: bool,

    /// Indicator whether this `Car` is listed for rent.
    for_rent: bool,

    /// ID of the live purchase claiming this `Car`, if any.
    purchase_id: Option<domain::purchase::Id>,

    /// URL of this `Car`'s image, if any.
    image_url: Option<String>,
}

impl From<domain::Vehicle> for Car {
    fn from(v: domain::Vehicle) -> Self {
        Self {
            id: v.id,
            name: v.name.to_string(),
            model: v.model.to_string(),
            color: v.color.to_string(),
            year: v.year,
            license_plate: v.license_plate.to_string(),
            kind: v.kind.to_string(),
            daily_rate: v.daily_rate.to_string(),
            price: v.price.to_string(),
            is_available: v.is_available,
            for_sale: v.for_sale,
            for_rent: v.for_rent,
            purchase_id: v.purchase_id,
            image_url: v.image_url.map(|u| u.to_string()),
        }
    }
}

/// Request of creating a new [`Car`].
#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    /// Name (make) of the new `Car`.
    name: String,

    /// Model of the new `Car`.
    model: String,

    /// Color of the new `Car`.
    color: String,

    /// Year the new `Car` was manufactured.
    year: u16,

    /// License plate of the new `Car`.
    license_plate: String,

    /// Kind of the new `Car`.
    kind: String,

    /// Price of renting the new `Car` for one day.
    daily_rate: String,

    /// Price of buying the new `Car` outright.
    price: String,

    /// Whether the new `Car` is listed for sale.
    for_sale: bool,

    /// Whether the new `Car` is listed for rent.
    for_rent: bool,

    /// URL of the new `Car`'s image, if any.
    #[serde(default)]
    image_url: Option<String>,
}

/// Lists all the `Car`s of the fleet.
pub async fn list(
    State(service): State<Service>,
) -> Result<Json<Vec<Car>>, Error> {
    service
        .execute(query::vehicles::All::by(()))
        .await
        .map_err(AsError::into_error)
        .map(|vs| Json(vs.into_iter().map(Into::into).collect()))
}

/// Parameters of the [`available`] listing.
#[derive(Debug, Deserialize)]
pub struct AvailableParams {
    /// First day of the requested period, if any.
    #[serde(default)]
    from: Option<String>,

    /// Last day of the requested period, if any.
    #[serde(default)]
    to: Option<String>,
}

/// Lists the presently claimable `Car`s, or the ones rentable over the whole
/// provided period.
pub async fn available(
    State(service): State<Service>,
    QueryParams(params): QueryParams<AvailableParams>,
) -> Result<Json<Vec<Car>>, Error> {
    let vehicles = match (params.from, params.to) {
        (Some(from), Some(to)) => {
            let period =
                DateRange::new(api::parse(from)?, api::parse(to)?)
                    .map_err(|e| Error::invalid_input(&e))?;
            service
                .execute(query::vehicles::AvailableIn { period })
                .await
                .map_err(AsError::into_error)?
        }
        (None, None) => service
            .execute(query::vehicles::Available::by(
                read::vehicle::Available,
            ))
            .await
            .map_err(AsError::into_error)?,
        (Some(_), None) | (None, Some(_)) => {
            return Err(Error::invalid_input(
                &"both `from` and `to` must be provided",
            ));
        }
    };
    Ok(Json(vehicles.into_iter().map(Into::into).collect()))
}

/// Lists the `Car`s listed for sale.
pub async fn for_sale(
    State(service): State<Service>,
) -> Result<Json<Vec<Car>>, Error> {
    service
        .execute(query::vehicles::ForSale::by(read::vehicle::ForSale))
        .await
        .map_err(AsError::into_error)
        .map(|vs| Json(vs.into_iter().map(Into::into).collect()))
}

/// Lists the presently claimable `Car`s listed for rent.
pub async fn for_rent(
    State(service): State<Service>,
) -> Result<Json<Vec<Car>>, Error> {
    service
        .execute(query::vehicles::AvailableForRent::by(
            read::vehicle::AvailableForRent,
        ))
        .await
        .map_err(AsError::into_error)
        .map(|vs| Json(vs.into_iter().map(Into::into).collect()))
}

/// Returns the `Car` with the provided ID.
pub async fn by_id(
    State(service): State<Service>,
    Path(id): Path<domain::vehicle::Id>,
) -> Result<Json<Car>, Error> {
    service
        .execute(query::vehicle::ById::by(id))
        .await
        .map_err(AsError::into_error)?
        .ok_or_else(|| NotFoundError::CarNotExists.into())
        .map(|v| Json(v.into()))
}

/// Creates a new `Car` listing.
pub async fn create(
    State(service): State<Service>,
    Json(req): Json<CreateRequest>,
) -> Result<(http::StatusCode, Json<Car>), Error> {
    let vehicle = service
        .execute(command::CreateVehicle {
            name: api::parse(req.name)?,
            model: api::parse(req.model)?,
            color: api::parse(req.color)?,
            year: req.year,
            license_plate: api::parse(req.license_plate)?,
            kind: api::parse(req.kind)?,
            daily_rate: api::parse(req.daily_rate)?,
            price: api::parse(req.price)?,
            for_sale: req.for_sale,
            for_rent: req.for_rent,
            image_url: req.image_url.map(api::parse).transpose()?,
        })
        .await
        .map_err(AsError::into_error)?;
    Ok((http::StatusCode::CREATED, Json(vehicle.into())))
}

/// Request of editing an existing [`Car`].
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateRequest {
    /// New name (make), if changed.
    name: Option<String>,

    /// New model, if changed.
    model: Option<String>,

    /// New color, if changed.
    color: Option<String>,

    /// New manufacture year, if changed.
    year: Option<u16>,

    /// New license plate, if changed.
    license_plate: Option<String>,

    /// New kind, if changed.
    kind: Option<String>,

    /// New daily rental rate, if changed.
    daily_rate: Option<String>,

    /// New sale price, if changed.
    price: Option<String>,

    /// New for-sale listing flag, if changed.
    for_sale: Option<bool>,

    /// New for-rent listing flag, if changed.
    for_rent: Option<bool>,

    /// New image URL, if changed.
    image_url: Option<String>,
}

/// Edits the `Car` with the provided ID.
pub async fn update(
    State(service): State<Service>,
    Path(id): Path<domain::vehicle::Id>,
    Json(req): Json<UpdateRequest>,
) -> Result<Json<Car>, Error> {
    service
        .execute(command::UpdateVehicle {
            vehicle_id: id,
            name: req.name.map(api::parse).transpose()?,
            model: req.model.map(api::parse).transpose()?,
            color: req.color.map(api::parse).transpose()?,
            year: req.year,
            license_plate: req.license_plate.map(api::parse).transpose()?,
            kind: req.kind.map(api::parse).transpose()?,
            daily_rate: req.daily_rate.map(api::parse).transpose()?,
            price: req.price.map(api::parse).transpose()?,
            for_sale: req.for_sale,
            for_rent: req.for_rent,
            image_url: req.image_url.map(api::parse).transpose()?,
        })
        .await
        .map_err(AsError::into_error)
        .map(|v| Json(v.into()))
}

/// Removes the `Car` with the provided ID along with its rentals and
/// purchase.
pub async fn remove(
    State(service): State<Service>,
    Path(id): Path<domain::vehicle::Id>,
) -> Result<http::StatusCode, Error> {
    service
        .execute(command::DeleteVehicle { vehicle_id: id })
        .await
        .map_err(AsError::into_error)
        .map(|()| http::StatusCode::NO_CONTENT)
}

define_error! {
    enum NotFoundError {
        #[code = "CAR_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Car` with the provided ID does not exist"]
        CarNotExists,
    }
}

impl AsError for command::create_vehicle::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::update_vehicle::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::VehicleNotExists(_) => {
                Some(NotFoundError::CarNotExists.into())
            }
        }
    }
}

impl AsError for command::delete_vehicle::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::VehicleNotExists(_) => {
                Some(NotFoundError::CarNotExists.into())
            }
        }
    }
}

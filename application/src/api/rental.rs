//! `Rental`-related REST API definitions.

use axum::{
    extract::{Path, Query as QueryParams, State},
    Json,
};
use common::DateRange;
use serde::{Deserialize, Serialize};
use service::{command, domain, query, read, Command as _};

use crate::{api, define_error, AsError, Error, Service};

/// A reservation of a car over a period.
#[derive(Debug, Serialize)]
pub struct Rental {
    /// Unique identifier of this `Rental`.
    id: domain::rental::Id,

    /// ID of the car this `Rental` reserves.
    car_id: domain::vehicle::Id,

    /// Name of the customer this `Rental` belongs to.
    customer_name: String,

    /// Email of the customer this `Rental` belongs to.
    customer_email: String,

    /// Phone of the customer this `Rental` belongs to.
    customer_phone: String,

    /// First reserved day.
    start_date: String,

    /// Last reserved day, inclusive.
    end_date: String,

    /// Total price over the whole period.
    total_price: String,

    /// Status of this `Rental`.
    status: String,
}

impl From<domain::Rental> for Rental {
    fn from(r: domain::Rental) -> Self {
        Self {
            id: r.id,
            car_id: r.vehicle_id,
            customer_name: r.customer.name.to_string(),
            customer_email: r.customer.email.to_string(),
            customer_phone: r.customer.phone.to_string(),
            start_date: r.period.start().to_string(),
            end_date: r.period.end().to_string(),
            total_price: r.total_price.to_string(),
            status: r.status.to_string(),
        }
    }
}

/// Request of creating a new [`Rental`].
#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    /// ID of the car to reserve.
    car_id: domain::vehicle::Id,

    /// Name of the customer.
    customer_name: String,

    /// Email of the customer.
    customer_email: String,

    /// Phone of the customer.
    customer_phone: String,

    /// First day to reserve.
    start_date: String,

    /// Last day to reserve, inclusive.
    end_date: String,
}

/// Parameters of the [`list`] filtering.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListParams {
    /// Customer email to filter by.
    email: Option<String>,

    /// Car ID to filter by.
    car_id: Option<domain::vehicle::Id>,

    /// Indicator whether only active `Rental`s should be returned.
    active: Option<bool>,
}

/// Lists `Rental`s, optionally filtered by customer email, car, or activity.
pub async fn list(
    State(service): State<Service>,
    QueryParams(params): QueryParams<ListParams>,
) -> Result<Json<Vec<Rental>>, Error> {
    let rentals = if let Some(email) = params.email {
        service
            .execute(query::rentals::ByCustomerEmail::by(api::parse(email)?))
            .await
            .map_err(AsError::into_error)?
    } else if let Some(car_id) = params.car_id {
        service
            .execute(query::rentals::ForVehicle::by(car_id))
            .await
            .map_err(AsError::into_error)?
    } else if params.active.unwrap_or_default() {
        let read::rental::Active(rentals) = service
            .execute(query::rentals::Active::by(()))
            .await
            .map_err(AsError::into_error)?;
        rentals
    } else {
        service
            .execute(query::rentals::All::by(()))
            .await
            .map_err(AsError::into_error)?
    };
    Ok(Json(rentals.into_iter().map(Into::into).collect()))
}

/// Returns the `Rental` with the provided ID.
pub async fn by_id(
    State(service): State<Service>,
    Path(id): Path<domain::rental::Id>,
) -> Result<Json<Rental>, Error> {
    service
        .execute(query::rental::ById::by(id))
        .await
        .map_err(AsError::into_error)?
        .ok_or_else(|| NotFoundError::RentalNotExists.into())
        .map(|r| Json(r.into()))
}

/// Creates a new `Rental` reservation.
pub async fn create(
    State(service): State<Service>,
    Json(req): Json<CreateRequest>,
) -> Result<(http::StatusCode, Json<Rental>), Error> {
    let period = DateRange::new(
        api::parse(req.start_date)?,
        api::parse(req.end_date)?,
    )
    .map_err(|e| Error::invalid_input(&e))?;

    let rental = service
        .execute(command::CreateRental {
            vehicle_id: req.car_id,
            customer: domain::Customer {
                name: api::parse(req.customer_name)?,
                email: api::parse(req.customer_email)?,
                phone: api::parse(req.customer_phone)?,
            },
            period,
        })
        .await
        .map_err(AsError::into_error)?;
    Ok((http::StatusCode::CREATED, Json(rental.into())))
}

/// Request of moving a [`Rental`] to another status.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    /// Status to move the `Rental` to.
    status: String,
}

/// Moves the `Rental` with the provided ID to the requested status.
///
/// The legacy decision statuses are accepted as aliases: `APPROVED` means
/// `CONFIRMED` and `REJECTED` means `CANCELLED`, case-insensitively.
pub async fn transition(
    State(service): State<Service>,
    Path(id): Path<domain::rental::Id>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<Rental>, Error> {
    let status = api::parse(normalize(&req.status))?;

    service
        .execute(command::TransitionRental {
            rental_id: id,
            status,
        })
        .await
        .map_err(AsError::into_error)
        .map(|r| Json(r.into()))
}

/// Removes the `Rental` with the provided ID without notifying anyone.
pub async fn remove(
    State(service): State<Service>,
    Path(id): Path<domain::rental::Id>,
) -> Result<http::StatusCode, Error> {
    service
        .execute(command::DeleteRental { rental_id: id })
        .await
        .map_err(AsError::into_error)
        .map(|()| http::StatusCode::NO_CONTENT)
}

/// Parameters of the [`quote`] and [`overlapping`] lookups.
#[derive(Debug, Deserialize)]
pub struct PeriodParams {
    /// ID of the car in question.
    car_id: domain::vehicle::Id,

    /// First day of the period.
    from: String,

    /// Last day of the period, inclusive.
    to: String,
}

impl PeriodParams {
    /// Parses these [`PeriodParams`] into a [`DateRange`].
    fn period(&self) -> Result<DateRange, Error> {
        DateRange::new(api::parse(&self.from)?, api::parse(&self.to)?)
            .map_err(|e| Error::invalid_input(&e))
    }
}

/// Response of the [`quote`] lookup.
#[derive(Debug, Serialize)]
pub struct Quote {
    /// Total price over the whole period.
    total_price: String,
}

/// Prices a prospective `Rental` without reserving anything.
pub async fn quote(
    State(service): State<Service>,
    QueryParams(params): QueryParams<PeriodParams>,
) -> Result<Json<Quote>, Error> {
    let period = params.period()?;

    service
        .execute(query::quote::RentalQuote {
            vehicle_id: params.car_id,
            period,
        })
        .await
        .map_err(AsError::into_error)
        .map(|total| {
            Json(Quote {
                total_price: total.to_string(),
            })
        })
}

/// Lists the `Rental`s of a car occupying days of the provided period.
pub async fn overlapping(
    State(service): State<Service>,
    QueryParams(params): QueryParams<PeriodParams>,
) -> Result<Json<Vec<Rental>>, Error> {
    let period = params.period()?;

    service
        .execute(query::rentals::Overlapping {
            vehicle_id: params.car_id,
            period,
        })
        .await
        .map_err(AsError::into_error)
        .map(|rs| Json(rs.into_iter().map(Into::into).collect()))
}

/// Maps the legacy decision statuses onto the lifecycle ones.
fn normalize(status: &str) -> String {
    let status = status.to_uppercase();
    match status.as_str() {
        "APPROVED" => "CONFIRMED".to_owned(),
        "REJECTED" => "CANCELLED".to_owned(),
        _ => status,
    }
}

define_error! {
    enum NotFoundError {
        #[code = "RENTAL_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Rental` with the provided ID does not exist"]
        RentalNotExists,
    }
}

impl AsError for command::create_rental::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "PERIOD_CONFLICT"]
                #[status = CONFLICT]
                #[message = "Requested period overlaps an existing `Rental`"]
                PeriodConflict,

                #[code = "CAR_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Car` with the provided ID does not exist"]
                CarNotExists,

                #[code = "CAR_NOT_FOR_RENT"]
                #[status = CONFLICT]
                #[message = "`Car` with the provided ID is not listed for \
                             rent"]
                CarNotForRent,

                #[code = "CAR_UNAVAILABLE"]
                #[status = CONFLICT]
                #[message = "`Car` with the provided ID is not currently \
                             available"]
                CarUnavailable,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::PeriodConflict(_) => Error::PeriodConflict.into(),
            Self::VehicleNotExists(_) => Error::CarNotExists.into(),
            Self::VehicleNotForRent(_) => Error::CarNotForRent.into(),
            Self::VehicleUnavailable(_) => Error::CarUnavailable.into(),
        })
    }
}

impl AsError for command::transition_rental::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "INVALID_TRANSITION"]
                #[status = CONFLICT]
                #[message = "`Rental` cannot be moved to the requested \
                             status"]
                InvalidTransition,

                #[code = "CAR_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Car` with the provided ID does not exist"]
                CarNotExists,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::InvalidTransition { .. } => Error::InvalidTransition.into(),
            Self::RentalNotExists(_) => NotFoundError::RentalNotExists.into(),
            Self::VehicleNotExists(_) => Error::CarNotExists.into(),
        })
    }
}

impl AsError for command::delete_rental::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "CAR_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Car` with the provided ID does not exist"]
                CarNotExists,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::RentalNotExists(_) => NotFoundError::RentalNotExists.into(),
            Self::VehicleNotExists(_) => Error::CarNotExists.into(),
        })
    }
}

impl AsError for query::quote::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "CAR_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Car` with the provided ID does not exist"]
                CarNotExists,

                #[code = "CAR_NOT_FOR_RENT"]
                #[status = CONFLICT]
                #[message = "`Car` with the provided ID is not listed for \
                             rent"]
                CarNotForRent,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::VehicleNotExists(_) => Error::CarNotExists.into(),
            Self::VehicleNotForRent(_) => Error::CarNotForRent.into(),
        })
    }
}

//! `Purchase`-related REST API definitions.

use axum::{
    extract::{Path, Query as QueryParams, State},
    Json,
};
use serde::{Deserialize, Serialize};
use service::{command, domain, query, Command as _};

use crate::{api, define_error, AsError, Error, Service};

/// An outright purchase of a car.
#[derive(Debug, Serialize)]
pub struct Purchase {
    /// Unique identifier of this `Purchase`.
    id: domain::purchase::Id,

    /// ID of the car being purchased.
    car_id: domain::vehicle::Id,

    /// Name of the customer this `Purchase` belongs to.
    customer_name: String,

    /// Email of the customer this `Purchase` belongs to.
    customer_email: String,

    /// Phone of the customer this `Purchase` belongs to.
    customer_phone: String,

    /// Postal address the customer provided.
    address: String,

    /// Price the car is being purchased for.
    price: String,

    /// Day this `Purchase` was placed on.
    purchased_on: String,

    /// Payment method of this `Purchase`.
    payment_method: String,

    /// Status of this `Purchase`.
    status: String,
}

impl From<domain::Purchase> for Purchase {
    fn from(p: domain::Purchase) -> Self {
        Self {
            id: p.id,
            car_id: p.vehicle_id,
            customer_name: p.customer.name.to_string(),
            customer_email: p.customer.email.to_string(),
            customer_phone: p.customer.phone.to_string(),
            address: p.address.to_string(),
            price: p.price.to_string(),
            purchased_on: p.purchased_on.to_string(),
            payment_method: p.payment_method.to_string(),
            status: p.status.to_string(),
        }
    }
}

/// Request of creating a new [`Purchase`].
#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    /// ID of the car to purchase.
    car_id: domain::vehicle::Id,

    /// Name of the customer.
    customer_name: String,

    /// Email of the customer.
    customer_email: String,

    /// Phone of the customer.
    customer_phone: String,

    /// Postal address of the customer.
    address: String,

    /// Payment method of the new `Purchase`.
    payment_method: String,
}

/// Parameters of the [`list`] filtering.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListParams {
    /// Customer email to filter by.
    email: Option<String>,
}

/// Lists `Purchase`s, optionally filtered by customer email.
pub async fn list(
    State(service): State<Service>,
    QueryParams(params): QueryParams<ListParams>,
) -> Result<Json<Vec<Purchase>>, Error> {
    let purchases = if let Some(email) = params.email {
        service
            .execute(query::purchases::ByCustomerEmail::by(api::parse(
                email,
            )?))
            .await
            .map_err(AsError::into_error)?
    } else {
        service
            .execute(query::purchases::All::by(()))
            .await
            .map_err(AsError::into_error)?
    };
    Ok(Json(purchases.into_iter().map(Into::into).collect()))
}

/// Returns the `Purchase` with the provided ID.
pub async fn by_id(
    State(service): State<Service>,
    Path(id): Path<domain::purchase::Id>,
) -> Result<Json<Purchase>, Error> {
    service
        .execute(query::purchase::ById::by(id))
        .await
        .map_err(AsError::into_error)?
        .ok_or_else(|| NotFoundError::PurchaseNotExists.into())
        .map(|p| Json(p.into()))
}

/// Places a new `Purchase`, claiming the car immediately.
pub async fn create(
    State(service): State<Service>,
    Json(req): Json<CreateRequest>,
) -> Result<(http::StatusCode, Json<Purchase>), Error> {
    let purchase = service
        .execute(command::CreatePurchase {
            vehicle_id: req.car_id,
            customer: domain::Customer {
                name: api::parse(req.customer_name)?,
                email: api::parse(req.customer_email)?,
                phone: api::parse(req.customer_phone)?,
            },
            address: api::parse(req.address)?,
            payment_method: api::parse(req.payment_method.to_uppercase())?,
        })
        .await
        .map_err(AsError::into_error)?;
    Ok((http::StatusCode::CREATED, Json(purchase.into())))
}

/// Request of moving a [`Purchase`] to another status.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    /// Status to move the `Purchase` to.
    status: String,
}

/// Moves the `Purchase` with the provided ID to the requested status,
/// case-insensitively.
pub async fn transition(
    State(service): State<Service>,
    Path(id): Path<domain::purchase::Id>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<Purchase>, Error> {
    let status = api::parse(req.status.to_uppercase())?;

    service
        .execute(command::TransitionPurchase {
            purchase_id: id,
            status,
        })
        .await
        .map_err(AsError::into_error)
        .map(|p| Json(p.into()))
}

/// Removes the `Purchase` with the provided ID, relisting the car for sale.
pub async fn remove(
    State(service): State<Service>,
    Path(id): Path<domain::purchase::Id>,
) -> Result<http::StatusCode, Error> {
    service
        .execute(command::DeletePurchase { purchase_id: id })
        .await
        .map_err(AsError::into_error)
        .map(|()| http::StatusCode::NO_CONTENT)
}

define_error! {
    enum NotFoundError {
        #[code = "PURCHASE_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Purchase` with the provided ID does not exist"]
        PurchaseNotExists,
    }
}

impl AsError for command::create_purchase::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "CAR_ALREADY_PURCHASED"]
                #[status = CONFLICT]
                #[message = "`Car` with the provided ID has been purchased \
                             already"]
                CarAlreadyPurchased,

                #[code = "CAR_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Car` with the provided ID does not exist"]
                CarNotExists,

                #[code = "CAR_NOT_FOR_SALE"]
                #[status = CONFLICT]
                #[message = "`Car` with the provided ID is not listed for \
                             sale"]
                CarNotForSale,

                #[code = "CAR_UNAVAILABLE"]
                #[status = CONFLICT]
                #[message = "`Car` with the provided ID is not currently \
                             available"]
                CarUnavailable,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::VehicleAlreadyPurchased(_) => {
                Error::CarAlreadyPurchased.into()
            }
            Self::VehicleNotExists(_) => Error::CarNotExists.into(),
            Self::VehicleNotForSale(_) => Error::CarNotForSale.into(),
            Self::VehicleUnavailable(_) => Error::CarUnavailable.into(),
        })
    }
}

impl AsError for command::transition_purchase::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "INVALID_TRANSITION"]
                #[status = CONFLICT]
                #[message = "`Purchase` cannot be moved to the requested \
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
            Self::PurchaseNotExists(_) => {
                NotFoundError::PurchaseNotExists.into()
            }
            Self::VehicleNotExists(_) => Error::CarNotExists.into(),
        })
    }
}

impl AsError for command::delete_purchase::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::PurchaseNotExists(_) => {
                Some(NotFoundError::PurchaseNotExists.into())
            }
        }
    }
}

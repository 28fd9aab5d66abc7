//! REST API definitions.

pub mod purchase;
pub mod rental;
pub mod vehicle;

use std::{fmt, str::FromStr};

use axum::{
    routing::{get, put},
    Router,
};

use crate::{Error, Service};

/// Builds the [`Router`] exposing the whole REST API of the provided
/// [`Service`].
pub fn router(service: Service) -> Router {
    Router::new()
        .route("/api/cars", get(vehicle::list).post(vehicle::create))
        .route("/api/cars/available", get(vehicle::available))
        .route("/api/cars/for-sale", get(vehicle::for_sale))
        .route("/api/cars/for-rent", get(vehicle::for_rent))
        .route(
            "/api/cars/:id",
            get(vehicle::by_id).put(vehicle::update).delete(vehicle::remove),
        )
        .route("/api/rentals", get(rental::list).post(rental::create))
        .route("/api/rentals/quote", get(rental::quote))
        .route("/api/rentals/overlapping", get(rental::overlapping))
        .route("/api/rentals/:id", get(rental::by_id).delete(rental::remove))
        .route("/api/rentals/:id/status", put(rental::transition))
        .route("/api/purchases", get(purchase::list).post(purchase::create))
        .route(
            "/api/purchases/:id",
            get(purchase::by_id).delete(purchase::remove),
        )
        .route("/api/purchases/:id/status", put(purchase::transition))
        .with_state(service)
}

/// Parses the provided string into a domain value, rejecting failures as
/// invalid input.
pub(crate) fn parse<T: FromStr>(s: impl AsRef<str>) -> Result<T, Error>
where
    T::Err: fmt::Display,
{
    s.as_ref()
        .parse()
        .map_err(|e: T::Err| Error::invalid_input(&e))
}

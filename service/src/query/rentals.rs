//! [`Query`] collection related to the multiple [`Rental`]s.

use common::{
    operations::{By, Select},
    DateRange,
};
use tracerr::Traced;

use crate::{
    domain::{customer, vehicle, Rental},
    infra::{database, Database},
    read, Service,
};

use super::{DatabaseQuery, Query};

/// Queries a list of all [`Rental`]s.
pub type All = DatabaseQuery<By<Vec<Rental>, ()>>;

/// Queries a list of [`Rental`]s of a single [`Vehicle`].
///
/// [`Vehicle`]: crate::domain::Vehicle
pub type ForVehicle = DatabaseQuery<By<Vec<Rental>, vehicle::Id>>;

/// Queries a list of [`Rental`]s belonging to a [`Customer`] by their
/// [`customer::Email`].
///
/// [`Customer`]: crate::domain::Customer
pub type ByCustomerEmail = DatabaseQuery<By<Vec<Rental>, customer::Email>>;

/// Queries a list of active ([`Pending`] or [`Confirmed`]) [`Rental`]s.
///
/// [`Confirmed`]: crate::domain::rental::Status::Confirmed
/// [`Pending`]: crate::domain::rental::Status::Pending
pub type Active = DatabaseQuery<By<read::rental::Active<Vec<Rental>>, ()>>;

/// Queries the [`Rental`]s of a [`Vehicle`] occupying days of the provided
/// period.
///
/// [`Vehicle`]: crate::domain::Vehicle
#[derive(Clone, Copy, Debug)]
pub struct Overlapping {
    /// ID of the [`Vehicle`] to inspect.
    ///
    /// [`Vehicle`]: crate::domain::Vehicle
    pub vehicle_id: vehicle::Id,

    /// Period to detect overlaps against.
    pub period: DateRange,
}

impl<Db, M> Query<Overlapping> for Service<Db, M>
where
    Db: Database<
        Select<By<read::rental::NotCancelled<Vec<Rental>>, vehicle::Id>>,
        Ok = read::rental::NotCancelled<Vec<Rental>>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<Rental>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Overlapping { vehicle_id, period }: Overlapping,
    ) -> Result<Self::Ok, Self::Err> {
        let read::rental::NotCancelled(booked) = self
            .database()
            .execute(Select(By::<
                read::rental::NotCancelled<Vec<Rental>>,
                _,
            >::new(vehicle_id)))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(booked
            .into_iter()
            .filter(|r| r.conflicts_with(&period))
            .collect())
    }
}

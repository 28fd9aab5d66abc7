//! [`Query`] collection related to the multiple [`Vehicle`]s.

use common::{
    operations::{By, Select},
    DateRange,
};
use tracerr::Traced;

use crate::{
    domain::{rental, vehicle, Rental, Vehicle},
    infra::{database, Database},
    read, Service,
};

use super::{DatabaseQuery, Query};

/// Queries a list of all [`Vehicle`]s of the fleet.
pub type All = DatabaseQuery<By<Vec<Vehicle>, ()>>;

/// Queries a list of presently claimable [`Vehicle`]s.
pub type Available = DatabaseQuery<By<Vec<Vehicle>, read::vehicle::Available>>;

/// Queries a list of [`Vehicle`]s listed for sale.
pub type ForSale = DatabaseQuery<By<Vec<Vehicle>, read::vehicle::ForSale>>;

/// Queries a list of presently claimable [`Vehicle`]s listed for rent.
pub type AvailableForRent =
    DatabaseQuery<By<Vec<Vehicle>, read::vehicle::AvailableForRent>>;

/// Queries a list of [`Vehicle`]s rentable over the whole provided period.
///
/// A [`Vehicle`] qualifies if it's listed for rent, presently claimable, and
/// none of its non-cancelled [`Rental`]s overlaps the period.
#[derive(Clone, Copy, Debug)]
pub struct AvailableIn {
    /// Period the [`Vehicle`]s should be rentable over.
    pub period: DateRange,
}

impl<Db, M> Query<AvailableIn> for Service<Db, M>
where
    Db: Database<
            Select<By<Vec<Vehicle>, read::vehicle::AvailableForRent>>,
            Ok = Vec<Vehicle>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<read::rental::NotCancelled<Vec<Rental>>, vehicle::Id>>,
            Ok = read::rental::NotCancelled<Vec<Rental>>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Vec<Vehicle>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        AvailableIn { period }: AvailableIn,
    ) -> Result<Self::Ok, Self::Err> {
        let candidates = self
            .database()
            .execute(Select(By::<Vec<Vehicle>, _>::new(
                read::vehicle::AvailableForRent,
            )))
            .await
            .map_err(tracerr::wrap!())?;

        let mut free = Vec::with_capacity(candidates.len());
        for vehicle in candidates {
            let read::rental::NotCancelled(booked) = self
                .database()
                .execute(Select(By::<
                    read::rental::NotCancelled<Vec<Rental>>,
                    _,
                >::new(vehicle.id)))
                .await
                .map_err(tracerr::wrap!())?;
            if rental::find_conflicting(&booked, &period).is_none() {
                free.push(vehicle);
            }
        }
        Ok(free)
    }
}

//! [`Query`] pricing a prospective [`Rental`].
//!
//! [`Rental`]: crate::domain::Rental

use common::{
    operations::{By, Select},
    DateRange, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{rental, vehicle, Vehicle},
    infra::{database, Database},
    Service,
};

use super::Query;

/// [`Query`] pricing a prospective [`Rental`] of a [`Vehicle`] over a period
/// without reserving anything.
///
/// The total is the [`Vehicle`]'s daily rate multiplied by the number of
/// days the period spans, endpoints included.
///
/// [`Rental`]: crate::domain::Rental
#[derive(Clone, Copy, Debug)]
pub struct RentalQuote {
    /// ID of the [`Vehicle`] to price.
    pub vehicle_id: vehicle::Id,

    /// Period to price the [`Vehicle`] over.
    pub period: DateRange,
}

impl<Db, M> Query<RentalQuote> for Service<Db, M>
where
    Db: Database<
        Select<By<Option<Vehicle>, vehicle::Id>>,
        Ok = Option<Vehicle>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Money;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        RentalQuote { vehicle_id, period }: RentalQuote,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let vehicle = self
            .database()
            .execute(Select(By::<Option<Vehicle>, _>::new(vehicle_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::VehicleNotExists(vehicle_id))
            .map_err(tracerr::wrap!())?;

        if !vehicle.for_rent {
            return Err(tracerr::new!(E::VehicleNotForRent(vehicle_id)));
        }

        Ok(rental::quote(vehicle.daily_rate, &period))
    }
}

/// Error of [`RentalQuote`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Vehicle`] with the provided ID does not exist.
    #[display("`Vehicle(id: {_0})` does not exist")]
    VehicleNotExists(#[error(not(source))] vehicle::Id),

    /// [`Vehicle`] is not listed for rent.
    #[display("`Vehicle(id: {_0})` is not listed for rent")]
    VehicleNotForRent(#[error(not(source))] vehicle::Id),
}

//! [`Command`] for reserving a [`Vehicle`] over a period.

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    DateRange,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{rental, vehicle, Customer, Rental, Vehicle},
    infra::{database, Database},
    read,
    Service,
};

use super::Command;

/// [`Command`] for reserving a [`Vehicle`] over a period.
///
/// The created [`Rental`] starts out [`Pending`] and doesn't claim the
/// [`Vehicle`]'s availability: for rentals, occupancy is governed by date
/// overlap alone, so other periods of the same [`Vehicle`] stay bookable.
///
/// [`Pending`]: rental::Status::Pending
#[derive(Clone, Debug)]
pub struct CreateRental {
    /// ID of the [`Vehicle`] to reserve.
    pub vehicle_id: vehicle::Id,

    /// [`Customer`] the new [`Rental`] belongs to.
    pub customer: Customer,

    /// [`DateRange`] to reserve the [`Vehicle`] for.
    pub period: DateRange,
}

impl<Db, M> Command<CreateRental> for Service<Db, M>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Vehicle, vehicle::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Vehicle>, vehicle::Id>>,
            Ok = Option<Vehicle>,
            Err = Traced<database::Error>,
        > + Database<
            Select<
                By<read::rental::NotCancelled<Vec<Rental>>, vehicle::Id>,
            >,
            Ok = read::rental::NotCancelled<Vec<Rental>>,
            Err = Traced<database::Error>,
        > + Database<Insert<Rental>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Rental;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateRental) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateRental {
            vehicle_id,
            customer,
            period,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Vehicle`.
        tx.execute(Lock(By::new(vehicle_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let vehicle = tx
            .execute(Select(By::<Option<Vehicle>, _>::new(vehicle_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::VehicleNotExists(vehicle_id))
            .map_err(tracerr::wrap!())?;

        if let Err(e) = vehicle.ensure_rentable() {
            return Err(tracerr::new!(match e {
                vehicle::ClaimError::NotForRent => {
                    E::VehicleNotForRent(vehicle_id)
                }
                vehicle::ClaimError::AlreadyPurchased
                | vehicle::ClaimError::NotForSale
                | vehicle::ClaimError::Unavailable => {
                    E::VehicleUnavailable(vehicle_id)
                }
            }));
        }

        let read::rental::NotCancelled(booked) = tx
            .execute(Select(By::<
                read::rental::NotCancelled<Vec<Rental>>,
                _,
            >::new(vehicle_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if let Some(conflicting) = rental::find_conflicting(&booked, &period) {
            return Err(tracerr::new!(E::PeriodConflict(conflicting.id)));
        }

        let rental = Rental {
            id: rental::Id::new(),
            vehicle_id: vehicle.id,
            customer,
            period,
            total_price: rental::quote(vehicle.daily_rate, &period),
            status: rental::Status::Pending,
        };
        tx.execute(Insert(rental.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(rental)
    }
}

/// Error of [`CreateRental`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Requested period overlaps an existing [`Rental`].
    #[display("period is already occupied by `Rental(id: {_0})`")]
    PeriodConflict(#[error(not(source))] rental::Id),

    /// [`Vehicle`] with the provided ID does not exist.
    #[display("`Vehicle(id: {_0})` does not exist")]
    VehicleNotExists(#[error(not(source))] vehicle::Id),

    /// [`Vehicle`] is not listed for rent.
    #[display("`Vehicle(id: {_0})` is not listed for rent")]
    VehicleNotForRent(#[error(not(source))] vehicle::Id),

    /// [`Vehicle`] is not presently claimable.
    #[display("`Vehicle(id: {_0})` is not currently available")]
    VehicleUnavailable(#[error(not(source))] vehicle::Id),
}

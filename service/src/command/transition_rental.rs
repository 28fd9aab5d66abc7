//! [`Command`] for moving a [`Rental`] through its lifecycle.

use std::fmt::Display;

use common::operations::{
    By, Commit, Delete, Lock, Perform, Select, Transact, Transacted, Update,
};
use derive_more::{Display as DisplayDerive, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{rental, vehicle, Rental, Vehicle},
    infra::{
        database,
        email::{Event, Notification},
        Database, Mailer,
    },
    Service,
};

use super::Command;

/// [`Command`] for moving a [`Rental`] through its lifecycle.
///
/// Moving to [`Completed`] or [`Cancelled`] releases the [`Vehicle`];
/// [`Cancelled`] additionally removes the [`Rental`] record once its side
/// effects have fired, returning the pre-deletion snapshot.
///
/// [`Cancelled`]: rental::Status::Cancelled
/// [`Completed`]: rental::Status::Completed
#[derive(Clone, Copy, Debug)]
pub struct TransitionRental {
    /// ID of the [`Rental`] to transition.
    pub rental_id: rental::Id,

    /// [`rental::Status`] to transition the [`Rental`] to.
    pub status: rental::Status,
}

impl<Db, M> Command<TransitionRental> for Service<Db, M>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Rental>, rental::Id>>,
            Ok = Option<Rental>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Lock<By<Vehicle, vehicle::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Rental>, rental::Id>>,
            Ok = Option<Rental>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Vehicle>, vehicle::Id>>,
            Ok = Option<Vehicle>,
            Err = Traced<database::Error>,
        > + Database<Update<Rental>, Err = Traced<database::Error>>
        + Database<Update<Vehicle>, Err = Traced<database::Error>>
        + Database<Delete<Rental>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    M: Mailer<Perform<Notification>>,
    M::Err: Display,
{
    type Ok = Rental;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: TransitionRental,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let TransitionRental { rental_id, status } = cmd;

        // Locate the `Vehicle` to lock before opening the transaction.
        let rental = self
            .database()
            .execute(Select(By::<Option<Rental>, _>::new(rental_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RentalNotExists(rental_id))
            .map_err(tracerr::wrap!())?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Vehicle`.
        tx.execute(Lock(By::new(rental.vehicle_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut rental = tx
            .execute(Select(By::<Option<Rental>, _>::new(rental_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RentalNotExists(rental_id))
            .map_err(tracerr::wrap!())?;

        let from = rental.status;
        if !from.allows_transition_to(status) {
            return Err(tracerr::new!(E::InvalidTransition {
                from,
                to: status,
            }));
        }

        let mut vehicle = tx
            .execute(Select(By::<Option<Vehicle>, _>::new(rental.vehicle_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::VehicleNotExists(rental.vehicle_id))
            .map_err(tracerr::wrap!())?;

        rental.status = status;
        match status {
            rental::Status::Confirmed => {
                tx.execute(Update(rental.clone()))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;
            }
            rental::Status::Completed => {
                vehicle.release();
                tx.execute(Update(vehicle.clone()))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;
                tx.execute(Update(rental.clone()))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;
            }
            rental::Status::Cancelled => {
                vehicle.release();
                tx.execute(Update(vehicle.clone()))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;
                tx.execute(Delete(rental.clone()))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;
            }
            rental::Status::Pending => {
                // `allows_transition_to()` never targets `Pending`.
                return Err(tracerr::new!(E::InvalidTransition {
                    from,
                    to: status,
                }));
            }
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let event = match status {
            rental::Status::Confirmed | rental::Status::Completed => {
                Event::RentalConfirmed {
                    period: rental.period,
                    total_price: rental.total_price,
                }
            }
            rental::Status::Cancelled => Event::RentalCancelled {
                period: rental.period,
            },
            rental::Status::Pending => unreachable!("rejected above"),
        };
        let notification = Notification {
            recipient: rental.customer.email.clone(),
            customer: rental.customer.name.clone(),
            vehicle: vehicle.summary(),
            event,
        };
        if let Err(e) = self.mailer().execute(Perform(notification)).await {
            log::warn!("failed to dispatch `Rental` notification: {e}");
        }

        Ok(rental)
    }
}

/// Error of [`TransitionRental`] [`Command`] execution.
#[derive(Debug, DisplayDerive, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Requested [`rental::Status`] transition is not allowed.
    #[display("`Rental` cannot move from `{from}` to `{to}`")]
    InvalidTransition {
        /// Current [`rental::Status`] of the [`Rental`].
        from: rental::Status,

        /// Rejected target [`rental::Status`].
        to: rental::Status,
    },

    /// [`Rental`] with the provided ID does not exist.
    #[display("`Rental(id: {_0})` does not exist")]
    RentalNotExists(#[error(not(source))] rental::Id),

    /// [`Vehicle`] with the provided ID does not exist.
    #[display("`Vehicle(id: {_0})` does not exist")]
    VehicleNotExists(#[error(not(source))] vehicle::Id),
}

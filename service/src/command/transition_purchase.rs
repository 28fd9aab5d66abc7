//! [`Command`] for moving a [`Purchase`] through its lifecycle.

use std::fmt::Display;

use common::operations::{
    By, Commit, Delete, Lock, Perform, Select, Transact, Transacted, Update,
};
use derive_more::{Display as DisplayDerive, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{purchase, vehicle, Purchase, Vehicle},
    infra::{
        database,
        email::{Event, Notification},
        Database, Mailer,
    },
    Service,
};

use super::Command;

/// [`Command`] for moving a [`Purchase`] through its lifecycle.
///
/// Completing keeps the [`Vehicle`] claimed. Cancelling releases it, clears
/// its purchase back-reference and removes the [`Purchase`] record once its
/// side effects have fired, returning the pre-deletion snapshot.
#[derive(Clone, Copy, Debug)]
pub struct TransitionPurchase {
    /// ID of the [`Purchase`] to transition.
    pub purchase_id: purchase::Id,

    /// [`purchase::Status`] to transition the [`Purchase`] to.
    pub status: purchase::Status,
}

impl<Db, M> Command<TransitionPurchase> for Service<Db, M>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Purchase>, purchase::Id>>,
            Ok = Option<Purchase>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Lock<By<Vehicle, vehicle::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Purchase>, purchase::Id>>,
            Ok = Option<Purchase>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Vehicle>, vehicle::Id>>,
            Ok = Option<Vehicle>,
            Err = Traced<database::Error>,
        > + Database<Update<Purchase>, Err = Traced<database::Error>>
        + Database<Update<Vehicle>, Err = Traced<database::Error>>
        + Database<Delete<Purchase>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    M: Mailer<Perform<Notification>>,
    M::Err: Display,
{
    type Ok = Purchase;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: TransitionPurchase,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let TransitionPurchase {
            purchase_id,
            status,
        } = cmd;

        // Locate the `Vehicle` to lock before opening the transaction.
        let purchase = self
            .database()
            .execute(Select(By::<Option<Purchase>, _>::new(purchase_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PurchaseNotExists(purchase_id))
            .map_err(tracerr::wrap!())?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Vehicle`.
        tx.execute(Lock(By::new(purchase.vehicle_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut purchase = tx
            .execute(Select(By::<Option<Purchase>, _>::new(purchase_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PurchaseNotExists(purchase_id))
            .map_err(tracerr::wrap!())?;

        let from = purchase.status;
        if !from.allows_transition_to(status) {
            return Err(tracerr::new!(E::InvalidTransition {
                from,
                to: status,
            }));
        }

        let mut vehicle = tx
            .execute(Select(By::<Option<Vehicle>, _>::new(
                purchase.vehicle_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::VehicleNotExists(purchase.vehicle_id))
            .map_err(tracerr::wrap!())?;

        purchase.status = status;
        match status {
            purchase::Status::Completed => {
                tx.execute(Update(purchase.clone()))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;
            }
            purchase::Status::Cancelled => {
                vehicle.release();
                vehicle.purchase_id = None;
                tx.execute(Update(vehicle.clone()))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;
                tx.execute(Delete(purchase.clone()))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))
                    .map(drop)?;
            }
            purchase::Status::Pending => {
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
            purchase::Status::Completed => Event::PurchaseConfirmed {
                total_price: purchase.price,
            },
            purchase::Status::Cancelled => Event::PurchaseCancelled,
            purchase::Status::Pending => unreachable!("rejected above"),
        };
        let notification = Notification {
            recipient: purchase.customer.email.clone(),
            customer: purchase.customer.name.clone(),
            vehicle: vehicle.summary(),
            event,
        };
        if let Err(e) = self.mailer().execute(Perform(notification)).await {
            log::warn!("failed to dispatch `Purchase` notification: {e}");
        }

        Ok(purchase)
    }
}

/// Error of [`TransitionPurchase`] [`Command`] execution.
#[derive(Debug, DisplayDerive, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Requested [`purchase::Status`] transition is not allowed.
    #[display("`Purchase` cannot move from `{from}` to `{to}`")]
    InvalidTransition {
        /// Current [`purchase::Status`] of the [`Purchase`].
        from: purchase::Status,

        /// Rejected target [`purchase::Status`].
        to: purchase::Status,
    },

    /// [`Purchase`] with the provided ID does not exist.
    #[display("`Purchase(id: {_0})` does not exist")]
    PurchaseNotExists(#[error(not(source))] purchase::Id),

    /// [`Vehicle`] with the provided ID does not exist.
    #[display("`Vehicle(id: {_0})` does not exist")]
    VehicleNotExists(#[error(not(source))] vehicle::Id),
}

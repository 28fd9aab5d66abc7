//! [`Command`] for removing a [`Purchase`] record.

use common::operations::{
    By, Commit, Delete, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{purchase, vehicle, Purchase, Vehicle},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for removing a [`Purchase`] record.
///
/// Unlike cancellation, removal is an administrative action and sends no
/// notification. The claimed [`Vehicle`] is released and put back up for
/// sale.
#[derive(Clone, Copy, Debug)]
pub struct DeletePurchase {
    /// ID of the [`Purchase`] to remove.
    pub purchase_id: purchase::Id,
}

impl<Db, M> Command<DeletePurchase> for Service<Db, M>
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
        > + Database<Update<Vehicle>, Err = Traced<database::Error>>
        + Database<Delete<Purchase>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeletePurchase,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeletePurchase { purchase_id } = cmd;

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

        let purchase = tx
            .execute(Select(By::<Option<Purchase>, _>::new(purchase_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PurchaseNotExists(purchase_id))
            .map_err(tracerr::wrap!())?;

        // A cancelled `Purchase` is removed right away, so any record found
        // here still holds the claim on its `Vehicle`.
        if let Some(mut vehicle) = tx
            .execute(Select(By::<Option<Vehicle>, _>::new(
                purchase.vehicle_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
        {
            vehicle.release();
            vehicle.purchase_id = None;
            vehicle.for_sale = true;
            tx.execute(Update(vehicle))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;
        }

        tx.execute(Delete(purchase))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(())
    }
}

/// Error of [`DeletePurchase`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Purchase`] with the provided ID does not exist.
    #[display("`Purchase(id: {_0})` does not exist")]
    PurchaseNotExists(#[error(not(source))] purchase::Id),
}

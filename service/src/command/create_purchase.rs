//! [`Command`] for placing an outright [`Purchase`] of a [`Vehicle`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted, Update},
    Date,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{customer, purchase, vehicle, Customer, Purchase, Vehicle},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for placing an outright [`Purchase`] of a [`Vehicle`].
///
/// A [`Purchase`] claims the [`Vehicle`] the moment it's placed: the claim
/// check and the availability flip happen atomically under the
/// per-[`Vehicle`] lock, so two competing buyers can never both succeed.
#[derive(Clone, Debug)]
pub struct CreatePurchase {
    /// ID of the [`Vehicle`] to purchase.
    pub vehicle_id: vehicle::Id,

    /// [`Customer`] the new [`Purchase`] belongs to.
    pub customer: Customer,

    /// Postal [`customer::Address`] provided by the [`Customer`].
    pub address: customer::Address,

    /// [`purchase::PaymentMethod`] of the new [`Purchase`].
    pub payment_method: purchase::PaymentMethod,
}

impl<Db, M> Command<CreatePurchase> for Service<Db, M>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Vehicle, vehicle::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Vehicle>, vehicle::Id>>,
            Ok = Option<Vehicle>,
            Err = Traced<database::Error>,
        > + Database<Update<Vehicle>, Err = Traced<database::Error>>
        + Database<Insert<Purchase>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Purchase;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreatePurchase,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreatePurchase {
            vehicle_id,
            customer,
            address,
            payment_method,
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

        let mut vehicle = tx
            .execute(Select(By::<Option<Vehicle>, _>::new(vehicle_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::VehicleNotExists(vehicle_id))
            .map_err(tracerr::wrap!())?;

        let purchase_id = purchase::Id::new();
        if let Err(e) = vehicle.claim_for_purchase(purchase_id) {
            return Err(tracerr::new!(match e {
                vehicle::ClaimError::AlreadyPurchased => {
                    E::VehicleAlreadyPurchased(vehicle_id)
                }
                vehicle::ClaimError::NotForSale
                | vehicle::ClaimError::NotForRent => {
                    E::VehicleNotForSale(vehicle_id)
                }
                vehicle::ClaimError::Unavailable => {
                    E::VehicleUnavailable(vehicle_id)
                }
            }));
        }

        let purchase = Purchase {
            id: purchase_id,
            vehicle_id: vehicle.id,
            customer,
            address,
            price: vehicle.price,
            purchased_on: Date::today(),
            payment_method,
            status: purchase::Status::Pending,
        };

        tx.execute(Update(vehicle))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Insert(purchase.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(purchase)
    }
}

/// Error of [`CreatePurchase`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Vehicle`] is claimed by a live [`Purchase`] already.
    #[display("`Vehicle(id: {_0})` has been purchased already")]
    VehicleAlreadyPurchased(#[error(not(source))] vehicle::Id),

    /// [`Vehicle`] with the provided ID does not exist.
    #[display("`Vehicle(id: {_0})` does not exist")]
    VehicleNotExists(#[error(not(source))] vehicle::Id),

    /// [`Vehicle`] is not listed for sale.
    #[display("`Vehicle(id: {_0})` is not listed for sale")]
    VehicleNotForSale(#[error(not(source))] vehicle::Id),

    /// [`Vehicle`] is not presently claimable.
    #[display("`Vehicle(id: {_0})` is not currently available")]
    VehicleUnavailable(#[error(not(source))] vehicle::Id),
}

//! [`InMemory`] [`Database`] engine.

mod impls;

use std::{collections::HashMap, mem, sync::Arc};

use common::operations::{By, Commit, Lock, Transact};
use derive_more::{Display, Error as StdError};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracerr::Traced;

use crate::{
    domain::{purchase, rental, vehicle, Purchase, Rental, Vehicle},
    infra::{database, Database},
};

/// In-memory [`Database`] engine.
///
/// Writes go through [`Transaction`]s: they stage inside the [`Transaction`]
/// and apply atomically on [`Commit`], so an aborted [`Transaction`] leaves
/// no partial state behind. Claim exclusivity is provided by per-[`Vehicle`]
/// mutexes acquired via the [`Lock`] operation and held until the
/// [`Transaction`] commits or is dropped.
#[derive(Clone, Debug, Default)]
pub struct InMemory {
    /// Committed state of this engine.
    state: Arc<Mutex<State>>,

    /// Per-[`Vehicle`] locks serializing claim/release pairs.
    locks: Arc<Mutex<HashMap<vehicle::Id, Arc<Mutex<()>>>>>,
}

impl InMemory {
    /// Creates a new empty [`InMemory`] engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lock serializing operations upon the [`Vehicle`] with the
    /// provided ID.
    async fn lock_of(&self, id: vehicle::Id) -> Arc<Mutex<()>> {
        Arc::clone(self.locks.lock().await.entry(id).or_default())
    }

    /// Runs the provided function over the committed [`State`].
    async fn read<T>(&self, f: impl FnOnce(&State) -> T) -> T {
        f(&*self.state.lock().await)
    }
}

/// Committed state of an [`InMemory`] engine.
#[derive(Debug, Default)]
struct State {
    /// All the stored [`Vehicle`]s.
    vehicles: HashMap<vehicle::Id, Vehicle>,

    /// All the stored [`Rental`]s.
    rentals: HashMap<rental::Id, Rental>,

    /// All the stored [`Purchase`]s.
    purchases: HashMap<purchase::Id, Purchase>,
}

impl State {
    /// Applies the provided [`Mutation`] to this [`State`].
    fn apply(&mut self, mutation: Mutation) {
        match mutation {
            Mutation::UpsertVehicle(v) => {
                _ = self.vehicles.insert(v.id, v);
            }
            Mutation::DeleteVehicle(id) => {
                _ = self.vehicles.remove(&id);
                // Claims die with the `Vehicle` they're held against.
                self.rentals.retain(|_, r| r.vehicle_id != id);
                self.purchases.retain(|_, p| p.vehicle_id != id);
            }
            Mutation::UpsertRental(r) => {
                _ = self.rentals.insert(r.id, r);
            }
            Mutation::DeleteRental(id) => {
                _ = self.rentals.remove(&id);
            }
            Mutation::UpsertPurchase(p) => {
                _ = self.purchases.insert(p.id, p);
            }
            Mutation::DeletePurchase(id) => {
                _ = self.purchases.remove(&id);
            }
        }
    }
}

/// Single buffered write of a [`Transaction`].
#[derive(Clone, Debug)]
enum Mutation {
    /// Insert or update of a [`Vehicle`].
    UpsertVehicle(Vehicle),

    /// Removal of a [`Vehicle`] along with its [`Rental`]s and [`Purchase`].
    DeleteVehicle(vehicle::Id),

    /// Insert or update of a [`Rental`].
    UpsertRental(Rental),

    /// Removal of a [`Rental`].
    DeleteRental(rental::Id),

    /// Insert or update of a [`Purchase`].
    UpsertPurchase(Purchase),

    /// Removal of a [`Purchase`].
    DeletePurchase(purchase::Id),
}

/// [`InMemory`] transaction, staging writes until [`Commit`].
///
/// Dropping an uncommitted [`Transaction`] discards its staged writes and
/// releases the [`Vehicle`] locks it holds.
#[derive(Debug)]
pub struct Transaction {
    /// Engine this [`Transaction`] belongs to.
    db: InMemory,

    /// Mutable part of this [`Transaction`].
    inner: Mutex<Inner>,
}

/// Mutable part of a [`Transaction`].
#[derive(Debug, Default)]
struct Inner {
    /// Held per-[`Vehicle`] lock guards.
    guards: Vec<OwnedMutexGuard<()>>,

    /// Writes to be applied on [`Commit`].
    staged: Vec<Mutation>,

    /// Indicator whether this [`Transaction`] has been committed.
    finished: bool,
}

impl Transaction {
    /// Returns the [`InMemory`] engine this [`Transaction`] belongs to.
    fn db(&self) -> &InMemory {
        &self.db
    }

    /// Errors if this [`Transaction`] has been committed already.
    async fn ensure_open(&self) -> Result<(), Traced<database::Error>> {
        if self.inner.lock().await.finished {
            return Err(tracerr::new!(database::Error::InMemory(
                Error::Finished
            )));
        }
        Ok(())
    }

    /// Stages the provided [`Mutation`] to be applied on [`Commit`].
    async fn stage(
        &self,
        mutation: Mutation,
    ) -> Result<(), Traced<database::Error>> {
        let mut inner = self.inner.lock().await;
        if inner.finished {
            return Err(tracerr::new!(database::Error::InMemory(
                Error::Finished
            )));
        }
        inner.staged.push(mutation);
        Ok(())
    }
}

impl Database<Transact> for InMemory {
    type Ok = Transaction;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(Transaction {
            db: self.clone(),
            inner: Mutex::new(Inner::default()),
        })
    }
}

impl Database<Lock<By<Vehicle, vehicle::Id>>> for Transaction {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Vehicle, vehicle::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        // The `Vehicle` lock must be acquired before `inner` is, otherwise
        // two transactions could block each other on `inner` forever.
        // Locking the same `Vehicle` twice in one `Transaction` deadlocks.
        let guard = self.db.lock_of(id).await.lock_owned().await;

        let mut inner = self.inner.lock().await;
        if inner.finished {
            return Err(tracerr::new!(database::Error::InMemory(
                Error::Finished
            )));
        }
        inner.guards.push(guard);
        Ok(())
    }
}

impl Database<Commit> for Transaction {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        let mut inner = self.inner.lock().await;
        if inner.finished {
            return Err(tracerr::new!(database::Error::InMemory(
                Error::Finished
            )));
        }
        inner.finished = true;

        let staged = mem::take(&mut inner.staged);
        let mut deleted_vehicles = Vec::new();
        {
            let mut state = self.db.state.lock().await;
            for mutation in staged {
                if let Mutation::DeleteVehicle(id) = &mutation {
                    deleted_vehicles.push(*id);
                }
                state.apply(mutation);
            }
        }

        // A deleted `Vehicle` takes its lock entry along, otherwise the map
        // would grow with the fleet's history.
        if !deleted_vehicles.is_empty() {
            let mut locks = self.db.locks.lock().await;
            for id in deleted_vehicles {
                _ = locks.remove(&id);
            }
        }

        inner.guards.clear();
        Ok(())
    }
}

/// [`InMemory`] engine error.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, StdError)]
pub enum Error {
    /// Operation was issued on an already committed [`Transaction`].
    #[display("`Transaction` is already committed")]
    Finished,
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Commit, Delete, Insert, Lock, Transact};

    use super::InMemory;
    use crate::{
        domain::{vehicle, Vehicle},
        infra::Database as _,
    };

    fn vehicle() -> Vehicle {
        Vehicle {
            id: vehicle::Id::new(),
            name: "Toyota".parse().unwrap(),
            model: "Corolla".parse().unwrap(),
            color: "Silver".parse().unwrap(),
            year: 2021,
            license_plate: "AB-123-CD".parse().unwrap(),
            kind: vehicle::Kind::Sedan,
            daily_rate: "50USD".parse().unwrap(),
            price: "15000USD".parse().unwrap(),
            is_available: true,
            for_sale: true,
            for_rent: true,
            purchase_id: None,
            image_url: None,
        }
    }

    #[tokio::test]
    async fn committed_vehicle_deletion_drops_its_lock_entry() {
        let db = InMemory::new();
        let vehicle = vehicle();
        let id = vehicle.id;
        db.execute(Insert(vehicle.clone())).await.unwrap();

        let tx = db.execute(Transact).await.unwrap();
        tx.execute(Lock(By::<Vehicle, _>::new(id))).await.unwrap();
        tx.execute(Delete(vehicle)).await.unwrap();
        tx.execute(Commit).await.unwrap();

        assert!(!db.locks.lock().await.contains_key(&id));
    }

    #[tokio::test]
    async fn aborted_transaction_keeps_the_lock_entry() {
        let db = InMemory::new();
        let vehicle = vehicle();
        let id = vehicle.id;
        db.execute(Insert(vehicle.clone())).await.unwrap();

        let tx = db.execute(Transact).await.unwrap();
        tx.execute(Lock(By::<Vehicle, _>::new(id))).await.unwrap();
        tx.execute(Delete(vehicle)).await.unwrap();
        drop(tx);

        assert!(db.locks.lock().await.contains_key(&id));
    }
}

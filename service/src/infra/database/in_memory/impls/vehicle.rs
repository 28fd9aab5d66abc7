//! [`Vehicle`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{vehicle, Vehicle},
    infra::{
        database::{
            self,
            in_memory::{InMemory, Mutation, Transaction},
        },
        Database,
    },
    read,
};

impl Database<Select<By<Option<Vehicle>, vehicle::Id>>> for InMemory {
    type Ok = Option<Vehicle>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Vehicle>, vehicle::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.read(|s| s.vehicles.get(&id).cloned()).await)
    }
}

impl Database<Select<By<Vec<Vehicle>, ()>>> for InMemory {
    type Ok = Vec<Vehicle>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Vehicle>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.read(|s| s.vehicles.values().cloned().collect()).await)
    }
}

impl Database<Select<By<Vec<Vehicle>, read::vehicle::Available>>>
    for InMemory
{
    type Ok = Vec<Vehicle>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Vehicle>, read::vehicle::Available>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .read(|s| {
                s.vehicles
                    .values()
                    .filter(|v| v.is_available && (v.for_sale || v.for_rent))
                    .cloned()
                    .collect()
            })
            .await)
    }
}

impl Database<Select<By<Vec<Vehicle>, read::vehicle::ForSale>>> for InMemory {
    type Ok = Vec<Vehicle>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Vehicle>, read::vehicle::ForSale>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .read(|s| {
                s.vehicles.values().filter(|v| v.for_sale).cloned().collect()
            })
            .await)
    }
}

impl Database<Select<By<Vec<Vehicle>, read::vehicle::AvailableForRent>>>
    for InMemory
{
    type Ok = Vec<Vehicle>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Vehicle>, read::vehicle::AvailableForRent>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .read(|s| {
                s.vehicles
                    .values()
                    .filter(|v| v.is_available && v.for_rent)
                    .cloned()
                    .collect()
            })
            .await)
    }
}

impl Database<Insert<Vehicle>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(vehicle): Insert<Vehicle>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.state.lock().await;
        state.apply(Mutation::UpsertVehicle(vehicle));
        Ok(())
    }
}

impl Database<Select<By<Option<Vehicle>, vehicle::Id>>> for Transaction {
    type Ok = Option<Vehicle>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        op: Select<By<Option<Vehicle>, vehicle::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.ensure_open().await?;
        self.db().execute(op).await
    }
}

impl Database<Update<Vehicle>> for Transaction {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(vehicle): Update<Vehicle>,
    ) -> Result<Self::Ok, Self::Err> {
        self.stage(Mutation::UpsertVehicle(vehicle)).await
    }
}

impl Database<Delete<Vehicle>> for Transaction {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(vehicle): Delete<Vehicle>,
    ) -> Result<Self::Ok, Self::Err> {
        self.stage(Mutation::DeleteVehicle(vehicle.id)).await
    }
}

//! [`Rental`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{customer, rental, vehicle, Rental},
    infra::{
        database::{
            self,
            in_memory::{InMemory, Mutation, Transaction},
        },
        Database,
    },
    read,
};

impl Database<Select<By<Option<Rental>, rental::Id>>> for InMemory {
    type Ok = Option<Rental>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Rental>, rental::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.read(|s| s.rentals.get(&id).cloned()).await)
    }
}

impl Database<Select<By<Vec<Rental>, ()>>> for InMemory {
    type Ok = Vec<Rental>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Rental>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.read(|s| s.rentals.values().cloned().collect()).await)
    }
}

impl Database<Select<By<Vec<Rental>, vehicle::Id>>> for InMemory {
    type Ok = Vec<Rental>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Rental>, vehicle::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let vehicle_id = by.into_inner();
        Ok(self
            .read(|s| {
                s.rentals
                    .values()
                    .filter(|r| r.vehicle_id == vehicle_id)
                    .cloned()
                    .collect()
            })
            .await)
    }
}

impl
    Database<
        Select<By<read::rental::NotCancelled<Vec<Rental>>, vehicle::Id>>,
    > for InMemory
{
    type Ok = read::rental::NotCancelled<Vec<Rental>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::rental::NotCancelled<Vec<Rental>>, vehicle::Id>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let vehicle_id = by.into_inner();
        Ok(read::rental::NotCancelled(
            self.read(|s| {
                s.rentals
                    .values()
                    .filter(|r| {
                        r.vehicle_id == vehicle_id
                            && r.status != rental::Status::Cancelled
                    })
                    .cloned()
                    .collect()
            })
            .await,
        ))
    }
}

impl Database<Select<By<Vec<Rental>, customer::Email>>> for InMemory {
    type Ok = Vec<Rental>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Rental>, customer::Email>>,
    ) -> Result<Self::Ok, Self::Err> {
        let email = by.into_inner();
        Ok(self
            .read(|s| {
                s.rentals
                    .values()
                    .filter(|r| r.customer.email == email)
                    .cloned()
                    .collect()
            })
            .await)
    }
}

impl Database<Select<By<read::rental::Active<Vec<Rental>>, ()>>>
    for InMemory
{
    type Ok = read::rental::Active<Vec<Rental>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<read::rental::Active<Vec<Rental>>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(read::rental::Active(
            self.read(|s| {
                s.rentals
                    .values()
                    .filter(|r| r.is_active())
                    .cloned()
                    .collect()
            })
            .await,
        ))
    }
}

impl Database<Select<By<Option<Rental>, rental::Id>>> for Transaction {
    type Ok = Option<Rental>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        op: Select<By<Option<Rental>, rental::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.ensure_open().await?;
        self.db().execute(op).await
    }
}

impl
    Database<
        Select<By<read::rental::NotCancelled<Vec<Rental>>, vehicle::Id>>,
    > for Transaction
{
    type Ok = read::rental::NotCancelled<Vec<Rental>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        op: Select<By<read::rental::NotCancelled<Vec<Rental>>, vehicle::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.ensure_open().await?;
        self.db().execute(op).await
    }
}

impl Database<Insert<Rental>> for Transaction {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(rental): Insert<Rental>,
    ) -> Result<Self::Ok, Self::Err> {
        self.stage(Mutation::UpsertRental(rental)).await
    }
}

impl Database<Update<Rental>> for Transaction {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(rental): Update<Rental>,
    ) -> Result<Self::Ok, Self::Err> {
        self.stage(Mutation::UpsertRental(rental)).await
    }
}

impl Database<Delete<Rental>> for Transaction {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(rental): Delete<Rental>,
    ) -> Result<Self::Ok, Self::Err> {
        self.stage(Mutation::DeleteRental(rental.id)).await
    }
}

//! [`Purchase`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{customer, purchase, Purchase},
    infra::{
        database::{
            self,
            in_memory::{InMemory, Mutation, Transaction},
        },
        Database,
    },
};

impl Database<Select<By<Option<Purchase>, purchase::Id>>> for InMemory {
    type Ok = Option<Purchase>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Purchase>, purchase::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.read(|s| s.purchases.get(&id).cloned()).await)
    }
}

impl Database<Select<By<Vec<Purchase>, ()>>> for InMemory {
    type Ok = Vec<Purchase>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Purchase>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.read(|s| s.purchases.values().cloned().collect()).await)
    }
}

impl Database<Select<By<Vec<Purchase>, customer::Email>>> for InMemory {
    type Ok = Vec<Purchase>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Purchase>, customer::Email>>,
    ) -> Result<Self::Ok, Self::Err> {
        let email = by.into_inner();
        Ok(self
            .read(|s| {
                s.purchases
                    .values()
                    .filter(|p| p.customer.email == email)
                    .cloned()
                    .collect()
            })
            .await)
    }
}

impl Database<Select<By<Option<Purchase>, purchase::Id>>> for Transaction {
    type Ok = Option<Purchase>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        op: Select<By<Option<Purchase>, purchase::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.ensure_open().await?;
        self.db().execute(op).await
    }
}

impl Database<Insert<Purchase>> for Transaction {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(purchase): Insert<Purchase>,
    ) -> Result<Self::Ok, Self::Err> {
        self.stage(Mutation::UpsertPurchase(purchase)).await
    }
}

impl Database<Update<Purchase>> for Transaction {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(purchase): Update<Purchase>,
    ) -> Result<Self::Ok, Self::Err> {
        self.stage(Mutation::UpsertPurchase(purchase)).await
    }
}

impl Database<Delete<Purchase>> for Transaction {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(purchase): Delete<Purchase>,
    ) -> Result<Self::Ok, Self::Err> {
        self.stage(Mutation::DeletePurchase(purchase.id)).await
    }
}

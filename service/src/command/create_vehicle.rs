//! [`Command`] for listing a new [`Vehicle`].

use common::{operations::Insert, Money};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{vehicle, Vehicle},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for listing a new [`Vehicle`].
#[derive(Clone, Debug)]
pub struct CreateVehicle {
    /// [`vehicle::Name`] of the new [`Vehicle`].
    pub name: vehicle::Name,

    /// [`vehicle::Model`] of the new [`Vehicle`].
    pub model: vehicle::Model,

    /// [`vehicle::Color`] of the new [`Vehicle`].
    pub color: vehicle::Color,

    /// Year the new [`Vehicle`] was manufactured.
    pub year: vehicle::Year,

    /// [`vehicle::LicensePlate`] of the new [`Vehicle`].
    pub license_plate: vehicle::LicensePlate,

    /// [`vehicle::Kind`] of the new [`Vehicle`].
    pub kind: vehicle::Kind,

    /// Price of renting the new [`Vehicle`] for one day.
    pub daily_rate: Money,

    /// Price of buying the new [`Vehicle`] outright.
    pub price: Money,

    /// Whether the new [`Vehicle`] is listed for sale.
    pub for_sale: bool,

    /// Whether the new [`Vehicle`] is listed for rent.
    pub for_rent: bool,

    /// URL of the new [`Vehicle`]'s image, if any.
    pub image_url: Option<vehicle::ImageUrl>,
}

impl<Db, M> Command<CreateVehicle> for Service<Db, M>
where
    Db: Database<Insert<Vehicle>, Err = Traced<database::Error>>,
{
    type Ok = Vehicle;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateVehicle,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateVehicle {
            name,
            model,
            color,
            year,
            license_plate,
            kind,
            daily_rate,
            price,
            for_sale,
            for_rent,
            image_url,
        } = cmd;

        let vehicle = Vehicle {
            id: vehicle::Id::new(),
            name,
            model,
            color,
            year,
            license_plate,
            kind,
            daily_rate,
            price,
            is_available: true,
            for_sale,
            for_rent,
            purchase_id: None,
            image_url,
        };

        self.database()
            .execute(Insert(vehicle.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(vehicle)
    }
}

/// Error of [`CreateVehicle`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}

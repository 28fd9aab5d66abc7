//! [`Command`] for editing an existing [`Vehicle`] listing.

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{vehicle, Vehicle},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for editing an existing [`Vehicle`] listing.
///
/// Only the provided fields are changed. Availability and the purchase
/// back-reference are owned by the lifecycles and cannot be edited here.
#[derive(Clone, Debug)]
pub struct UpdateVehicle {
    /// ID of the [`Vehicle`] to edit.
    pub vehicle_id: vehicle::Id,

    /// New [`vehicle::Name`], if changed.
    pub name: Option<vehicle::Name>,

    /// New [`vehicle::Model`], if changed.
    pub model: Option<vehicle::Model>,

    /// New [`vehicle::Color`], if changed.
    pub color: Option<vehicle::Color>,

    /// New manufacture year, if changed.
    pub year: Option<vehicle::Year>,

    /// New [`vehicle::LicensePlate`], if changed.
    pub license_plate: Option<vehicle::LicensePlate>,

    /// New [`vehicle::Kind`], if changed.
    pub kind: Option<vehicle::Kind>,

    /// New daily rental rate, if changed.
    pub daily_rate: Option<Money>,

    /// New sale price, if changed.
    pub price: Option<Money>,

    /// New for-sale listing flag, if changed.
    pub for_sale: Option<bool>,

    /// New for-rent listing flag, if changed.
    pub for_rent: Option<bool>,

    /// New image URL, if changed.
    pub image_url: Option<vehicle::ImageUrl>,
}

impl<Db, M> Command<UpdateVehicle> for Service<Db, M>
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
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Vehicle;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateVehicle,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateVehicle {
            vehicle_id,
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

        if let Some(name) = name {
            vehicle.name = name;
        }
        if let Some(model) = model {
            vehicle.model = model;
        }
        if let Some(color) = color {
            vehicle.color = color;
        }
        if let Some(year) = year {
            vehicle.year = year;
        }
        if let Some(license_plate) = license_plate {
            vehicle.license_plate = license_plate;
        }
        if let Some(kind) = kind {
            vehicle.kind = kind;
        }
        if let Some(daily_rate) = daily_rate {
            vehicle.daily_rate = daily_rate;
        }
        if let Some(price) = price {
            vehicle.price = price;
        }
        if let Some(for_sale) = for_sale {
            vehicle.for_sale = for_sale;
        }
        if let Some(for_rent) = for_rent {
            vehicle.for_rent = for_rent;
        }
        if let Some(image_url) = image_url {
            vehicle.image_url = Some(image_url);
        }

        tx.execute(Update(vehicle.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(vehicle)
    }
}

/// Error of [`UpdateVehicle`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Vehicle`] with the provided ID does not exist.
    #[display("`Vehicle(id: {_0})` does not exist")]
    VehicleNotExists(#[error(not(source))] vehicle::Id),
}

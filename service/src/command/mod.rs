//! [`Command`] definition.

pub mod create_purchase;
pub mod create_rental;
pub mod create_vehicle;
pub mod delete_purchase;
pub mod delete_rental;
pub mod delete_vehicle;
pub mod transition_purchase;
pub mod transition_rental;
pub mod update_vehicle;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    create_purchase::CreatePurchase, create_rental::CreateRental,
    create_vehicle::CreateVehicle, delete_purchase::DeletePurchase,
    delete_rental::DeleteRental, delete_vehicle::DeleteVehicle,
    transition_purchase::TransitionPurchase,
    transition_rental::TransitionRental, update_vehicle::UpdateVehicle,
};

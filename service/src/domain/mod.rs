//! Domain definitions.

pub mod customer;
pub mod purchase;
pub mod rental;
pub mod vehicle;

pub use self::{
    customer::Customer, purchase::Purchase, rental::Rental, vehicle::Vehicle,
};

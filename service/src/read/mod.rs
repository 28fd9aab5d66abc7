//! Read models of the domain.

pub mod rental;
pub mod vehicle;

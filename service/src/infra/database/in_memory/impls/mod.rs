//! Per-entity [`Database`] operation implementations of the [`InMemory`]
//! engine.
//!
//! [`Database`]: crate::infra::Database
//! [`InMemory`]: super::InMemory

mod purchase;
mod rental;
mod vehicle;

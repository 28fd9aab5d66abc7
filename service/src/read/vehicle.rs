//! [`Vehicle`] read model definitions.

#[cfg(doc)]
use crate::domain::Vehicle;

/// Selector of [`Vehicle`]s being presently claimable and listed for rent
/// or sale.
#[derive(Clone, Copy, Debug)]
pub struct Available;

/// Selector of [`Vehicle`]s listed for sale.
#[derive(Clone, Copy, Debug)]
pub struct ForSale;

/// Selector of [`Vehicle`]s being presently claimable and listed for rent.
#[derive(Clone, Copy, Debug)]
pub struct AvailableForRent;

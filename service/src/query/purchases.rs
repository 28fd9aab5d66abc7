//! [`Query`] collection related to the multiple [`Purchase`]s.

use common::operations::By;

use crate::domain::{customer, Purchase};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a list of all [`Purchase`]s.
pub type All = DatabaseQuery<By<Vec<Purchase>, ()>>;

/// Queries a list of [`Purchase`]s belonging to a [`Customer`] by their
/// [`customer::Email`].
///
/// [`Customer`]: crate::domain::Customer
pub type ByCustomerEmail = DatabaseQuery<By<Vec<Purchase>, customer::Email>>;

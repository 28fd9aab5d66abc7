//! [`Query`] collection related to a single [`Purchase`].

use common::operations::By;

use crate::domain::{purchase, Purchase};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Purchase`] by its [`purchase::Id`].
pub type ById = DatabaseQuery<By<Option<Purchase>, purchase::Id>>;

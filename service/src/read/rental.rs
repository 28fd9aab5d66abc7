//! [`Rental`] read model definitions.

#[cfg(doc)]
use crate::domain::Rental;

/// Wrapper around [`Rental`]s from which the cancelled ones are filtered
/// out.
///
/// This is the set overlap detection runs against: completed [`Rental`]s
/// still occupy their days, while cancelled ones never conflict.
#[derive(Clone, Debug)]
pub struct NotCancelled<T>(pub T);

/// Wrapper around [`Rental`]s indicating that every one [`is_active()`].
///
/// [`is_active()`]: Rental::is_active
#[derive(Clone, Debug)]
pub struct Active<T>(pub T);

//! [`Rental`] definitions.

use common::{define_kind, DateRange, Money};
use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{vehicle, Customer};
#[cfg(doc)]
use crate::domain::Vehicle;

/// Time-bounded reservation of a [`Vehicle`] by a [`Customer`].
#[derive(Clone, Debug)]
pub struct Rental {
    /// ID of this [`Rental`].
    pub id: Id,

    /// ID of the [`Vehicle`] this [`Rental`] reserves.
    pub vehicle_id: vehicle::Id,

    /// [`Customer`] this [`Rental`] belongs to.
    pub customer: Customer,

    /// [`DateRange`] this [`Rental`] reserves the [`Vehicle`] for, with both
    /// endpoints counting as occupied days.
    pub period: DateRange,

    /// Total price of this [`Rental`] over its whole period.
    pub total_price: Money,

    /// [`Status`] of this [`Rental`].
    pub status: Status,
}

impl Rental {
    /// Returns whether this [`Rental`] is active, i.e. hasn't reached a
    /// terminal [`Status`] yet.
    #[must_use]
    pub fn is_active(&self) -> bool {
        match self.status {
            Status::Pending | Status::Confirmed => true,
            Status::Completed | Status::Cancelled => false,
        }
    }

    /// Indicates whether this [`Rental`] occupies any day of the provided
    /// `period`.
    ///
    /// Cancelled [`Rental`]s never conflict.
    #[must_use]
    pub fn conflicts_with(&self, period: &DateRange) -> bool {
        self.status != Status::Cancelled && self.period.overlaps(period)
    }
}

/// Looks up a [`Rental`] occupying any day of the provided `period` among
/// the given ones.
#[must_use]
pub fn find_conflicting<'r>(
    rentals: &'r [Rental],
    period: &DateRange,
) -> Option<&'r Rental> {
    rentals.iter().find(|r| r.conflicts_with(period))
}

/// Computes the total price of renting for the provided `period` at the
/// given `daily_rate`, counting both endpoint days.
#[must_use]
pub fn quote(daily_rate: Money, period: &DateRange) -> Money {
    daily_rate.per_days(period.days())
}

/// ID of a [`Rental`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_kind! {
    #[doc = "Status of a [`Rental`]."]
    enum Status {
        #[doc = "Requested, but not confirmed yet."]
        Pending = 1,

        #[doc = "Confirmed and awaiting (or under) way."]
        Confirmed = 2,

        #[doc = "Finished, kept as a record."]
        Completed = 3,

        #[doc = "Cancelled, record is removed after side effects fire."]
        Cancelled = 4,
    }
}

impl Status {
    /// Checks whether a [`Rental`] may move from this [`Status`] to the
    /// provided one.
    #[must_use]
    pub fn allows_transition_to(self, to: Self) -> bool {
        match self {
            Self::Pending => {
                matches!(to, Self::Confirmed | Self::Cancelled)
            }
            Self::Confirmed => {
                matches!(to, Self::Completed | Self::Cancelled)
            }
            Self::Completed | Self::Cancelled => false,
        }
    }
}

#[cfg(test)]
mod spec {
    use super::Status;

    #[test]
    fn pending_may_be_confirmed_or_cancelled() {
        assert!(Status::Pending.allows_transition_to(Status::Confirmed));
        assert!(Status::Pending.allows_transition_to(Status::Cancelled));
        assert!(!Status::Pending.allows_transition_to(Status::Completed));
        assert!(!Status::Pending.allows_transition_to(Status::Pending));
    }

    #[test]
    fn confirmed_may_be_completed_or_cancelled() {
        assert!(Status::Confirmed.allows_transition_to(Status::Completed));
        assert!(Status::Confirmed.allows_transition_to(Status::Cancelled));
        assert!(!Status::Confirmed.allows_transition_to(Status::Pending));
    }

    #[test]
    fn terminal_statuses_allow_nothing() {
        for terminal in [Status::Completed, Status::Cancelled] {
            for to in [
                Status::Pending,
                Status::Confirmed,
                Status::Completed,
                Status::Cancelled,
            ] {
                assert!(!terminal.allows_transition_to(to));
            }
        }
    }
}

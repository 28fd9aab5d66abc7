//! [`Purchase`] definitions.

use common::{define_kind, Date, Money};
use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{customer, vehicle, Customer};
#[cfg(doc)]
use crate::domain::Vehicle;

/// Outright purchase of a [`Vehicle`] by a [`Customer`].
///
/// A [`Vehicle`] can have at most one live [`Purchase`].
#[derive(Clone, Debug)]
pub struct Purchase {
    /// ID of this [`Purchase`].
    pub id: Id,

    /// ID of the [`Vehicle`] being purchased.
    pub vehicle_id: vehicle::Id,

    /// [`Customer`] this [`Purchase`] belongs to.
    pub customer: Customer,

    /// Postal [`customer::Address`] the [`Customer`] provided.
    pub address: customer::Address,

    /// Price the [`Vehicle`] is being purchased for.
    pub price: Money,

    /// [`Date`] this [`Purchase`] was placed on.
    pub purchased_on: Date,

    /// [`PaymentMethod`] of this [`Purchase`].
    ///
    /// Recorded only, never charged.
    pub payment_method: PaymentMethod,

    /// [`Status`] of this [`Purchase`].
    pub status: Status,
}

/// ID of a [`Purchase`].
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
    #[doc = "Status of a [`Purchase`]."]
    enum Status {
        #[doc = "Placed, but not completed yet."]
        Pending = 1,

        #[doc = "Completed, the `Vehicle` stays claimed."]
        Completed = 2,

        #[doc = "Cancelled, record is removed after side effects fire."]
        Cancelled = 3,
    }
}

impl Status {
    /// Checks whether a [`Purchase`] may move from this [`Status`] to the
    /// provided one.
    #[must_use]
    pub fn allows_transition_to(self, to: Self) -> bool {
        match self {
            Self::Pending => {
                matches!(to, Self::Completed | Self::Cancelled)
            }
            Self::Completed | Self::Cancelled => false,
        }
    }
}

define_kind! {
    #[doc = "Payment method of a [`Purchase`]."]
    enum PaymentMethod {
        #[doc = "Cash."]
        Cash = 1,

        #[doc = "Credit card."]
        CreditCard = 2,

        #[doc = "Bank transfer."]
        BankTransfer = 3,

        #[doc = "Leasing."]
        Leasing = 4,
    }
}

//! [`Vehicle`] definitions.

use common::{define_kind, Money};
use derive_more::{AsRef, Display, Error, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::purchase;
#[cfg(doc)]
use crate::domain::{Purchase, Rental};

/// Vehicle of the fleet, available for rent, for sale, or both.
#[derive(Clone, Debug)]
pub struct Vehicle {
    /// ID of this [`Vehicle`].
    pub id: Id,

    /// [`Name`] of this [`Vehicle`].
    pub name: Name,

    /// [`Model`] of this [`Vehicle`].
    pub model: Model,

    /// [`Color`] of this [`Vehicle`].
    pub color: Color,

    /// Year this [`Vehicle`] was manufactured.
    pub year: Year,

    /// [`LicensePlate`] of this [`Vehicle`].
    pub license_plate: LicensePlate,

    /// [`Kind`] of this [`Vehicle`].
    pub kind: Kind,

    /// Price of renting this [`Vehicle`] for one day.
    pub daily_rate: Money,

    /// Price of buying this [`Vehicle`] outright.
    pub price: Money,

    /// Indicator whether this [`Vehicle`] is presently claimable.
    ///
    /// `false` whenever the [`Vehicle`] is committed to a live [`Purchase`].
    pub is_available: bool,

    /// Indicator whether this [`Vehicle`] is listed for sale.
    pub for_sale: bool,

    /// Indicator whether this [`Vehicle`] is listed for rent.
    pub for_rent: bool,

    /// ID of the live [`Purchase`] claiming this [`Vehicle`], if any.
    pub purchase_id: Option<purchase::Id>,

    /// URL of this [`Vehicle`]'s image, if any.
    pub image_url: Option<ImageUrl>,
}

impl Vehicle {
    /// Checks whether this [`Vehicle`] can presently be rented out.
    ///
    /// # Errors
    ///
    /// - [`ClaimError::NotForRent`] if this [`Vehicle`] is not listed for
    ///   rent.
    /// - [`ClaimError::Unavailable`] if this [`Vehicle`] is claimed already.
    pub fn ensure_rentable(&self) -> Result<(), ClaimError> {
        if !self.for_rent {
            return Err(ClaimError::NotForRent);
        }
        if !self.is_available {
            return Err(ClaimError::Unavailable);
        }
        Ok(())
    }

    /// Claims this [`Vehicle`] for the [`Purchase`] with the provided ID.
    ///
    /// The check and the flip of [`is_available`] are a single step. The
    /// caller must hold the per-[`Vehicle`] lock, so no other claim can
    /// interleave before the mutated [`Vehicle`] is committed.
    ///
    /// # Errors
    ///
    /// - [`ClaimError::AlreadyPurchased`] if a live [`Purchase`] claims this
    ///   [`Vehicle`] already.
    /// - [`ClaimError::NotForSale`] if this [`Vehicle`] is not listed for
    ///   sale.
    /// - [`ClaimError::Unavailable`] if this [`Vehicle`] is claimed by
    ///   something else.
    ///
    /// [`is_available`]: Vehicle::is_available
    pub fn claim_for_purchase(
        &mut self,
        purchase_id: purchase::Id,
    ) -> Result<(), ClaimError> {
        if self.purchase_id.is_some() {
            return Err(ClaimError::AlreadyPurchased);
        }
        if !self.for_sale {
            return Err(ClaimError::NotForSale);
        }
        if !self.is_available {
            return Err(ClaimError::Unavailable);
        }

        self.is_available = false;
        self.purchase_id = Some(purchase_id);
        Ok(())
    }

    /// Reverts the availability of this [`Vehicle`] after a claim ends.
    ///
    /// Listing flags are left untouched.
    pub fn release(&mut self) {
        self.is_available = true;
    }

    /// Returns a human-readable summary of this [`Vehicle`] for
    /// notifications.
    #[must_use]
    pub fn summary(&self) -> String {
        let Self {
            name,
            model,
            color,
            year,
            ..
        } = self;
        format!("{name} {model} ({year}, {color})")
    }
}

/// Error of claiming a [`Vehicle`].
#[derive(Clone, Copy, Debug, Display, Error, Eq, PartialEq)]
pub enum ClaimError {
    /// [`Vehicle`] is claimed by a live [`Purchase`] already.
    #[display("`Vehicle` has been purchased already")]
    AlreadyPurchased,

    /// [`Vehicle`] is not listed for rent.
    #[display("`Vehicle` is not listed for rent")]
    NotForRent,

    /// [`Vehicle`] is not listed for sale.
    #[display("`Vehicle` is not listed for sale")]
    NotForSale,

    /// [`Vehicle`] is not presently claimable.
    #[display("`Vehicle` is not currently available")]
    Unavailable,
}

/// ID of a [`Vehicle`].
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

/// Name of a [`Vehicle`] (usually its make).
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(forward)]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 256
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Model of a [`Vehicle`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(forward)]
pub struct Model(String);

impl Model {
    /// Creates a new [`Model`] if the given `model` is valid.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Option<Self> {
        let model = model.into();
        Self::check(&model).then_some(Self(model))
    }

    /// Checks whether the given `model` is a valid [`Model`].
    fn check(model: impl AsRef<str>) -> bool {
        let model = model.as_ref();
        model.trim() == model && !model.is_empty() && model.len() <= 256
    }
}

impl FromStr for Model {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Model`")
    }
}

/// Color of a [`Vehicle`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(forward)]
pub struct Color(String);

impl Color {
    /// Creates a new [`Color`] if the given `color` is valid.
    #[must_use]
    pub fn new(color: impl Into<String>) -> Option<Self> {
        let color = color.into();
        Self::check(&color).then_some(Self(color))
    }

    /// Checks whether the given `color` is a valid [`Color`].
    fn check(color: impl AsRef<str>) -> bool {
        let color = color.as_ref();
        color.trim() == color && !color.is_empty() && color.len() <= 64
    }
}

impl FromStr for Color {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Color`")
    }
}

/// Year a [`Vehicle`] was manufactured.
pub type Year = u16;

/// License plate of a [`Vehicle`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(forward)]
pub struct LicensePlate(String);

impl LicensePlate {
    /// Creates a new [`LicensePlate`] if the given `plate` is valid.
    #[must_use]
    pub fn new(plate: impl Into<String>) -> Option<Self> {
        let plate = plate.into();
        Self::check(&plate).then_some(Self(plate))
    }

    /// Checks whether the given `plate` is a valid [`LicensePlate`].
    fn check(plate: impl AsRef<str>) -> bool {
        let plate = plate.as_ref();
        plate.trim() == plate && !plate.is_empty() && plate.len() <= 16
    }
}

impl FromStr for LicensePlate {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `LicensePlate`")
    }
}

/// URL of a [`Vehicle`]'s image.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(forward)]
pub struct ImageUrl(String);

impl ImageUrl {
    /// Creates a new [`ImageUrl`] if the given `url` is valid.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Option<Self> {
        let url = url.into();
        Self::check(&url).then_some(Self(url))
    }

    /// Checks whether the given `url` is a valid [`ImageUrl`].
    fn check(url: impl AsRef<str>) -> bool {
        let url = url.as_ref();
        url.trim() == url && !url.is_empty() && url.len() <= 1000
    }
}

impl FromStr for ImageUrl {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `ImageUrl`")
    }
}

define_kind! {
    #[doc = "Kind of a [`Vehicle`]."]
    enum Kind {
        #[doc = "A sedan."]
        Sedan = 1,

        #[doc = "A sport utility vehicle."]
        Suv = 2,

        #[doc = "A hatchback."]
        Hatchback = 3,

        #[doc = "A convertible."]
        Convertible = 4,

        #[doc = "A sports car."]
        Sports = 5,

        #[doc = "A minivan."]
        Minivan = 6,

        #[doc = "A pickup truck."]
        Pickup = 7,
    }
}

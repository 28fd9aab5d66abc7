//! [`Mailer`]-related implementations.

use std::convert::Infallible;

use common::{operations::Perform, DateRange, Money};
use tracing as log;

use crate::domain::customer;
#[cfg(doc)]
use crate::domain::{Customer, Purchase, Rental, Vehicle};

/// Notification dispatch.
///
/// Dispatch is fire-and-forget: callers log delivery failures and never let
/// them fail the state transition that triggered the [`Notification`].
pub use common::Handler as Mailer;

/// Notification to be delivered to a [`Customer`].
#[derive(Clone, Debug)]
pub struct Notification {
    /// Address to deliver this [`Notification`] to.
    pub recipient: customer::Email,

    /// Name of the [`Customer`] being addressed.
    pub customer: customer::Name,

    /// Human-readable summary of the [`Vehicle`] involved.
    pub vehicle: String,

    /// [`Event`] this [`Notification`] is about.
    pub event: Event,
}

/// Meaningful transition a [`Notification`] is emitted about.
///
/// Every transition emits its [`Event`] exactly once.
#[derive(Clone, Copy, Debug)]
pub enum Event {
    /// [`Rental`] was confirmed or completed.
    RentalConfirmed {
        /// Period the [`Vehicle`] is reserved for.
        period: DateRange,

        /// Total price over the whole period.
        total_price: Money,
    },

    /// [`Rental`] was cancelled.
    RentalCancelled {
        /// Period the [`Vehicle`] was reserved for.
        period: DateRange,
    },

    /// [`Purchase`] was completed.
    PurchaseConfirmed {
        /// Price the [`Vehicle`] was purchased for.
        total_price: Money,
    },

    /// [`Purchase`] was cancelled.
    PurchaseCancelled,
}

/// [`Mailer`] writing [`Notification`]s to the log instead of delivering
/// them.
#[derive(Clone, Copy, Debug, Default)]
pub struct Log;

impl Mailer<Perform<Notification>> for Log {
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Perform(notification): Perform<Notification>,
    ) -> Result<Self::Ok, Self::Err> {
        let Notification {
            recipient,
            customer,
            vehicle,
            event,
        } = notification;

        match event {
            Event::RentalConfirmed {
                period,
                total_price,
            } => {
                log::info!(
                    %recipient,
                    "rental of {vehicle} for {period} ({total_price}) \
                     confirmed for {customer}",
                );
            }
            Event::RentalCancelled { period } => {
                log::info!(
                    %recipient,
                    "rental of {vehicle} for {period} cancelled \
                     for {customer}",
                );
            }
            Event::PurchaseConfirmed { total_price } => {
                log::info!(
                    %recipient,
                    "purchase of {vehicle} ({total_price}) confirmed \
                     for {customer}",
                );
            }
            Event::PurchaseCancelled => {
                log::info!(
                    %recipient,
                    "purchase of {vehicle} cancelled for {customer}",
                );
            }
        }

        Ok(())
    }
}

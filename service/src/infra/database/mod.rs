//! [`Database`]-related implementations.

pub mod in_memory;

use derive_more::{Display, Error as StdError, From};

pub use self::in_memory::InMemory;

/// Database operation.
pub use common::Handler as Database;

/// [`Database`] error.
#[derive(Clone, Copy, Debug, Display, From, StdError)]
pub enum Error {
    /// [`InMemory`] engine error.
    InMemory(in_memory::Error),
}

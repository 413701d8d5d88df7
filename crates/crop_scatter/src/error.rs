//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid configuration, invalid category weights, unsupported category reassignment
//! and failures reported by the scene host.
use thiserror::Error;

use crate::host::HostError;
use crate::sampling::category::CategoryId;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid weight {weight} for category '{id}'")]
    InvalidWeight { id: CategoryId, weight: f64 },

    #[error("category set is empty")]
    EmptyCategorySet,

    #[error("cannot reassign placement {handle} from '{from}' to '{to}': handle is pose-only")]
    UnsupportedReassignment {
        handle: u64,
        from: CategoryId,
        to: CategoryId,
    },

    #[error("unknown {group} placement at index {index}")]
    UnknownPlacement { group: &'static str, index: usize },

    #[error(transparent)]
    Host(#[from] HostError),

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}

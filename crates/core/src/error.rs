use thiserror::Error;

use crate::config::ConfigError;

/// A placement that could not be computed this frame.
///
/// Hosts recover by hiding the overlay and retrying on the next trigger;
/// none of these reach the end user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("target element {id:?} is not present")]
    MissingTarget { id: String },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("placement: {0}")]
    Placement(#[from] PlacementError),
    #[error("config: {0}")]
    Config(#[from] ConfigError),
}

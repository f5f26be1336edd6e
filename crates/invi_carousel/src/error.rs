//! Carousel error types

use invi_core::ConfigError;
use invi_platform::PlatformError;
use thiserror::Error;

/// Errors raised while building or re-querying a carousel
///
/// Slide operations never fail with an error; they resolve their
/// [`MoveOutcome`](crate::MoveOutcome) to `false` instead.
#[derive(Error, Debug)]
pub enum CarouselError {
    /// Nothing under the host element matches the item selector
    #[error("no element matches item selector `{selector}`")]
    NoItems {
        /// The configured item selector
        selector: String,
    },

    /// The first matched item has no parent to act as the sliding container
    #[error("carousel items have no container element")]
    Detached,

    /// Settings could not be resolved
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The host rejected a setup mutation
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// Result type for carousel construction
pub type Result<T> = std::result::Result<T, CarouselError>;

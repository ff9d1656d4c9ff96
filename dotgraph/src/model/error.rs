//! Errors raised by the object model.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// An edge needs at least two endpoints after empty ids and empty
    /// groups have been dropped.
    #[error("An edge requires at least two targets, got {0}")]
    NotEnoughTargets(usize),
}

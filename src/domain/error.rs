//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::RoomId;

/// Domain errors represent violations of the room structure rules.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("room {parent} is already connected to two rooms")]
    TooManyChildren { parent: RoomId },

    #[error("room {0} appears more than once in the structure")]
    DuplicateId(RoomId),

    #[error("room id 0 is reserved for absent connections")]
    InvalidId,

    #[error("room ids must be exactly 1..={count}, missing: {missing:?}")]
    NonContiguousIds { count: usize, missing: Vec<RoomId> },

    #[error("malformed preorder sequence: {reason}")]
    MalformedPreorder { reason: String },

    #[error("internal structure operation failed: {0}")]
    Internal(String),
}

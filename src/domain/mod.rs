//! Domain layer: room structure, encoding rules and test-line rules
//!
//! This layer is independent of external concerns (no file access, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
pub mod preorder;

pub use arena::{Dimensions, Room, RoomId, Structure, StructureResult, NO_ROOM};
pub use builder::StructureBuilder;
pub use entities::*;
pub use error::DomainError;
pub use preorder::{decode_preorder, write_structure, PreorderShape};

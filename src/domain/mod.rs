//! Domain layer: entities and tree algorithms
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod instruction;
pub mod tree;

pub use entities::*;
pub use error::{DomainError, TreeResult};
pub use instruction::{
    is_legal_parent, resolve, Destination, Instruction, InstructionKind, Resolution,
    DEFAULT_INDENT_PER_LEVEL,
};
pub use tree::{Tree, TreeIter};

//! Application layer: reducer and services
//!
//! This layer turns actions into tree revisions and derives the queries the
//! presentation layer and dialogs consume. It performs no I/O.

pub mod error;
pub mod reducer;
pub mod services;

pub use error::{ApplicationError, ApplicationResult, FormError};
pub use reducer::{reduce, Reduction, TreeAction};

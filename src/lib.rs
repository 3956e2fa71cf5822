//! dragtree: a drag-and-drop tree mutation engine.
//!
//! Items live in a forest of labeled, coloured nodes. Drop gestures arrive as
//! [`domain::Instruction`]s, get resolved against the current tree and are
//! committed through a single reducer, [`application::reduce`].
//!
//! Layers:
//! - [`domain`]: tree model and instruction interpretation (pure)
//! - [`application`]: reducer, store, derived queries, drag sessions, forms
//! - [`infrastructure`]: seed/script loading, dependency wiring
//! - [`cli`]: the `dragtree` command line

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

//! trellis-core
//!
//! Pure domain types, validation, and tree operations for assessment form
//! schemas. No storage or network dependency — this is the shared
//! vocabulary of the Trellis system.

pub mod model;
pub mod tree;
pub mod validate;

//! # Error Handling
//!
//! Error handling for the meshplane push core. Collaborator failures surface
//! as [`Error::Generation`] and are passed through the generators untouched.

mod types;

pub use types::{Error, Result};

// src/utils/mod.rs
//! Common utilities and helpers

pub mod errors;
pub mod paths;

pub use errors::{Result, StrutError};

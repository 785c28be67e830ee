//! Common types, protocol definitions, and errors shared across `rh-api` crates.

pub mod error;
pub mod protocol;

pub use error::ServiceError;

//! # SOA Domain
//!
//! Domain entities shared between the service and repository layers.

pub mod entities;

pub use entities::*;

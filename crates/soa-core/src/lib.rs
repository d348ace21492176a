//! # SOA Core
//!
//! Core types, traits, and error definitions for the enterprise SOA user
//! service. This crate provides the foundational abstractions shared by the
//! repository, service, and server layers: the `User` record, typed IDs,
//! the unified error type, and the explicit transaction boundary.

pub mod domain;
pub mod error;
pub mod id;
pub mod result;
pub mod telemetry;
pub mod transaction;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use result::*;
pub use transaction::*;

// Re-export shaku for dependency injection
pub use shaku::{module, Component, HasComponent, Interface};

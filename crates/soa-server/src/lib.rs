//! # SOA Server
//!
//! Wires configuration, the DAO backend, the transaction manager, and the
//! user service together.

pub mod app;
pub mod di;

pub use app::run;
pub use di::{InMemoryModule, MySqlModule, ServiceModule};

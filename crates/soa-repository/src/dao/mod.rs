//! DAO (Data Access Object) layer.
//!
//! DAOs provide low-level, single-source data access abstractions.
//! Each DAO implementation maps to one data source.
//!
//! Hierarchy:
//! ```text
//! Service → DAO (interface + impl) → memory / DB
//! ```

pub mod r#impl;
pub mod user_dao;

pub use r#impl::{InMemoryUserDao, InMemoryUserDaoParameters, MySqlUserDaoImpl};
pub use user_dao::UserDao;

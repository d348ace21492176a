//! # SOA Service
//!
//! User service layer. Exposes the [`UserService`] contract, its plain
//! implementation over a [`soa_repository::UserDao`], and the transaction
//! boundary applied around every call.

pub mod r#impl;
pub mod transactional;
pub mod user_service;

pub use r#impl::{UserServiceComponent, UserServiceComponentParameters, UserServiceImpl};
pub use transactional::Transactional;
pub use user_service::*;

//! # SOA Repository
//!
//! Data access layer for the user service:
//!
//! ```text
//! Service
//!   ↓  Arc<dyn UserDao>             (DAO interface)
//! InMemoryUserDao | MySqlUserDaoImpl
//!   ↓
//! memory | MySQL
//! ```
//!
//! ## Structure
//!
//! ```text
//! src/
//!   pool.rs                      ← DatabasePool
//!   transaction.rs               ← MySqlTransactionManager
//!   dao/
//!     user_dao.rs                ← UserDao trait
//!     impl/
//!       memory/user_dao_impl.rs  ← InMemoryUserDao
//!       mysql/user_dao_impl.rs   ← MySqlUserDaoImpl
//! ```

pub mod dao;
pub mod pool;
pub mod transaction;

pub use dao::{InMemoryUserDao, InMemoryUserDaoParameters, MySqlUserDaoImpl, UserDao};
pub use pool::*;
pub use transaction::*;

//! MySQL DAO implementations using SQLx.

mod user_dao_impl;

pub use user_dao_impl::MySqlUserDaoImpl;

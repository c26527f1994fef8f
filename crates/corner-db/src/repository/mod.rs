//! # Repository Modules
//!
//! One repository per aggregate. Repositories hold a pool clone for
//! standalone operations; multi-table flows (checkout, resume, return) use
//! the `*_tx` associated functions, which run on a caller-owned
//! `SqliteConnection` so everything commits or rolls back together.

pub mod customer;
pub mod held_sale;
pub mod inventory;
pub mod product;
pub mod sale;
pub mod settings;

//! # Corner POS — Database Layer
//!
//! SQLite persistence for the Corner POS engine, built on sqlx.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           corner-db                                     │
//! │                                                                         │
//! │  corner-engine services                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database (pool.rs) ── owns the SqlitePool                              │
//! │       │                                                                 │
//! │       ├──► ProductRepository     (repository/product.rs)                │
//! │       ├──► InventoryRepository   (repository/inventory.rs)              │
//! │       ├──► CustomerRepository    (repository/customer.rs)               │
//! │       ├──► SaleRepository        (repository/sale.rs)                   │
//! │       ├──► HeldSaleRepository    (repository/held_sale.rs)              │
//! │       └──► SettingsRepository    (repository/settings.rs)               │
//! │                                                                         │
//! │  Counter updates (stock, loyalty points) are relative deltas            │
//! │  (`SET x = x + ?`), never read-modify-write, so concurrent sales        │
//! │  cannot clobber each other.                                             │
//! │                                                                         │
//! │  Multi-table operations (checkout, resume, return) run inside one       │
//! │  sqlx transaction: repositories expose `*_tx` variants that take        │
//! │  `&mut SqliteConnection` for that purpose.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! - **Repository pattern**: one repository per aggregate, thin SQL inside
//! - **No business logic**: pricing and cart rules live in corner-core
//! - **Embedded migrations**: schema ships inside the binary

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::customer::CustomerRepository;
pub use repository::held_sale::HeldSaleRepository;
pub use repository::inventory::InventoryRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
pub use repository::settings::SettingsRepository;

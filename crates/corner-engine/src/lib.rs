//! # corner-engine: Register Orchestration for Corner POS
//!
//! The services a register shell drives: catalog snapshot, checkout,
//! suspended sales, and returns. Pure computation stays in corner-core;
//! row movement stays in corner-db; this crate sequences the two.
//!
//! ## Architecture Position
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │   UI shell (out of scope)                                          │
//! │        │                                                           │
//! │        ▼                                                           │
//! │  ★ corner-engine (THIS CRATE) ★                                    │
//! │                                                                    │
//! │   ┌──────────────┐ ┌──────────────┐ ┌─────────────┐ ┌───────────┐  │
//! │   │   catalog    │ │   checkout   │ │    holds    │ │  returns  │  │
//! │   │   snapshot   │ │ orchestrator │ │   manager   │ │   flow    │  │
//! │   └──────────────┘ └──────────────┘ └─────────────┘ └───────────┘  │
//! │        │                  │               │              │         │
//! │        ▼                  ▼               ▼              ▼         │
//! │   corner-core (pure math) + corner-db (SQLite repositories)        │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every multi-table write runs in a single SQLite transaction; a failure
//! anywhere in a flow leaves the database exactly as it was.

pub mod catalog;
pub mod checkout;
pub mod error;
pub mod holds;
pub mod returns;

pub use catalog::CatalogSnapshot;
pub use checkout::{CheckoutOutcome, CheckoutRequest, CheckoutService};
pub use error::{CheckoutError, HoldError, ReturnError};
pub use holds::HoldService;
pub use returns::ReturnService;

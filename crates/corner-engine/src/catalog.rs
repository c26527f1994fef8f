//! # Catalog Snapshot
//!
//! An in-memory, read-only view of the sellable catalog, loaded once when
//! the register opens.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │  Database ──load()──► CatalogSnapshot                              │
//! │                          ├── products   (active only, by id)       │
//! │                          ├── categories                            │
//! │                          └── stock      (product_id → count)       │
//! │                                                                    │
//! │  The register browses and scans against this snapshot; authorative │
//! │  stock still lives in the database and is mutated there by         │
//! │  checkout/return deltas. Displayed counts are advisory.            │
//! └────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use tracing::info;

use corner_core::{Category, Product};
use corner_db::{Database, DbResult};

/// A point-in-time view of active products, categories, and stock levels.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    products: Vec<Product>,
    categories: Vec<Category>,
    /// product_id → current_stock for products with an inventory record.
    stock: HashMap<String, i64>,
}

impl CatalogSnapshot {
    /// Loads the snapshot from the database.
    pub async fn load(db: &Database) -> DbResult<Self> {
        let products = db.products().list_active().await?;
        let categories = db.products().list_categories().await?;

        let stock = db
            .inventory()
            .list_all()
            .await?
            .into_iter()
            .map(|r| (r.product_id, r.current_stock))
            .collect::<HashMap<_, _>>();

        info!(
            products = products.len(),
            categories = categories.len(),
            tracked = stock.len(),
            "Catalog snapshot loaded"
        );

        Ok(CatalogSnapshot {
            products,
            categories,
            stock,
        })
    }

    /// All active products, ordered by name.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// All categories, ordered by name.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Finds a product by id.
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Finds a product by barcode (scanner path).
    pub fn find_by_barcode(&self, barcode: &str) -> Option<&Product> {
        self.products
            .iter()
            .find(|p| p.barcode.as_deref() == Some(barcode))
    }

    /// Active products in one category.
    pub fn products_in_category(&self, category_id: &str) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category_id.as_deref() == Some(category_id))
            .collect()
    }

    /// Advisory stock count for a product; `None` when untracked.
    pub fn stock(&self, product_id: &str) -> Option<i64> {
        self.stock.get(product_id).copied()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

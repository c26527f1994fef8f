//! # Database Seeder
//!
//! Populates a development database with sample catalog, stock, and
//! customer data for manual testing of the register flows.
//!
//! ## Usage
//! ```bash
//! cargo run -p corner-db --bin seed              # seeds ./corner-dev.db
//! DATABASE_PATH=/tmp/demo.db cargo run -p corner-db --bin seed
//! ```
//!
//! Idempotence: the seeder refuses to run against a database that already
//! has products, so re-running it never duplicates the catalog.

use chrono::Utc;
use tracing::info;

use corner_core::Product;
use corner_db::{Database, DbConfig};

// (name, price_cents, cost_cents, unit, barcode, stock, min_stock)
const SAMPLE_PRODUCTS: &[(&str, i64, i64, &str, Option<&str>, i64, i64)] = &[
    ("Chai Patti 500g", 54_000, 48_000, "pcs", Some("8964000000017"), 40, 10),
    ("Milk 1L", 22_000, 19_500, "pcs", Some("8964000000024"), 60, 20),
    ("Bread Large", 16_000, 13_000, "pcs", None, 25, 8),
    ("Eggs (dozen)", 33_000, 30_000, "pcs", None, 30, 10),
    ("Basmati Rice 5kg", 230_000, 205_000, "pcs", Some("8964000000086"), 15, 5),
    ("Cooking Oil 1L", 58_000, 52_000, "ltr", Some("8964000000093"), 20, 6),
    ("Sugar 1kg", 15_000, 13_500, "kg", None, 50, 15),
    ("Lays Masala 40g", 5_000, 4_200, "pcs", Some("8964000000109"), 120, 30),
    ("Coca-Cola 1.5L", 18_000, 15_500, "pcs", Some("5449000054227"), 48, 12),
    ("Surf Excel 1kg", 65_000, 58_000, "pcs", Some("8964000000123"), 18, 6),
];

const SAMPLE_CUSTOMERS: &[(&str, Option<&str>)] = &[
    ("Fatima Noor", Some("0300-1234567")),
    ("Ali Raza", Some("0321-7654321")),
    ("Sana Tariq", None),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let path = std::env::var("DATABASE_PATH").unwrap_or_else(|_| "./corner-dev.db".to_string());
    info!(path = %path, "Seeding database");

    let db = Database::new(DbConfig::new(&path)).await?;

    if !db.products().list_active().await?.is_empty() {
        info!("Database already has products, nothing to do");
        return Ok(());
    }

    let grocery = db.products().insert_category("Grocery").await?;

    for &(name, price, cost, unit, barcode, stock, min_stock) in SAMPLE_PRODUCTS {
        let product = db
            .products()
            .insert(Product {
                id: String::new(),
                name: name.to_string(),
                price_cents: price,
                cost_cents: Some(cost),
                category_id: Some(grocery.id.clone()),
                barcode: barcode.map(String::from),
                unit: unit.to_string(),
                is_active: true,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .await?;

        db.inventory()
            .upsert(&product.id, stock, min_stock, stock * 2)
            .await?;
    }

    for &(name, phone) in SAMPLE_CUSTOMERS {
        db.customers().insert(name, phone, None).await?;
    }

    info!(
        products = SAMPLE_PRODUCTS.len(),
        customers = SAMPLE_CUSTOMERS.len(),
        "Seed complete"
    );

    db.close().await;
    Ok(())
}

//! # Product Repository
//!
//! Database operations for products and categories.
//!
//! The active product list feeds the catalog snapshot the register browses;
//! barcode lookup serves the scanner path. Products are soft-deleted
//! (`is_active = 0`) so historical sale lines keep a resolvable reference.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use corner_core::{Category, Product};

const PRODUCT_COLUMNS: &str = "id, name, price_cents, cost_cents, category_id, barcode, unit, \
     is_active, created_at, updated_at";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
/// let products = repo.list_active().await?;
/// let scanned = repo.get_by_barcode("5449000000996").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Fetches a product by id, active or not.
    pub async fn get(&self, id: &str) -> DbResult<Product> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");

        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Looks up an active product by barcode (scanner path).
    pub async fn get_by_barcode(&self, barcode: &str) -> DbResult<Option<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE barcode = ?1 AND is_active = 1"
        );

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(barcode)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Lists all active products, ordered by name.
    pub async fn list_active(&self) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE is_active = 1 ORDER BY name"
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Listed active products");
        Ok(products)
    }

    /// Lists active products in a category, ordered by name.
    pub async fn list_by_category(&self, category_id: &str) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE category_id = ?1 AND is_active = 1 ORDER BY name"
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(category_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Inserts a new product and returns it.
    pub async fn insert(&self, mut product: Product) -> DbResult<Product> {
        if product.id.is_empty() {
            product.id = Uuid::new_v4().to_string();
        }
        let now = Utc::now();
        product.created_at = now;
        product.updated_at = now;

        sqlx::query(
            "INSERT INTO products \
             (id, name, price_cents, cost_cents, category_id, barcode, unit, \
              is_active, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.cost_cents)
        .bind(&product.category_id)
        .bind(&product.barcode)
        .bind(&product.unit)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        debug!(product_id = %product.id, name = %product.name, "Inserted product");
        Ok(product)
    }

    /// Updates an existing product's mutable fields.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE products \
             SET name = ?2, price_cents = ?3, cost_cents = ?4, category_id = ?5, \
                 barcode = ?6, unit = ?7, is_active = ?8, updated_at = ?9 \
             WHERE id = ?1",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.cost_cents)
        .bind(&product.category_id)
        .bind(&product.barcode)
        .bind(&product.unit)
        .bind(product.is_active)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }
        Ok(())
    }

    /// Soft-deletes a product. History keeps its sale-line snapshots.
    pub async fn deactivate(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE products SET is_active = 0, updated_at = ?2 WHERE id = ?1",
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        debug!(product_id = %id, "Deactivated product");
        Ok(())
    }

    /// Lists all categories, ordered by name.
    pub async fn list_categories(&self) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, created_at FROM categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Inserts a category. Names are unique.
    pub async fn insert_category(&self, name: &str) -> DbResult<Category> {
        let category = Category {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        };

        sqlx::query("INSERT INTO categories (id, name, created_at) VALUES (?1, ?2, ?3)")
            .bind(&category.id)
            .bind(&category.name)
            .bind(category.created_at)
            .execute(&self.pool)
            .await?;

        Ok(category)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;
    use corner_core::Product;

    fn chai(barcode: Option<&str>) -> Product {
        Product {
            id: String::new(),
            name: "Chai Patti 500g".to_string(),
            price_cents: 54_000,
            cost_cents: Some(48_000),
            category_id: None,
            barcode: barcode.map(String::from),
            unit: "pcs".to_string(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn insert_and_get_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let inserted = repo.insert(chai(None)).await.unwrap();
        let fetched = repo.get(&inserted.id).await.unwrap();

        assert_eq!(fetched.name, "Chai Patti 500g");
        assert_eq!(fetched.price_cents, 54_000);
        assert_eq!(fetched.cost_cents, Some(48_000));
    }

    #[tokio::test]
    async fn barcode_lookup_skips_inactive() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let product = repo.insert(chai(Some("8964000000017"))).await.unwrap();
        assert!(repo.get_by_barcode("8964000000017").await.unwrap().is_some());

        repo.deactivate(&product.id).await.unwrap();
        assert!(repo.get_by_barcode("8964000000017").await.unwrap().is_none());

        // Still resolvable by id for history
        assert!(!repo.get(&product.id).await.unwrap().is_active);
    }

    #[tokio::test]
    async fn list_active_excludes_deactivated() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let a = repo.insert(chai(None)).await.unwrap();
        let mut other = chai(None);
        other.name = "Biscuit".to_string();
        repo.insert(other).await.unwrap();

        repo.deactivate(&a.id).await.unwrap();

        let active = repo.list_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Biscuit");
    }

    #[tokio::test]
    async fn duplicate_category_name_is_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        repo.insert_category("Beverages").await.unwrap();
        let err = repo.insert_category("Beverages").await.unwrap_err();

        assert!(matches!(err, crate::DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn get_unknown_product_is_not_found() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db.products().get("missing").await.unwrap_err();
        assert!(matches!(err, crate::DbError::NotFound { .. }));
    }
}

//! # Settings Repository
//!
//! The single configuration row (id = 1), seeded by the initial migration.
//! Services load it once at the start of a flow and treat the value as an
//! immutable snapshot for the rest of that flow.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use corner_core::Settings;

/// Repository for the singleton settings row.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    /// Creates a new SettingsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository { pool }
    }

    /// Loads the settings snapshot.
    pub async fn load(&self) -> DbResult<Settings> {
        let settings = sqlx::query_as::<_, Settings>(
            "SELECT currency_code, tax_enabled, tax_rate_bps, tax_label, \
                    loyalty_enabled, points_per_100, redeem_rate_cents \
             FROM settings WHERE id = 1",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(settings)
    }

    /// Saves the settings row. In-flight flows keep the snapshot they
    /// loaded; the new values apply from the next flow on.
    pub async fn save(&self, settings: &Settings) -> DbResult<()> {
        sqlx::query(
            "UPDATE settings \
             SET currency_code = ?1, tax_enabled = ?2, tax_rate_bps = ?3, \
                 tax_label = ?4, loyalty_enabled = ?5, points_per_100 = ?6, \
                 redeem_rate_cents = ?7 \
             WHERE id = 1",
        )
        .bind(&settings.currency_code)
        .bind(settings.tax_enabled)
        .bind(settings.tax_rate_bps)
        .bind(&settings.tax_label)
        .bind(settings.loyalty_enabled)
        .bind(settings.points_per_100)
        .bind(settings.redeem_rate_cents)
        .execute(&self.pool)
        .await?;

        debug!("Saved settings");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

use std::str::FromStr as _;

use tracing::{debug, error};

use crate::model::TenantData;

use super::TenantRepository;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] sqlx::Error),
    #[error("malformed tenant payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Tenant payloads in a local SQLite database.
#[derive(Debug, Clone)]
pub struct LocalTenantDb {
    pool: sqlx::SqlitePool,
}

#[derive(sqlx::FromRow)]
struct TenantRow {
    data: String,
}

#[derive(sqlx::FromRow)]
struct FingerprintRow {
    fingerprint: String,
}

fn fingerprint(document: &str) -> String {
    blake3::hash(document.as_bytes()).to_hex().to_string()
}

impl LocalTenantDb {
    pub async fn open(url: &str) -> Result<Self, sqlx::Error> {
        let options = sqlx::sqlite::SqliteConnectOptions::from_str(url)
            .inspect_err(|error| error!(%error, %url, "Failed to open tenant db"))?
            .create_if_missing(true);
        let pool = sqlx::pool::PoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .inspect_err(|error| error!(%error, %url, "Failed to open tenant db"))?;
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tenants(
                tenant_id TEXT NOT NULL PRIMARY KEY,
                data TEXT NOT NULL,
                fingerprint TEXT NOT NULL
            );
        "#,
        )
        .execute(&pool)
        .await
        .inspect_err(|error| error!(%error, %url, "Failed to execute DDL to tenant db"))?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &sqlx::SqlitePool {
        &self.pool
    }

    pub async fn tenants(&self) -> Result<Vec<String>, Error> {
        let ids =
            sqlx::query_scalar::<_, String>("SELECT tenant_id FROM tenants ORDER BY tenant_id")
                .fetch_all(&self.pool)
                .await?;
        Ok(ids)
    }
}

impl TenantRepository for LocalTenantDb {
    type Error = Error;

    async fn load(&self, tenant_id: &str) -> Result<Option<TenantData>, Self::Error> {
        let row = sqlx::query_as::<_, TenantRow>("SELECT data FROM tenants WHERE tenant_id = ?")
            .bind(tenant_id)
            .fetch_optional(&self.pool)
            .await
            .inspect_err(|error| error!(%error, tenant_id, "Failed to load tenant"))?;
        match row {
            Some(row) => Ok(Some(serde_json::from_str(&row.data)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, tenant_id: &str, data: &TenantData) -> Result<bool, Self::Error> {
        let document = serde_json::to_string(data)?;
        let fingerprint = fingerprint(&document);
        let stored = sqlx::query_as::<_, FingerprintRow>(
            "SELECT fingerprint FROM tenants WHERE tenant_id = ?",
        )
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;
        if stored.is_some_and(|row| row.fingerprint == fingerprint) {
            debug!(tenant_id, "tenant payload unchanged");
            return Ok(false);
        }
        sqlx::query(
            r#"
            INSERT INTO tenants(tenant_id, data, fingerprint) VALUES (?, ?, ?)
            ON CONFLICT(tenant_id) DO UPDATE SET
                data = excluded.data,
                fingerprint = excluded.fingerprint
        "#,
        )
        .bind(tenant_id)
        .bind(&document)
        .bind(&fingerprint)
        .execute(&self.pool)
        .await
        .inspect_err(|error| error!(%error, tenant_id, "Failed to save tenant"))?;
        debug!(tenant_id, %fingerprint, "saved tenant payload");
        Ok(true)
    }
}

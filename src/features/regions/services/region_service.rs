use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::regions::models::{summarize, DesaName, KecamatanSummary};
use crate::shared::constants::canonical_kecamatan;

/// Kecamatan of Kabupaten Pacitan and the villages registered in them
pub struct RegionService {
    pool: PgPool,
}

impl RegionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_kecamatan(&self) -> Result<Vec<KecamatanSummary>> {
        let desa_counts = sqlx::query_as::<_, (String, i64)>(
            "SELECT kecamatan, COUNT(*) FROM desa GROUP BY kecamatan",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count desa per kecamatan: {:?}", e);
            AppError::Database(e)
        })?;

        let location_counts = sqlx::query_as::<_, (String, i64)>(
            "SELECT kecamatan, COUNT(*) FROM locations WHERE status = 'approved' GROUP BY kecamatan",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count locations per kecamatan: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(summarize(&desa_counts, &location_counts))
    }

    pub async fn list_desa(&self, kecamatan: &str) -> Result<Vec<DesaName>> {
        let kecamatan = canonical_kecamatan(kecamatan).ok_or_else(|| {
            AppError::NotFound(format!(
                "Kecamatan '{}' tidak ada di Kabupaten Pacitan",
                kecamatan
            ))
        })?;

        sqlx::query_as::<_, DesaName>(
            "SELECT id, name FROM desa WHERE kecamatan = $1 ORDER BY name",
        )
        .bind(kecamatan)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list desa of {}: {:?}", kecamatan, e);
            AppError::Database(e)
        })
    }
}

//! Database Module
//!
//! Embedded SurrealDB storage (RocksDB engine on disk, in-memory for tests)

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::utils::AppError;

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        let service = Self::select_namespace(db).await?;
        tracing::info!("Database connection established (SurrealDB RocksDB)");
        Ok(service)
    }

    /// In-memory database (test scenarios)
    pub async fn memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
        Self::select_namespace(db).await
    }

    async fn select_namespace(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns("campus")
            .use_db("campus")
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;
        Ok(Self { db })
    }
}

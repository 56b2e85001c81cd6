//! File metadata repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::file::StoredFile;
use crate::utils::errors::EventHubError;

const FILE_COLUMNS: &str =
    "id, original_name, filename, mime_type, size, path, uploaded_by, created_at";

#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record an uploaded file
    pub async fn create(
        &self,
        original_name: &str,
        filename: &str,
        mime_type: &str,
        size: i64,
        path: &str,
        uploaded_by: i64,
    ) -> Result<StoredFile, EventHubError> {
        let file = sqlx::query_as::<_, StoredFile>(&format!(
            r#"
            INSERT INTO files (original_name, filename, mime_type, size, path, uploaded_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {FILE_COLUMNS}
            "#
        ))
        .bind(original_name)
        .bind(filename)
        .bind(mime_type)
        .bind(size)
        .bind(path)
        .bind(uploaded_by)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(file)
    }

    /// Find file by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<StoredFile>, EventHubError> {
        let file = sqlx::query_as::<_, StoredFile>(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(file)
    }

    /// Delete file metadata
    pub async fn delete(&self, id: i64) -> Result<(), EventHubError> {
        sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

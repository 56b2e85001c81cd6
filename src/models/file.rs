//! Stored file model
//!
//! Metadata stub for the file collaborator; upload plumbing lives outside
//! this crate. The core only needs enough to cascade-delete cover images.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StoredFile {
    pub id: i64,
    pub original_name: String,
    pub filename: String,
    pub mime_type: String,
    pub size: i64,
    pub path: String,
    pub uploaded_by: i64,
    pub created_at: DateTime<Utc>,
}

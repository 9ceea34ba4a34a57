use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{ConversionRepository, ConversionUpdate, RepositoryError};
use crate::domain::{ArtifactKey, Conversion, ConversionId, ConversionStatus, SessionId};

pub struct PgConversionRepository {
    pool: PgPool,
}

impl PgConversionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_row(row: &PgRow) -> Result<Conversion, RepositoryError> {
    let status: String = row
        .try_get("status")
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
    let status = ConversionStatus::from_str(&status).map_err(RepositoryError::QueryFailed)?;

    let id: Uuid = row
        .try_get("id")
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
    let session_id: String = row
        .try_get("session_id")
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
    let source_url: String = row
        .try_get("source_url")
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
    let title: Option<String> = row
        .try_get("title")
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
    let audio_artifact_key: Option<String> = row
        .try_get("audio_artifact_key")
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
    let transcript: Option<String> = row
        .try_get("transcript")
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
    let error_message: Option<String> = row
        .try_get("error_message")
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
    let updated_at: DateTime<Utc> = row
        .try_get("updated_at")
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

    Ok(Conversion {
        id: ConversionId::from_uuid(id),
        session_id: SessionId::new(session_id),
        source_url,
        status,
        title,
        audio_artifact: audio_artifact_key.map(ArtifactKey::from_raw),
        transcript,
        error_message,
        created_at,
        updated_at,
    })
}

#[async_trait]
impl ConversionRepository for PgConversionRepository {
    #[instrument(skip(self, conversion), fields(conversion_id = %conversion.id.as_uuid()))]
    async fn create(&self, conversion: &Conversion) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO conversions
                (id, session_id, source_url, status, title, audio_artifact_key,
                 transcript, error_message, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(conversion.id.as_uuid())
        .bind(conversion.session_id.as_str())
        .bind(&conversion.source_url)
        .bind(conversion.status.as_str())
        .bind(&conversion.title)
        .bind(conversion.audio_artifact.as_ref().map(|k| k.as_str()))
        .bind(&conversion.transcript)
        .bind(&conversion.error_message)
        .bind(conversion.created_at)
        .bind(conversion.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    #[instrument(skip(self), fields(conversion_id = %id.as_uuid()))]
    async fn get_by_id(&self, id: ConversionId) -> Result<Option<Conversion>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, session_id, source_url, status, title, audio_artifact_key,
                   transcript, error_message, created_at, updated_at
            FROM conversions
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        row.as_ref().map(map_row).transpose()
    }

    #[instrument(skip(self, update), fields(conversion_id = %id.as_uuid()))]
    async fn update(
        &self,
        id: ConversionId,
        update: ConversionUpdate,
    ) -> Result<(), RepositoryError> {
        // Moving to a non-failed status clears the previous error message;
        // unsupplied fields keep their stored values. A status write must be
        // a legal edge of the transition graph.
        let next_status = update.status.map(|s| s.as_str());
        let result = sqlx::query(
            r#"
            UPDATE conversions
            SET status = COALESCE($2, status),
                title = COALESCE($3, title),
                audio_artifact_key = COALESCE($4, audio_artifact_key),
                transcript = COALESCE($5, transcript),
                error_message = CASE
                    WHEN $2 IS NOT NULL AND $2 <> 'failed' THEN NULL
                    ELSE COALESCE($6, error_message)
                END,
                updated_at = $7
            WHERE id = $1
              AND ($2 IS NULL OR (status, $2) IN (
                  ('pending', 'converting_mp3'),
                  ('converting_mp3', 'completed'),
                  ('converting_mp3', 'failed'),
                  ('completed', 'converting_text'),
                  ('converting_text', 'completed'),
                  ('converting_text', 'failed')))
            "#,
        )
        .bind(id.as_uuid())
        .bind(next_status)
        .bind(update.title)
        .bind(update.audio_artifact.map(|k| k.as_str().to_string()))
        .bind(update.transcript)
        .bind(update.error_message)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        if result.rows_affected() == 0 {
            let current: Option<String> =
                sqlx::query_scalar("SELECT status FROM conversions WHERE id = $1")
                    .bind(id.as_uuid())
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

            return Err(match current {
                Some(current) => RepositoryError::ConstraintViolation(format!(
                    "illegal status transition: {} -> {}",
                    current,
                    next_status.unwrap_or("unchanged")
                )),
                None => RepositoryError::NotFound(id.as_uuid().to_string()),
            });
        }

        Ok(())
    }

    #[instrument(skip(self), fields(conversion_id = %id.as_uuid()))]
    async fn claim_audio_leg(&self, id: ConversionId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE conversions
            SET status = 'converting_mp3', updated_at = $2
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(id.as_uuid())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self), fields(conversion_id = %id.as_uuid()))]
    async fn claim_text_leg(&self, id: ConversionId) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE conversions
            SET status = 'converting_text', error_message = NULL, updated_at = $2
            WHERE id = $1
              AND status = 'completed'
              AND audio_artifact_key IS NOT NULL
              AND transcript IS NULL
            "#,
        )
        .bind(id.as_uuid())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self), fields(session_id = %session_id))]
    async fn list_by_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<Conversion>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, session_id, source_url, status, title, audio_artifact_key,
                   transcript, error_message, created_at, updated_at
            FROM conversions
            WHERE session_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(session_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        rows.iter().map(map_row).collect()
    }
}

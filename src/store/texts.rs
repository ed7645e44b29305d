//! Texts and their context chunks

use super::{is_unique_violation, CreateOutcome, LexicalStore, Result, StoreError};
use crate::infrastructure::database::entities::{chunk, text};
use crate::shared::TextSpan;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::debug;
use uuid::Uuid;

impl LexicalStore {
    /// Persist a submitted text with its ordered chunk rows. Unique per
    /// (profile, content): re-submitting the same input returns the existing
    /// text and leaves its chunks untouched.
    pub async fn create_or_fetch_text(
        &self,
        profile_id: i32,
        content: &str,
        spans: &[TextSpan],
        user_id: i32,
        entry_id: Option<i32>,
    ) -> Result<CreateOutcome<text::Model>> {
        self.get_owned_profile(profile_id, user_id).await?;

        let fetch = || async {
            text::Entity::find()
                .filter(text::Column::LearningProfileId.eq(profile_id))
                .filter(text::Column::Content.eq(content))
                .one(&self.conn)
                .await
        };

        if let Some(existing) = fetch().await? {
            return Ok(CreateOutcome::Existing(existing));
        }

        let now = Utc::now();
        let insert = text::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            learning_profile_id: Set(profile_id),
            dictionary_entry_id: Set(entry_id),
            content: Set(content.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await;

        let row = match insert {
            Ok(row) => row,
            Err(err) if is_unique_violation(&err) => {
                debug!("Text already ingested for profile {}, fetching it", profile_id);
                let row = fetch()
                    .await?
                    .ok_or_else(|| StoreError::NotFound("text".into()))?;
                return Ok(CreateOutcome::Existing(row));
            }
            Err(err) => return Err(err.into()),
        };

        for (position, span) in spans.iter().enumerate() {
            chunk::ActiveModel {
                text_id: Set(row.id),
                position: Set(position as i32),
                start_offset: Set(span.start as i32),
                end_offset: Set(span.end as i32),
                content: Set(span.content.clone()),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&self.conn)
            .await?;
        }

        Ok(CreateOutcome::Created(row))
    }

    /// The ordered chunks of a persisted text.
    pub async fn text_chunks(&self, text_id: i32) -> Result<Vec<chunk::Model>> {
        Ok(chunk::Entity::find()
            .filter(chunk::Column::TextId.eq(text_id))
            .order_by_asc(chunk::Column::Position)
            .all(&self.conn)
            .await?)
    }
}

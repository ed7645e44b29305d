//! Learning profiles and the language lookup table

use super::{LexicalStore, Result, StoreError};
use crate::infrastructure::database::entities::{language, learning_profile};
use crate::shared::LanguageCode;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

impl LexicalStore {
    /// Resolve a language code against the seeded lookup table.
    pub async fn language_id(&self, code: LanguageCode) -> Result<i32> {
        let row = language::Entity::find()
            .filter(language::Column::Code.eq(code.code()))
            .one(&self.conn)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("language {}", code)))?;
        Ok(row.id)
    }

    /// Reverse lookup: the [`LanguageCode`] behind a language row id.
    pub async fn language_code(&self, language_id: i32) -> Result<LanguageCode> {
        let row = language::Entity::find_by_id(language_id)
            .one(&self.conn)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("language {}", language_id)))?;
        row.code
            .parse()
            .map_err(|_| StoreError::Validation(format!("unknown language code '{}'", row.code)))
    }

    /// Create a learning profile for a user. The language pair must be
    /// distinct and unused by that user.
    pub async fn create_learning_profile(
        &self,
        user_id: i32,
        primary_language: LanguageCode,
        foreign_language: LanguageCode,
        is_active: bool,
    ) -> Result<learning_profile::Model> {
        if primary_language == foreign_language {
            return Err(StoreError::Validation(
                "primary and foreign language must differ".into(),
            ));
        }

        let primary_id = self.language_id(primary_language).await?;
        let foreign_id = self.language_id(foreign_language).await?;

        let existing = learning_profile::Entity::find()
            .filter(learning_profile::Column::UserId.eq(user_id))
            .filter(learning_profile::Column::PrimaryLanguageId.eq(primary_id))
            .filter(learning_profile::Column::ForeignLanguageId.eq(foreign_id))
            .one(&self.conn)
            .await?;
        if existing.is_some() {
            return Err(StoreError::Conflict("profile already exists".into()));
        }

        let now = Utc::now();
        let row = learning_profile::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            primary_language_id: Set(primary_id),
            foreign_language_id: Set(foreign_id),
            is_active: Set(is_active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await?;

        Ok(row)
    }

    /// The profile that implicitly drives ingestion when the caller names
    /// none: the user's active profile.
    pub async fn active_profile(&self, user_id: i32) -> Result<learning_profile::Model> {
        learning_profile::Entity::find()
            .filter(learning_profile::Column::UserId.eq(user_id))
            .filter(learning_profile::Column::IsActive.eq(true))
            .one(&self.conn)
            .await?
            .ok_or_else(|| {
                StoreError::NotFound(format!("no active learning profile for user {}", user_id))
            })
    }

    pub async fn get_profile(&self, profile_id: i32) -> Result<learning_profile::Model> {
        learning_profile::Entity::find_by_id(profile_id)
            .one(&self.conn)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("learning profile {}", profile_id)))
    }

    /// Fetch a profile and verify it belongs to the acting user.
    pub async fn get_owned_profile(
        &self,
        profile_id: i32,
        user_id: i32,
    ) -> Result<learning_profile::Model> {
        let profile = self.get_profile(profile_id).await?;
        if profile.user_id != user_id {
            return Err(StoreError::Forbidden(
                "profile does not belong to the requesting user".into(),
            ));
        }
        Ok(profile)
    }
}

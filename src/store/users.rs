//! User registration and deletion

use super::{LexicalStore, Result, StoreError};
use crate::infrastructure::database::entities::user;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, Set};
use tracing::info;
use uuid::Uuid;

impl LexicalStore {
    /// Register a new user. Username and email must be unused; email is
    /// normalized to lowercase before the uniqueness check.
    pub async fn register_user(
        &self,
        username: &str,
        email: &str,
        full_name: &str,
    ) -> Result<user::Model> {
        if username.len() < 3 {
            return Err(StoreError::Validation(
                "username must be at least 3 characters".into(),
            ));
        }
        let email = email.trim().to_lowercase();

        let existing = user::Entity::find()
            .filter(
                user::Column::Username
                    .eq(username)
                    .or(user::Column::Email.eq(email.clone())),
            )
            .one(&self.conn)
            .await?;
        if existing.is_some() {
            return Err(StoreError::Conflict(
                "username or email already registered".into(),
            ));
        }

        let now = Utc::now();
        let row = user::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            username: Set(username.to_string()),
            email: Set(email),
            full_name: Set(full_name.to_string()),
            disabled: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await?;

        info!(user = %row.uuid, "Registered user {}", row.username);
        Ok(row)
    }

    pub async fn get_user(&self, user_id: i32) -> Result<user::Model> {
        user::Entity::find_by_id(user_id)
            .one(&self.conn)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("user {}", user_id)))
    }

    /// Soft delete: flips the disabled flag and leaves all data intact.
    pub async fn disable_user(&self, user_id: i32) -> Result<user::Model> {
        let row = self.get_user(user_id).await?;
        if row.disabled {
            return Ok(row);
        }
        let mut active: user::ActiveModel = row.into();
        active.disabled = Set(true);
        active.updated_at = Set(Utc::now());
        Ok(active.update(&self.conn).await?)
    }

    /// Hard delete: removes the user and cascades through their learning
    /// profiles to dictionary entries and all enrichment rows. Shared word
    /// rows survive since other users' dictionaries may reference them.
    pub async fn hard_delete_user(&self, user_id: i32) -> Result<()> {
        let row = self.get_user(user_id).await?;
        info!(user = %row.uuid, "Hard-deleting user {}", row.username);
        row.delete(&self.conn).await?;
        Ok(())
    }
}

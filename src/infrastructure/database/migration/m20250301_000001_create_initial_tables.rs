//! Initial migration to create all tables

use crate::shared::LanguageCode;
use sea_orm_migration::prelude::*;
use strum::IntoEnumIterator;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Users::Uuid).uuid().not_null().unique_key())
                    .col(ColumnDef::new(Users::Username).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::FullName).string().not_null())
                    .col(ColumnDef::new(Users::Disabled).boolean().not_null().default(false))
                    .col(ColumnDef::new(Users::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        // Create languages lookup table
        manager
            .create_table(
                Table::create()
                    .table(Languages::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Languages::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Languages::Code).string_len(5).not_null().unique_key())
                    .col(ColumnDef::new(Languages::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(Languages::CreatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        // Populate languages with the supported set
        let now = chrono::Utc::now();
        for lang in LanguageCode::iter() {
            manager
                .exec_stmt(
                    Query::insert()
                        .into_table(Languages::Table)
                        .columns([Languages::Code, Languages::Name, Languages::CreatedAt])
                        .values_panic([
                            lang.code().into(),
                            lang.display_name().into(),
                            now.into(),
                        ])
                        .to_owned(),
                )
                .await?;
        }

        // Create learning_profiles table
        manager
            .create_table(
                Table::create()
                    .table(LearningProfiles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(LearningProfiles::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(LearningProfiles::Uuid).uuid().not_null().unique_key())
                    .col(ColumnDef::new(LearningProfiles::UserId).integer().not_null())
                    .col(ColumnDef::new(LearningProfiles::PrimaryLanguageId).integer().not_null())
                    .col(ColumnDef::new(LearningProfiles::ForeignLanguageId).integer().not_null())
                    .col(ColumnDef::new(LearningProfiles::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(LearningProfiles::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(LearningProfiles::UpdatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(LearningProfiles::Table, LearningProfiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(LearningProfiles::Table, LearningProfiles::PrimaryLanguageId)
                            .to(Languages::Table, Languages::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(LearningProfiles::Table, LearningProfiles::ForeignLanguageId)
                            .to(Languages::Table, Languages::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // One profile per (user, primary, foreign) triple
        manager
            .create_index(
                Index::create()
                    .name("uq_profile_user_lang_pair")
                    .table(LearningProfiles::Table)
                    .col(LearningProfiles::UserId)
                    .col(LearningProfiles::PrimaryLanguageId)
                    .col(LearningProfiles::ForeignLanguageId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create words table
        manager
            .create_table(
                Table::create()
                    .table(Words::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Words::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Words::Uuid).uuid().not_null().unique_key())
                    .col(ColumnDef::new(Words::Lemma).string().not_null())
                    .col(ColumnDef::new(Words::LanguageId).integer().not_null())
                    .col(ColumnDef::new(Words::Pos).integer().not_null())
                    .col(ColumnDef::new(Words::Embedding).json().null())
                    .col(ColumnDef::new(Words::EmbeddingModel).string_len(64).null())
                    .col(ColumnDef::new(Words::EmbeddingUpdatedAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Words::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Words::UpdatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Words::Table, Words::LanguageId)
                            .to(Languages::Table, Languages::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Natural key of a word; the store's create-or-fetch relies on this
        manager
            .create_index(
                Index::create()
                    .name("uq_word_lemma_language_pos")
                    .table(Words::Table)
                    .col(Words::Lemma)
                    .col(Words::LanguageId)
                    .col(Words::Pos)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create dictionary_entries table
        manager
            .create_table(
                Table::create()
                    .table(DictionaryEntries::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(DictionaryEntries::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(DictionaryEntries::Uuid).uuid().not_null().unique_key())
                    .col(ColumnDef::new(DictionaryEntries::LearningProfileId).integer().not_null())
                    .col(ColumnDef::new(DictionaryEntries::WordId).integer().not_null())
                    .col(ColumnDef::new(DictionaryEntries::Notes).text().null())
                    .col(ColumnDef::new(DictionaryEntries::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(DictionaryEntries::UpdatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(DictionaryEntries::Table, DictionaryEntries::LearningProfileId)
                            .to(LearningProfiles::Table, LearningProfiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(DictionaryEntries::Table, DictionaryEntries::WordId)
                            .to(Words::Table, Words::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_entry_profile_word")
                    .table(DictionaryEntries::Table)
                    .col(DictionaryEntries::LearningProfileId)
                    .col(DictionaryEntries::WordId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create texts table
        manager
            .create_table(
                Table::create()
                    .table(Texts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Texts::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Texts::Uuid).uuid().not_null().unique_key())
                    .col(ColumnDef::new(Texts::LearningProfileId).integer().not_null())
                    .col(ColumnDef::new(Texts::DictionaryEntryId).integer().null())
                    .col(ColumnDef::new(Texts::Content).text().not_null())
                    .col(ColumnDef::new(Texts::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Texts::UpdatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Texts::Table, Texts::LearningProfileId)
                            .to(LearningProfiles::Table, LearningProfiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Re-submitting identical input must converge to one row
        manager
            .create_index(
                Index::create()
                    .name("uq_text_profile_content")
                    .table(Texts::Table)
                    .col(Texts::LearningProfileId)
                    .col(Texts::Content)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create chunks table
        manager
            .create_table(
                Table::create()
                    .table(Chunks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Chunks::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Chunks::TextId).integer().not_null())
                    .col(ColumnDef::new(Chunks::Position).integer().not_null())
                    .col(ColumnDef::new(Chunks::StartOffset).integer().not_null())
                    .col(ColumnDef::new(Chunks::EndOffset).integer().not_null())
                    .col(ColumnDef::new(Chunks::Content).text().not_null())
                    .col(ColumnDef::new(Chunks::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Chunks::Table, Chunks::TextId)
                            .to(Texts::Table, Texts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_chunk_text_position")
                    .table(Chunks::Table)
                    .col(Chunks::TextId)
                    .col(Chunks::Position)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create the three enrichment tables, all shaped alike
        manager
            .create_table(enrichment_table(
                Translations::Table,
                Translations::Id,
                Translations::Uuid,
                Translations::DictionaryEntryId,
                Translations::LanguageId,
                Translations::Content,
                Translations::Embedding,
                Translations::EmbeddingModel,
                Translations::EmbeddingUpdatedAt,
                Translations::CreatedAt,
                Translations::UpdatedAt,
            ))
            .await?;

        manager
            .create_table(
                enrichment_table(
                    Definitions::Table,
                    Definitions::Id,
                    Definitions::Uuid,
                    Definitions::DictionaryEntryId,
                    Definitions::LanguageId,
                    Definitions::Content,
                    Definitions::Embedding,
                    Definitions::EmbeddingModel,
                    Definitions::EmbeddingUpdatedAt,
                    Definitions::CreatedAt,
                    Definitions::UpdatedAt,
                )
                .col(ColumnDef::new(Definitions::SourceTextId).integer().null())
                .foreign_key(
                    ForeignKey::create()
                        .from(Definitions::Table, Definitions::SourceTextId)
                        .to(Texts::Table, Texts::Id)
                        .on_delete(ForeignKeyAction::SetNull),
                )
                .to_owned(),
            )
            .await?;

        manager
            .create_table(enrichment_table(
                Examples::Table,
                Examples::Id,
                Examples::Uuid,
                Examples::DictionaryEntryId,
                Examples::LanguageId,
                Examples::Content,
                Examples::Embedding,
                Examples::EmbeddingModel,
                Examples::EmbeddingUpdatedAt,
                Examples::CreatedAt,
                Examples::UpdatedAt,
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Examples::Table).if_exists().to_owned()).await?;
        manager.drop_table(Table::drop().table(Definitions::Table).if_exists().to_owned()).await?;
        manager.drop_table(Table::drop().table(Translations::Table).if_exists().to_owned()).await?;
        manager.drop_table(Table::drop().table(Chunks::Table).if_exists().to_owned()).await?;
        manager.drop_table(Table::drop().table(Texts::Table).if_exists().to_owned()).await?;
        manager.drop_table(Table::drop().table(DictionaryEntries::Table).if_exists().to_owned()).await?;
        manager.drop_table(Table::drop().table(Words::Table).if_exists().to_owned()).await?;
        manager.drop_table(Table::drop().table(LearningProfiles::Table).if_exists().to_owned()).await?;
        manager.drop_table(Table::drop().table(Languages::Table).if_exists().to_owned()).await?;
        manager.drop_table(Table::drop().table(Users::Table).if_exists().to_owned()).await?;
        Ok(())
    }
}

/// Translations, definitions and examples share the same column layout.
#[allow(clippy::too_many_arguments)]
fn enrichment_table<T: Iden + Copy + 'static>(
    table: T,
    id: T,
    uuid: T,
    entry_id: T,
    language_id: T,
    content: T,
    embedding: T,
    embedding_model: T,
    embedding_updated_at: T,
    created_at: T,
    updated_at: T,
) -> TableCreateStatement {
    Table::create()
        .table(table)
        .if_not_exists()
        .col(ColumnDef::new(id).integer().not_null().auto_increment().primary_key())
        .col(ColumnDef::new(uuid).uuid().not_null().unique_key())
        .col(ColumnDef::new(entry_id).integer().not_null())
        .col(ColumnDef::new(language_id).integer().not_null())
        .col(ColumnDef::new(content).text().not_null())
        .col(ColumnDef::new(embedding).json().null())
        .col(ColumnDef::new(embedding_model).string_len(64).null())
        .col(ColumnDef::new(embedding_updated_at).timestamp_with_time_zone().null())
        .col(ColumnDef::new(created_at).timestamp_with_time_zone().not_null())
        .col(ColumnDef::new(updated_at).timestamp_with_time_zone().not_null())
        .foreign_key(
            ForeignKey::create()
                .from(table, entry_id)
                .to(DictionaryEntries::Table, DictionaryEntries::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .from(table, language_id)
                .to(Languages::Table, Languages::Id),
        )
        .to_owned()
}

#[derive(DeriveIden, Clone, Copy)]
enum Users {
    Table,
    Id,
    Uuid,
    Username,
    Email,
    FullName,
    Disabled,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum Languages {
    Table,
    Id,
    Code,
    Name,
    CreatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum LearningProfiles {
    Table,
    Id,
    Uuid,
    UserId,
    PrimaryLanguageId,
    ForeignLanguageId,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum Words {
    Table,
    Id,
    Uuid,
    Lemma,
    LanguageId,
    Pos,
    Embedding,
    EmbeddingModel,
    EmbeddingUpdatedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum DictionaryEntries {
    Table,
    Id,
    Uuid,
    LearningProfileId,
    WordId,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum Texts {
    Table,
    Id,
    Uuid,
    LearningProfileId,
    DictionaryEntryId,
    Content,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum Chunks {
    Table,
    Id,
    TextId,
    Position,
    StartOffset,
    EndOffset,
    Content,
    CreatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum Translations {
    Table,
    Id,
    Uuid,
    DictionaryEntryId,
    LanguageId,
    Content,
    Embedding,
    EmbeddingModel,
    EmbeddingUpdatedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum Definitions {
    Table,
    Id,
    Uuid,
    DictionaryEntryId,
    LanguageId,
    Content,
    SourceTextId,
    Embedding,
    EmbeddingModel,
    EmbeddingUpdatedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum Examples {
    Table,
    Id,
    Uuid,
    DictionaryEntryId,
    LanguageId,
    Content,
    Embedding,
    EmbeddingModel,
    EmbeddingUpdatedAt,
    CreatedAt,
    UpdatedAt,
}

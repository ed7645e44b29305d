//! End-to-end runs of the ingestion pipeline against an in-memory store.

mod helpers;

use helpers::{lexicon, lexicon_with, user_with_profile, MockGenerator};
use lexicon_core::infrastructure::database::entities::{
    definition, dictionary_entry, example, text, translation, word,
};
use lexicon_core::{IngestError, IngestStage, StoreError};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

const TEXT: &str = "Hello world, hello again.";

#[tokio::test]
async fn full_run_persists_words_entries_and_enrichment() {
    let ctx = lexicon().await;
    let (user, profile) = user_with_profile(&ctx, "alice").await;

    let report = ctx
        .lexicon
        .pipeline()
        .ingest(profile.id, user.id, TEXT)
        .await
        .unwrap();

    assert_eq!(report.candidates, vec!["again", "hello", "world"]);
    assert!(report.failed_lemmas().is_empty());
    assert_eq!(report.chunk_count, 1);

    let conn = ctx.lexicon.database().conn();
    assert_eq!(word::Entity::find().count(conn).await.unwrap(), 3);
    assert_eq!(
        dictionary_entry::Entity::find().count(conn).await.unwrap(),
        3
    );
    assert_eq!(translation::Entity::find().count(conn).await.unwrap(), 3);
    assert_eq!(definition::Entity::find().count(conn).await.unwrap(), 3);
    assert_eq!(example::Entity::find().count(conn).await.unwrap(), 3);

    // Every persisted word carries an embedding from creation time.
    for row in word::Entity::find().all(conn).await.unwrap() {
        assert!(row.embedding.is_some(), "word '{}' lacks a vector", row.lemma);
        assert_eq!(row.embedding_model.as_deref(), Some("mock-embedder-v1"));
    }

    // Definitions point back at the text that motivated them.
    let text_id = report.text_id.unwrap();
    for row in definition::Entity::find().all(conn).await.unwrap() {
        assert_eq!(row.source_text_id, Some(text_id));
    }

    let created = &report.outcome(IngestStage::PersistWords).unwrap().created;
    assert_eq!(created.len(), 3);
}

#[tokio::test]
async fn reingesting_the_same_text_converges() {
    let ctx = lexicon().await;
    let (user, profile) = user_with_profile(&ctx, "alice").await;
    let pipeline = ctx.lexicon.pipeline();

    let first = pipeline.ingest(profile.id, user.id, TEXT).await.unwrap();
    let second = pipeline.ingest(profile.id, user.id, TEXT).await.unwrap();

    // Dictionary dedup removes every lemma the first run persisted.
    assert!(second.candidates.is_empty());
    assert_eq!(
        second
            .outcome(IngestStage::ExtractCandidates)
            .unwrap()
            .existing
            .len(),
        3
    );
    assert_eq!(second.text_id, first.text_id);
    assert!(second
        .outcome(IngestStage::PersistText)
        .unwrap()
        .existing
        .contains("text"));

    let conn = ctx.lexicon.database().conn();
    assert_eq!(word::Entity::find().count(conn).await.unwrap(), 3);
    assert_eq!(text::Entity::find().count(conn).await.unwrap(), 1);
    assert_eq!(translation::Entity::find().count(conn).await.unwrap(), 3);
}

#[tokio::test]
async fn definition_failure_does_not_abort_the_run() {
    let ctx = lexicon_with(MockGenerator::new().failing_define("world")).await;
    let (user, profile) = user_with_profile(&ctx, "alice").await;

    let report = ctx
        .lexicon
        .pipeline()
        .ingest(profile.id, user.id, TEXT)
        .await
        .unwrap();

    let define = report.outcome(IngestStage::Define).unwrap();
    assert!(define.failed.contains_key("world"));
    assert!(define.created.contains("again"));
    assert!(define.created.contains("hello"));

    // The failed lemma still gets its word, entry, translation and example.
    let conn = ctx.lexicon.database().conn();
    let world = word::Entity::find()
        .filter(word::Column::Lemma.eq("world"))
        .one(conn)
        .await
        .unwrap();
    assert!(world.is_some());
    assert_eq!(definition::Entity::find().count(conn).await.unwrap(), 2);
    assert_eq!(translation::Entity::find().count(conn).await.unwrap(), 3);
    assert_eq!(example::Entity::find().count(conn).await.unwrap(), 3);
}

#[tokio::test]
async fn examples_are_conditioned_on_the_generated_definition() {
    let ctx = lexicon_with(MockGenerator::new().failing_define("world")).await;
    let (user, profile) = user_with_profile(&ctx, "alice").await;

    ctx.lexicon
        .pipeline()
        .ingest(profile.id, user.id, TEXT)
        .await
        .unwrap();

    let calls = ctx.generator.exemplify_calls.lock().unwrap();
    let hello = calls.iter().find(|(w, _)| w == "hello").unwrap();
    assert_eq!(hello.1.as_deref(), Some("meaning of hello"));

    // No definition for "world", so exemplification falls back to the
    // word's most common sense.
    let world = calls.iter().find(|(w, _)| w == "world").unwrap();
    assert_eq!(world.1, None);
}

#[tokio::test]
async fn translation_batch_failure_marks_every_batch_member() {
    let ctx = lexicon_with(MockGenerator::new().failing_translate("hello")).await;
    let (user, profile) = user_with_profile(&ctx, "alice").await;

    let report = ctx
        .lexicon
        .pipeline()
        .ingest(profile.id, user.id, TEXT)
        .await
        .unwrap();

    let translate = report.outcome(IngestStage::Translate).unwrap();
    assert_eq!(translate.failed.len(), 3);

    let conn = ctx.lexicon.database().conn();
    assert_eq!(translation::Entity::find().count(conn).await.unwrap(), 0);
    // Words and entries are unaffected by the generation failure.
    assert_eq!(word::Entity::find().count(conn).await.unwrap(), 3);
    assert_eq!(
        dictionary_entry::Entity::find().count(conn).await.unwrap(),
        3
    );
}

#[tokio::test]
async fn concurrent_identical_ingestions_converge() {
    let ctx = lexicon().await;
    let (user, profile) = user_with_profile(&ctx, "alice").await;
    let pipeline = ctx.lexicon.pipeline();

    let (a, b) = tokio::join!(
        pipeline.ingest(profile.id, user.id, TEXT),
        pipeline.ingest(profile.id, user.id, TEXT),
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    // Both runs end on the same persisted text, and the natural keys fold
    // every duplicate write into the row the other run created.
    assert_eq!(a.text_id, b.text_id);
    assert!(a.failed_lemmas().is_empty());
    assert!(b.failed_lemmas().is_empty());

    let conn = ctx.lexicon.database().conn();
    assert_eq!(text::Entity::find().count(conn).await.unwrap(), 1);
    assert_eq!(word::Entity::find().count(conn).await.unwrap(), 3);
    assert_eq!(
        dictionary_entry::Entity::find().count(conn).await.unwrap(),
        3
    );
}

#[tokio::test]
async fn words_are_shared_across_profiles() {
    let ctx = lexicon().await;
    let (alice, alice_profile) = user_with_profile(&ctx, "alice").await;
    let (bob, bob_profile) = user_with_profile(&ctx, "bob").await;
    let pipeline = ctx.lexicon.pipeline();

    pipeline.ingest(alice_profile.id, alice.id, TEXT).await.unwrap();
    let report = pipeline.ingest(bob_profile.id, bob.id, TEXT).await.unwrap();

    // Bob's run finds the word rows already present and only binds them
    // into his own dictionary.
    assert_eq!(
        report.outcome(IngestStage::PersistWords).unwrap().existing.len(),
        3
    );

    let conn = ctx.lexicon.database().conn();
    assert_eq!(word::Entity::find().count(conn).await.unwrap(), 3);
    assert_eq!(
        dictionary_entry::Entity::find().count(conn).await.unwrap(),
        6
    );
}

#[tokio::test]
async fn empty_text_is_rejected() {
    let ctx = lexicon().await;
    let (user, profile) = user_with_profile(&ctx, "alice").await;

    let err = ctx
        .lexicon
        .pipeline()
        .ingest(profile.id, user.id, "   \n ")
        .await
        .unwrap_err();
    assert!(matches!(err, IngestError::EmptyText));
}

#[tokio::test]
async fn ingesting_into_a_foreign_profile_is_forbidden() {
    let ctx = lexicon().await;
    let (_alice, alice_profile) = user_with_profile(&ctx, "alice").await;
    let (bob, _bob_profile) = user_with_profile(&ctx, "bob").await;

    let err = ctx
        .lexicon
        .pipeline()
        .ingest(alice_profile.id, bob.id, TEXT)
        .await
        .unwrap_err();
    assert!(matches!(err, IngestError::Store(StoreError::Forbidden(_))));
}

#[tokio::test]
async fn ingest_for_user_targets_the_active_profile() {
    let ctx = lexicon().await;
    let (user, profile) = user_with_profile(&ctx, "alice").await;

    let report = ctx
        .lexicon
        .pipeline()
        .ingest_for_user(user.id, TEXT)
        .await
        .unwrap();

    let conn = ctx.lexicon.database().conn();
    let entries = dictionary_entry::Entity::find()
        .filter(dictionary_entry::Column::LearningProfileId.eq(profile.id))
        .count(conn)
        .await
        .unwrap();
    assert_eq!(entries, 3);
    assert!(report.text_id.is_some());
}

//! Store-level semantics: natural keys, idempotent creation, ownership and
//! cascade behavior.

mod helpers;

use helpers::{lexicon, user_with_profile};
use lexicon_core::infrastructure::database::entities::{
    chunk, dictionary_entry, learning_profile, text, word,
};
use lexicon_core::shared::{LanguageCode, PartOfSpeech, TextSpan};
use lexicon_core::{CreateOutcome, StoreError};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

#[tokio::test]
async fn create_or_fetch_word_is_idempotent() {
    let ctx = lexicon().await;
    let store = ctx.lexicon.store();

    let first = store
        .create_or_fetch_word("run", LanguageCode::En, PartOfSpeech::Verb)
        .await
        .unwrap();
    assert!(first.was_created());

    let second = store
        .create_or_fetch_word("run", LanguageCode::En, PartOfSpeech::Verb)
        .await
        .unwrap();
    assert!(!second.was_created());
    assert_eq!(first.as_inner().id, second.as_inner().id);
}

#[tokio::test]
async fn concurrent_word_creation_yields_one_row() {
    let ctx = lexicon().await;
    let store = ctx.lexicon.store();

    let (a, b) = tokio::join!(
        store.create_or_fetch_word("run", LanguageCode::En, PartOfSpeech::Verb),
        store.create_or_fetch_word("run", LanguageCode::En, PartOfSpeech::Verb),
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_eq!(a.as_inner().id, b.as_inner().id);
    assert_eq!(
        [a.was_created(), b.was_created()].iter().filter(|c| **c).count(),
        1,
        "exactly one caller observes the creation"
    );

    let conn = ctx.lexicon.database().conn();
    assert_eq!(word::Entity::find().count(conn).await.unwrap(), 1);
}

#[tokio::test]
async fn words_differ_by_part_of_speech() {
    let ctx = lexicon().await;
    let store = ctx.lexicon.store();

    let noun = store
        .create_word("run", LanguageCode::En, PartOfSpeech::Noun)
        .await
        .unwrap();
    let verb = store
        .create_word("run", LanguageCode::En, PartOfSpeech::Verb)
        .await
        .unwrap();
    assert_ne!(noun.id, verb.id);

    let err = store
        .create_word("run", LanguageCode::En, PartOfSpeech::Verb)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let ctx = lexicon().await;
    let store = ctx.lexicon.store();

    store
        .register_user("alice", "Alice@Example.com", "Alice")
        .await
        .unwrap();

    // Email comparison is case-insensitive.
    let err = store
        .register_user("alice2", "alice@example.com", "Alice")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));

    let err = store
        .register_user("al", "short@example.com", "Al")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}

#[tokio::test]
async fn profile_language_pair_must_differ() {
    let ctx = lexicon().await;
    let store = ctx.lexicon.store();
    let user = store
        .register_user("alice", "alice@example.com", "Alice")
        .await
        .unwrap();

    let err = store
        .create_learning_profile(user.id, LanguageCode::En, LanguageCode::En, true)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));

    store
        .create_learning_profile(user.id, LanguageCode::En, LanguageCode::Es, true)
        .await
        .unwrap();
    let err = store
        .create_learning_profile(user.id, LanguageCode::En, LanguageCode::Es, false)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));
}

#[tokio::test]
async fn disable_is_soft_and_hard_delete_cascades() {
    let ctx = lexicon().await;
    let store = ctx.lexicon.store();
    let (user, profile) = user_with_profile(&ctx, "alice").await;

    let w = store
        .create_word("house", LanguageCode::En, PartOfSpeech::Noun)
        .await
        .unwrap();
    store
        .create_dictionary_entry(profile.id, w.id, user.id, None)
        .await
        .unwrap();

    let disabled = store.disable_user(user.id).await.unwrap();
    assert!(disabled.disabled);
    let conn = ctx.lexicon.database().conn();
    assert_eq!(
        dictionary_entry::Entity::find().count(conn).await.unwrap(),
        1,
        "soft delete keeps data"
    );

    store.hard_delete_user(user.id).await.unwrap();
    assert_eq!(
        learning_profile::Entity::find().count(conn).await.unwrap(),
        0
    );
    assert_eq!(
        dictionary_entry::Entity::find().count(conn).await.unwrap(),
        0
    );
    // Shared word rows survive the cascade.
    assert_eq!(word::Entity::find().count(conn).await.unwrap(), 1);
}

#[tokio::test]
async fn texts_are_unique_per_profile_and_keep_their_chunks() {
    let ctx = lexicon().await;
    let store = ctx.lexicon.store();
    let (user, profile) = user_with_profile(&ctx, "alice").await;

    let spans = vec![
        TextSpan {
            content: "first part".into(),
            start: 0,
            end: 10,
        },
        TextSpan {
            content: "second part".into(),
            start: 5,
            end: 16,
        },
    ];

    let first = store
        .create_or_fetch_text(profile.id, "first part second", &spans, user.id, None)
        .await
        .unwrap();
    assert!(first.was_created());

    let again = store
        .create_or_fetch_text(profile.id, "first part second", &[], user.id, None)
        .await
        .unwrap();
    assert!(matches!(again, CreateOutcome::Existing(_)));

    let conn = ctx.lexicon.database().conn();
    assert_eq!(text::Entity::find().count(conn).await.unwrap(), 1);

    let chunks = store.text_chunks(first.as_inner().id).await.unwrap();
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].position, 0);
    assert_eq!(chunks[0].content, "first part");
    assert_eq!(chunks[1].start_offset, 5);
}

#[tokio::test]
async fn updating_enrichment_text_refreshes_the_embedding() {
    let ctx = lexicon().await;
    let store = ctx.lexicon.store();
    let (user, profile) = user_with_profile(&ctx, "alice").await;

    let w = store
        .create_word("house", LanguageCode::En, PartOfSpeech::Noun)
        .await
        .unwrap();
    let entry = store
        .create_dictionary_entry(profile.id, w.id, user.id, None)
        .await
        .unwrap();
    let translation = store
        .create_translation(entry.id, LanguageCode::Es, "casa", user.id)
        .await
        .unwrap();

    // Same content is a no-op.
    let unchanged = store
        .update_translation(translation.id, "casa", user.id)
        .await
        .unwrap();
    assert_eq!(unchanged.embedding, translation.embedding);

    let updated = store
        .update_translation(translation.id, "hogar", user.id)
        .await
        .unwrap();
    assert_eq!(updated.content, "hogar");
    assert_ne!(updated.embedding, translation.embedding);
}

#[tokio::test]
async fn enrichment_writes_require_ownership() {
    let ctx = lexicon().await;
    let store = ctx.lexicon.store();
    let (alice, alice_profile) = user_with_profile(&ctx, "alice").await;
    let (bob, _) = user_with_profile(&ctx, "bob").await;

    let w = store
        .create_word("house", LanguageCode::En, PartOfSpeech::Noun)
        .await
        .unwrap();
    let entry = store
        .create_dictionary_entry(alice_profile.id, w.id, alice.id, None)
        .await
        .unwrap();

    let err = store
        .create_translation(entry.id, LanguageCode::Es, "casa", bob.id)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Forbidden(_)));
}

#[tokio::test]
async fn renaming_a_word_requires_holding_it_and_reembeds() {
    let ctx = lexicon().await;
    let store = ctx.lexicon.store();
    let (alice, alice_profile) = user_with_profile(&ctx, "alice").await;
    let (bob, _) = user_with_profile(&ctx, "bob").await;

    let w = store
        .create_word("hose", LanguageCode::En, PartOfSpeech::Noun)
        .await
        .unwrap();
    store
        .create_dictionary_entry(alice_profile.id, w.id, alice.id, None)
        .await
        .unwrap();

    let err = store.update_word_lemma(w.id, "house", bob.id).await.unwrap_err();
    assert!(matches!(err, StoreError::Forbidden(_)));

    let renamed = store.update_word_lemma(w.id, "house", alice.id).await.unwrap();
    assert_eq!(renamed.lemma, "house");
    assert_ne!(renamed.embedding, w.embedding);
}

#[tokio::test]
async fn dictionary_probe_sees_only_the_given_profile() {
    let ctx = lexicon().await;
    let store = ctx.lexicon.store();
    let (alice, alice_profile) = user_with_profile(&ctx, "alice").await;
    let (_bob, bob_profile) = user_with_profile(&ctx, "bob").await;

    let w = store
        .create_word("house", LanguageCode::En, PartOfSpeech::Noun)
        .await
        .unwrap();
    store
        .create_dictionary_entry(alice_profile.id, w.id, alice.id, None)
        .await
        .unwrap();

    assert!(store
        .word_in_dictionary(alice_profile.id, "house", PartOfSpeech::Noun)
        .await
        .unwrap());
    assert!(!store
        .word_in_dictionary(bob_profile.id, "house", PartOfSpeech::Noun)
        .await
        .unwrap());
    assert!(!store
        .word_in_dictionary(alice_profile.id, "house", PartOfSpeech::Verb)
        .await
        .unwrap());
}

#[tokio::test]
async fn chunk_rows_enforce_their_position_key() {
    let ctx = lexicon().await;
    let (user, profile) = user_with_profile(&ctx, "alice").await;
    let store = ctx.lexicon.store();

    let spans = vec![TextSpan {
        content: "only".into(),
        start: 0,
        end: 4,
    }];
    let created = store
        .create_or_fetch_text(profile.id, "only", &spans, user.id, None)
        .await
        .unwrap();

    let conn = ctx.lexicon.database().conn();
    let rows = chunk::Entity::find()
        .filter(chunk::Column::TextId.eq(created.as_inner().id))
        .count(conn)
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

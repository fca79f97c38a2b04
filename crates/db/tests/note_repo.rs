//! Integration tests for author-scoped note persistence.
//!
//! Exercises `NoteRepo` against a real database:
//! - Ownership filters on list/update/delete
//! - Newest-first ordering
//! - The per-author title unique constraint

use jotbook_db::models::note::{CreateNote, UpdateNote};
use jotbook_db::models::user::{CreateUser, User};
use jotbook_db::repositories::{NoteRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, email: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            name: "Test User".to_string(),
            password_hash: None,
            email_verified: true,
            google_subject: None,
        },
    )
    .await
    .expect("user creation should succeed")
}

fn new_note(author_id: i64, title: &str, content: Option<&str>) -> CreateNote {
    CreateNote {
        author_id,
        title: title.to_string(),
        content: content.map(str::to_string),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_returns_only_own_notes_newest_first(pool: PgPool) {
    let ada = new_user(&pool, "ada@example.com").await;
    let bob = new_user(&pool, "bob@example.com").await;

    let first = NoteRepo::create(&pool, &new_note(ada.id, "first", None)).await.unwrap();
    let second = NoteRepo::create(&pool, &new_note(ada.id, "second", Some("body"))).await.unwrap();
    NoteRepo::create(&pool, &new_note(bob.id, "bob's", None)).await.unwrap();
    let third = NoteRepo::create(&pool, &new_note(ada.id, "third", None)).await.unwrap();

    let notes = NoteRepo::list_by_author(&pool, ada.id).await.unwrap();
    let ids: Vec<i64> = notes.iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![third.id, second.id, first.id]);
    assert!(notes.iter().all(|n| n.author_id == ada.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn find_by_title_is_exact_and_scoped(pool: PgPool) {
    let ada = new_user(&pool, "ada@example.com").await;
    let bob = new_user(&pool, "bob@example.com").await;
    NoteRepo::create(&pool, &new_note(ada.id, "Plans", None)).await.unwrap();

    assert!(NoteRepo::find_by_title(&pool, ada.id, "Plans").await.unwrap().is_some());
    assert!(NoteRepo::find_by_title(&pool, ada.id, "plans").await.unwrap().is_none());
    assert!(NoteRepo::find_by_title(&pool, bob.id, "Plans").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_title_for_same_author_violates_constraint(pool: PgPool) {
    let ada = new_user(&pool, "ada@example.com").await;
    let bob = new_user(&pool, "bob@example.com").await;
    NoteRepo::create(&pool, &new_note(ada.id, "Plans", None)).await.unwrap();

    let err = NoteRepo::create(&pool, &new_note(ada.id, "Plans", None))
        .await
        .expect_err("second insert must fail");
    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
            assert_eq!(db_err.constraint(), Some("uq_notes_author_title"));
        }
        other => panic!("expected a database error, got {other:?}"),
    }

    // Another author may reuse the title.
    NoteRepo::create(&pool, &new_note(bob.id, "Plans", None))
        .await
        .expect("same title for a different author is allowed");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_and_delete_ignore_foreign_rows(pool: PgPool) {
    let ada = new_user(&pool, "ada@example.com").await;
    let bob = new_user(&pool, "bob@example.com").await;
    let note = NoteRepo::create(&pool, &new_note(ada.id, "mine", Some("original")))
        .await
        .unwrap();

    let change = UpdateNote {
        title: "hijacked".to_string(),
        content: None,
    };
    assert_eq!(NoteRepo::update_for_author(&pool, note.id, bob.id, &change).await.unwrap(), 0);
    assert_eq!(NoteRepo::delete_for_author(&pool, note.id, bob.id).await.unwrap(), 0);

    let notes = NoteRepo::list_by_author(&pool, ada.id).await.unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].title, "mine");
    assert_eq!(notes[0].content.as_deref(), Some("original"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_touches_updated_at_and_delete_is_idempotent(pool: PgPool) {
    let ada = new_user(&pool, "ada@example.com").await;
    let note = NoteRepo::create(&pool, &new_note(ada.id, "A", Some("B"))).await.unwrap();

    let change = UpdateNote {
        title: "C".to_string(),
        content: Some("D".to_string()),
    };
    assert_eq!(NoteRepo::update_for_author(&pool, note.id, ada.id, &change).await.unwrap(), 1);

    let notes = NoteRepo::list_by_author(&pool, ada.id).await.unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].title, "C");
    assert_eq!(notes[0].content.as_deref(), Some("D"));
    assert_eq!(notes[0].created_at, note.created_at);
    assert!(notes[0].updated_at >= note.updated_at);

    assert_eq!(NoteRepo::delete_for_author(&pool, note.id, ada.id).await.unwrap(), 1);
    assert_eq!(NoteRepo::delete_for_author(&pool, note.id, ada.id).await.unwrap(), 0);
}

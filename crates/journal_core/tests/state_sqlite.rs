//! SQLite persistence: migrations, key scoping, payload round trips.

use journal_core::db::migrations::latest_version;
use journal_core::db::{open_db, open_db_in_memory};
use journal_core::{
    storage_key, JournalService, NoteBlock, SqliteStateRepository, StateRepository,
};

#[test]
fn open_db_applies_migrations() {
    let conn = open_db_in_memory().expect("in-memory db opens");
    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .expect("user_version readable");
    assert_eq!(version, latest_version());

    let table_count: u32 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='journal_state';",
            [],
            |row| row.get(0),
        )
        .expect("sqlite_master readable");
    assert_eq!(table_count, 1);
}

#[test]
fn sqlite_repo_round_trips_payloads_per_key() {
    let conn = open_db_in_memory().expect("db opens");
    let repo = SqliteStateRepository::new(&conn);

    assert_eq!(repo.load("missing").expect("load works"), None);

    repo.save("a", r#"{"sections":[]}"#).expect("save a");
    repo.save("b", r#"{"sections":[{"title":"T","entries":[]}]}"#)
        .expect("save b");
    repo.save("a", r#"{"sections":[{"title":"A2","entries":[]}]}"#)
        .expect("replace a");

    assert!(repo.load("a").expect("load a").expect("present").contains("A2"));
    assert!(repo.load("b").expect("load b").expect("present").contains("\"T\""));
}

#[test]
fn journal_survives_reopening_the_database_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let db_path = dir.path().join("journal.sqlite3");
    let key = storage_key("https://lms.example.org/courses/safety/index.html");

    {
        let conn = open_db(&db_path).expect("file db opens");
        let repo = SqliteStateRepository::new(&conn);
        let mut service = JournalService::open(repo, key.clone()).expect("service opens");
        service
            .process_blocks(&[NoteBlock::from_text(
                "Journal Entry\nSection: Week 1\nPrompt: What did you learn?",
            )])
            .expect("ingest");
        service.record_response(0, 0, "I learned X").expect("autosave");
    }

    let conn = open_db(&db_path).expect("file db reopens");
    let repo = SqliteStateRepository::new(&conn);
    let service = JournalService::open(repo, key).expect("service reopens");
    assert_eq!(
        service.store().sections[0].entries[0].response,
        "I learned X"
    );
}

#[test]
fn different_pages_get_different_keys_in_one_database() {
    let conn = open_db_in_memory().expect("db opens");
    let key_a = storage_key("https://lms.example.org/courses/a/index.html");
    let key_b = storage_key("https://lms.example.org/courses/b/index.html");

    {
        let repo = SqliteStateRepository::new(&conn);
        let mut service = JournalService::open(repo, key_a.clone()).expect("service a");
        service
            .process_blocks(&[NoteBlock::from_text("Journal Entry\nSection: A\nPrompt: P")])
            .expect("ingest a");
    }

    let repo = SqliteStateRepository::new(&conn);
    let service = JournalService::open(repo, key_b).expect("service b");
    assert!(service.store().is_empty());

    let repo = SqliteStateRepository::new(&conn);
    let service = JournalService::open(repo, key_a).expect("service a again");
    assert_eq!(service.store().sections[0].title, "A");
}

use jotter::{
    Config, Error, FormOutcome, MatchType, NoteService, NoteStorage, NoteStore, UpsertForm,
    UpsertStatus,
};
use tempfile::TempDir;

fn open_service(temp_dir: &TempDir) -> NoteService<NoteStore> {
    let config = Config::new(Some(temp_dir.path().join("test_jotter"))).unwrap();
    config.init().unwrap();
    NoteService::open(NoteStore::open(&config).unwrap())
}

#[test]
fn test_notes_survive_reopen() {
    let temp_dir = TempDir::new().unwrap();
    {
        let mut service = open_service(&temp_dir);
        assert_eq!(service.create_note("Budget", "groceries"), UpsertStatus::Success);
        assert_eq!(service.create_note("", "untitled thought"), UpsertStatus::Success);
    }

    let service = open_service(&temp_dir);
    let hits = service.search("").unwrap();
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|h| h.match_type == MatchType::None));
    assert!(hits.iter().all(|h| h.note.last_modified_at() >= h.note.created_at()));
}

#[test]
fn test_search_after_writes() {
    let temp_dir = TempDir::new().unwrap();
    let mut service = open_service(&temp_dir);
    service.create_note("Budget", "groceries");
    service.create_note("Password reset", "reset the password");

    let hits = service.search("reset").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].match_type, MatchType::Both);

    let id = hits[0].note.id();
    assert_eq!(service.delete_note(id), UpsertStatus::Success);
    assert!(service.search("reset").unwrap().is_empty());
    assert_eq!(service.search("").unwrap().len(), 1);
}

#[test]
fn test_blank_content_is_rejected_before_storage() {
    let temp_dir = TempDir::new().unwrap();
    let mut service = open_service(&temp_dir);
    assert_eq!(service.create_note("Title only", "   "), UpsertStatus::NoContent);
    assert!(service.storage().load_all().unwrap().is_empty());
}

#[test]
fn test_edit_unknown_note_fails() {
    let temp_dir = TempDir::new().unwrap();
    let mut service = open_service(&temp_dir);
    assert_eq!(service.edit_note(99, "t", "c"), UpsertStatus::Failed);
}

#[test]
fn test_form_round_trip_through_store() {
    let temp_dir = TempDir::new().unwrap();
    let mut service = open_service(&temp_dir);

    let mut form = UpsertForm::create();
    form.title = "Trip".to_string();
    form.content = "pack bags".to_string();
    assert_eq!(form.submit(&mut service), FormOutcome::Saved);

    let id = service.search("trip").unwrap()[0].note.id();
    let cleared = UpsertForm::edit(id, "Trip", "");
    assert_eq!(cleared.submit(&mut service), FormOutcome::ConfirmDelete { id });
    assert_eq!(cleared.delete(&mut service), UpsertStatus::Success);
    assert!(service.search("").unwrap().is_empty());
}

#[test]
fn test_search_is_idempotent_on_store_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let mut service = open_service(&temp_dir);
    service.create_note("alpha", "one");
    service.create_note("beta", "alpha two");

    let first = service.search("alpha").unwrap();
    let second = service.search("alpha").unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_unavailable_store_is_reported() {
    struct BrokenStore;

    impl NoteStorage for BrokenStore {
        fn load_all(&self) -> jotter::Result<Vec<jotter::NoteRecord>> {
            Err(Error::StorageUnavailable)
        }
        fn insert(&self, _: &str, _: &str, _: i64, _: i64) -> UpsertStatus {
            UpsertStatus::Failed
        }
        fn update(&self, _: i64, _: &str, _: &str, _: i64) -> UpsertStatus {
            UpsertStatus::Failed
        }
        fn delete(&self, _: i64) -> UpsertStatus {
            UpsertStatus::Failed
        }
    }

    let mut service = NoteService::open(BrokenStore);
    assert!(matches!(service.search(""), Err(Error::StorageUnavailable)));
    assert!(matches!(service.search("anything"), Err(Error::StorageUnavailable)));
    assert_eq!(service.create_note("t", "c"), UpsertStatus::Failed);
}

use serde_json::json;
use sitecontent_core::db::open_db_in_memory;
use sitecontent_core::{
    ContentKind, EntityPatch, KeyedConfigStore, RepoError, SqliteKeyedConfigStore, StorageShape,
    ValidationError,
};

fn hero(title: &str) -> EntityPatch {
    EntityPatch::new()
        .default_text("title", title)
        .default_text("body", "Join us")
}

#[test]
fn upsert_twice_keeps_one_section_with_latest_title() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyedConfigStore::try_new(&conn, ContentKind::CareerContent).unwrap();

    let first = store.upsert("hero", &hero("X")).unwrap();
    let second = store
        .upsert("hero", &EntityPatch::new().default_text("title", "Y"))
        .unwrap();

    let all = store.list().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].section, "hero");
    assert_eq!(all[0].localized("title").unwrap().resolve("en"), "Y");
    assert_eq!(all[0].localized("body").unwrap().resolve("tr"), "Join us");
    assert_eq!(second.created_at, first.created_at);
    assert!(second.updated_at > first.updated_at);
}

#[test]
fn title_only_upsert_creates_section_in_every_keyed_kind() {
    let conn = open_db_in_memory().unwrap();
    for kind in [
        ContentKind::CareerContent,
        ContentKind::AboutContent,
        ContentKind::ContactContent,
    ] {
        let store = SqliteKeyedConfigStore::try_new(&conn, kind).unwrap();
        let patch = EntityPatch::from_json(&json!({"title": "X"})).unwrap();

        let created = store.upsert("hero", &patch).unwrap();
        assert_eq!(created.localized("title").unwrap().resolve("tr"), "X");
        assert!(created.localized("body").is_none());
        assert_eq!(store.count().unwrap(), 1, "{kind}");
    }
}

#[test]
fn upsert_as_create_requires_title() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyedConfigStore::try_new(&conn, ContentKind::AboutContent).unwrap();

    let err = store
        .upsert("mission", &EntityPatch::new().default_text("body", "Only body"))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::MissingField { field: "title", .. })
    ));
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn sections_list_in_key_order() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyedConfigStore::try_new(&conn, ContentKind::AboutContent).unwrap();

    for section in ["vision", "story", "mission"] {
        store.upsert(section, &hero(section)).unwrap();
    }
    let keys: Vec<String> = store
        .list()
        .unwrap()
        .into_iter()
        .map(|content| content.section)
        .collect();
    assert_eq!(keys, vec!["mission", "story", "vision"]);
}

#[test]
fn get_and_delete_missing_section_return_not_found() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyedConfigStore::try_new(&conn, ContentKind::ContactContent).unwrap();

    assert!(store.get("hero").unwrap_err().is_not_found());

    store.upsert("hero", &hero("Contact")).unwrap();
    store.delete("hero").unwrap();
    assert!(store.get("hero").unwrap_err().is_not_found());
    assert!(store.delete("hero").unwrap_err().is_not_found());
}

#[test]
fn section_keys_are_validated() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyedConfigStore::try_new(&conn, ContentKind::CareerContent).unwrap();

    let err = store.upsert("Hero Banner", &hero("X")).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::InvalidSection(_))
    ));
}

#[test]
fn section_content_rejects_list_attributes() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyedConfigStore::try_new(&conn, ContentKind::CareerContent).unwrap();

    let err = store
        .upsert("hero", &hero("X").display_order(2))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::UnsupportedAttribute { .. })
    ));
}

#[test]
fn json_patch_can_clear_optional_section_fields() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyedConfigStore::try_new(&conn, ContentKind::ContactContent).unwrap();

    let created = store
        .upsert(
            "hero",
            &EntityPatch::from_json(&json!({
                "title": {"tr": "Bize Ulaşın", "en": "Contact Us"},
                "body": "Form",
                "mapEmbedUrl": "https://maps.example.com",
            }))
            .unwrap(),
        )
        .unwrap();
    assert_eq!(created.text("mapEmbedUrl"), Some("https://maps.example.com"));

    let cleared = store
        .upsert(
            "hero",
            &EntityPatch::from_json(&json!({"mapEmbedUrl": null})).unwrap(),
        )
        .unwrap();
    assert_eq!(cleared.text("mapEmbedUrl"), None);
    assert_eq!(cleared.localized("title"), created.localized("title"));

    let public = cleared.to_public_json("en");
    assert_eq!(public["section"], "hero");
    assert_eq!(public["title"], "Contact Us");
    assert_eq!(public["body"], "Form");
}

#[test]
fn list_kinds_are_not_keyed_stores() {
    let conn = open_db_in_memory().unwrap();
    let err = SqliteKeyedConfigStore::try_new(&conn, ContentKind::Service)
        .err()
        .unwrap();
    assert!(matches!(
        err,
        RepoError::WrongStorage {
            expected: StorageShape::Keyed,
            ..
        }
    ));
}

use sitecontent_core::db::{open_db, open_db_in_memory};
use sitecontent_core::{
    seed_defaults, ContentKind, ContentRepository, ContentStore, CoreConfig, DatabaseLocation,
    EntityPatch, KeyedConfigStore, ReadView, SeedOutcome, SqliteContentRepository,
    SqliteKeyedConfigStore,
};

#[test]
fn seeding_empty_database_applies_defaults_with_fixed_ids() {
    let conn = open_db_in_memory().unwrap();
    let report = seed_defaults(&conn).unwrap();

    assert_eq!(
        report.outcome(ContentKind::CompanyValue),
        Some(SeedOutcome::Applied { count: 4 })
    );
    assert_eq!(
        report.outcome(ContentKind::ContactMessage),
        Some(SeedOutcome::NoDefaults)
    );
    assert!(report.applied_total() > 0);

    let repo = SqliteContentRepository::try_new(&conn, ContentKind::CompanyValue).unwrap();
    let listed = repo.list(ReadView::Public).unwrap();
    let ids: Vec<&str> = listed.iter().map(|entity| entity.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3", "4"]);
    assert_eq!(listed[0].localized("title").unwrap().resolve("fr"), "Confiance");
    assert_eq!(listed[1].localized("title").unwrap().resolve("fr"), "Yenilik");

    let about = SqliteKeyedConfigStore::try_new(&conn, ContentKind::AboutContent).unwrap();
    assert_eq!(about.count().unwrap(), 3);
    assert!(about.get("mission").is_ok());
}

#[test]
fn second_seed_run_is_a_noop() {
    let conn = open_db_in_memory().unwrap();
    let first = seed_defaults(&conn).unwrap();
    let second = seed_defaults(&conn).unwrap();

    assert!(!first.is_noop());
    assert!(second.is_noop());
    assert_eq!(
        second.outcome(ContentKind::CompanyValue),
        Some(SeedOutcome::Skipped { existing: 4 })
    );
}

#[test]
fn seeding_skips_kinds_with_admin_content() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContentRepository::try_new(&conn, ContentKind::Milestone).unwrap();
    repo.create(
        &sitecontent_core::EntityDraft::new()
            .text("year", "2030")
            .default_text("title", "Admin milestone")
            .default_text("description", "Added before seeding"),
    )
    .unwrap();

    let report = seed_defaults(&conn).unwrap();
    assert_eq!(
        report.outcome(ContentKind::Milestone),
        Some(SeedOutcome::Skipped { existing: 1 })
    );
    assert_eq!(repo.count().unwrap(), 1);
}

#[test]
fn every_seeded_list_entity_is_public_and_resolvable() {
    let conn = open_db_in_memory().unwrap();
    let report = seed_defaults(&conn).unwrap();

    for (kind, outcome) in report.iter() {
        let SeedOutcome::Applied { count } = outcome else {
            continue;
        };
        if let Ok(repo) = SqliteContentRepository::try_new(&conn, kind) {
            let listed = repo.list(ReadView::Public).unwrap();
            assert_eq!(listed.len(), count, "{kind}");
            for entity in &listed {
                for spec in kind.schema().localized_fields() {
                    if let Some(text) = entity.localized(spec.name) {
                        assert!(!text.resolve("ru").is_empty(), "{kind}.{}", spec.name);
                    }
                }
            }
        }
    }
}

#[test]
fn file_backed_store_keeps_admin_edits_across_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("content.db");
    let config = CoreConfig {
        database: DatabaseLocation::File { path: path.clone() },
        ..CoreConfig::default()
    };

    let store = ContentStore::init(&config).unwrap();
    assert!(!store.seed_report().unwrap().is_noop());
    store
        .content(ContentKind::CompanyValue)
        .unwrap()
        .update("1", &EntityPatch::new().default_text("title", "Edited"))
        .unwrap();
    store
        .sections(ContentKind::CareerContent)
        .unwrap()
        .upsert("hero", &EntityPatch::new().default_text("title", "Edited hero"))
        .unwrap();
    store.shutdown().unwrap();

    let restarted = ContentStore::init(&config).unwrap();
    assert!(restarted.seed_report().unwrap().is_noop());
    let value = restarted
        .content(ContentKind::CompanyValue)
        .unwrap()
        .get("1", ReadView::Admin)
        .unwrap();
    assert_eq!(value.localized("title").unwrap().resolve("tr"), "Edited");
    let hero = restarted
        .sections(ContentKind::CareerContent)
        .unwrap()
        .get("hero")
        .unwrap();
    assert_eq!(hero.localized("title").unwrap().resolve("tr"), "Edited hero");
    restarted.shutdown().unwrap();

    let conn = open_db(&path).unwrap();
    assert!(seed_defaults(&conn).unwrap().is_noop());
}

#[test]
fn in_memory_store_restores_defaults_on_restart() {
    let config = CoreConfig::default();

    let store = ContentStore::init(&config).unwrap();
    store
        .content(ContentKind::CompanyValue)
        .unwrap()
        .delete("1")
        .unwrap();
    store.shutdown().unwrap();

    let restarted = ContentStore::init(&config).unwrap();
    assert!(restarted
        .content(ContentKind::CompanyValue)
        .unwrap()
        .get("1", ReadView::Admin)
        .is_ok());
}

#[test]
fn seeding_can_be_disabled() {
    let config = CoreConfig {
        seed_on_start: false,
        ..CoreConfig::default()
    };
    let store = ContentStore::init(&config).unwrap();

    assert!(store.seed_report().is_none());
    assert_eq!(
        store
            .content(ContentKind::CompanyValue)
            .unwrap()
            .count()
            .unwrap(),
        0
    );
}

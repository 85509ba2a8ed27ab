use sitecontent_core::db::open_db_in_memory;
use sitecontent_core::{
    notifier_for, ContentKind, ContentService, EntityDraft, LogNotifier, NoopNotifier,
    SqliteContentRepository, SubmissionNotifier,
};

fn service_draft(title: &str) -> EntityDraft {
    EntityDraft::new()
        .default_text("title", title)
        .default_text("description", "desc")
}

#[test]
fn reorder_assigns_positions_in_given_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContentRepository::try_new(&conn, ContentKind::Service).unwrap();
    let service = ContentService::new(repo, &NoopNotifier);

    let a = service.create(&service_draft("A")).unwrap();
    let b = service.create(&service_draft("B")).unwrap();
    let c = service.create(&service_draft("C")).unwrap();

    service
        .reorder(&[c.id.as_str(), a.id.as_str(), b.id.as_str()])
        .unwrap();
    let ids: Vec<String> = service
        .list_admin()
        .unwrap()
        .into_iter()
        .map(|entity| entity.id)
        .collect();
    assert_eq!(ids, vec![c.id, a.id, b.id]);
}

#[test]
fn reorder_stops_at_unknown_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContentRepository::try_new(&conn, ContentKind::Service).unwrap();
    let service = ContentService::new(repo, &NoopNotifier);

    let a = service.create(&service_draft("A").display_order(9)).unwrap();
    let err = service.reorder(&[a.id.as_str(), "missing"]).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(
        service
            .get(&a.id, sitecontent_core::ReadView::Admin)
            .unwrap()
            .display_order,
        0
    );
}

#[test]
fn set_active_toggles_public_visibility() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContentRepository::try_new(&conn, ContentKind::Service).unwrap();
    let service = ContentService::new(repo, &NoopNotifier);

    let created = service.create(&service_draft("A")).unwrap();
    service.set_active(&created.id, false).unwrap();
    assert!(service.list_public().unwrap().is_empty());
    assert_eq!(service.list_admin().unwrap().len(), 1);

    service.set_active(&created.id, true).unwrap();
    assert_eq!(service.list_public().unwrap().len(), 1);
}

#[test]
fn log_notifier_requires_recipient() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContentRepository::try_new(&conn, ContentKind::DemoRequest).unwrap();
    let service = ContentService::new(repo, &NoopNotifier);
    let stored = service
        .create(
            &EntityDraft::new()
                .text("name", "Ada")
                .text("email", "ada@example.com")
                .text("company", "Example A.Ş."),
        )
        .unwrap();

    let notifier = LogNotifier::new("sales@example.com");
    assert_eq!(notifier.recipient(), "sales@example.com");
    assert!(notifier.notify(&stored).is_ok());
    assert!(LogNotifier::new("  ").notify(&stored).is_err());

    let failing = LogNotifier::new("");
    let repo = SqliteContentRepository::try_new(&conn, ContentKind::DemoRequest).unwrap();
    let service = ContentService::new(repo, &failing);
    assert!(service
        .create(
            &EntityDraft::new()
                .text("name", "Grace")
                .text("email", "grace@example.com")
                .text("company", "Example")
        )
        .is_ok());
}

#[test]
fn notifier_follows_configured_recipient() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContentRepository::try_new(&conn, ContentKind::ContactMessage).unwrap();
    let service = ContentService::new(repo, &NoopNotifier);
    let stored = service
        .create(
            &EntityDraft::new()
                .text("name", "Ada")
                .text("email", "ada@example.com")
                .text("message", "Merhaba"),
        )
        .unwrap();

    let configured = sitecontent_core::CoreConfig {
        notification_recipient: Some("info@example.com".to_string()),
        ..sitecontent_core::CoreConfig::default()
    };
    assert!(notifier_for(&configured).notify(&stored).is_ok());
    assert!(notifier_for(&sitecontent_core::CoreConfig::default())
        .notify(&stored)
        .is_ok());
}

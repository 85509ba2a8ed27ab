use serde_json::{json, Value};
use sitecontent_core::db::open_db_in_memory;
use sitecontent_core::{
    AdminGateway, ContentEntity, ContentStore, CoreConfig, NoopNotifier, NotifyError,
    PublicReadApi, SubmissionNotifier,
};
use std::cell::RefCell;

#[derive(Default)]
struct RecordingNotifier {
    seen: RefCell<Vec<String>>,
    fail: bool,
}

impl SubmissionNotifier for RecordingNotifier {
    fn notify(&self, submission: &ContentEntity) -> Result<(), NotifyError> {
        self.seen
            .borrow_mut()
            .push(format!("{}:{}", submission.kind, submission.id));
        if self.fail {
            Err(NotifyError("smtp unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

fn empty_store() -> ContentStore {
    ContentStore::init(&CoreConfig {
        seed_on_start: false,
        ..CoreConfig::default()
    })
    .unwrap()
}

fn contact_message() -> Value {
    json!({
        "name": "Ada",
        "email": "ada@example.com",
        "message": "Demo istiyorum",
    })
}

#[test]
fn admin_crud_roundtrip_over_json() {
    let store = empty_store();
    let admin = AdminGateway::new(&store, &NoopNotifier);

    let created = admin
        .create(
            "company-values",
            &json!({"title": {"tr": "Güven", "en": "Trust"}, "description": "Söz", "displayOrder": 2}),
        )
        .unwrap();
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["title"]["en"], "Trust");
    assert_eq!(created["displayOrder"], 2);
    assert_eq!(created["isActive"], true);

    let updated = admin
        .update("company_values", &id, &json!({"isActive": false, "iconName": "shield"}))
        .unwrap();
    assert_eq!(updated["isActive"], false);
    assert_eq!(updated["iconName"], "shield");
    assert_eq!(updated["createdAt"], created["createdAt"]);

    assert_eq!(admin.list("company_values").unwrap().len(), 1);
    assert_eq!(admin.get("company_values", &id).unwrap()["id"], id.as_str());

    admin.delete("company_values", &id).unwrap();
    assert_eq!(admin.get("company_values", &id).unwrap_err().status, 404);
}

#[test]
fn admin_errors_map_to_http_statuses() {
    let store = empty_store();
    let admin = AdminGateway::new(&store, &NoopNotifier);

    assert_eq!(admin.list("gadgets").unwrap_err().status, 404);
    assert_eq!(admin.get("services", "missing").unwrap_err().status, 404);
    assert_eq!(admin.delete("services", "missing").unwrap_err().status, 404);
    assert_eq!(admin.list("about_contents").unwrap_err().status, 404);

    let missing_default = admin
        .create(
            "company_values",
            &json!({"title": {"en": "Trust"}, "description": {"tr": "Söz"}}),
        )
        .unwrap_err();
    assert_eq!(missing_default.status, 400);
    assert!(missing_default.message.contains("title"));

    assert_eq!(admin.create("company_values", &json!([1, 2])).unwrap_err().status, 400);
    assert_eq!(
        admin
            .create("company_values", &json!({"title": "A", "description": "B", "colour": "red"}))
            .unwrap_err()
            .status,
        400
    );

    let created = admin
        .create("company_values", &json!({"title": "A", "description": "B"}))
        .unwrap();
    let id = created["id"].as_str().unwrap();
    let stale = created["updatedAt"].as_i64().unwrap();
    admin
        .update_if_unmodified("company_values", id, stale, &json!({"title": "B"}))
        .unwrap();
    let conflict = admin
        .update_if_unmodified("company_values", id, stale, &json!({"title": "C"}))
        .unwrap_err();
    assert_eq!(conflict.status, 409);
}

#[test]
fn corrupt_rows_become_generic_internal_errors() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO services (id, fields, display_order, is_active, created_at, updated_at)
         VALUES ('bad', '{\"secret\": \"x\"}', 0, 1, 0, 0);",
        [],
    )
    .unwrap();
    let store = ContentStore::from_connection(conn, false).unwrap();
    let admin = AdminGateway::new(&store, &NoopNotifier);
    let public = PublicReadApi::new(&store, &NoopNotifier);

    let err = admin.list("services").unwrap_err();
    assert_eq!(err.status, 500);
    assert!(!err.message.contains("secret"));
    assert!(public.list("services", "en").is_empty());
}

#[test]
fn admin_sections_upsert_and_list() {
    let store = empty_store();
    let admin = AdminGateway::new(&store, &NoopNotifier);

    admin
        .upsert_section("career_contents", "hero", &json!({"title": "X", "body": "Katılın"}))
        .unwrap();
    let second = admin
        .upsert_section("career_contents", "hero", &json!({"title": "Y"}))
        .unwrap();
    assert_eq!(second["title"]["tr"], "Y");

    let all = admin.list_sections("career_contents").unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0]["section"], "hero");

    assert_eq!(
        admin
            .upsert_section("career_contents", "culture", &json!({"title": "Only"}))
            .unwrap_err()
            .status,
        400
    );
    assert_eq!(admin.get_section("career_contents", "culture").unwrap_err().status, 404);
    assert_eq!(admin.list_sections("services").unwrap_err().status, 404);

    admin.delete_section("career_contents", "hero").unwrap();
    assert!(admin.list_sections("career_contents").unwrap().is_empty());
}

#[test]
fn public_reads_filter_inactive_and_resolve_language() {
    let store = empty_store();
    let admin = AdminGateway::new(&store, &NoopNotifier);
    let public = PublicReadApi::new(&store, &NoopNotifier);

    let shown = admin
        .create(
            "faq_items",
            &json!({
                "question": {"tr": "Soru?", "en": "Question?"},
                "answer": {"tr": "Cevap"},
                "displayOrder": 1,
            }),
        )
        .unwrap();
    let hidden = admin
        .create(
            "faq_items",
            &json!({"question": "Gizli", "answer": "Gizli", "isActive": false}),
        )
        .unwrap();

    let listed = public.list("faq_items", "en");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["question"], "Question?");
    assert_eq!(listed[0]["answer"], "Cevap");

    let shown_id = shown["id"].as_str().unwrap();
    let hidden_id = hidden["id"].as_str().unwrap();
    assert_eq!(public.get("faq_items", shown_id, "fr").unwrap()["question"], "Soru?");
    assert!(public.get("faq_items", hidden_id, "tr").is_none());
    assert_eq!(admin.list("faq_items").unwrap().len(), 2);
}

#[test]
fn public_reads_degrade_instead_of_failing() {
    let store = empty_store();
    let public = PublicReadApi::new(&store, &NoopNotifier);

    assert!(public.list("gadgets", "tr").is_empty());
    assert!(public.list("contact_messages", "tr").is_empty());
    assert!(public.list("about_contents", "tr").is_empty());
    assert!(public.get("services", "missing", "tr").is_none());
    assert!(public.section("about_contents", "missing", "tr").is_none());
    assert!(public.sections("services", "tr").is_empty());
}

#[test]
fn public_sections_resolve_language() {
    let store = ContentStore::init(&CoreConfig::default()).unwrap();
    let public = PublicReadApi::new(&store, &NoopNotifier);

    let story = public.section("about_contents", "story", "en").unwrap();
    assert_eq!(story["title"], "Our Story");
    let sections = public.sections("about_contents", "de");
    assert_eq!(sections.len(), 3);
    assert_eq!(sections[0]["section"], "mission");
    assert_eq!(sections[0]["title"], "Misyonumuz");
}

#[test]
fn submissions_notify_after_commit() {
    let store = empty_store();
    let notifier = RecordingNotifier::default();
    let public = PublicReadApi::new(&store, &notifier);

    let stored = public
        .submit_form("contact_messages", &json!({"id": "chosen", "name": "Ada", "email": "ada@example.com", "message": "Merhaba"}))
        .unwrap();
    let id = stored["id"].as_str().unwrap();
    assert_ne!(id, "chosen");
    assert_eq!(
        notifier.seen.borrow().as_slice(),
        [format!("contact_messages:{id}")]
    );

    let admin = AdminGateway::new(&store, &notifier);
    assert_eq!(admin.list("contact_messages").unwrap().len(), 1);
}

#[test]
fn notifier_failure_does_not_undo_the_write() {
    let store = empty_store();
    let notifier = RecordingNotifier {
        fail: true,
        ..RecordingNotifier::default()
    };
    let public = PublicReadApi::new(&store, &notifier);

    let stored = public.submit_form("contact_messages", &contact_message()).unwrap();
    assert_eq!(notifier.seen.borrow().len(), 1);

    let admin = AdminGateway::new(&store, &NoopNotifier);
    let id = stored["id"].as_str().unwrap();
    assert_eq!(admin.get("contact_messages", id).unwrap()["name"], "Ada");
}

#[test]
fn submissions_are_limited_to_form_kinds() {
    let store = empty_store();
    let notifier = RecordingNotifier::default();
    let public = PublicReadApi::new(&store, &notifier);

    let err = public
        .submit_form("services", &json!({"title": "X", "description": "Y"}))
        .unwrap_err();
    assert_eq!(err.status, 404);

    let invalid = public
        .submit_form("demo_requests", &json!({"name": "Ada", "email": "ada@example.com"}))
        .unwrap_err();
    assert_eq!(invalid.status, 400);

    let ordered = public
        .submit_form("contact_messages", &json!({"name": "Ada", "email": "a@b.c", "message": "m", "displayOrder": 1}))
        .unwrap_err();
    assert_eq!(ordered.status, 400);
    assert!(notifier.seen.borrow().is_empty());
}

#[test]
fn admin_created_submissions_also_notify() {
    let store = empty_store();
    let notifier = RecordingNotifier::default();
    let admin = AdminGateway::new(&store, &notifier);

    admin.create("job_applications", &json!({"name": "Ada", "email": "ada@example.com"})).unwrap();
    admin
        .create("services", &json!({"title": "Danışmanlık", "description": "Yol haritası"}))
        .unwrap();
    assert_eq!(notifier.seen.borrow().len(), 1);
}

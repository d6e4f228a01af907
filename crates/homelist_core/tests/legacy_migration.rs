use homelist_core::db::open_db_in_memory;
use homelist_core::migrate::legacy_item_id;
use homelist_core::repo::metadata_repo::LEGACY_COMPLETION_MARKER_KEY;
use homelist_core::{
    migrate_legacy_documents, ItemListQuery, ItemRepository, MetadataRepository, MigrationError,
    SqliteItemRepository, SqliteMetadataRepository, User,
};

const EXPORT: &str = r#"[
    {
        "id": "aZ19kdPq7",
        "name": "Refrigerador",
        "category": "Cocina",
        "relevance": "Alta",
        "price": 500000,
        "quantity": 1,
        "completed": true,
        "completedBy": "Valeria",
        "completedAt": {"seconds": 1700000000, "nanoseconds": 500000000},
        "addedBy": "Felipe",
        "createdAt": 1690000000000
    },
    {
        "id": "bX22mmQr8",
        "name": "Toallas",
        "category": "Baños",
        "relevance": "Media",
        "price": 20000,
        "completed": true
    },
    {
        "id": "cY33nnRs9",
        "name": "Sillas",
        "category": "Comedor",
        "relevance": "Alta",
        "price": 30000,
        "quantity": 4,
        "completedQuantity": 9,
        "completed": false,
        "completedBy": "Felipe"
    },
    {
        "id": "dW44ooSt0",
        "name": "Alfombra",
        "category": "Living",
        "relevance": "Baja",
        "price": 80000,
        "quantity": 1,
        "completed": false,
        "completedBy": "Felipe",
        "completedAt": 1,
        "deleted": true,
        "deletedBy": "Valeria",
        "deletedAt": {"_seconds": 1700000100, "_nanoseconds": 0}
    }
]"#;

#[test]
fn import_converts_boolean_completion() {
    let conn = open_db_in_memory().unwrap();

    let report = migrate_legacy_documents(&conn, EXPORT, User::Felipe).unwrap();
    assert_eq!(report.imported, 4);
    assert_eq!(report.converted, 2);
    assert_eq!(report.already_present, 0);
    assert!(!report.skipped_marker);

    let repo = SqliteItemRepository::try_new(&conn).unwrap();
    let fridge = repo
        .get_item(legacy_item_id("aZ19kdPq7"), false)
        .unwrap()
        .unwrap();
    assert_eq!(fridge.completed_quantity, 1);
    assert_eq!(fridge.completed_by, Some(User::Valeria));
    assert_eq!(fridge.completed_at, Some(1_700_000_000_500));
    assert_eq!(fridge.created_at, Some(1_690_000_000_000));

    let towels = repo
        .get_item(legacy_item_id("bX22mmQr8"), false)
        .unwrap()
        .unwrap();
    assert_eq!(towels.quantity, 1);
    assert_eq!(towels.completed_quantity, 1);
    assert_eq!(towels.created_at, None);

    let chairs = repo
        .get_item(legacy_item_id("cY33nnRs9"), false)
        .unwrap()
        .unwrap();
    assert_eq!(chairs.completed_quantity, 4);
    assert_eq!(chairs.completed_by, Some(User::Felipe));

    let rug = repo
        .get_item(legacy_item_id("dW44ooSt0"), true)
        .unwrap()
        .unwrap();
    assert!(rug.is_deleted);
    assert_eq!(rug.completed_by, None);
    assert_eq!(rug.completed_at, None);
    assert_eq!(rug.deleted_at, Some(1_700_000_100_000));

    let metadata = SqliteMetadataRepository::try_new(&conn).unwrap();
    let note = metadata
        .get_value(LEGACY_COMPLETION_MARKER_KEY)
        .unwrap()
        .unwrap();
    assert!(note.contains("converted=2"));
}

#[test]
fn boolean_completion_overrides_stale_count() {
    let conn = open_db_in_memory().unwrap();
    let export = r#"[
        {"id": "eE55ppTu1", "name": "Sillas de terraza", "category": "Terraza 1", "relevance": "Media", "price": 40000, "quantity": 2, "completed": true, "completedQuantity": 0, "completedBy": "Valeria", "completedAt": 1700000000000}
    ]"#;

    let report = migrate_legacy_documents(&conn, export, User::Felipe).unwrap();
    assert_eq!(report.imported, 1);
    assert_eq!(report.converted, 1);

    let repo = SqliteItemRepository::try_new(&conn).unwrap();
    let chairs = repo
        .get_item(legacy_item_id("eE55ppTu1"), false)
        .unwrap()
        .unwrap();
    assert_eq!(chairs.completed_quantity, 2);
    assert!(chairs.is_completed());
    assert_eq!(chairs.completed_by, Some(User::Valeria));
    assert_eq!(chairs.completed_at, Some(1_700_000_000_000));
}

#[test]
fn import_runs_only_once() {
    let conn = open_db_in_memory().unwrap();

    migrate_legacy_documents(&conn, EXPORT, User::Felipe).unwrap();
    let second = migrate_legacy_documents(&conn, EXPORT, User::Valeria).unwrap();
    assert!(second.skipped_marker);
    assert_eq!(second.imported, 0);

    let repo = SqliteItemRepository::try_new(&conn).unwrap();
    assert_eq!(repo.count_items(true).unwrap(), 4);
}

#[test]
fn empty_export_still_sets_marker() {
    let conn = open_db_in_memory().unwrap();

    let report = migrate_legacy_documents(&conn, "[]", User::Felipe).unwrap();
    assert_eq!(report.imported, 0);
    assert_eq!(report.converted, 0);

    let metadata = SqliteMetadataRepository::try_new(&conn).unwrap();
    let note = metadata
        .get_value(LEGACY_COMPLETION_MARKER_KEY)
        .unwrap()
        .unwrap();
    assert!(note.starts_with("no items needed migration"));
}

#[test]
fn malformed_document_aborts_whole_import() {
    let conn = open_db_in_memory().unwrap();
    let export = r#"[
        {"id": "ok-1", "name": "Mesa", "category": "Comedor", "relevance": "Alta", "price": 1000, "completed": true},
        {"id": "bad-2", "name": "Cosa", "category": "Garage", "relevance": "Alta", "price": 1000}
    ]"#;

    match migrate_legacy_documents(&conn, export, User::Felipe) {
        Err(MigrationError::InvalidDocument { index, reason }) => {
            assert_eq!(index, 1);
            assert!(reason.contains("Garage"));
        }
        other => panic!("unexpected result: {other:?}"),
    }

    let repo = SqliteItemRepository::try_new(&conn).unwrap();
    assert!(repo
        .list_items(&ItemListQuery {
            include_deleted: true,
            ..ItemListQuery::default()
        })
        .unwrap()
        .is_empty());
    let metadata = SqliteMetadataRepository::try_new(&conn).unwrap();
    assert!(!metadata.has_marker(LEGACY_COMPLETION_MARKER_KEY).unwrap());
}

#[test]
fn non_array_export_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    assert!(matches!(
        migrate_legacy_documents(&conn, "{\"items\": []}", User::Felipe),
        Err(MigrationError::MalformedJson(_))
    ));
}

#[test]
fn existing_ids_are_left_untouched() {
    let conn = open_db_in_memory().unwrap();
    let export = r#"[
        {"id": "6f1c2a56-7d3e-4b1a-9e0f-2b8c4d5e6f70", "name": "Mesa", "category": "Comedor", "relevance": "Alta", "price": 1000, "completed": true}
    ]"#;

    conn.execute(
        "INSERT INTO items (id, name, category, relevance, price, quantity)
         VALUES ('6f1c2a56-7d3e-4b1a-9e0f-2b8c4d5e6f70', 'Mesa nueva', 'Comedor', 'Media', 2000, 1);",
        [],
    )
    .unwrap();

    let report = migrate_legacy_documents(&conn, export, User::Felipe).unwrap();
    assert_eq!(report.imported, 0);
    assert_eq!(report.already_present, 1);

    let repo = SqliteItemRepository::try_new(&conn).unwrap();
    let kept = repo
        .get_item("6f1c2a56-7d3e-4b1a-9e0f-2b8c4d5e6f70".parse().unwrap(), false)
        .unwrap()
        .unwrap();
    assert_eq!(kept.name, "Mesa nueva");
    assert_eq!(kept.completed_quantity, 0);
}

use homelist_core::{Category, Item, Relevance, User};
use serde_json::json;

#[test]
fn serializes_with_document_field_names() {
    let mut item = Item::new("Sofá", Category::Living, Relevance::High, 500_000);
    item.added_by = Some(User::Felipe);
    item.created_at = Some(1_000);

    let value = serde_json::to_value(&item).unwrap();
    assert_eq!(value["category"], json!("Living"));
    assert_eq!(value["relevance"], json!("Alta"));
    assert_eq!(value["completedQuantity"], json!(0));
    assert_eq!(value["addedBy"], json!("Felipe"));
    assert_eq!(value["createdAt"], json!(1_000));
    assert_eq!(value["deleted"], json!(false));
    assert!(value.get("isDeleted").is_none());

    let back: Item = serde_json::from_value(value).unwrap();
    assert_eq!(back, item);
}

#[test]
fn deserialization_applies_defaults_and_validation() {
    let minimal = json!({
        "id": "6f1c2a56-7d3e-4b1a-9e0f-2b8c4d5e6f70",
        "name": "Velador",
        "category": "Dormitorio Principal",
        "relevance": "Media",
        "price": 45000,
        "quantity": 2
    });
    let item: Item = serde_json::from_value(minimal).unwrap();
    assert_eq!(item.category, Category::MainBedroom);
    assert_eq!(item.completed_quantity, 0);
    assert!(!item.is_deleted);

    let over_completed = json!({
        "id": "6f1c2a56-7d3e-4b1a-9e0f-2b8c4d5e6f70",
        "name": "Velador",
        "category": "Dormitorio Principal",
        "relevance": "Media",
        "price": 45000,
        "quantity": 2,
        "completedQuantity": 3
    });
    let err = serde_json::from_value::<Item>(over_completed).unwrap_err();
    assert!(err.to_string().contains("completedQuantity (3)"));

    let nil_id = json!({
        "id": "00000000-0000-0000-0000-000000000000",
        "name": "Velador",
        "category": "Living",
        "relevance": "Baja",
        "price": 0,
        "quantity": 1
    });
    assert!(serde_json::from_value::<Item>(nil_id).is_err());
}

#[test]
fn with_id_rejects_nil() {
    assert!(Item::with_id(uuid::Uuid::nil(), "Mesa", Category::Dining, Relevance::Low, 1).is_err());
}

use homelist_core::derive::{
    activity_feed, category_counts, category_progress, dashboard_stats, filter_items,
    share_text, sort_items, visible_items, ActivityKind, ItemFilter, StatusFilter,
    ALL_DONE_MESSAGE, DEFAULT_ACTIVITY_LIMIT,
};
use homelist_core::{Category, Item, Relevance, User};

fn item(name: &str, category: Category, relevance: Relevance, price: i64, quantity: u32) -> Item {
    let mut item = Item::new(name, category, relevance, price);
    item.quantity = quantity;
    item
}

fn completed(mut item: Item, by: User, at: i64) -> Item {
    let quantity = item.quantity;
    item.apply_completion(quantity, by, at);
    item
}

fn deleted(mut item: Item, by: User, at: i64) -> Item {
    item.soft_delete(by, at);
    item
}

fn sample_items() -> Vec<Item> {
    let mut partial = item("Sillas", Category::Dining, Relevance::High, 30_000, 4);
    partial.apply_completion(2, User::Felipe, 10);

    vec![
        item("Sofá", Category::Living, Relevance::Medium, 500_000, 1),
        partial,
        completed(
            item("Refrigerador", Category::Kitchen, Relevance::High, 450_000, 1),
            User::Valeria,
            20,
        ),
        item("alfombra", Category::Living, Relevance::Low, 80_000, 1),
        item("Cafetera", Category::Kitchen, Relevance::High, 40_000, 1),
        deleted(
            item("Lámpara", Category::Living, Relevance::High, 25_000, 2),
            User::Felipe,
            30,
        ),
    ]
}

fn names(items: &[Item]) -> Vec<&str> {
    items.iter().map(|item| item.name.as_str()).collect()
}

#[test]
fn filter_hides_deleted_and_combines_criteria() {
    let items = sample_items();

    let all = filter_items(&items, &ItemFilter::default());
    assert_eq!(all.len(), 5);
    assert!(all.iter().all(|item| !item.is_deleted));

    let living = filter_items(
        &items,
        &ItemFilter {
            category: Some(Category::Living),
            ..ItemFilter::default()
        },
    );
    assert_eq!(names(&living), vec!["Sofá", "alfombra"]);

    let high_pending = filter_items(
        &items,
        &ItemFilter {
            relevances: vec![Relevance::High],
            status: StatusFilter::Pending,
            ..ItemFilter::default()
        },
    );
    assert_eq!(names(&high_pending), vec!["Sillas", "Cafetera"]);

    let done = filter_items(
        &items,
        &ItemFilter {
            status: StatusFilter::Completed,
            ..ItemFilter::default()
        },
    );
    assert_eq!(names(&done), vec!["Refrigerador"]);
}

#[test]
fn search_is_case_insensitive_and_trimmed() {
    let items = sample_items();
    let found = filter_items(
        &items,
        &ItemFilter {
            search: "  SOF ".to_string(),
            ..ItemFilter::default()
        },
    );
    assert_eq!(names(&found), vec!["Sofá"]);

    let lamp = filter_items(
        &items,
        &ItemFilter {
            search: "lámpara".to_string(),
            ..ItemFilter::default()
        },
    );
    assert!(lamp.is_empty());
}

#[test]
fn sort_puts_pending_first_by_relevance_then_name() {
    let mut items = filter_items(&sample_items(), &ItemFilter::default());
    items.push(completed(
        item("Microondas", Category::Kitchen, Relevance::Low, 70_000, 1),
        User::Felipe,
        40,
    ));
    sort_items(&mut items);

    assert_eq!(
        names(&items),
        vec![
            "Cafetera",
            "Sillas",
            "Sofá",
            "alfombra",
            "Microondas",
            "Refrigerador"
        ]
    );
    assert_eq!(
        names(&visible_items(&items, &ItemFilter::default())),
        names(&items)
    );
}

#[test]
fn category_counts_cover_every_category() {
    let visible = filter_items(&sample_items(), &ItemFilter::default());
    let counts = category_counts(&visible);

    assert_eq!(counts.total, 5);
    assert_eq!(counts.per_category.len(), Category::ALL.len());
    assert_eq!(counts.count(Category::Living), 2);
    assert_eq!(counts.count(Category::Kitchen), 2);
    assert_eq!(counts.count(Category::Dining), 1);
    assert_eq!(counts.count(Category::Terrace2), 0);
}

#[test]
fn dashboard_counts_active_items_and_partial_spend() {
    let stats = dashboard_stats(&sample_items(), 1_000_000);

    assert_eq!(stats.progress.total, 5);
    assert_eq!(stats.progress.completed, 1);
    assert_eq!(stats.progress.percent(), 20);

    assert_eq!(stats.budget.total, 1_000_000);
    assert_eq!(stats.budget.spent, 450_000 + 2 * 30_000);
    assert_eq!(stats.budget.remaining, 1_000_000 - 510_000);

    let high = stats.for_relevance(Relevance::High);
    assert_eq!((high.completed, high.total), (1, 3));
    let low = stats.for_relevance(Relevance::Low);
    assert_eq!((low.completed, low.total), (0, 1));
}

#[test]
fn dashboard_remaining_goes_negative_when_over_budget() {
    let items = vec![completed(
        item("Cama", Category::MainBedroom, Relevance::High, 700_000, 1),
        User::Felipe,
        1,
    )];
    let stats = dashboard_stats(&items, 500_000);
    assert_eq!(stats.budget.remaining, -200_000);

    let empty = dashboard_stats(&[], 500_000);
    assert_eq!(empty.progress.ratio(), 0.0);
}

#[test]
fn dashboard_saturates_on_huge_prices() {
    let items = vec![
        completed(
            item("Piano", Category::Living, Relevance::Low, i64::MAX / 2, 3),
            User::Valeria,
            1,
        ),
        completed(
            item("Lámpara", Category::Living, Relevance::Low, 10_000, 1),
            User::Felipe,
            2,
        ),
    ];
    let stats = dashboard_stats(&items, 500_000);
    assert_eq!(stats.budget.spent, i64::MAX);
    assert_eq!(stats.budget.remaining, 500_000 - i64::MAX);
    assert_eq!(stats.progress.completed, 2);
}

#[test]
fn category_progress_counts_units_in_display_order() {
    let progress = category_progress(&sample_items());

    let categories = progress
        .iter()
        .map(|entry| entry.category)
        .collect::<Vec<_>>();
    assert_eq!(
        categories,
        vec![Category::Living, Category::Kitchen, Category::Dining]
    );

    let dining = progress[2].units;
    assert_eq!((dining.completed, dining.total), (2, 4));
    let living = progress[0].units;
    assert_eq!((living.completed, living.total), (0, 2));
}

#[test]
fn activity_feed_is_newest_first_and_limited() {
    let mut items = Vec::new();
    for index in 0..5_i64 {
        let mut added = item(
            &format!("Item {index}"),
            Category::Other,
            Relevance::Low,
            1_000,
            1,
        );
        added.added_by = Some(User::Felipe);
        added.created_at = Some(index * 100);
        items.push(added);
    }
    items[1] = completed(items[1].clone(), User::Valeria, 450);
    items[2] = deleted(items[2].clone(), User::Valeria, 900);

    let mut partial = item("Sillas", Category::Dining, Relevance::High, 1, 4);
    partial.apply_completion(2, User::Felipe, 1_000);
    partial.added_by = Some(User::Valeria);
    items.push(partial);

    let mut undated = item("Sin fecha", Category::Other, Relevance::Low, 1, 1);
    undated.added_by = Some(User::Felipe);
    items.push(undated);

    let feed = activity_feed(&items, DEFAULT_ACTIVITY_LIMIT);
    assert_eq!(feed.len(), DEFAULT_ACTIVITY_LIMIT);
    assert_eq!(feed[0].kind, ActivityKind::Deleted);
    assert_eq!(feed[0].item_name, "Item 2");
    assert_eq!(feed[1].kind, ActivityKind::Completed);
    assert_eq!(feed[1].user, User::Valeria);
    assert_eq!(feed[1].at_ms, 450);
    assert!(feed.windows(2).all(|pair| pair[0].at_ms >= pair[1].at_ms));
    assert!(feed.iter().all(|event| event.item_name != "Sin fecha"));
    assert!(feed.iter().all(|event| event.item_name != "Sillas"));

    assert_eq!(
        feed[0].describe(900 + 5 * 60 * 1000),
        "Valeria eliminó Item 2 · hace 5 min."
    );
    assert_eq!(activity_feed(&items, 2).len(), 2);
}

#[test]
fn share_text_groups_pending_units_by_category() {
    let text = share_text(&sample_items());
    let expected = "🛒 Lista de Compras Pendiente:\n\n\
        **Living (2):**\n\
        - Sofá (1)\n\
        - alfombra (1)\n\n\
        **Cocina (1):**\n\
        - Cafetera (1)\n\n\
        **Comedor (2):**\n\
        - Sillas (2)";
    assert_eq!(text, expected);
}

#[test]
fn share_text_reports_all_done() {
    let items = vec![
        completed(
            item("Sofá", Category::Living, Relevance::High, 1, 1),
            User::Felipe,
            1,
        ),
        deleted(
            item("Lámpara", Category::Living, Relevance::Low, 1, 1),
            User::Felipe,
            2,
        ),
    ];
    assert_eq!(share_text(&items), ALL_DONE_MESSAGE);
    assert_eq!(share_text(&[]), ALL_DONE_MESSAGE);
}

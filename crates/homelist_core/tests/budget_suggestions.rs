use homelist_core::db::open_db_in_memory;
use homelist_core::seed::initial_catalog;
use homelist_core::{
    accept_suggestion, accept_suggestions, fixed_clock, parse_suggestions, BudgetService,
    CatalogSuggestionProvider, Category, DisabledSuggestionProvider, ItemService, Relevance,
    SqliteItemRepository, SqliteMetadataRepository, SuggestedItem, SuggestionError,
    SuggestionProvider, SuggestionService, User, DEFAULT_BUDGET,
};

struct CannedProvider(&'static str);

impl SuggestionProvider for CannedProvider {
    fn suggest(&self, _category: Category) -> Result<Vec<SuggestedItem>, SuggestionError> {
        // Deliberately tagged with the wrong category.
        parse_suggestions(self.0, Category::Other)
    }
}

struct FailingProvider;

impl SuggestionProvider for FailingProvider {
    fn suggest(&self, _category: Category) -> Result<Vec<SuggestedItem>, SuggestionError> {
        Err(SuggestionError::Provider("quota exceeded".to_string()))
    }
}

#[test]
fn budget_defaults_until_set() {
    let conn = open_db_in_memory().unwrap();
    let budget = BudgetService::new(SqliteMetadataRepository::try_new(&conn).unwrap());

    assert_eq!(budget.budget().unwrap(), DEFAULT_BUDGET);
    budget.set_budget(3_500_000).unwrap();

    let reopened = BudgetService::new(SqliteMetadataRepository::try_new(&conn).unwrap());
    assert_eq!(reopened.budget().unwrap(), 3_500_000);
}

#[test]
fn disabled_provider_returns_nothing() {
    let service = SuggestionService::new(DisabledSuggestionProvider);
    assert!(service.suggest(Category::Kitchen).unwrap().is_empty());
}

#[test]
fn service_stamps_requested_category() {
    let service = SuggestionService::new(CannedProvider(
        r#"[{"name": "Macetero", "relevance": "Baja", "price": 12000}]"#,
    ));

    let suggestions = service.suggest(Category::Terrace1).unwrap();
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].category, Category::Terrace1);
    assert_eq!(suggestions[0].relevance, Relevance::Low);
}

#[test]
fn provider_errors_propagate() {
    let service = SuggestionService::new(FailingProvider);
    match service.suggest(Category::Living) {
        Err(SuggestionError::Provider(message)) => assert_eq!(message, "quota exceeded"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn catalog_provider_skips_existing_names() {
    let kitchen = initial_catalog()
        .into_iter()
        .filter(|entry| entry.category == Category::Kitchen)
        .collect::<Vec<_>>();
    let first_name = kitchen[0].name.to_uppercase();

    let provider = CatalogSuggestionProvider::new([first_name]);
    let suggestions = provider.suggest(Category::Kitchen).unwrap();

    assert_eq!(suggestions.len(), 3);
    assert!(suggestions.iter().all(|s| s.name != kitchen[0].name));
    assert_eq!(suggestions[0].name, kitchen[1].name);
}

#[test]
fn accepted_suggestions_become_pending_items() {
    let conn = open_db_in_memory().unwrap();
    let items = ItemService::with_clock(
        SqliteItemRepository::try_new(&conn).unwrap(),
        fixed_clock(42),
    );

    let suggestion = SuggestedItem {
        name: "Parrilla".to_string(),
        relevance: Relevance::Medium,
        price: 150_000,
        category: Category::Terrace2,
    };
    let item = accept_suggestion(&items, &suggestion, User::Valeria).unwrap();
    assert_eq!(item.name, "Parrilla");
    assert_eq!(item.category, Category::Terrace2);
    assert_eq!(item.quantity, 1);
    assert_eq!(item.completed_quantity, 0);
    assert_eq!(item.added_by, Some(User::Valeria));
    assert_eq!(item.created_at, Some(42));

    let provider = CatalogSuggestionProvider::excluding_items(&items.list_visible().unwrap());
    let batch = SuggestionService::new(provider)
        .suggest(Category::Terrace2)
        .unwrap();
    let added = accept_suggestions(&items, &batch, User::Felipe).unwrap();
    assert_eq!(added, batch.len());
    assert_eq!(items.list_visible().unwrap().len(), 1 + batch.len());
}

//! End-to-end tests for the recipe session over a real storage medium.
//!
//! These drive `RecipeSession` with a `FakeAiClient`, so no network access is
//! needed.

use std::sync::Arc;
use std::time::Duration;

use jhatpat_core::ai::{FakeAiClient, FAKE_IMAGE_DATA_URI};
use jhatpat_core::storage::ContextId;
use jhatpat_core::{
    ActionError, FileMedium, MemoryMedium, PersistentStore, Recipe, RecipeHistory, RecipeSession,
    StorageMedium, HISTORY_KEY,
};
use tempfile::TempDir;

const GINGER_RESPONSE: &str = r#"{"recipes": [{"recipeName": "Ginger Chicken Rice", "ingredients": ["chicken", "rice", "ginger", "salt"], "instructions": "Wash the rice.\nCook the chicken with ginger."}]}"#;

fn memory_session(client: FakeAiClient, limit: Option<usize>) -> (Arc<FakeAiClient>, RecipeSession) {
    let client = Arc::new(client);
    let history = RecipeHistory::on_medium(Arc::new(MemoryMedium::new()), limit);
    history.load();
    let session = RecipeSession::new(client.clone(), history, "Hindi");
    (client, session)
}

fn names(recipes: &[Recipe]) -> Vec<&str> {
    recipes.iter().map(|r| r.name.as_str()).collect()
}

#[tokio::test]
async fn test_submit_puts_new_recipe_first() {
    let (_, session) = memory_session(
        FakeAiClient::with_response("creative recipe generator", GINGER_RESPONSE),
        None,
    );
    session
        .history()
        .add_or_promote(Recipe::new("Aloo Gobi", vec!["potato".into()], "Chop everything."));

    let submission = session.submit("chicken, rice, ginger").await.unwrap();

    assert_eq!(submission.recipes.len(), 1);
    assert_eq!(submission.recipes[0].ingredients, vec!["chicken", "rice", "ginger"]);
    assert_eq!(
        names(&session.history().recipes()),
        vec!["Ginger Chicken Rice", "Aloo Gobi"]
    );
}

#[tokio::test]
async fn test_submitting_twice_keeps_one_entry() {
    let (_, session) = memory_session(
        FakeAiClient::with_response("creative recipe generator", GINGER_RESPONSE),
        None,
    );

    session.submit("chicken, rice, ginger").await.unwrap();
    session.submit("chicken, rice, ginger").await.unwrap();

    assert_eq!(session.history().len(), 1);
}

#[tokio::test]
async fn test_short_input_is_rejected_without_model_call() {
    let (client, session) = memory_session(FakeAiClient::default(), None);

    let err = session.submit("ab").await.unwrap_err();

    assert!(matches!(err, ActionError::InvalidInput(_)));
    assert_eq!(
        err.to_string(),
        "Please enter at least 3 characters for ingredients."
    );
    assert_eq!(client.chat_calls(), 0);
    assert!(session.history().is_empty());
}

#[tokio::test]
async fn test_failed_generation_leaves_history_unchanged() {
    let (_, session) = memory_session(
        FakeAiClient::with_response("creative recipe generator", r#"{"recipes": [{"ingredients": []}]}"#),
        None,
    );

    let err = session.submit("chicken, rice").await.unwrap_err();

    assert!(matches!(err, ActionError::GenerationFailed(_)));
    assert!(session.history().is_empty());
}

#[tokio::test]
async fn test_image_failure_still_returns_recipe() {
    let (client, session) = memory_session(FakeAiClient::default().without_image(), None);
    let recipe = session.submit("chicken, rice, ginger").await.unwrap().recipes[0].clone();

    let selection = session.select(recipe.clone()).await;

    assert!(selection.recipe.image_uri.is_none());
    assert_eq!(selection.recipe.name, recipe.name);
    assert!(selection
        .notices
        .iter()
        .any(|n| n.is_error() && n.title == "Image Generation Failed"));
    // Translation still runs after the image fails.
    assert!(selection.recipe.translation.is_some());
    assert_eq!(client.image_calls(), 1);

    let stored = session.history().get(0).unwrap();
    assert!(stored.image_uri.is_none());
    assert!(stored.translation.is_some());
}

#[tokio::test]
async fn test_enrichment_keeps_history_order() {
    let (_, session) = memory_session(FakeAiClient::default(), None);
    let older = Recipe::new("Aloo Gobi", vec![], "Chop everything.");
    session.history().add_or_promote(older.clone());
    session.submit("chicken, rice, ginger").await.unwrap();

    let selection = session.select(older).await;

    assert!(!selection.has_errors());
    let recipes = session.history().recipes();
    assert_eq!(names(&recipes), vec!["Ginger Chicken Rice", "Aloo Gobi"]);
    assert_eq!(recipes[1].image_uri.as_deref(), Some(FAKE_IMAGE_DATA_URI));
}

#[tokio::test]
async fn test_updates_before_load_are_replayed() {
    let medium: Arc<dyn StorageMedium> = Arc::new(MemoryMedium::new());
    let seeded = vec![Recipe::new("Aloo Gobi", vec![], "Chop everything.")];
    medium
        .set_item(
            HISTORY_KEY,
            &serde_json::to_string(&seeded).unwrap(),
            ContextId::External,
        )
        .unwrap();

    let history = RecipeHistory::on_medium(medium.clone(), None);
    history.add_or_promote(Recipe::new("Dal", vec![], "Boil the lentils."));
    assert!(history.is_empty());

    history.load();

    assert_eq!(names(&history.recipes()), vec!["Dal", "Aloo Gobi"]);
    let persisted: Vec<Recipe> =
        serde_json::from_str(&medium.get_item(HISTORY_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(persisted.len(), 2);
}

#[tokio::test]
async fn test_second_context_mirrors_writes_and_removals() {
    let medium: Arc<dyn StorageMedium> = Arc::new(MemoryMedium::new());
    let writer = RecipeHistory::on_medium(medium.clone(), None);
    writer.load();
    let reader: PersistentStore<Vec<Recipe>> =
        PersistentStore::open(medium.clone(), HISTORY_KEY, Vec::new());
    let mut changes = reader.subscribe();
    let watcher = reader.watch_external_changes();

    writer.add_or_promote(Recipe::new("Dal", vec![], "Boil the lentils."));
    tokio::time::timeout(Duration::from_secs(1), changes.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(names(&reader.get()), vec!["Dal"]);

    medium.remove_item(HISTORY_KEY, ContextId::External).unwrap();
    tokio::time::timeout(Duration::from_secs(1), changes.changed())
        .await
        .unwrap()
        .unwrap();
    assert!(reader.get().is_empty());

    watcher.abort();
}

#[tokio::test]
async fn test_quota_failure_keeps_memory_value() {
    let medium: Arc<dyn StorageMedium> = Arc::new(MemoryMedium::new().with_quota(16));
    let history = RecipeHistory::on_medium(medium.clone(), None);
    history.load();

    history.add_or_promote(Recipe::new("Dal", vec![], "Boil the lentils."));

    assert_eq!(history.len(), 1);
    assert!(medium.get_item(HISTORY_KEY).unwrap().is_none());
}

#[tokio::test]
async fn test_history_limit_evicts_oldest() {
    let history = RecipeHistory::on_medium(Arc::new(MemoryMedium::new()), Some(2));
    history.load();

    for name in ["Dal", "Poha", "Upma"] {
        history.add_or_promote(Recipe::new(name, vec![], "Cook it."));
    }

    assert_eq!(names(&history.recipes()), vec!["Upma", "Poha"]);
}

#[tokio::test]
async fn test_history_survives_restart_on_disk() {
    let temp_dir = TempDir::new().unwrap();

    {
        let history = RecipeHistory::on_medium(Arc::new(FileMedium::new(temp_dir.path())), None);
        history.load();
        let session = RecipeSession::new(Arc::new(FakeAiClient::default()), history, "Hindi");
        let recipe = session.submit("chicken, rice, ginger").await.unwrap().recipes[0].clone();
        session.select(recipe).await;
    }

    let history = RecipeHistory::on_medium(Arc::new(FileMedium::new(temp_dir.path())), None);
    history.load();
    let recipes = history.recipes();
    assert_eq!(names(&recipes), vec!["Ginger Chicken Rice"]);
    assert_eq!(recipes[0].image_uri.as_deref(), Some(FAKE_IMAGE_DATA_URI));
    assert_eq!(recipes[0].translation.as_ref().unwrap().language, "Hindi");
}

#[tokio::test]
async fn test_legacy_field_names_load() {
    let medium: Arc<dyn StorageMedium> = Arc::new(MemoryMedium::new());
    medium
        .set_item(
            HISTORY_KEY,
            r#"[{"recipeName": "Aloo Gobi", "ingredients": ["potato"], "instructions": "Chop.", "imageDataUri": "data:image/png;base64,AAAA"}]"#,
            ContextId::External,
        )
        .unwrap();

    let history = RecipeHistory::on_medium(medium, None);
    history.load();

    let recipe = history.get(0).unwrap();
    assert_eq!(recipe.name, "Aloo Gobi");
    assert_eq!(recipe.image_uri.as_deref(), Some("data:image/png;base64,AAAA"));
}

#[tokio::test]
async fn test_corrupt_history_falls_back_to_empty() {
    let medium: Arc<dyn StorageMedium> = Arc::new(MemoryMedium::new());
    medium
        .set_item(HISTORY_KEY, "not json", ContextId::External)
        .unwrap();

    let history = RecipeHistory::on_medium(medium, None);
    history.load();

    assert!(history.is_empty());
}

//! Store behavior against a mock HTTP server: cache reconciliation, the
//! partial-failure contract of `fetch_all`, and search with its local
//! fallback.

use larder_api::types::{IngredientPatch, RecipeDraft, TagDraft};
use larder_client::api_client::{NoopUnauthorized, RestClient};
use larder_client::config::ClientConfig;
use larder_client::session::Session;
use larder_client::state::{AuthStore, CatalogStore};
use larder_core::{Ingredient, Recipe, Tag, TagBrief};
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn build_store(server: &MockServer, dir: &tempfile::TempDir) -> CatalogStore {
    let config = ClientConfig {
        api_base_url: server.uri(),
        request_timeout_ms: 5_000,
        token_path: dir.path().join("token"),
    };
    let session = Session::new(config.token_path.clone());
    let api = RestClient::new(&config, session, Arc::new(NoopUnauthorized)).expect("build client");
    CatalogStore::new(api)
}

fn recipe(id: i64, name: &str, tag_names: &[&str]) -> Recipe {
    Recipe {
        id,
        name: name.to_string(),
        description: String::new(),
        steps: String::new(),
        tips: String::new(),
        calories: 0,
        created_at: None,
        updated_at: None,
        images: Vec::new(),
        tags: tag_names
            .iter()
            .enumerate()
            .map(|(i, name)| TagBrief {
                id: i as i64,
                name: name.to_string(),
                category: String::new(),
                color: None,
            })
            .collect(),
        ingredients: Vec::new(),
    }
}

fn tag(id: i64, name: &str) -> Tag {
    Tag {
        id,
        name: name.to_string(),
        category_id: None,
        category: String::new(),
    }
}

#[tokio::test]
async fn fetch_all_keeps_failed_collections_and_updates_the_rest() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().expect("temp dir");
    let mut store = build_store(&server, &dir);
    store.recipes = vec![recipe(1, "stale but kept", &[])];

    Mock::given(method("GET"))
        .and(path("/recipes"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 1, "name": "dessert"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ingredients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 2, "name": "tomato", "unit": "g"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tags/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ingredients/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    store.fetch_all().await;

    assert_eq!(store.recipes.len(), 1, "failed fetch keeps the old cache");
    assert_eq!(store.recipes[0].name, "stale but kept");
    assert_eq!(store.tags.len(), 1);
    assert_eq!(store.ingredients.len(), 1);
    assert!(!store.loading);
}

#[tokio::test]
async fn failed_add_tag_leaves_the_cache_untouched() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().expect("temp dir");
    let mut store = build_store(&server, &dir);
    store.tags = vec![tag(1, "existing")];

    Mock::given(method("POST"))
        .and(path("/tags"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "detail": "Tag already exists"
        })))
        .mount(&server)
        .await;

    let draft = TagDraft { name: "existing".to_string(), category_id: None };
    let before = store.tags.clone();
    let err = store.add_tag(&draft).await.expect_err("create must fail");
    assert_eq!(err.status(), Some(400));
    assert_eq!(store.tags, before, "no partial insert on failure");
}

#[tokio::test]
async fn add_tag_appends_the_created_entity() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().expect("temp dir");
    let mut store = build_store(&server, &dir);

    Mock::given(method("POST"))
        .and(path("/tags"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": 5, "name": "spicy", "category_id": null, "category": ""
        })))
        .mount(&server)
        .await;

    let draft = TagDraft { name: "spicy".to_string(), category_id: None };
    let created = store.add_tag(&draft).await.expect("create tag");
    assert_eq!(created.id, 5);
    assert_eq!(store.tags.len(), 1);
    assert_eq!(store.tags[0].name, "spicy");
}

#[tokio::test]
async fn add_recipe_refetches_the_collection() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().expect("temp dir");
    let mut store = build_store(&server, &dir);

    Mock::given(method("POST"))
        .and(path("/recipes"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": 9, "name": "Tomato Soup"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/recipes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 9, "name": "Tomato Soup", "calories": 120}
        ])))
        .mount(&server)
        .await;

    let draft = RecipeDraft {
        name: "Tomato Soup".to_string(),
        description: String::new(),
        steps: String::new(),
        tips: String::new(),
        tag_ids: Vec::new(),
        ingredients: Vec::new(),
    };
    let id = store.add_recipe(&draft).await.expect("create recipe");
    assert_eq!(id, 9);
    // The cache holds the refetched entry with server-computed fields.
    assert_eq!(store.recipes.len(), 1);
    assert_eq!(store.recipes[0].calories, 120);
}

#[tokio::test]
async fn delete_recipe_removes_the_cache_entry() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().expect("temp dir");
    let mut store = build_store(&server, &dir);
    store.recipes = vec![recipe(1, "keep", &[]), recipe(2, "drop", &[])];

    Mock::given(method("DELETE"))
        .and(path("/recipes/2"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    store.delete_recipe(2).await.expect("delete recipe");
    assert_eq!(store.recipes.len(), 1);
    assert_eq!(store.recipes[0].id, 1);
}

#[tokio::test]
async fn update_ingredient_replaces_the_cache_entry() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().expect("temp dir");
    let mut store = build_store(&server, &dir);
    store.ingredients = vec![Ingredient {
        id: 3,
        name: "tomato".to_string(),
        unit: "g".to_string(),
        calorie: None,
        category_id: None,
        category: String::new(),
    }];

    Mock::given(method("PUT"))
        .and(path("/ingredients/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 3, "name": "tomato", "unit": "g", "calorie": 0.18
        })))
        .mount(&server)
        .await;

    let patch = IngredientPatch { calorie: Some(0.18), ..Default::default() };
    store.update_ingredient(3, &patch).await.expect("update ingredient");
    assert_eq!(store.ingredients.len(), 1);
    assert_eq!(store.ingredients[0].calorie, Some(0.18));
}

#[tokio::test]
async fn remote_search_hits_intersect_the_cache() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().expect("temp dir");
    let mut store = build_store(&server, &dir);
    store.recipes = vec![
        recipe(1, "Tomato Soup", &["soup"]),
        recipe(2, "Beef Stew", &["stew"]),
    ];

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "beef"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "hits": [{"id": 2, "name": "Beef Stew"}],
            "total": 1
        })))
        .mount(&server)
        .await;

    let result = store.search_recipes("beef", &[]).await;
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].id, 2);
    // The cache entry, not the search-hit shape, is returned.
    assert_eq!(result[0].tags[0].name, "stew");
}

#[tokio::test]
async fn remote_search_failure_falls_back_to_subsequence_match() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().expect("temp dir");
    let mut store = build_store(&server, &dir);
    store.recipes = vec![
        recipe(1, "Tomato Soup", &[]),
        recipe(2, "Beef Stew", &[]),
    ];

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = store.search_recipes("tms", &[]).await;
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].id, 1);

    let none = store.search_recipes("mts", &[]).await;
    assert!(none.is_empty());
}

#[tokio::test]
async fn tag_filter_applies_after_keyword_filtering() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().expect("temp dir");
    let mut store = build_store(&server, &dir);
    store.recipes = vec![
        recipe(1, "Ice Cream", &["dessert", "cold"]),
        recipe(2, "Cake", &["dessert"]),
        recipe(3, "Iced Coffee", &["dessert", "cold"]),
    ];

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "hits": [{"id": 1}, {"id": 2}],
            "total": 2
        })))
        .mount(&server)
        .await;

    let filter = vec!["dessert".to_string(), "cold".to_string()];
    let result = store.search_recipes("dessert", &filter).await;
    // Recipe 3 matches the tags but was not a search hit; recipe 2 was a
    // hit but lacks "cold".
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].id, 1);
}

#[tokio::test]
async fn login_transitions_and_persists_then_logout_clears() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().expect("temp dir");
    let config = ClientConfig {
        api_base_url: server.uri(),
        request_timeout_ms: 5_000,
        token_path: dir.path().join("token"),
    };
    let session = Session::new(config.token_path.clone());
    let api = RestClient::new(&config, session.clone(), Arc::new(NoopUnauthorized))
        .expect("build client");
    let mut auth = AuthStore::new(api, session.clone());
    assert!(!auth.is_logged_in());

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "tok-7"
        })))
        .mount(&server)
        .await;

    assert!(auth.login("admin", "pw").await);
    assert!(auth.is_logged_in());
    assert_eq!(session.token().as_deref(), Some("tok-7"));

    auth.logout();
    assert!(!auth.is_logged_in());
    assert_eq!(session.token(), None);
}

#[tokio::test]
async fn login_that_cannot_persist_the_token_stays_logged_out() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().expect("temp dir");
    let config = ClientConfig {
        api_base_url: server.uri(),
        request_timeout_ms: 5_000,
        // A directory cannot hold the token file, so persisting must fail.
        token_path: dir.path().to_path_buf(),
    };
    let session = Session::new(config.token_path.clone());
    let api = RestClient::new(&config, session.clone(), Arc::new(NoopUnauthorized))
        .expect("build client");
    let mut auth = AuthStore::new(api, session.clone());

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "tok-9"
        })))
        .mount(&server)
        .await;

    // Memory and the persisted session stay in step: neither reports a login.
    assert!(!auth.login("admin", "pw").await);
    assert!(!auth.is_logged_in());
    assert_eq!(session.token(), None);
}

#[tokio::test]
async fn rejected_login_leaves_state_unchanged() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().expect("temp dir");
    let config = ClientConfig {
        api_base_url: server.uri(),
        request_timeout_ms: 5_000,
        token_path: dir.path().join("token"),
    };
    let session = Session::new(config.token_path.clone());
    let api = RestClient::new(&config, session.clone(), Arc::new(NoopUnauthorized))
        .expect("build client");
    let mut auth = AuthStore::new(api, session.clone());

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "detail": "Invalid credentials"
        })))
        .mount(&server)
        .await;

    assert!(!auth.login("admin", "wrong").await);
    assert!(!auth.is_logged_in());
    assert_eq!(session.token(), None);
}

//! Client state stores.
//!
//! Two independent containers mirror the backend for the current page
//! session: [`AuthStore`] (the session token) and [`CatalogStore`] (one
//! cache per collection plus the derived views over them). Stores call the
//! facade and reconcile their caches after each successful mutation; a
//! failed facade call propagates to the caller and leaves the cache in its
//! prior state.

use crate::api_client::{ApiClientError, RestClient, DEFAULT_SEARCH_LIMIT};
use crate::session::Session;
use larder_api::types::{
    CategoryDraft, IngredientDraft, IngredientPatch, RecipeDraft, RecipePatch, TagDraft, TagPatch,
};
use larder_core::{
    CategoryId, Ingredient, IngredientCategory, IngredientId, Recipe, RecipeId, Tag, TagCategory,
    TagId,
};
use std::collections::{BTreeMap, HashSet};

/// Bucket label for tags whose category is empty.
pub const UNCATEGORIZED: &str = "未分类";

// ============================================================================
// PURE HELPERS
// ============================================================================

/// Leading-numeric parse of a free-form amount string: `"2.5"` -> 2.5,
/// `"100g"` -> 100, `"适量"` -> `None`. No exponent forms; amounts never
/// use them.
pub fn parse_leading_f64(value: &str) -> Option<f64> {
    let s = value.trim_start();
    let bytes = s.as_bytes();
    let mut i = 0;
    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }
    let mut seen_digit = false;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
        seen_digit = true;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
            seen_digit = true;
        }
    }
    if !seen_digit {
        return None;
    }
    s[..i].parse().ok()
}

/// Case-insensitive subsequence match: every character of `keyword` must
/// appear in `name` in order, not necessarily contiguously. Deliberately
/// loose; this is the degraded-search fallback, not a ranked search.
pub fn subsequence_match(keyword: &str, name: &str) -> bool {
    let keyword = keyword.to_lowercase();
    let name = name.to_lowercase();
    let mut name_chars = name.chars();
    'keyword: for k in keyword.chars() {
        for c in name_chars.by_ref() {
            if c == k {
                continue 'keyword;
            }
        }
        return false;
    }
    true
}

/// Total calories of a recipe: per line, the parsed amount times the line's
/// calorie override (falling back to the referenced ingredient's value),
/// summed and rounded. Non-numeric amounts and missing calorie values
/// contribute zero; a recipe without ingredients yields zero.
pub fn calc_calories(recipe: &Recipe) -> i64 {
    let mut total = 0.0;
    for line in &recipe.ingredients {
        let amount = match parse_leading_f64(&line.amount) {
            Some(amount) => amount,
            None => continue,
        };
        let calorie = line.calorie.or(line.ingredient_calorie).unwrap_or(0.0);
        total += amount * calorie;
    }
    total.round() as i64
}

// ============================================================================
// AUTH STORE
// ============================================================================

/// Session state: logged out (empty token) or logged in (non-empty token).
/// The in-memory token and the persisted session are updated together on
/// every transition.
pub struct AuthStore {
    api: RestClient,
    session: Session,
    token: String,
}

impl AuthStore {
    pub fn new(api: RestClient, session: Session) -> Self {
        let token = session.token().unwrap_or_default();
        Self { api, session, token }
    }

    pub fn is_logged_in(&self) -> bool {
        !self.token.is_empty()
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Attempt a login. On success the token is stored in memory and in the
    /// persisted session and `true` is returned. On any failure (transport,
    /// rejected credentials, or an unpersistable token) state is unchanged
    /// and `false` is returned; surfacing the failure is the caller's job.
    ///
    /// A token that cannot be persisted counts as a failed login: the
    /// facade and the navigation guard read the persisted session, so a
    /// memory-only token would claim a login the rest of the client cannot
    /// see.
    pub async fn login(&mut self, username: &str, password: &str) -> bool {
        match self.api.login(username, password).await {
            Ok(response) => {
                if let Err(err) = self.session.store(&response.access_token) {
                    tracing::warn!(error = %err, "failed to persist session token");
                    return false;
                }
                self.token = response.access_token;
                true
            }
            Err(err) => {
                tracing::debug!(error = %err, "login failed");
                false
            }
        }
    }

    /// Purely local logout: clears the in-memory token and the persisted
    /// session. No backend call is made.
    pub fn logout(&mut self) {
        self.token.clear();
        if let Err(err) = self.session.clear() {
            tracing::warn!(error = %err, "failed to clear persisted session");
        }
    }
}

// ============================================================================
// CATALOG STORE
// ============================================================================

/// One in-memory cache per collection, valid for the current page session.
pub struct CatalogStore {
    api: RestClient,
    pub recipes: Vec<Recipe>,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<Ingredient>,
    pub tag_categories: Vec<TagCategory>,
    pub ingredient_categories: Vec<IngredientCategory>,
    pub loading: bool,
}

impl CatalogStore {
    pub fn new(api: RestClient) -> Self {
        Self {
            api,
            recipes: Vec::new(),
            tags: Vec::new(),
            ingredients: Vec::new(),
            tag_categories: Vec::new(),
            ingredient_categories: Vec::new(),
            loading: false,
        }
    }

    // --- Fetching ---------------------------------------------------------

    /// Refresh all five collections concurrently. Each fetch fails
    /// independently: a failed collection is logged and keeps its previous
    /// cache value while the others still update.
    pub async fn fetch_all(&mut self) {
        self.loading = true;
        let (recipes, tags, ingredients, tag_categories, ingredient_categories) = tokio::join!(
            self.api.list_recipes(),
            self.api.list_tags(),
            self.api.list_ingredients(None),
            self.api.list_tag_categories(),
            self.api.list_ingredient_categories(),
        );
        self.loading = false;

        match recipes {
            Ok(recipes) => self.recipes = recipes,
            Err(err) => tracing::warn!(error = %err, "failed to fetch recipes"),
        }
        match tags {
            Ok(tags) => self.tags = tags,
            Err(err) => tracing::warn!(error = %err, "failed to fetch tags"),
        }
        match ingredients {
            Ok(ingredients) => self.ingredients = ingredients,
            Err(err) => tracing::warn!(error = %err, "failed to fetch ingredients"),
        }
        match tag_categories {
            Ok(categories) => self.tag_categories = categories,
            Err(err) => tracing::warn!(error = %err, "failed to fetch tag categories"),
        }
        match ingredient_categories {
            Ok(categories) => self.ingredient_categories = categories,
            Err(err) => tracing::warn!(error = %err, "failed to fetch ingredient categories"),
        }
    }

    pub async fn fetch_recipes(&mut self) {
        self.loading = true;
        let result = self.api.list_recipes().await;
        self.loading = false;
        match result {
            Ok(recipes) => self.recipes = recipes,
            Err(err) => tracing::warn!(error = %err, "failed to fetch recipes"),
        }
    }

    pub async fn fetch_tags(&mut self) {
        match self.api.list_tags().await {
            Ok(tags) => self.tags = tags,
            Err(err) => tracing::warn!(error = %err, "failed to fetch tags"),
        }
    }

    pub async fn fetch_ingredients(&mut self) {
        match self.api.list_ingredients(None).await {
            Ok(ingredients) => self.ingredients = ingredients,
            Err(err) => tracing::warn!(error = %err, "failed to fetch ingredients"),
        }
    }

    pub async fn fetch_tag_categories(&mut self) {
        match self.api.list_tag_categories().await {
            Ok(categories) => self.tag_categories = categories,
            Err(err) => tracing::warn!(error = %err, "failed to fetch tag categories"),
        }
    }

    pub async fn fetch_ingredient_categories(&mut self) {
        match self.api.list_ingredient_categories().await {
            Ok(categories) => self.ingredient_categories = categories,
            Err(err) => tracing::warn!(error = %err, "failed to fetch ingredient categories"),
        }
    }

    /// Fetch one recipe without touching the cache. Detail pages want the
    /// freshest copy; a failure is logged and surfaces as `None`.
    pub async fn fetch_recipe_by_id(&self, id: RecipeId) -> Option<Recipe> {
        match self.api.get_recipe(id).await {
            Ok(recipe) => Some(recipe),
            Err(err) => {
                tracing::warn!(error = %err, recipe_id = id, "failed to fetch recipe");
                None
            }
        }
    }

    // --- Derived views ------------------------------------------------------

    pub fn recipe_by_id(&self, id: RecipeId) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    /// Tags grouped by category name; tags without a category land in the
    /// [`UNCATEGORIZED`] bucket.
    pub fn tags_by_category(&self) -> BTreeMap<String, Vec<Tag>> {
        let mut grouped: BTreeMap<String, Vec<Tag>> = BTreeMap::new();
        for tag in &self.tags {
            let category = if tag.category.is_empty() {
                UNCATEGORIZED.to_string()
            } else {
                tag.category.clone()
            };
            grouped.entry(category).or_default().push(tag.clone());
        }
        grouped
    }

    // --- Search -------------------------------------------------------------

    /// Search the recipe cache. An empty keyword with no tag filter returns
    /// the full cache. A keyword first goes to the remote search endpoint
    /// and the hit ids are intersected with the cache (keeping the cache's
    /// richer entries); if the remote call fails, a local subsequence match
    /// on recipe names takes over. Tag filters then restrict the result to
    /// recipes carrying every selected tag name.
    pub async fn search_recipes(&self, keyword: &str, selected_tags: &[String]) -> Vec<Recipe> {
        if keyword.is_empty() && selected_tags.is_empty() {
            return self.recipes.clone();
        }
        let mut result = self.recipes.clone();
        if !keyword.is_empty() {
            match self.api.search(keyword, "", DEFAULT_SEARCH_LIMIT).await {
                Ok(response) => {
                    let hit_ids: HashSet<RecipeId> =
                        response.hits.iter().map(|hit| hit.id).collect();
                    result.retain(|recipe| hit_ids.contains(&recipe.id));
                }
                Err(err) => {
                    tracing::warn!(error = %err, "remote search failed, using local fallback");
                    result.retain(|recipe| subsequence_match(keyword, &recipe.name));
                }
            }
        }
        if !selected_tags.is_empty() {
            result.retain(|recipe| {
                selected_tags
                    .iter()
                    .all(|name| recipe.tags.iter().any(|tag| tag.name == *name))
            });
        }
        result
    }

    // --- Recipe CRUD ----------------------------------------------------------

    /// Create a recipe, then refetch the collection: the backend computes
    /// fields (calories, joined ingredient data) the draft does not carry.
    pub async fn add_recipe(&mut self, draft: &RecipeDraft) -> Result<RecipeId, ApiClientError> {
        let created = self.api.create_recipe(draft).await?;
        self.fetch_recipes().await;
        Ok(created.id)
    }

    pub async fn update_recipe(
        &mut self,
        id: RecipeId,
        patch: &RecipePatch,
    ) -> Result<(), ApiClientError> {
        self.api.update_recipe(id, patch).await?;
        self.fetch_recipes().await;
        Ok(())
    }

    pub async fn delete_recipe(&mut self, id: RecipeId) -> Result<(), ApiClientError> {
        self.api.delete_recipe(id).await?;
        self.recipes.retain(|r| r.id != id);
        Ok(())
    }

    // --- Tag CRUD ----------------------------------------------------------

    pub async fn add_tag(&mut self, draft: &TagDraft) -> Result<Tag, ApiClientError> {
        let created = self.api.create_tag(draft).await?;
        self.tags.push(created.clone());
        Ok(created)
    }

    pub async fn update_tag(&mut self, id: TagId, patch: &TagPatch) -> Result<Tag, ApiClientError> {
        let updated = self.api.update_tag(id, patch).await?;
        if let Some(cached) = self.tags.iter_mut().find(|t| t.id == id) {
            *cached = updated.clone();
        }
        Ok(updated)
    }

    pub async fn delete_tag(&mut self, id: TagId) -> Result<(), ApiClientError> {
        self.api.delete_tag(id).await?;
        self.tags.retain(|t| t.id != id);
        Ok(())
    }

    pub async fn add_tag_category(&mut self, name: &str) -> Result<TagCategory, ApiClientError> {
        let draft = CategoryDraft { name: name.to_string() };
        let created = self.api.create_tag_category(&draft).await?;
        self.tag_categories.push(created.clone());
        Ok(created)
    }

    pub async fn delete_tag_category(&mut self, id: CategoryId) -> Result<(), ApiClientError> {
        self.api.delete_tag_category(id).await?;
        self.tag_categories.retain(|c| c.id != id);
        Ok(())
    }

    // --- Ingredient CRUD ----------------------------------------------------

    pub async fn add_ingredient(
        &mut self,
        draft: &IngredientDraft,
    ) -> Result<Ingredient, ApiClientError> {
        let created = self.api.create_ingredient(draft).await?;
        self.ingredients.push(created.clone());
        Ok(created)
    }

    pub async fn update_ingredient(
        &mut self,
        id: IngredientId,
        patch: &IngredientPatch,
    ) -> Result<Ingredient, ApiClientError> {
        let updated = self.api.update_ingredient(id, patch).await?;
        if let Some(cached) = self.ingredients.iter_mut().find(|i| i.id == id) {
            *cached = updated.clone();
        }
        Ok(updated)
    }

    pub async fn delete_ingredient(&mut self, id: IngredientId) -> Result<(), ApiClientError> {
        self.api.delete_ingredient(id).await?;
        self.ingredients.retain(|i| i.id != id);
        Ok(())
    }

    pub async fn add_ingredient_category(
        &mut self,
        name: &str,
    ) -> Result<IngredientCategory, ApiClientError> {
        let draft = CategoryDraft { name: name.to_string() };
        let created = self.api.create_ingredient_category(&draft).await?;
        self.ingredient_categories.push(created.clone());
        Ok(created)
    }

    pub async fn delete_ingredient_category(
        &mut self,
        id: CategoryId,
    ) -> Result<(), ApiClientError> {
        self.api.delete_ingredient_category(id).await?;
        self.ingredient_categories.retain(|c| c.id != id);
        Ok(())
    }
}

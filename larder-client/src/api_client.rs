//! REST facade for the recipe catalog backend.
//!
//! One method per backend capability. Every call reads the persisted
//! session token and attaches `Authorization: Bearer <token>` when one is
//! present; no client-side validation is performed. Exactly one network
//! attempt per call.
//!
//! A 401 response clears the persisted session and notifies the
//! [`UnauthorizedObserver`] supplied at construction; what (if anything)
//! happens to the current location is the observer's decision, which keeps
//! this layer free of navigation side effects.

use crate::config::ClientConfig;
use crate::session::Session;
use larder_api::types::{
    CategoryDraft, ChangePasswordRequest, DetailResponse, ExportBatchRequest, ImportReport,
    IngredientDraft, IngredientPatch, LoginRequest, OkResponse, RecipeDraft, RecipePatch,
    ReorderImagesRequest, SearchResponse, StatusResponse, SynonymMap, TagDraft, TagPatch,
    TokenResponse,
};
use larder_api::ErrorBody;
use larder_core::{
    CategoryId, ImageId, Ingredient, IngredientCategory, IngredientId, Recipe, RecipeId,
    RecipeImage, Tag, TagCategory, TagId,
};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;

/// Result cap sent to the search endpoint when callers do not care.
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;

/// Notified after a 401 response has cleared the persisted session.
pub trait UnauthorizedObserver: Send + Sync {
    fn unauthorized(&self);
}

/// Observer that ignores authorization failures. Useful for contexts that
/// have no location to redirect (scripts, tests).
pub struct NoopUnauthorized;

impl UnauthorizedObserver for NoopUnauthorized {
    fn unauthorized(&self) {}
}

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    /// Transport failure; the request never produced a response.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// Classified non-2xx response with the backend-supplied message.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl ApiClientError {
    /// HTTP status of a classified failure; `None` for transport errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
    session: Session,
    on_unauthorized: Arc<dyn UnauthorizedObserver>,
}

impl RestClient {
    pub fn new(
        config: &ClientConfig,
        session: Session,
        on_unauthorized: Arc<dyn UnauthorizedObserver>,
    ) -> Result<Self, ApiClientError> {
        let timeout = Duration::from_millis(config.request_timeout_ms);
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session,
            on_unauthorized,
        })
    }

    // ------------------------------------------------------------------------
    // Auth
    // ------------------------------------------------------------------------

    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<TokenResponse, ApiClientError> {
        let req = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.post_json("/auth/login", &req).await
    }

    pub async fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> Result<DetailResponse, ApiClientError> {
        let req = ChangePasswordRequest {
            old_password: old_password.to_string(),
            new_password: new_password.to_string(),
        };
        self.post_json("/auth/change-password", &req).await
    }

    // ------------------------------------------------------------------------
    // Recipes
    // ------------------------------------------------------------------------

    pub async fn list_recipes(&self) -> Result<Vec<Recipe>, ApiClientError> {
        self.get_json::<Vec<Recipe>, ()>("/recipes", None).await
    }

    pub async fn get_recipe(&self, id: RecipeId) -> Result<Recipe, ApiClientError> {
        let path = format!("/recipes/{}", id);
        self.get_json::<Recipe, ()>(&path, None).await
    }

    pub async fn create_recipe(&self, draft: &RecipeDraft) -> Result<Recipe, ApiClientError> {
        self.post_json("/recipes", draft).await
    }

    pub async fn update_recipe(
        &self,
        id: RecipeId,
        patch: &RecipePatch,
    ) -> Result<Recipe, ApiClientError> {
        let path = format!("/recipes/{}", id);
        self.put_json(&path, patch).await
    }

    pub async fn delete_recipe(&self, id: RecipeId) -> Result<(), ApiClientError> {
        let path = format!("/recipes/{}", id);
        self.delete(&path).await
    }

    // ------------------------------------------------------------------------
    // Tags
    // ------------------------------------------------------------------------

    pub async fn list_tags(&self) -> Result<Vec<Tag>, ApiClientError> {
        self.get_json::<Vec<Tag>, ()>("/tags", None).await
    }

    pub async fn create_tag(&self, draft: &TagDraft) -> Result<Tag, ApiClientError> {
        self.post_json("/tags", draft).await
    }

    pub async fn update_tag(&self, id: TagId, patch: &TagPatch) -> Result<Tag, ApiClientError> {
        let path = format!("/tags/{}", id);
        self.put_json(&path, patch).await
    }

    pub async fn delete_tag(&self, id: TagId) -> Result<(), ApiClientError> {
        let path = format!("/tags/{}", id);
        self.delete(&path).await
    }

    pub async fn list_tag_categories(&self) -> Result<Vec<TagCategory>, ApiClientError> {
        self.get_json::<Vec<TagCategory>, ()>("/tags/categories", None)
            .await
    }

    pub async fn create_tag_category(
        &self,
        draft: &CategoryDraft,
    ) -> Result<TagCategory, ApiClientError> {
        self.post_json("/tags/categories", draft).await
    }

    pub async fn delete_tag_category(&self, id: CategoryId) -> Result<(), ApiClientError> {
        let path = format!("/tags/categories/{}", id);
        self.delete(&path).await
    }

    // ------------------------------------------------------------------------
    // Ingredients
    // ------------------------------------------------------------------------

    pub async fn list_ingredients(
        &self,
        q: Option<&str>,
    ) -> Result<Vec<Ingredient>, ApiClientError> {
        let params = q
            .filter(|q| !q.is_empty())
            .map(|q| [("q", q.to_string())]);
        self.get_json("/ingredients", params.as_ref()).await
    }

    pub async fn create_ingredient(
        &self,
        draft: &IngredientDraft,
    ) -> Result<Ingredient, ApiClientError> {
        self.post_json("/ingredients", draft).await
    }

    pub async fn update_ingredient(
        &self,
        id: IngredientId,
        patch: &IngredientPatch,
    ) -> Result<Ingredient, ApiClientError> {
        let path = format!("/ingredients/{}", id);
        self.put_json(&path, patch).await
    }

    pub async fn delete_ingredient(&self, id: IngredientId) -> Result<(), ApiClientError> {
        let path = format!("/ingredients/{}", id);
        self.delete(&path).await
    }

    pub async fn list_ingredient_categories(
        &self,
    ) -> Result<Vec<IngredientCategory>, ApiClientError> {
        self.get_json::<Vec<IngredientCategory>, ()>("/ingredients/categories", None)
            .await
    }

    pub async fn create_ingredient_category(
        &self,
        draft: &CategoryDraft,
    ) -> Result<IngredientCategory, ApiClientError> {
        self.post_json("/ingredients/categories", draft).await
    }

    pub async fn delete_ingredient_category(&self, id: CategoryId) -> Result<(), ApiClientError> {
        let path = format!("/ingredients/categories/{}", id);
        self.delete(&path).await
    }

    // ------------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------------

    pub async fn search(
        &self,
        q: &str,
        tag: &str,
        limit: u32,
    ) -> Result<SearchResponse, ApiClientError> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if !q.is_empty() {
            params.push(("q", q.to_string()));
        }
        if !tag.is_empty() {
            params.push(("tag", tag.to_string()));
        }
        params.push(("limit", limit.to_string()));
        self.get_json("/search", Some(&params)).await
    }

    pub async fn setup_search_index(&self) -> Result<StatusResponse, ApiClientError> {
        self.post_json("/search/setup", &()).await
    }

    pub async fn get_synonyms(&self) -> Result<SynonymMap, ApiClientError> {
        self.get_json::<SynonymMap, ()>("/search/synonyms", None)
            .await
    }

    pub async fn set_synonyms(
        &self,
        synonyms: &SynonymMap,
    ) -> Result<StatusResponse, ApiClientError> {
        self.put_json("/search/synonyms", synonyms).await
    }

    // ------------------------------------------------------------------------
    // Images (multipart upload, reorder, delete)
    // ------------------------------------------------------------------------

    pub async fn upload_image(
        &self,
        recipe_id: RecipeId,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<RecipeImage, ApiClientError> {
        let url = format!("{}/recipes/{}/images", self.base_url, recipe_id);
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part("file", part);
        let response = self
            .client
            .post(url)
            .headers(self.auth_headers())
            .multipart(form)
            .send()
            .await?;
        let response = self.check(response).await?;
        Ok(response.json().await?)
    }

    pub async fn reorder_images(
        &self,
        recipe_id: RecipeId,
        image_ids: &[ImageId],
    ) -> Result<OkResponse, ApiClientError> {
        let path = format!("/recipes/{}/images/reorder", recipe_id);
        let req = ReorderImagesRequest {
            image_ids: image_ids.to_vec(),
        };
        self.put_json(&path, &req).await
    }

    pub async fn delete_image(&self, id: ImageId) -> Result<(), ApiClientError> {
        let path = format!("/images/{}", id);
        self.delete(&path).await
    }

    // ------------------------------------------------------------------------
    // Import / export (binary archives)
    // ------------------------------------------------------------------------

    pub async fn export_recipe(&self, id: RecipeId) -> Result<Vec<u8>, ApiClientError> {
        let url = format!("{}/recipes/{}/export", self.base_url, id);
        let response = self.client.get(url).headers(self.auth_headers()).send().await?;
        let response = self.check(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    pub async fn export_batch(&self, recipe_ids: &[RecipeId]) -> Result<Vec<u8>, ApiClientError> {
        let url = format!("{}/recipes/export-batch", self.base_url);
        let req = ExportBatchRequest {
            recipe_ids: recipe_ids.to_vec(),
        };
        let response = self
            .client
            .post(url)
            .headers(self.auth_headers())
            .json(&req)
            .send()
            .await?;
        let response = self.check(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    pub async fn import_recipes(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<ImportReport, ApiClientError> {
        let url = format!("{}/recipes/import", self.base_url);
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part("file", part);
        let response = self
            .client
            .post(url)
            .headers(self.auth_headers())
            .multipart(form)
            .send()
            .await?;
        let response = self.check(response).await?;
        Ok(response.json().await?)
    }

    // ------------------------------------------------------------------------
    // Plumbing
    // ------------------------------------------------------------------------

    /// Bearer header from the persisted session, read at call time. A token
    /// that cannot be encoded as a header value counts as absent.
    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(token) = self.session.token() {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                headers.insert(AUTHORIZATION, value);
            }
        }
        headers
    }

    async fn get_json<T, Q>(&self, path: &str, query: Option<&Q>) -> Result<T, ApiClientError>
    where
        T: serde::de::DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.get(url).headers(self.auth_headers());
        if let Some(query) = query {
            request = request.query(query);
        }
        let response = request.send().await?;
        let response = self.check(response).await?;
        Ok(response.json().await?)
    }

    async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, ApiClientError>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(url)
            .headers(self.auth_headers())
            .json(body)
            .send()
            .await?;
        let response = self.check(response).await?;
        Ok(response.json().await?)
    }

    async fn put_json<T, B>(&self, path: &str, body: &B) -> Result<T, ApiClientError>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .put(url)
            .headers(self.auth_headers())
            .json(body)
            .send()
            .await?;
        let response = self.check(response).await?;
        Ok(response.json().await?)
    }

    /// DELETE returning no content (the backend answers 204).
    async fn delete(&self, path: &str) -> Result<(), ApiClientError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .delete(url)
            .headers(self.auth_headers())
            .send()
            .await?;
        self.check(response).await?;
        Ok(())
    }

    /// Classify a non-2xx response. On 401 the persisted session is cleared
    /// and the observer notified before the error is returned.
    async fn check(
        &self,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ApiClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            if let Err(err) = self.session.clear() {
                tracing::warn!(error = %err, "failed to clear session after 401");
            }
            self.on_unauthorized.unauthorized();
        }
        let text = response.text().await?;
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.detail)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });
        Err(ApiClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

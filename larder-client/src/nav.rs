//! Route table and navigation guard.
//!
//! A static path-to-page table with a single `requires_auth` flag per route.
//! [`Navigator`] owns the current location, enforces the guard before each
//! navigation, and doubles as the facade's [`UnauthorizedObserver`]: when a
//! 401 arrives while the location is under `/admin`, it rewrites the
//! location to the login page with the original path as return target.

use crate::api_client::UnauthorizedObserver;
use crate::session::Session;
use larder_core::RecipeId;
use std::sync::Mutex;

/// Prefix under which every guarded page lives.
pub const ADMIN_PREFIX: &str = "/admin";

/// Login path carrying the originally intended location.
pub fn login_redirect(target: &str) -> String {
    format!("/login?redirect={}", urlencoding::encode(target))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    RecipeDetail(RecipeId),
    Login,
    AdminRecipeList,
    AdminRecipeNew,
    AdminRecipeEdit(RecipeId),
    AdminTags,
    AdminIngredients,
    AdminSettings,
}

impl Route {
    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::RecipeDetail(_) => "Recipe",
            Route::Login => "Login",
            Route::AdminRecipeList => "Recipes",
            Route::AdminRecipeNew => "New Recipe",
            Route::AdminRecipeEdit(_) => "Edit Recipe",
            Route::AdminTags => "Tags",
            Route::AdminIngredients => "Ingredients",
            Route::AdminSettings => "Settings",
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::RecipeDetail(id) => format!("/recipe/{}", id),
            Route::Login => "/login".to_string(),
            Route::AdminRecipeList => "/admin".to_string(),
            Route::AdminRecipeNew => "/admin/recipe/new".to_string(),
            Route::AdminRecipeEdit(id) => format!("/admin/recipe/{}/edit", id),
            Route::AdminTags => "/admin/tags".to_string(),
            Route::AdminIngredients => "/admin/ingredients".to_string(),
            Route::AdminSettings => "/admin/settings".to_string(),
        }
    }

    pub fn parse(path: &str) -> Option<Route> {
        match path {
            "/" => return Some(Route::Home),
            "/login" => return Some(Route::Login),
            "/admin" => return Some(Route::AdminRecipeList),
            "/admin/recipe/new" => return Some(Route::AdminRecipeNew),
            "/admin/tags" => return Some(Route::AdminTags),
            "/admin/ingredients" => return Some(Route::AdminIngredients),
            "/admin/settings" => return Some(Route::AdminSettings),
            _ => {}
        }
        if let Some(rest) = path.strip_prefix("/recipe/") {
            return rest.parse().ok().map(Route::RecipeDetail);
        }
        if let Some(rest) = path.strip_prefix("/admin/recipe/") {
            let id = rest.strip_suffix("/edit")?;
            return id.parse().ok().map(Route::AdminRecipeEdit);
        }
        None
    }

    /// Whether the route sits behind the auth guard. Exactly the
    /// `/admin`-prefixed pages.
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Route::AdminRecipeList
                | Route::AdminRecipeNew
                | Route::AdminRecipeEdit(_)
                | Route::AdminTags
                | Route::AdminIngredients
                | Route::AdminSettings
        )
    }
}

/// Outcome of a guarded navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavOutcome {
    /// The target route was entered.
    Entered(Route),
    /// The guard intercepted; the location is now the login page carrying
    /// the intended target.
    RedirectedToLogin { redirect: String },
}

/// Current location plus the auth guard.
///
/// The guard reads the persisted session directly (not any in-memory copy),
/// so a token cleared elsewhere takes effect on the next navigation.
pub struct Navigator {
    session: Session,
    current: Mutex<String>,
}

impl Navigator {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            current: Mutex::new(Route::Home.path()),
        }
    }

    pub fn current_path(&self) -> String {
        // A poisoned lock still holds a valid path; keep going with it.
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Replace the location without running the guard. Used for locations
    /// that are not routes of this app (e.g. externally driven paths).
    pub fn set_path(&self, path: impl Into<String>) {
        *self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = path.into();
    }

    /// Navigate to a route, enforcing the auth guard: a guarded route
    /// without a persisted token lands on `/login?redirect=<target>`.
    pub fn navigate(&self, route: Route) -> NavOutcome {
        if route.requires_auth() && self.session.token().is_none() {
            let target = route.path();
            let login = login_redirect(&target);
            self.set_path(login.clone());
            return NavOutcome::RedirectedToLogin { redirect: login };
        }
        self.set_path(route.path());
        NavOutcome::Entered(route)
    }
}

impl UnauthorizedObserver for Navigator {
    /// Logout-on-401: the session is already cleared by the facade; if the
    /// current location is an admin page, send it to login with a return
    /// target. Public pages stay where they are.
    fn unauthorized(&self) {
        let current = self.current_path();
        if current.starts_with(ADMIN_PREFIX) {
            self.set_path(login_redirect(&current));
        }
    }
}

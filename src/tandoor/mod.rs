pub mod types;

use crate::config::TandoorConfig;
use crate::error::{Result, TandoorError};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Number;
use tracing::debug;
pub use types::*;

/// Note attached to every meal plan entry created through this server.
pub const MEAL_PLAN_NOTE: &str = "Added via MCP";

#[derive(Debug, Serialize)]
struct RecipeQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    keywords: Option<i64>,
}

#[derive(Debug, Serialize)]
struct KeywordQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<&'a str>,
}

/// HTTP client for the Tandoor REST API, bound to one base URL and token.
///
/// Operations never fail: faults are returned as [`ApiResponse::Failure`].
#[derive(Clone, Debug)]
pub struct TandoorClient {
    http: Client,
    base_url: String,
}

impl TandoorClient {
    /// Build a client from configuration. Both the URL and the token are required.
    pub fn new(config: &TandoorConfig) -> Result<Self> {
        let base_url = config
            .api_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| TandoorError::config("TANDOOR_API_URL must be set"))?;
        let token = config
            .api_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| TandoorError::config("TANDOOR_API_TOKEN must be set"))?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| TandoorError::config("TANDOOR_API_TOKEN contains invalid characters"))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Send a request and turn non-2xx answers into [`TandoorError::Status`]
    async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TandoorError::Status { status, body });
        }
        Ok(response)
    }

    /// GET a paginated collection and return the first page of results
    async fn fetch_page<T, Q>(&self, path: &str, query: &Q) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.http.get(self.url(path)).query(query);
        let page: Page<T> = self.execute(request).await?.json().await?;
        Ok(page.results)
    }

    async fn post_shopping_list_entry(&self, body: &NewShoppingListEntry<'_>) -> Result<()> {
        let request = self.http.post(self.url("shopping-list-entry/")).json(body);
        let created = self.execute(request).await?.text().await?;
        debug!("Added shopping list item: {}", created);
        Ok(())
    }

    async fn post_meal_plan(&self, entry: &NewMealPlanEntry) -> Result<MealPlanEntry> {
        let request = self.http.post(self.url("meal-plan/")).json(entry);
        let meal_plan: MealPlanEntry = self.execute(request).await?.json().await?;
        debug!(
            "Added recipe {} to meal plan as entry {:?}",
            entry.recipe,
            meal_plan.id()
        );
        Ok(meal_plan)
    }

    /// List recipes, optionally filtered by name and keyword id
    pub async fn list_recipes(
        &self,
        name: Option<&str>,
        keyword_id: Option<i64>,
    ) -> ApiResponse<Vec<Recipe>> {
        let query = RecipeQuery {
            query: name,
            keywords: keyword_id,
        };
        debug!("Fetching recipes with params: {:?}", query);

        let result = self.fetch_page("recipe", &query).await;
        ApiResponse::from_result(result, "Failed to fetch recipes")
    }

    /// List keywords, optionally filtered by name
    pub async fn list_keywords(&self, name: Option<&str>) -> ApiResponse<Vec<Keyword>> {
        let query = KeywordQuery { query: name };
        debug!("Fetching keywords with params: {:?}", query);

        let result = self.fetch_page("keyword", &query).await;
        ApiResponse::from_result(result, "Failed to fetch keywords")
    }

    pub async fn add_shopping_list_item(
        &self,
        name: &str,
        quantity: Number,
    ) -> ApiResponse<ShoppingListItemAdded> {
        let body = NewShoppingListEntry {
            food: FoodRef { name },
            amount: quantity,
        };

        let result = self
            .post_shopping_list_entry(&body)
            .await
            .map(|()| ShoppingListItemAdded { success: true });
        ApiResponse::from_result(result, "Failed to add shopping list item")
    }

    /// Add a recipe to the meal plan. Tandoor also puts the recipe's
    /// ingredients on the shopping list.
    pub async fn add_recipe_to_meal_plan(
        &self,
        entry: &NewMealPlanEntry,
    ) -> ApiResponse<MealPlanAdded> {
        let result = self
            .post_meal_plan(entry)
            .await
            .map(|meal_plan| MealPlanAdded {
                success: true,
                meal_plan,
            });
        ApiResponse::from_result(result, "Failed to add recipe to meal plan")
    }

    pub async fn list_meal_types(&self) -> ApiResponse<Vec<MealType>> {
        debug!("Fetching meal types");

        let result = self.fetch_page("meal-type/", &[] as &[(&str, &str)]).await;
        ApiResponse::from_result(result, "Failed to fetch meal types")
    }
}

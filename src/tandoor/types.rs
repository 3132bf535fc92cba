//! Read-only projections of the Tandoor REST payloads.
//!
//! Remote objects are held as the JSON the server sent and written back out
//! unchanged. Nothing is required of their shape, so schema drift on the
//! Tandoor side never turns a 2xx answer into a failure.

use crate::error::TandoorError;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use tracing::error;

/// Paginated list envelope used by the Tandoor collection endpoints
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Page<T> {
    pub(crate) results: Vec<T>,
}

macro_rules! remote_object {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Value);
    };
}

remote_object!(
    /// Entry of `GET /recipe`, nested keyword references included
    Recipe
);
remote_object!(Keyword);
remote_object!(MealType);
remote_object!(
    /// Entry created by `POST /meal-plan/`
    MealPlanEntry
);

impl MealPlanEntry {
    pub fn id(&self) -> Option<i64> {
        self.0.get("id").and_then(Value::as_i64)
    }
}

/// Body of `POST /shopping-list-entry/`
#[derive(Debug, Clone, Serialize)]
pub(crate) struct NewShoppingListEntry<'a> {
    pub(crate) food: FoodRef<'a>,
    pub(crate) amount: Number,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct FoodRef<'a> {
    pub(crate) name: &'a str,
}

/// Body of `POST /meal-plan/`
#[derive(Debug, Clone, Serialize)]
pub struct NewMealPlanEntry {
    pub recipe: i64,
    pub servings: Number,
    pub from_date: String,
    pub meal_type: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShoppingListItemAdded {
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealPlanAdded {
    pub success: bool,
    pub meal_plan: MealPlanEntry,
}

/// Uniform failure shape returned in place of a success payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResult {
    pub error: String,
    pub details: String,
}

impl ErrorResult {
    /// Map a client fault to the error shape. Every remote operation goes
    /// through here so the shape never diverges between tools.
    pub fn from_error(context: &str, err: &TandoorError) -> Self {
        let details = match err {
            TandoorError::Status { status, body } if body.is_empty() => {
                format!("Request failed with status code {}", status.as_u16())
            }
            TandoorError::Status { status, body } => {
                format!(
                    "Request failed with status code {}: {}",
                    status.as_u16(),
                    body
                )
            }
            other => other.to_string(),
        };

        Self {
            error: context.to_string(),
            details,
        }
    }
}

/// Outcome of one remote operation. Serializes as the bare payload on
/// success and as an [`ErrorResult`] on failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ApiResponse<T> {
    Success(T),
    Failure(ErrorResult),
}

impl<T> ApiResponse<T> {
    pub(crate) fn from_result(result: Result<T, TandoorError>, context: &str) -> Self {
        match result {
            Ok(value) => ApiResponse::Success(value),
            Err(err) => {
                error!("{}: {}", context, err);
                ApiResponse::Failure(ErrorResult::from_error(context, &err))
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn into_result(self) -> Result<T, ErrorResult> {
        match self {
            ApiResponse::Success(value) => Ok(value),
            ApiResponse::Failure(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[test]
    fn test_recipe_is_passed_through_unchanged() {
        let raw = json!({
            "id": 7,
            "name": "Tomato Soup",
            "description": null,
            "keywords": [{"id": 3, "label": "Soup", "name": "soup"}],
            "working_time": 20,
            "rating": 4.5,
            "new": false
        });

        let recipe: Recipe = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&recipe).unwrap(), raw);
    }

    #[test]
    fn test_projections_tolerate_shape_drift() {
        let page: Page<Recipe> = serde_json::from_value(json!({
            "results": [
                {"id": 1, "name": "Soup"},
                {"id": 2, "keywords": [{"id": 3}], "name": null},
                {"id": "abc"}
            ]
        }))
        .unwrap();

        assert_eq!(
            serde_json::to_value(&page.results).unwrap(),
            json!([
                {"id": 1, "name": "Soup"},
                {"id": 2, "keywords": [{"id": 3}], "name": null},
                {"id": "abc"}
            ])
        );
    }

    #[test]
    fn test_meal_plan_entry_id() {
        let entry: MealPlanEntry = serde_json::from_value(json!({"id": 31})).unwrap();
        assert_eq!(entry.id(), Some(31));

        let entry: MealPlanEntry = serde_json::from_value(json!({"recipe": 5})).unwrap();
        assert_eq!(entry.id(), None);
    }

    #[test]
    fn test_error_result_from_status() {
        let err = TandoorError::Status {
            status: StatusCode::UNAUTHORIZED,
            body: "{\"detail\":\"Invalid token.\"}".to_string(),
        };

        let result = ErrorResult::from_error("Failed to fetch recipes", &err);
        assert_eq!(result.error, "Failed to fetch recipes");
        assert_eq!(
            result.details,
            "Request failed with status code 401: {\"detail\":\"Invalid token.\"}"
        );
    }

    #[test]
    fn test_error_result_from_status_without_body() {
        let err = TandoorError::Status {
            status: StatusCode::BAD_GATEWAY,
            body: String::new(),
        };

        let result = ErrorResult::from_error("Failed to fetch keywords", &err);
        assert_eq!(result.details, "Request failed with status code 502");
    }

    #[test]
    fn test_api_response_serializes_untagged() {
        let ok: ApiResponse<ShoppingListItemAdded> =
            ApiResponse::Success(ShoppingListItemAdded { success: true });
        assert_eq!(serde_json::to_value(&ok).unwrap(), json!({"success": true}));

        let failed: ApiResponse<ShoppingListItemAdded> = ApiResponse::from_result(
            Err(TandoorError::config("bad header")),
            "Failed to add shopping list item",
        );
        assert!(matches!(failed, ApiResponse::Failure(_)));
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({
                "error": "Failed to add shopping list item",
                "details": "Configuration error: bad header"
            })
        );
    }

    #[test]
    fn test_meal_plan_body_omits_missing_title() {
        let body = NewMealPlanEntry {
            recipe: 5,
            servings: Number::from(2),
            from_date: "2024-06-01".to_string(),
            meal_type: 1,
            title: None,
            note: "Added via MCP".to_string(),
        };

        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("title").is_none());
        assert_eq!(value["servings"], json!(2));
        assert_eq!(value["note"], "Added via MCP");
    }
}

//! Fixed set of MCP tools backed by the Tandoor client.
//!
//! Each tool deserializes its arguments into a typed parameter struct (whose
//! JSON schema is advertised in `tools/list`), makes exactly one client call
//! and returns the serialized outcome as a single text block. Remote failures
//! arrive here already converted to an `ErrorResult`, so they are returned
//! as ordinary tool output.

use crate::tandoor::{NewMealPlanEntry, TandoorClient, MEAL_PLAN_NOTE};
use once_cell::sync::Lazy;
use rmcp::model::{CallToolResult, Content, JsonObject, Tool};
use rmcp::ErrorData as McpError;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::sync::Arc;
use tracing::debug;

pub const LIST_RECIPES: &str = "list-recipes";
pub const LIST_KEYWORDS: &str = "list-keywords";
pub const ADD_SHOPPING_LIST_ITEM: &str = "add-shopping-list-item";
pub const ADD_RECIPE_TO_MEAL_PLAN: &str = "add-recipe-to-meal-plan";
pub const LIST_MEAL_TYPES: &str = "list-meal-types";

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListRecipesParams {
    /// Allows to filter for recipes having this string in their name.
    pub name: Option<String>,
    /// ID of keyword a recipe should have.
    pub keyword_id: Option<i64>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListKeywordsParams {
    /// Allows to filter for keywords having this string in their name.
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddShoppingListItemParams {
    /// Name of the item to add to the shopping list.
    pub name: String,
    /// Quantity of the item to add to the shopping list.
    #[serde(default = "default_quantity")]
    pub quantity: Number,
}

fn default_quantity() -> Number {
    Number::from(1)
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddRecipeToMealPlanParams {
    /// ID of the recipe to add to the meal plan.
    pub recipe_id: i64,
    /// Number of servings for the recipe.
    pub servings: Number,
    /// Date for the meal plan entry in YYYY-MM-DD format.
    pub from_date: String,
    /// ID of the meal type (e.g., Breakfast, Lunch, Dinner).
    pub meal_type_id: i64,
    /// Optional title for the meal plan entry.
    pub title: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListMealTypesParams {}

static TOOLS: Lazy<Vec<Tool>> = Lazy::new(|| {
    vec![
        tool::<ListRecipesParams>(
            LIST_RECIPES,
            "List Recipes",
            "List Recipes in the Users Tandoor Library",
        ),
        tool::<ListKeywordsParams>(
            LIST_KEYWORDS,
            "List Keywords",
            "List all Keywords of Recipes in the Users Tandoor Library",
        ),
        tool::<AddShoppingListItemParams>(
            ADD_SHOPPING_LIST_ITEM,
            "Add Shopping List Item",
            "Add an item to the Tandoor Shopping List",
        ),
        tool::<AddRecipeToMealPlanParams>(
            ADD_RECIPE_TO_MEAL_PLAN,
            "Add Recipe to Meal Plan",
            "Add a recipe to your Tandoor meal plan. Note: Adding a recipe to the meal plan will also automatically add all of its ingredients to your shopping list.",
        ),
        tool::<ListMealTypesParams>(
            LIST_MEAL_TYPES,
            "List Meal Types",
            "List the meal types (e.g. Breakfast, Lunch, Dinner) defined in the Users Tandoor Space",
        ),
    ]
});

fn tool<P: JsonSchema>(name: &'static str, title: &'static str, description: &'static str) -> Tool {
    let mut tool = Tool::new(name, description, Arc::new(input_schema::<P>()));
    tool.title = Some(title.into());
    tool
}

/// JSON schema of a parameter struct as an MCP `inputSchema` object
pub(crate) fn input_schema<P: JsonSchema>() -> JsonObject {
    let schema = schemars::schema_for!(P);
    match serde_json::to_value(schema) {
        Ok(Value::Object(mut object)) => {
            object.remove("$schema");
            object
        }
        _ => JsonObject::new(),
    }
}

/// Every registered tool, in registration order
pub fn tools() -> Vec<Tool> {
    (*TOOLS).clone()
}

/// Run the tool `name` with the raw call arguments
pub async fn call_tool(
    client: &TandoorClient,
    name: &str,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, McpError> {
    debug!("Calling tool: {}", name);

    match name {
        LIST_RECIPES => {
            let params: ListRecipesParams = parse_arguments(name, arguments)?;
            let recipes = client
                .list_recipes(params.name.as_deref(), params.keyword_id)
                .await;
            text_result(&recipes)
        }
        LIST_KEYWORDS => {
            let params: ListKeywordsParams = parse_arguments(name, arguments)?;
            text_result(&client.list_keywords(params.name.as_deref()).await)
        }
        ADD_SHOPPING_LIST_ITEM => {
            let params: AddShoppingListItemParams = parse_arguments(name, arguments)?;
            let added = client
                .add_shopping_list_item(&params.name, params.quantity)
                .await;
            text_result(&added)
        }
        ADD_RECIPE_TO_MEAL_PLAN => {
            let params: AddRecipeToMealPlanParams = parse_arguments(name, arguments)?;
            let entry = NewMealPlanEntry {
                recipe: params.recipe_id,
                servings: params.servings,
                from_date: params.from_date,
                meal_type: params.meal_type_id,
                title: params.title,
                note: MEAL_PLAN_NOTE.to_string(),
            };
            text_result(&client.add_recipe_to_meal_plan(&entry).await)
        }
        LIST_MEAL_TYPES => {
            let _: ListMealTypesParams = parse_arguments(name, arguments)?;
            text_result(&client.list_meal_types().await)
        }
        _ => Err(McpError::invalid_params(
            format!("Unknown tool: {}", name),
            None,
        )),
    }
}

fn parse_arguments<P: DeserializeOwned>(
    tool: &str,
    arguments: Option<JsonObject>,
) -> Result<P, McpError> {
    serde_json::from_value(Value::Object(arguments.unwrap_or_default())).map_err(|e| {
        McpError::invalid_params(format!("Invalid arguments for {}: {}", tool, e), None)
    })
}

fn text_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string(value).map_err(|e| {
        McpError::internal_error(format!("Failed to serialize tool result: {}", e), None)
    })?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

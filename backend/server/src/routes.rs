use axum::{
    Json,
    extract::{FromRequest, Path, Query, Request, State},
    http::StatusCode,
    response::IntoResponse,
};
use catalog::{
    dish::{CreateDish, Dish, UpdateDish},
    ingredient::{CreateIngredient, Ingredient, UpdateIngredient},
    recipe::{CreateRecipe, Recipe, UpdateRecipe},
    stats::DishStats,
    vendor::{CreateDishVendor, CreateVendor, DishVendor, UpdateVendor, Vendor},
};
use serde::{Deserialize, de::DeserializeOwned};

use crate::{error::AppError, state::SharedState};

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    q: String,
}

#[derive(Deserialize)]
pub struct RegionParams {
    region: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeParams {
    region: Option<String>,
    dish_id: Option<String>,
}

/// JSON body whose rejections surface as validation errors.
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;

        Ok(Payload(value))
    }
}

fn found<T>(item: Option<T>, resource: &'static str, id: &str) -> Result<Json<T>, AppError> {
    item.map(Json).ok_or_else(|| AppError::not_found(resource, id))
}

fn deleted(removed: bool, resource: &'static str, id: &str) -> Result<StatusCode, AppError> {
    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(resource, id))
    }
}

pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

// ingredients

pub async fn list_ingredients(State(state): State<SharedState>) -> Json<Vec<Ingredient>> {
    Json(state.catalog.ingredients.list())
}

pub async fn search_ingredients(
    State(state): State<SharedState>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<Ingredient>> {
    Json(state.catalog.ingredients.search(&params.q))
}

pub async fn create_ingredient(
    State(state): State<SharedState>,
    Payload(payload): Payload<CreateIngredient>,
) -> Result<impl IntoResponse, AppError> {
    let ingredient = state.catalog.ingredients.create(payload)?;

    Ok((StatusCode::CREATED, Json(ingredient)))
}

pub async fn get_ingredient(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Ingredient>, AppError> {
    found(state.catalog.ingredients.get(&id), "Ingredient", &id)
}

pub async fn update_ingredient(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Payload(payload): Payload<UpdateIngredient>,
) -> Result<Json<Ingredient>, AppError> {
    found(state.catalog.ingredients.update(&id, payload)?, "Ingredient", &id)
}

pub async fn delete_ingredient(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    deleted(state.catalog.ingredients.delete(&id), "Ingredient", &id)
}

// dishes

pub async fn list_dishes(
    State(state): State<SharedState>,
    Query(params): Query<RegionParams>,
) -> Json<Vec<Dish>> {
    let dishes = &state.catalog.dishes;

    Json(match params.region {
        Some(region) => dishes.by_region(&region),
        None => dishes.list(),
    })
}

pub async fn search_dishes(
    State(state): State<SharedState>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<Dish>> {
    Json(state.catalog.dishes.search(&params.q))
}

pub async fn create_dish(
    State(state): State<SharedState>,
    Payload(payload): Payload<CreateDish>,
) -> Result<impl IntoResponse, AppError> {
    let dish = state.catalog.dishes.create(payload)?;

    Ok((StatusCode::CREATED, Json(dish)))
}

pub async fn get_dish(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Dish>, AppError> {
    found(state.catalog.dishes.get(&id), "Dish", &id)
}

pub async fn update_dish(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Payload(payload): Payload<UpdateDish>,
) -> Result<Json<Dish>, AppError> {
    found(state.catalog.dishes.update(&id, payload)?, "Dish", &id)
}

pub async fn delete_dish(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    deleted(state.catalog.dishes.delete(&id), "Dish", &id)
}

pub async fn dish_recipes(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Json<Vec<Recipe>> {
    Json(state.catalog.recipes.by_dish(&id))
}

pub async fn dish_vendors(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Json<Vec<Vendor>> {
    Json(state.catalog.vendors.by_dish(&id))
}

/// Unknown dishes report zero counts.
pub async fn dish_stats(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Json<DishStats> {
    Json(state.catalog.stats.for_dish(&id))
}

// recipes

pub async fn list_recipes(
    State(state): State<SharedState>,
    Query(params): Query<RecipeParams>,
) -> Json<Vec<Recipe>> {
    let recipes = match &params.dish_id {
        Some(dish_id) => state.catalog.recipes.by_dish(dish_id),
        None => state.catalog.recipes.list(),
    };

    Json(
        recipes
            .into_iter()
            .filter(|recipe| params.region.as_ref().is_none_or(|r| &recipe.region == r))
            .collect(),
    )
}

pub async fn search_recipes(
    State(state): State<SharedState>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<Recipe>> {
    Json(state.catalog.recipes.search(&params.q))
}

pub async fn create_recipe(
    State(state): State<SharedState>,
    Payload(payload): Payload<CreateRecipe>,
) -> Result<impl IntoResponse, AppError> {
    let recipe = state.catalog.recipes.create(payload)?;

    Ok((StatusCode::CREATED, Json(recipe)))
}

pub async fn get_recipe(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Recipe>, AppError> {
    found(state.catalog.recipes.get(&id), "Recipe", &id)
}

pub async fn update_recipe(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Payload(payload): Payload<UpdateRecipe>,
) -> Result<Json<Recipe>, AppError> {
    found(state.catalog.recipes.update(&id, payload)?, "Recipe", &id)
}

pub async fn delete_recipe(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    deleted(state.catalog.recipes.delete(&id), "Recipe", &id)
}

// vendors

pub async fn list_vendors(
    State(state): State<SharedState>,
    Query(params): Query<RegionParams>,
) -> Json<Vec<Vendor>> {
    let vendors = &state.catalog.vendors;

    Json(match params.region {
        Some(region) => vendors.by_region(&region),
        None => vendors.list(),
    })
}

pub async fn search_vendors(
    State(state): State<SharedState>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<Vendor>> {
    Json(state.catalog.vendors.search(&params.q))
}

pub async fn create_vendor(
    State(state): State<SharedState>,
    Payload(payload): Payload<CreateVendor>,
) -> Result<impl IntoResponse, AppError> {
    let vendor = state.catalog.vendors.create(payload)?;

    Ok((StatusCode::CREATED, Json(vendor)))
}

pub async fn get_vendor(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Vendor>, AppError> {
    found(state.catalog.vendors.get(&id), "Vendor", &id)
}

pub async fn update_vendor(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Payload(payload): Payload<UpdateVendor>,
) -> Result<Json<Vendor>, AppError> {
    found(state.catalog.vendors.update(&id, payload)?, "Vendor", &id)
}

pub async fn delete_vendor(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    deleted(state.catalog.vendors.delete(&id), "Vendor", &id)
}

// dish-vendor associations

pub async fn create_dish_vendor(
    State(state): State<SharedState>,
    Payload(payload): Payload<CreateDishVendor>,
) -> Result<impl IntoResponse, AppError> {
    let association = state.catalog.vendors.create_dish_vendor(payload)?;

    Ok((StatusCode::CREATED, Json(association)))
}

pub async fn list_dish_vendors(
    State(state): State<SharedState>,
    Path(dish_id): Path<String>,
) -> Json<Vec<DishVendor>> {
    Json(state.catalog.vendors.dish_vendors(&dish_id))
}

pub async fn delete_dish_vendor(
    State(state): State<SharedState>,
    Path((dish_id, vendor_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    if state.catalog.vendors.delete_dish_vendor(&dish_id, &vendor_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("DishVendor", format!("{dish_id}/{vendor_id}")))
    }
}

//! # Recipes
//!
//! A procedure for preparing one dish. A recipe cannot be stored against a dish id that does not
//! exist, and its properties always mirror the referenced dish. Nutrition is borrowed from the dish
//! until the recipe supplies its own ingredient list.
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    error::{CatalogError, CatalogResult, require},
    id,
    lookup::{DishLookup, RecipeLookup},
    nutrition::{IngredientUsage, NutritionCalculator, NutritionInfo},
    repository::Repository,
};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeStep {
    pub step_number: u32,
    pub instruction: String,
    /// Minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technique: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub region: String,
    pub dish_id: String,
    pub dish_name: String,
    pub ingredients: Vec<IngredientUsage>,
    pub instructions: Vec<RecipeStep>,
    pub calculated_nutrition: NutritionInfo,
    pub properties: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooking_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecipe {
    pub title: String,
    pub description: Option<String>,
    pub region: String,
    #[serde(default)]
    pub dish_id: String,
    pub ingredients: Option<Vec<IngredientUsage>>,
    #[serde(default)]
    pub instructions: Vec<RecipeStep>,
    pub cooking_time: Option<u32>,
    pub difficulty: Option<String>,
    pub servings: Option<u32>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecipe {
    pub title: Option<String>,
    pub description: Option<String>,
    pub region: Option<String>,
    pub dish_id: Option<String>,
    pub ingredients: Option<Vec<IngredientUsage>>,
    pub instructions: Option<Vec<RecipeStep>>,
    pub cooking_time: Option<u32>,
    pub difficulty: Option<String>,
    pub servings: Option<u32>,
}

pub struct RecipeStore {
    recipes: Arc<dyn Repository<Recipe>>,
    dishes: Arc<dyn DishLookup>,
    nutrition: NutritionCalculator,
}

impl RecipeStore {
    pub fn new(
        recipes: Arc<dyn Repository<Recipe>>,
        dishes: Arc<dyn DishLookup>,
        nutrition: NutritionCalculator,
    ) -> Self {
        Self {
            recipes,
            dishes,
            nutrition,
        }
    }

    pub fn list(&self) -> Vec<Recipe> {
        self.recipes.list()
    }

    pub fn get(&self, id: &str) -> Option<Recipe> {
        self.recipes.get(id)
    }

    pub fn by_dish(&self, dish_id: &str) -> Vec<Recipe> {
        self.filter(|recipe| recipe.dish_id == dish_id)
    }

    pub fn by_region(&self, region: &str) -> Vec<Recipe> {
        self.filter(|recipe| recipe.region == region)
    }

    /// Case-insensitive match over title, description and the cached dish name.
    pub fn search(&self, query: &str) -> Vec<Recipe> {
        let query = query.to_lowercase();

        self.filter(|recipe| {
            recipe.title.to_lowercase().contains(&query)
                || recipe
                    .description
                    .as_ref()
                    .is_some_and(|description| description.to_lowercase().contains(&query))
                || recipe.dish_name.to_lowercase().contains(&query)
        })
    }

    fn filter(&self, predicate: impl Fn(&Recipe) -> bool) -> Vec<Recipe> {
        self.list().into_iter().filter(|r| predicate(r)).collect()
    }

    pub fn create(&self, input: CreateRecipe) -> CatalogResult<Recipe> {
        require("dishId", &input.dish_id)?;
        require("title", &input.title)?;
        require("region", &input.region)?;

        let dish = self.dishes.dish(&input.dish_id).ok_or_else(|| {
            warn!("Recipe references missing dish {}", input.dish_id);
            CatalogError::not_found("Dish", &input.dish_id)
        })?;

        // An explicit empty list is stored as given but keeps the dish's nutrition.
        let (ingredients, calculated_nutrition) = match input.ingredients {
            Some(own) if !own.is_empty() => {
                let own = self.nutrition.enrich(own);
                let nutrition = self.nutrition.calculate(&own);
                (own, nutrition)
            }
            Some(own) => (own, dish.calculated_nutrition),
            None => (dish.ingredients, dish.calculated_nutrition),
        };

        let now = Utc::now();
        let recipe = Recipe {
            id: id::generate("recipe"),
            title: input.title,
            description: input.description,
            region: input.region,
            dish_id: dish.id,
            dish_name: dish.name,
            ingredients,
            instructions: input.instructions,
            calculated_nutrition,
            properties: dish.properties,
            cooking_time: input.cooking_time,
            difficulty: input.difficulty,
            servings: input.servings,
            created_at: now,
            updated_at: now,
        };

        debug!("Created recipe {} for dish {}", recipe.id, recipe.dish_id);
        self.recipes.put(recipe.id.clone(), recipe.clone());

        Ok(recipe)
    }

    /// Dish name and properties are refreshed from the current dish on every update.
    pub fn update(&self, id: &str, input: UpdateRecipe) -> CatalogResult<Option<Recipe>> {
        let Some(prior) = self.get(id) else {
            return Ok(None);
        };

        if let Some(title) = &input.title {
            require("title", title)?;
        }
        if let Some(region) = &input.region {
            require("region", region)?;
        }

        let dish_id = match input.dish_id {
            Some(dish_id) if !dish_id.is_empty() => dish_id,
            _ => prior.dish_id.clone(),
        };
        let dish = self.dishes.dish(&dish_id).ok_or_else(|| {
            warn!("Recipe {id} references missing dish {dish_id}");
            CatalogError::not_found("Dish", &dish_id)
        })?;

        let (ingredients, calculated_nutrition) = match input.ingredients {
            Some(own) => {
                let own = self.nutrition.enrich(own);
                let nutrition = self.nutrition.calculate(&own);
                (own, nutrition)
            }
            None => (prior.ingredients, prior.calculated_nutrition),
        };

        let updated = Recipe {
            title: input.title.unwrap_or(prior.title),
            description: input.description.or(prior.description),
            region: input.region.unwrap_or(prior.region),
            dish_id: dish.id,
            dish_name: dish.name,
            ingredients,
            instructions: input.instructions.unwrap_or(prior.instructions),
            calculated_nutrition,
            properties: dish.properties,
            cooking_time: input.cooking_time.or(prior.cooking_time),
            difficulty: input.difficulty.or(prior.difficulty),
            servings: input.servings.or(prior.servings),
            updated_at: Utc::now(),
            ..prior
        };

        debug!("Updated recipe {id}");
        self.recipes.put(id.to_string(), updated.clone());

        Ok(Some(updated))
    }

    pub fn delete(&self, id: &str) -> bool {
        self.recipes.delete(id)
    }
}

impl RecipeLookup for RecipeStore {
    fn recipes_for_dish(&self, dish_id: &str) -> Vec<Recipe> {
        self.by_dish(dish_id)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::{
        dish::{DishStore, UpdateDish, tests as fixtures},
        nutrition::tests::{FixedIngredients, ingredient, usage},
        repository::in_memory,
    };

    fn stores() -> (Arc<DishStore>, RecipeStore) {
        let map: HashMap<_, _> = [
            ingredient("a", 100.0, &["熱", "補氣"]),
            ingredient("b", 30.0, &["清熱"]),
        ]
        .into_iter()
        .map(|i| (i.id.clone(), i))
        .collect();
        let nutrition = NutritionCalculator::new(Arc::new(FixedIngredients(map)));

        let dishes = Arc::new(DishStore::new(in_memory(), nutrition.clone()));
        let recipes = RecipeStore::new(in_memory(), dishes.clone(), nutrition);

        (dishes, recipes)
    }

    fn braise(dish_id: &str) -> CreateRecipe {
        CreateRecipe {
            title: "Slow braise".to_string(),
            description: None,
            region: "taiwan".to_string(),
            dish_id: dish_id.to_string(),
            ingredients: None,
            instructions: vec![RecipeStep {
                step_number: 1,
                instruction: "Simmer for an hour".to_string(),
                duration: Some(60),
                temperature: None,
                technique: Some("煮".to_string()),
            }],
            cooking_time: Some(70),
            difficulty: None,
            servings: None,
        }
    }

    #[test]
    fn test_create_inherits_from_dish() {
        let (dishes, recipes) = stores();
        let dish = dishes
            .create(fixtures::soup(vec![usage("a", 2.0)]))
            .unwrap();

        let recipe = recipes.create(braise(&dish.id)).unwrap();
        assert!(recipe.id.starts_with("recipe_"));
        assert_eq!(recipe.dish_name, dish.name);
        assert_eq!(recipe.ingredients, dish.ingredients);
        assert_eq!(recipe.calculated_nutrition, dish.calculated_nutrition);
        assert_eq!(recipe.properties, dish.properties);
    }

    #[test]
    fn test_own_ingredients_recompute_nutrition_not_properties() {
        let (dishes, recipes) = stores();
        let dish = dishes
            .create(fixtures::soup(vec![usage("a", 2.0)]))
            .unwrap();

        let mut input = braise(&dish.id);
        input.ingredients = Some(vec![usage("b", 1.0)]);

        let recipe = recipes.create(input).unwrap();
        assert_eq!(recipe.calculated_nutrition.total_calories, 30.0);
        assert_eq!(recipe.properties, vec!["熱", "補氣"]);
        assert_eq!(recipe.ingredients[0].ingredient_name, "name of b");
    }

    #[test]
    fn test_empty_ingredients_kept_with_dish_nutrition() {
        let (dishes, recipes) = stores();
        let dish = dishes
            .create(fixtures::soup(vec![usage("a", 2.0)]))
            .unwrap();

        let mut input = braise(&dish.id);
        input.ingredients = Some(Vec::new());

        let recipe = recipes.create(input).unwrap();
        assert!(recipe.ingredients.is_empty());
        assert_eq!(recipe.calculated_nutrition, dish.calculated_nutrition);
        assert_eq!(recipe.properties, dish.properties);
        assert_eq!(recipes.get(&recipe.id), Some(recipe));
    }

    #[test]
    fn test_missing_dish_persists_nothing() {
        let (_, recipes) = stores();

        assert_eq!(
            recipes.create(braise("dish_missing")),
            Err(CatalogError::not_found("Dish", "dish_missing"))
        );
        assert!(recipes.list().is_empty());
    }

    #[test]
    fn test_blank_dish_id_is_validation_error() {
        let (_, recipes) = stores();

        assert_eq!(
            recipes.create(braise("")),
            Err(CatalogError::Validation("dishId is required".to_string()))
        );
    }

    #[test]
    fn test_update_dish_id_refreshes_cache() {
        let (dishes, recipes) = stores();
        let first = dishes
            .create(fixtures::soup(vec![usage("a", 1.0)]))
            .unwrap();
        let mut second_input = fixtures::soup(vec![usage("b", 1.0)]);
        second_input.name = "Cooling Soup".to_string();
        let second = dishes.create(second_input).unwrap();

        let recipe = recipes.create(braise(&first.id)).unwrap();
        let updated = recipes
            .update(
                &recipe.id,
                UpdateRecipe {
                    dish_id: Some(second.id.clone()),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.dish_id, second.id);
        assert_eq!(updated.dish_name, "Cooling Soup");
        assert_eq!(updated.properties, vec!["清熱"]);
        assert_eq!(updated.ingredients, recipe.ingredients);
        assert_eq!(updated.calculated_nutrition, recipe.calculated_nutrition);
    }

    #[test]
    fn test_update_to_missing_dish_fails() {
        let (dishes, recipes) = stores();
        let dish = dishes.create(fixtures::soup(Vec::new())).unwrap();
        let recipe = recipes.create(braise(&dish.id)).unwrap();

        let result = recipes.update(
            &recipe.id,
            UpdateRecipe {
                dish_id: Some("dish_gone".to_string()),
                ..Default::default()
            },
        );

        assert_eq!(result, Err(CatalogError::not_found("Dish", "dish_gone")));
        assert_eq!(recipes.get(&recipe.id), Some(recipe));
    }

    #[test]
    fn test_update_mirrors_changed_dish_properties() {
        let (dishes, recipes) = stores();
        let dish = dishes
            .create(fixtures::soup(vec![usage("a", 1.0)]))
            .unwrap();
        let recipe = recipes.create(braise(&dish.id)).unwrap();

        dishes
            .update(
                &dish.id,
                UpdateDish {
                    properties: Some(vec!["養顏".to_string()]),
                    ..Default::default()
                },
            )
            .unwrap();

        let updated = recipes
            .update(
                &recipe.id,
                UpdateRecipe {
                    difficulty: Some("easy".to_string()),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.properties, vec!["養顏"]);
        assert_eq!(updated.difficulty.as_deref(), Some("easy"));
    }

    #[test]
    fn test_update_ingredients_recomputes() {
        let (dishes, recipes) = stores();
        let dish = dishes
            .create(fixtures::soup(vec![usage("a", 1.0)]))
            .unwrap();
        let recipe = recipes.create(braise(&dish.id)).unwrap();

        let updated = recipes
            .update(
                &recipe.id,
                UpdateRecipe {
                    ingredients: Some(vec![usage("a", 0.5), usage("b", 2.0)]),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.calculated_nutrition.total_calories, 110.0);
    }

    #[test]
    fn test_filters_and_search() {
        let (dishes, recipes) = stores();
        let dish = dishes.create(fixtures::soup(Vec::new())).unwrap();
        let recipe = recipes.create(braise(&dish.id)).unwrap();

        assert_eq!(recipes.by_dish(&dish.id), vec![recipe.clone()]);
        assert_eq!(recipes.recipes_for_dish("other"), Vec::new());
        assert_eq!(recipes.by_region("taiwan").len(), 1);
        assert_eq!(recipes.search("ginger soup"), vec![recipe.clone()]);
        assert_eq!(recipes.search("BRAISE"), vec![recipe.clone()]);
        assert!(recipes.delete(&recipe.id));
        assert_eq!(recipes.update(&recipe.id, UpdateRecipe::default()), Ok(None));
    }
}

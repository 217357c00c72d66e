//! # Dishes
//!
//! The hub of the catalog. Recipes and vendor listings both point at a dish.
//!
//! `calculated_nutrition` and `properties` always match `ingredients` as of the last write:
//! - create computes both, unless the caller passed a non-empty properties override
//! - update recomputes when ingredients are touched or no properties override is given
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{CatalogResult, require},
    id,
    lookup::DishLookup,
    nutrition::{IngredientUsage, NutritionCalculator, NutritionInfo},
    repository::Repository,
};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub region: String,
    pub ingredients: Vec<IngredientUsage>,
    pub calculated_nutrition: NutritionInfo,
    pub properties: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateDish {
    pub name: String,
    pub description: Option<String>,
    pub region: String,
    #[serde(default)]
    pub ingredients: Vec<IngredientUsage>,
    pub properties: Option<Vec<String>>,
    pub servings: Option<u32>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDish {
    pub name: Option<String>,
    pub description: Option<String>,
    pub region: Option<String>,
    pub ingredients: Option<Vec<IngredientUsage>>,
    pub properties: Option<Vec<String>>,
    pub servings: Option<u32>,
}

pub struct DishStore {
    dishes: Arc<dyn Repository<Dish>>,
    nutrition: NutritionCalculator,
}

impl DishStore {
    pub fn new(dishes: Arc<dyn Repository<Dish>>, nutrition: NutritionCalculator) -> Self {
        Self { dishes, nutrition }
    }

    pub fn list(&self) -> Vec<Dish> {
        self.dishes.list()
    }

    pub fn get(&self, id: &str) -> Option<Dish> {
        self.dishes.get(id)
    }

    pub fn by_region(&self, region: &str) -> Vec<Dish> {
        self.list()
            .into_iter()
            .filter(|dish| dish.region == region)
            .collect()
    }

    /// Case-insensitive match over name, description and property tags.
    pub fn search(&self, query: &str) -> Vec<Dish> {
        let query = query.to_lowercase();

        self.list()
            .into_iter()
            .filter(|dish| {
                dish.name.to_lowercase().contains(&query)
                    || dish
                        .description
                        .as_ref()
                        .is_some_and(|description| description.to_lowercase().contains(&query))
                    || dish
                        .properties
                        .iter()
                        .any(|property| property.to_lowercase().contains(&query))
            })
            .collect()
    }

    pub fn create(&self, input: CreateDish) -> CatalogResult<Dish> {
        require("name", &input.name)?;
        require("region", &input.region)?;

        let ingredients = self.nutrition.enrich(input.ingredients);
        let calculated_nutrition = self.nutrition.calculate(&ingredients);
        let properties = match input.properties {
            Some(properties) if !properties.is_empty() => properties,
            _ => self.nutrition.aggregate_properties(&ingredients),
        };

        let now = Utc::now();
        let dish = Dish {
            id: id::generate("dish"),
            name: input.name,
            description: input.description,
            region: input.region,
            ingredients,
            calculated_nutrition,
            properties,
            servings: input.servings,
            created_at: now,
            updated_at: now,
        };

        debug!("Created dish {} with {} ingredients", dish.id, dish.ingredients.len());
        self.dishes.put(dish.id.clone(), dish.clone());

        Ok(dish)
    }

    pub fn update(&self, id: &str, input: UpdateDish) -> CatalogResult<Option<Dish>> {
        let Some(prior) = self.get(id) else {
            return Ok(None);
        };

        if let Some(name) = &input.name {
            require("name", name)?;
        }
        if let Some(region) = &input.region {
            require("region", region)?;
        }

        let needs_recalculation = input.ingredients.is_some() || input.properties.is_none();
        let ingredients = self
            .nutrition
            .enrich(input.ingredients.unwrap_or(prior.ingredients));

        let (calculated_nutrition, properties) = match (needs_recalculation, input.properties) {
            (false, Some(properties)) => (prior.calculated_nutrition, properties),
            (true, Some(properties)) => (self.nutrition.calculate(&ingredients), properties),
            (_, None) => (
                self.nutrition.calculate(&ingredients),
                self.nutrition.aggregate_properties(&ingredients),
            ),
        };

        let updated = Dish {
            name: input.name.unwrap_or(prior.name),
            description: input.description.or(prior.description),
            region: input.region.unwrap_or(prior.region),
            ingredients,
            calculated_nutrition,
            properties,
            servings: input.servings.or(prior.servings),
            updated_at: Utc::now(),
            ..prior
        };

        debug!("Updated dish {id}, recalculated: {needs_recalculation}");
        self.dishes.put(id.to_string(), updated.clone());

        Ok(Some(updated))
    }

    pub fn delete(&self, id: &str) -> bool {
        self.dishes.delete(id)
    }
}

impl DishLookup for DishStore {
    fn dish(&self, id: &str) -> Option<Dish> {
        self.get(id)
    }
}

//! # Ingredients
//!
//! Base unit of the catalog. Everything else references ingredients by id and derives nutrition
//! and properties from them.
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{CatalogResult, require},
    id,
    lookup::IngredientLookup,
    nutrition::NutritionPerUnit,
    repository::Repository,
};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub unit: String,
    pub nutrition_per_unit: NutritionPerUnit,
    pub properties: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateIngredient {
    pub name: String,
    pub category: Option<String>,
    pub unit: String,
    pub nutrition_per_unit: NutritionPerUnit,
    pub properties: Option<Vec<String>>,
    pub region: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIngredient {
    pub name: Option<String>,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub nutrition_per_unit: Option<NutritionPerUnit>,
    pub properties: Option<Vec<String>>,
    pub region: Option<String>,
}

pub struct IngredientStore {
    ingredients: Arc<dyn Repository<Ingredient>>,
}

impl IngredientStore {
    pub fn new(ingredients: Arc<dyn Repository<Ingredient>>) -> Self {
        Self { ingredients }
    }

    pub fn list(&self) -> Vec<Ingredient> {
        self.ingredients.list()
    }

    pub fn get(&self, id: &str) -> Option<Ingredient> {
        self.ingredients.get(id)
    }

    pub fn search(&self, query: &str) -> Vec<Ingredient> {
        let query = query.to_lowercase();

        self.list()
            .into_iter()
            .filter(|ingredient| {
                ingredient.name.to_lowercase().contains(&query)
                    || ingredient
                        .category
                        .as_ref()
                        .is_some_and(|category| category.to_lowercase().contains(&query))
            })
            .collect()
    }

    pub fn create(&self, input: CreateIngredient) -> CatalogResult<Ingredient> {
        require("name", &input.name)?;
        require("unit", &input.unit)?;

        let now = Utc::now();
        let ingredient = Ingredient {
            id: id::generate("ingredient"),
            name: input.name,
            category: input.category,
            unit: input.unit,
            nutrition_per_unit: input.nutrition_per_unit,
            properties: input.properties.unwrap_or_default(),
            region: input.region,
            created_at: now,
            updated_at: now,
        };

        debug!("Created ingredient {}", ingredient.id);
        self.ingredients
            .put(ingredient.id.clone(), ingredient.clone());

        Ok(ingredient)
    }

    pub fn update(&self, id: &str, input: UpdateIngredient) -> CatalogResult<Option<Ingredient>> {
        let Some(prior) = self.get(id) else {
            return Ok(None);
        };

        if let Some(name) = &input.name {
            require("name", name)?;
        }
        if let Some(unit) = &input.unit {
            require("unit", unit)?;
        }

        let updated = Ingredient {
            name: input.name.unwrap_or(prior.name),
            category: input.category.or(prior.category),
            unit: input.unit.unwrap_or(prior.unit),
            nutrition_per_unit: input.nutrition_per_unit.unwrap_or(prior.nutrition_per_unit),
            properties: input.properties.unwrap_or(prior.properties),
            region: input.region.or(prior.region),
            updated_at: Utc::now(),
            ..prior
        };

        debug!("Updated ingredient {id}");
        self.ingredients.put(id.to_string(), updated.clone());

        Ok(Some(updated))
    }

    pub fn delete(&self, id: &str) -> bool {
        self.ingredients.delete(id)
    }
}

impl IngredientLookup for IngredientStore {
    fn ingredient(&self, id: &str) -> Option<Ingredient> {
        self.get(id)
    }
}

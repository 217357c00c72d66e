//! # Catalog
//!
//! Dishes, ingredients, recipes and vendors held in process memory.
//!
//! ## Dependency Graph
//!
//! ```text
//! ingredients <- nutrition <- dishes <- recipes
//!                                   <- vendors
//! recipes + vendors <- dish stats
//! ```
//!
//! Stores only ever see each other through the read-only traits in [`lookup`]. [`Catalog::new`]
//! is the single place that wires them together.
//!
//! ## Consistency
//!
//! Every store operation is a single map read or write and is atomic on its own. Multi-step flows
//! are not: creating a recipe checks that the dish exists and then copies from it, and a dish
//! deleted in between is not caught. Nothing survives a restart.
use std::sync::Arc;

pub mod chat;
pub mod dish;
pub mod error;
pub mod id;
pub mod ingredient;
pub mod lookup;
pub mod nutrition;
pub mod recipe;
pub mod repository;
pub mod stats;
pub mod vendor;

pub use error::{CatalogError, CatalogResult};

use dish::DishStore;
use ingredient::IngredientStore;
use nutrition::NutritionCalculator;
use recipe::RecipeStore;
use repository::in_memory;
use stats::DishStatsService;
use vendor::VendorStore;

pub struct Catalog {
    pub ingredients: Arc<IngredientStore>,
    pub dishes: Arc<DishStore>,
    pub recipes: Arc<RecipeStore>,
    pub vendors: Arc<VendorStore>,
    pub stats: DishStatsService,
}

impl Catalog {
    /// Empty in-memory catalog.
    pub fn new() -> Self {
        let ingredients = Arc::new(IngredientStore::new(in_memory()));
        let nutrition = NutritionCalculator::new(ingredients.clone());

        let dishes = Arc::new(DishStore::new(in_memory(), nutrition.clone()));
        let recipes = Arc::new(RecipeStore::new(in_memory(), dishes.clone(), nutrition));
        let vendors = Arc::new(VendorStore::new(in_memory(), in_memory(), dishes.clone()));
        let stats = DishStatsService::new(recipes.clone(), vendors.clone());

        Self {
            ingredients,
            dishes,
            recipes,
            vendors,
            stats,
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dish::CreateDish,
        ingredient::CreateIngredient,
        nutrition::{IngredientUsage, NutritionPerUnit},
        recipe::CreateRecipe,
        vendor::{CreateDishVendor, CreateVendor, VendorType},
    };

    #[test]
    fn test_wired_flow() {
        let catalog = Catalog::new();

        let lamb = catalog
            .ingredients
            .create(CreateIngredient {
                name: "Lamb".to_string(),
                category: Some("Meat".to_string()),
                unit: "g".to_string(),
                nutrition_per_unit: NutritionPerUnit {
                    calories: 2.5,
                    protein: Some(0.25),
                    fat: Some(0.17),
                    carbs: None,
                    fiber: None,
                },
                properties: Some(vec!["補氣".to_string(), "熱".to_string()]),
                region: None,
            })
            .unwrap();

        let dish = catalog
            .dishes
            .create(CreateDish {
                name: "Lamb Stew".to_string(),
                description: None,
                region: "taiwan".to_string(),
                ingredients: vec![IngredientUsage {
                    ingredient_id: lamb.id.clone(),
                    ingredient_name: String::new(),
                    amount: 200.0,
                    unit: "g".to_string(),
                }],
                properties: None,
                servings: Some(4),
            })
            .unwrap();

        assert_eq!(dish.calculated_nutrition.total_calories, 500.0);
        assert_eq!(dish.calculated_nutrition.total_protein, Some(50.0));
        assert_eq!(dish.calculated_nutrition.total_fat, Some(34.0));
        assert_eq!(dish.properties, vec!["熱", "補氣"]);
        assert_eq!(dish.ingredients[0].ingredient_name, "Lamb");

        catalog
            .recipes
            .create(CreateRecipe {
                title: "Winter stew".to_string(),
                description: None,
                region: "taiwan".to_string(),
                dish_id: dish.id.clone(),
                ingredients: None,
                instructions: Vec::new(),
                cooking_time: None,
                difficulty: None,
                servings: None,
            })
            .unwrap();

        let vendor = catalog
            .vendors
            .create(CreateVendor {
                name: "Stew House".to_string(),
                kind: VendorType::Restaurant,
                description: None,
                region: None,
                address: None,
                phone: None,
                website: None,
                rating: None,
                dishes: None,
            })
            .unwrap();
        catalog
            .vendors
            .create_dish_vendor(CreateDishVendor {
                dish_id: dish.id.clone(),
                vendor_id: vendor.id.clone(),
                price: None,
                currency: None,
                availability: Some(false),
                notes: None,
            })
            .unwrap();

        let stats = catalog.stats.for_dish(&dish.id);
        assert_eq!(stats.recipe_count, 1);
        assert_eq!(stats.vendor_count, 1);

        catalog.vendors.delete(&vendor.id);
        assert_eq!(catalog.stats.for_dish(&dish.id).vendor_count, 0);
    }
}

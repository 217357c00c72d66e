//! Read-only queries one store exposes to another. Stores hold these as trait objects and never
//! reach into each other's repositories, which keeps the dependency graph acyclic.
use crate::{dish::Dish, ingredient::Ingredient, recipe::Recipe, vendor::Vendor};

pub trait IngredientLookup: Send + Sync {
    fn ingredient(&self, id: &str) -> Option<Ingredient>;
}

pub trait DishLookup: Send + Sync {
    fn dish(&self, id: &str) -> Option<Dish>;
}

pub trait RecipeLookup: Send + Sync {
    fn recipes_for_dish(&self, dish_id: &str) -> Vec<Recipe>;
}

pub trait VendorLookup: Send + Sync {
    fn vendors_for_dish(&self, dish_id: &str) -> Vec<Vendor>;
}

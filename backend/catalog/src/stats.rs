use std::sync::Arc;

use serde::Serialize;

use crate::lookup::{RecipeLookup, VendorLookup};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DishStats {
    pub recipe_count: usize,
    pub vendor_count: usize,
}

/// Counts what hangs off a dish without the dish store knowing about recipes or vendors.
pub struct DishStatsService {
    recipes: Arc<dyn RecipeLookup>,
    vendors: Arc<dyn VendorLookup>,
}

impl DishStatsService {
    pub fn new(recipes: Arc<dyn RecipeLookup>, vendors: Arc<dyn VendorLookup>) -> Self {
        Self { recipes, vendors }
    }

    pub fn for_dish(&self, dish_id: &str) -> DishStats {
        DishStats {
            recipe_count: self.recipes.recipes_for_dish(dish_id).len(),
            vendor_count: self.vendors.vendors_for_dish(dish_id).len(),
        }
    }
}

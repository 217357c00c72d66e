//! # Nutrition
//!
//! Totals for a composed entity are derived from its ingredient usages:
//! - each usage multiplies the ingredient's per-unit values by its amount
//! - missing optional values count as zero
//! - usages pointing at unknown ingredients are skipped without error
//! - every total is rounded to 2 decimals
//!
//! Properties are the sorted, duplicate-free union of the referenced ingredients' tags.
//!
//! Both read whatever the ingredient store holds at call time. Nothing pins that snapshot, so a
//! concurrent ingredient edit can land between two lookups.
use std::{collections::BTreeSet, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::lookup::IngredientLookup;

pub const UNKNOWN_INGREDIENT: &str = "未知原料";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NutritionPerUnit {
    pub calories: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NutritionInfo {
    pub total_calories: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_protein: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_fat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_carbs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_fiber: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IngredientUsage {
    pub ingredient_id: String,
    /// Cached display name, refreshed whenever the owning record is written.
    #[serde(default)]
    pub ingredient_name: String,
    pub amount: f64,
    pub unit: String,
}

#[derive(Default)]
struct Totals {
    calories: f64,
    protein: f64,
    fat: f64,
    carbs: f64,
    fiber: f64,
}

impl Totals {
    fn add(&mut self, per_unit: &NutritionPerUnit, amount: f64) {
        self.calories += per_unit.calories * amount;
        self.protein += per_unit.protein.unwrap_or(0.0) * amount;
        self.fat += per_unit.fat.unwrap_or(0.0) * amount;
        self.carbs += per_unit.carbs.unwrap_or(0.0) * amount;
        self.fiber += per_unit.fiber.unwrap_or(0.0) * amount;
    }

    fn into_info(self) -> NutritionInfo {
        NutritionInfo {
            total_calories: round2(self.calories),
            total_protein: Some(round2(self.protein)),
            total_fat: Some(round2(self.fat)),
            total_carbs: Some(round2(self.carbs)),
            total_fiber: Some(round2(self.fiber)),
        }
    }
}

/// Two decimals, halves rounded toward positive infinity.
pub fn round2(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

#[derive(Clone)]
pub struct NutritionCalculator {
    ingredients: Arc<dyn IngredientLookup>,
}

impl NutritionCalculator {
    pub fn new(ingredients: Arc<dyn IngredientLookup>) -> Self {
        Self { ingredients }
    }

    pub fn calculate(&self, usages: &[IngredientUsage]) -> NutritionInfo {
        let mut totals = Totals::default();

        for usage in usages {
            let Some(ingredient) = self.ingredients.ingredient(&usage.ingredient_id) else {
                continue;
            };

            totals.add(&ingredient.nutrition_per_unit, usage.amount);
        }

        totals.into_info()
    }

    pub fn aggregate_properties(&self, usages: &[IngredientUsage]) -> Vec<String> {
        let mut properties = BTreeSet::new();

        for usage in usages {
            if let Some(ingredient) = self.ingredients.ingredient(&usage.ingredient_id) {
                properties.extend(ingredient.properties);
            }
        }

        properties.into_iter().collect()
    }

    /// Refreshes cached ingredient names, falling back to the caller's name, then a placeholder.
    pub fn enrich(&self, usages: Vec<IngredientUsage>) -> Vec<IngredientUsage> {
        usages
            .into_iter()
            .map(|mut usage| {
                match self.ingredients.ingredient(&usage.ingredient_id) {
                    Some(ingredient) if !ingredient.name.is_empty() => {
                        usage.ingredient_name = ingredient.name;
                    }
                    _ if usage.ingredient_name.is_empty() => {
                        usage.ingredient_name = UNKNOWN_INGREDIENT.to_string();
                    }
                    _ => {}
                }

                usage
            })
            .collect()
    }
}

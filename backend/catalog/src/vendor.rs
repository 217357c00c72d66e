//! # Vendors
//!
//! Purchase channels for dishes. Dish-vendor associations live in their own repository keyed by
//! dish id, each entry holding a non-empty list unique per (dish, vendor) pair. Deleting a vendor
//! strips it from every list and drops lists that end up empty.
use std::{collections::HashSet, sync::Arc};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    error::{CatalogError, CatalogResult, require},
    id,
    lookup::{DishLookup, VendorLookup},
    repository::Repository,
};

pub const MIN_RATING: f64 = 1.0;
pub const MAX_RATING: f64 = 5.0;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VendorType {
    Restaurant,
    Market,
    Online,
    Grocery,
}

/// A dish as listed by a vendor.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VendorDish {
    pub dish_id: String,
    #[serde(default)]
    pub dish_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DishVendor {
    pub dish_id: String,
    pub vendor_id: String,
    pub vendor_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub availability: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: VendorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    pub dishes: Vec<VendorDish>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateVendor {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: VendorType,
    pub description: Option<String>,
    pub region: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub rating: Option<f64>,
    pub dishes: Option<Vec<VendorDish>>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVendor {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<VendorType>,
    pub description: Option<String>,
    pub region: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub rating: Option<f64>,
    pub dishes: Option<Vec<VendorDish>>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateDishVendor {
    pub dish_id: String,
    pub vendor_id: String,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub availability: Option<bool>,
    pub notes: Option<String>,
}

fn check_rating(rating: Option<f64>) -> CatalogResult<()> {
    match rating {
        Some(rating) if !(MIN_RATING..=MAX_RATING).contains(&rating) => {
            let message = format!("rating must be between {MIN_RATING} and {MAX_RATING}");
            Err(CatalogError::validation(message))
        }
        _ => Ok(()),
    }
}

pub struct VendorStore {
    vendors: Arc<dyn Repository<Vendor>>,
    dish_vendors: Arc<dyn Repository<Vec<DishVendor>>>,
    dishes: Arc<dyn DishLookup>,
}

impl VendorStore {
    pub fn new(
        vendors: Arc<dyn Repository<Vendor>>,
        dish_vendors: Arc<dyn Repository<Vec<DishVendor>>>,
        dishes: Arc<dyn DishLookup>,
    ) -> Self {
        Self {
            vendors,
            dish_vendors,
            dishes,
        }
    }

    pub fn list(&self) -> Vec<Vendor> {
        self.vendors.list()
    }

    pub fn get(&self, id: &str) -> Option<Vendor> {
        self.vendors.get(id)
    }

    pub fn by_region(&self, region: &str) -> Vec<Vendor> {
        self.list()
            .into_iter()
            .filter(|vendor| vendor.region.as_deref() == Some(region))
            .collect()
    }

    /// Case-insensitive match over name, description and address.
    pub fn search(&self, query: &str) -> Vec<Vendor> {
        let query = query.to_lowercase();
        let matches = |field: &Option<String>| {
            field
                .as_ref()
                .is_some_and(|v| v.to_lowercase().contains(&query))
        };

        self.list()
            .into_iter()
            .filter(|vendor| {
                vendor.name.to_lowercase().contains(&query)
                    || matches(&vendor.description)
                    || matches(&vendor.address)
            })
            .collect()
    }

    /// Distinct vendors associated with the dish, in association order.
    pub fn by_dish(&self, dish_id: &str) -> Vec<Vendor> {
        let mut seen = HashSet::new();

        self.dish_vendors(dish_id)
            .into_iter()
            .filter(|association| seen.insert(association.vendor_id.clone()))
            .filter_map(|association| self.get(&association.vendor_id))
            .collect()
    }

    pub fn create(&self, input: CreateVendor) -> CatalogResult<Vendor> {
        require("name", &input.name)?;
        check_rating(input.rating)?;

        let now = Utc::now();
        let vendor = Vendor {
            id: id::generate("vendor"),
            name: input.name,
            kind: input.kind,
            description: input.description,
            region: input.region,
            address: input.address,
            phone: input.phone,
            website: input.website,
            rating: input.rating,
            dishes: input.dishes.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        debug!("Created vendor {}", vendor.id);
        self.vendors.put(vendor.id.clone(), vendor.clone());

        Ok(vendor)
    }

    pub fn update(&self, id: &str, input: UpdateVendor) -> CatalogResult<Option<Vendor>> {
        let Some(prior) = self.get(id) else {
            return Ok(None);
        };

        if let Some(name) = &input.name {
            require("name", name)?;
        }
        check_rating(input.rating)?;

        let updated = Vendor {
            name: input.name.unwrap_or(prior.name),
            kind: input.kind.unwrap_or(prior.kind),
            description: input.description.or(prior.description),
            region: input.region.or(prior.region),
            address: input.address.or(prior.address),
            phone: input.phone.or(prior.phone),
            website: input.website.or(prior.website),
            rating: input.rating.or(prior.rating),
            dishes: input.dishes.unwrap_or(prior.dishes),
            updated_at: Utc::now(),
            ..prior
        };

        debug!("Updated vendor {id}");
        self.vendors.put(id.to_string(), updated.clone());

        Ok(Some(updated))
    }

    pub fn delete(&self, id: &str) -> bool {
        let mut stripped = 0;

        for dish_id in self.dish_vendors.keys() {
            self.dish_vendors.update(&dish_id, &mut |current| {
                let mut associations = current?;
                let before = associations.len();
                associations.retain(|association| association.vendor_id != id);
                stripped += before - associations.len();

                (!associations.is_empty()).then_some(associations)
            });
        }

        if stripped > 0 {
            info!("Removed {stripped} dish associations of vendor {id}");
        }

        self.vendors.delete(id)
    }

    /// Links a dish to a vendor. Re-linking an existing pair stores nothing and returns the
    /// association that would have been stored.
    pub fn create_dish_vendor(&self, input: CreateDishVendor) -> CatalogResult<DishVendor> {
        require("dishId", &input.dish_id)?;
        require("vendorId", &input.vendor_id)?;

        let (dish, vendor) = (self.dishes.dish(&input.dish_id), self.get(&input.vendor_id));
        if dish.is_none() {
            return Err(CatalogError::not_found("Dish", input.dish_id));
        }
        let Some(vendor) = vendor else {
            return Err(CatalogError::not_found("Vendor", input.vendor_id));
        };

        let association = DishVendor {
            dish_id: input.dish_id,
            vendor_id: input.vendor_id,
            vendor_name: vendor.name,
            price: input.price,
            currency: input.currency,
            availability: input.availability.unwrap_or(true),
            notes: input.notes,
        };

        let mut linked = false;
        self.dish_vendors.update(&association.dish_id, &mut |current| {
            let mut existing = current.unwrap_or_default();
            if !existing.iter().any(|dv| dv.vendor_id == association.vendor_id) {
                existing.push(association.clone());
                linked = true;
            }
            Some(existing)
        });

        if !linked {
            debug!(
                "Dish {} already linked to vendor {}",
                association.dish_id, association.vendor_id
            );
        }

        Ok(association)
    }

    pub fn dish_vendors(&self, dish_id: &str) -> Vec<DishVendor> {
        self.dish_vendors.get(dish_id).unwrap_or_default()
    }

    /// Returns whether an association was removed.
    pub fn delete_dish_vendor(&self, dish_id: &str, vendor_id: &str) -> bool {
        let mut removed = false;
        self.dish_vendors.update(dish_id, &mut |current| {
            let mut associations = current?;
            let before = associations.len();
            associations.retain(|association| association.vendor_id != vendor_id);
            removed = associations.len() < before;

            (!associations.is_empty()).then_some(associations)
        });

        removed
    }
}

impl VendorLookup for VendorStore {
    fn vendors_for_dish(&self, dish_id: &str) -> Vec<Vendor> {
        self.by_dish(dish_id)
    }
}

//! The immutable restaurant catalog.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A restaurant record from the catalog file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    /// Unique id, stable for the lifetime of the process.
    pub id: u32,
    pub name: String,
    pub cuisine: String,
    pub location: String,
    /// Maximum party size the restaurant can seat.
    pub capacity: u32,
    /// Rating in `[0.0, 5.0]`.
    pub rating: f64,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Read-only collection of restaurants, in catalog-file order.
#[derive(Debug, Clone)]
pub struct Catalog {
    restaurants: Vec<Restaurant>,
}

impl Catalog {
    /// Load the catalog from a JSON file containing an array of restaurants.
    ///
    /// Called once at startup; an unreadable or malformed file is fatal and
    /// propagates to the caller.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let restaurants: Vec<Restaurant> = serde_json::from_str(&content)?;
        Ok(Self { restaurants })
    }

    /// Build a catalog from records already in memory.
    pub fn from_restaurants(restaurants: Vec<Restaurant>) -> Self {
        Self { restaurants }
    }

    /// Look up a restaurant by id.
    pub fn get(&self, id: u32) -> Option<&Restaurant> {
        self.restaurants.iter().find(|r| r.id == id)
    }

    /// Iterate restaurants in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Restaurant> {
        self.restaurants.iter()
    }

    pub fn len(&self) -> usize {
        self.restaurants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.restaurants.is_empty()
    }
}

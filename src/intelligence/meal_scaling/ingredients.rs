// ABOUTME: Ingredient lookup seam between the scaling engine and nutrition storage
// ABOUTME: IngredientLookup trait plus an in-memory database loadable from JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;

use pierre_meal_core::errors::{AppError, AppResult};
use pierre_meal_core::models::Ingredient;
use serde_json::json;

/// Read access to ingredient nutrition data
///
/// A missing ingredient is not an error: the engine drops it and records the
/// omission in the audit trail.
pub trait IngredientLookup: Send + Sync {
    /// Find an ingredient by its identifier
    fn get_ingredient_by_id(&self, id: &str) -> Option<Ingredient>;
}

impl IngredientLookup for HashMap<String, Ingredient> {
    fn get_ingredient_by_id(&self, id: &str) -> Option<Ingredient> {
        self.get(id).cloned()
    }
}

impl<T: IngredientLookup + ?Sized> IngredientLookup for &T {
    fn get_ingredient_by_id(&self, id: &str) -> Option<Ingredient> {
        (**self).get_ingredient_by_id(id)
    }
}

/// Ingredient database held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryIngredientDb {
    ingredients: HashMap<String, Ingredient>,
}

impl InMemoryIngredientDb {
    /// Create an empty database
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a database from ingredients, rejecting duplicate ids
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_ALREADY_EXISTS` when two ingredients share an id
    pub fn from_ingredients(ingredients: impl IntoIterator<Item = Ingredient>) -> AppResult<Self> {
        let mut db = Self::new();
        for ingredient in ingredients {
            db.insert(ingredient)?;
        }
        Ok(db)
    }

    /// Parse a JSON array of ingredients
    ///
    /// # Errors
    ///
    /// Returns a serialization error for malformed JSON, or a validation error
    /// for duplicate ids and negative nutrition values
    pub fn from_json(json: &str) -> AppResult<Self> {
        let ingredients: Vec<Ingredient> = serde_json::from_str(json)?;
        Self::from_ingredients(ingredients)
    }

    /// Register one ingredient
    ///
    /// # Errors
    ///
    /// Returns an error if the id is already registered or nutrition facts are negative
    pub fn insert(&mut self, ingredient: Ingredient) -> AppResult<()> {
        let facts = ingredient.per_100g;
        if [facts.calories, facts.protein, facts.carbs, facts.fat]
            .iter()
            .any(|value| !value.is_finite() || *value < 0.0)
        {
            return Err(AppError::invalid_input(format!(
                "Ingredient {} has invalid nutrition values",
                ingredient.id
            ))
            .with_details(json!({ "per_100g": facts }))
            .with_resource_id(ingredient.id));
        }
        if self.ingredients.contains_key(&ingredient.id) {
            return Err(
                AppError::already_exists(format!("Ingredient {}", ingredient.id))
                    .with_resource_id(ingredient.id),
            );
        }
        self.ingredients.insert(ingredient.id.clone(), ingredient);
        Ok(())
    }

    /// Number of registered ingredients
    #[must_use]
    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    /// Whether the database is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }
}

impl IngredientLookup for InMemoryIngredientDb {
    fn get_ingredient_by_id(&self, id: &str) -> Option<Ingredient> {
        self.ingredients.get(id).cloned()
    }
}

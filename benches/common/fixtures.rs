// ABOUTME: Benchmark fixtures generating deterministic pantries, recipes, and macro targets
// ABOUTME: Provides reproducible inputs sized for single-recipe and batch scaling measurements
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Benchmark fixtures for meal scaling.
//!
//! Everything is derived from the index so runs are reproducible.

use pierre_meal_scaler::intelligence::meal_scaling::{InMemoryIngredientDb, ScalingRequest};
use pierre_meal_scaler::models::{
    DailyContext, Ingredient, IngredientCategory, MacroTargets, MacroValues, RecipeIngredient,
};

/// Predefined recipe sizes for benchmark scenarios
#[derive(Debug, Clone, Copy)]
pub enum RecipeSize {
    /// Three ingredients
    Simple,
    /// Six ingredients
    Medium,
    /// Twelve ingredients
    Complex,
}

impl RecipeSize {
    pub const ALL: [Self; 3] = [Self::Simple, Self::Medium, Self::Complex];

    #[must_use]
    pub const fn count(self) -> usize {
        match self {
            Self::Simple => 3,
            Self::Medium => 6,
            Self::Complex => 12,
        }
    }
}

/// Nutrition facts per 100 g for the benchmark pantry
const PANTRY: [(&str, IngredientCategory, f64, f64, f64, f64); 12] = [
    ("pollo", IngredientCategory::Protein, 165.0, 31.0, 0.0, 3.6),
    ("arroz", IngredientCategory::Starch, 360.0, 7.0, 79.0, 0.6),
    ("aceite", IngredientCategory::Fat, 884.0, 0.0, 0.0, 100.0),
    ("brocoli", IngredientCategory::Vegetable, 34.0, 2.8, 7.0, 0.4),
    ("garbanzos", IngredientCategory::Legume, 164.0, 8.9, 27.0, 2.6),
    ("salsa_soja", IngredientCategory::Condiment, 53.0, 8.0, 4.9, 0.6),
    ("yogur", IngredientCategory::Dairy, 59.0, 10.0, 3.6, 0.4),
    ("platano", IngredientCategory::Fruit, 89.0, 1.1, 23.0, 0.3),
    ("miel", IngredientCategory::Sweetener, 304.0, 0.3, 82.0, 0.0),
    ("almendras", IngredientCategory::NutSeed, 579.0, 21.0, 22.0, 50.0),
    ("salmon", IngredientCategory::Protein, 208.0, 20.0, 0.0, 13.0),
    ("patata", IngredientCategory::Starch, 77.0, 2.0, 17.0, 0.1),
];

/// Gram amounts that keep every recipe plausible
const AMOUNTS: [f64; 12] = [
    130.0, 70.0, 8.0, 120.0, 90.0, 12.0, 125.0, 100.0, 15.0, 20.0, 110.0, 150.0,
];

/// Database holding the benchmark pantry
///
/// # Panics
///
/// Never in practice: pantry ids are unique and values non-negative
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn pantry() -> InMemoryIngredientDb {
    InMemoryIngredientDb::from_ingredients(PANTRY.iter().map(
        |&(id, category, calories, protein, carbs, fat)| {
            Ingredient::new(
                id,
                id,
                category,
                MacroValues::new(calories, protein, carbs, fat),
            )
        },
    ))
    .unwrap()
}

/// Recipe with the requested number of ingredients
#[must_use]
pub fn recipe(size: RecipeSize) -> Vec<RecipeIngredient> {
    PANTRY
        .iter()
        .zip(AMOUNTS)
        .take(size.count())
        .map(|(entry, amount)| RecipeIngredient::new(entry.0, amount))
        .collect()
}

/// Current macros of a recipe against the pantry
#[must_use]
pub fn recipe_macros(recipe: &[RecipeIngredient]) -> MacroValues {
    PANTRY
        .iter()
        .filter_map(|&(id, _, calories, protein, carbs, fat)| {
            recipe
                .iter()
                .find(|line| line.ingredient_id == id)
                .map(|line| {
                    MacroValues::new(calories, protein, carbs, fat).scaled(line.amount_grams / 100.0)
                })
        })
        .fold(MacroValues::zero(), |total, macros| total + macros)
}

/// Target that moves every macro by its own multiplier
#[must_use]
pub fn target_for(
    recipe: &[RecipeIngredient],
    calories: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
) -> MacroTargets {
    let current = recipe_macros(recipe);
    MacroValues::new(
        current.calories * calories,
        current.protein * protein,
        current.carbs * carbs,
        current.fat * fat,
    )
}

/// Independent requests mixing sizes, targets and meal positions
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
#[must_use]
pub fn batch_requests(count: usize) -> Vec<ScalingRequest> {
    (0..count)
        .map(|index| {
            let recipe = recipe(RecipeSize::ALL[index % RecipeSize::ALL.len()]);
            let shift = ((index * 7) % 40) as f64 / 100.0;
            let target = target_for(
                &recipe,
                0.8 + shift,
                1.0 + shift / 2.0,
                0.9 + shift,
                1.0 - shift / 2.0,
            );
            let meals_per_day = 3;
            let meal_position = (index % 3) as u8 + 1;
            ScalingRequest {
                recipe,
                target,
                context: DailyContext::for_meal(meal_position, meals_per_day),
            }
        })
        .collect()
}

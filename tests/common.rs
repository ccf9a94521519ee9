// ABOUTME: Shared test utilities and fixtures for meal scaling integration tests
// ABOUTME: Provides quiet test logging, a reference ingredient database, and sample recipes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `pierre_meal_scaler`
//!
//! Nutrition values are per 100 g and rounded from common food tables.

use std::env;
use std::sync::Once;

use pierre_meal_scaler::config::scaling::ClassificationConfig;
use pierre_meal_scaler::intelligence::meal_scaling::{
    InMemoryIngredientDb, IngredientClassification, IngredientClassifier,
};
use pierre_meal_scaler::models::{
    Ingredient, IngredientCategory, MacroTargets, MacroValues, RecipeIngredient,
};
use tracing::Level;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => Level::TRACE,
            Ok("DEBUG") => Level::DEBUG,
            Ok("INFO") => Level::INFO,
            _ => Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

fn ingredient(
    id: &str,
    name: &str,
    category: IngredientCategory,
    facts: (f64, f64, f64, f64),
) -> Ingredient {
    Ingredient::new(
        id,
        name,
        category,
        MacroValues::new(facts.0, facts.1, facts.2, facts.3),
    )
}

/// Reference ingredients used across the test suite
pub fn reference_ingredients() -> Vec<Ingredient> {
    use IngredientCategory::{
        Condiment, Dairy, Fat, Fruit, Legume, NutSeed, Other, Protein, Starch, Sweetener,
        Vegetable,
    };

    vec![
        ingredient("pollo", "Pechuga de pollo", Protein, (165.0, 31.0, 0.0, 3.6)),
        ingredient("arroz", "Arroz blanco", Starch, (360.0, 7.0, 79.0, 0.6)),
        ingredient("aceite", "Aceite de oliva", Fat, (884.0, 0.0, 0.0, 100.0)),
        ingredient("brocoli", "Brocoli", Vegetable, (34.0, 2.8, 7.0, 0.4)),
        ingredient("garbanzos", "Garbanzos cocidos", Legume, (164.0, 8.9, 27.0, 2.6)),
        ingredient("salsa_soja", "Salsa de soja", Condiment, (53.0, 8.0, 4.9, 0.6)),
        ingredient("yogur", "Yogur natural", Dairy, (59.0, 10.0, 3.6, 0.4)),
        ingredient("platano", "Platano", Fruit, (89.0, 1.1, 23.0, 0.3)),
        ingredient("miel", "Miel", Sweetener, (304.0, 0.3, 82.0, 0.0)),
        ingredient("almendras", "Almendras", NutSeed, (579.0, 21.0, 22.0, 50.0)),
        ingredient("avena", "Copos de avena", Starch, (389.0, 16.9, 66.0, 6.9)),
        ingredient("pasta", "Pasta seca", Starch, (371.0, 13.0, 75.0, 1.5)),
        ingredient("coco_rallado", "Coco rallado", Other, (660.0, 6.9, 24.0, 64.5)),
        ingredient("agua", "Agua", Other, (0.0, 0.0, 0.0, 0.0)),
    ]
}

/// In-memory database holding the reference ingredients
pub fn ingredient_db() -> InMemoryIngredientDb {
    InMemoryIngredientDb::from_ingredients(reference_ingredients()).unwrap()
}

/// Chicken, rice and olive oil: two anchors and one fine-tuning ingredient
///
/// Totals: 425.2 kcal, 35.2 g protein, 47.4 g carbs, 8.96 g fat
pub fn pollo_arroz_aceite() -> Vec<RecipeIngredient> {
    vec![
        RecipeIngredient::new("pollo", 100.0),
        RecipeIngredient::new("arroz", 60.0),
        RecipeIngredient::new("aceite", 5.0),
    ]
}

/// Six-ingredient bowl with plenty of flexible mass
///
/// Structural: pollo, arroz. Primary: brocoli, garbanzos. Secondary: aceite, salsa_soja.
pub fn power_bowl() -> Vec<RecipeIngredient> {
    vec![
        RecipeIngredient::new("pollo", 120.0),
        RecipeIngredient::new("arroz", 50.0),
        RecipeIngredient::new("brocoli", 150.0),
        RecipeIngredient::new("garbanzos", 80.0),
        RecipeIngredient::new("aceite", 10.0),
        RecipeIngredient::new("salsa_soja", 15.0),
    ]
}

/// Snack without any core ingredient or dominant calorie share
pub fn yogur_platano_miel() -> Vec<RecipeIngredient> {
    vec![
        RecipeIngredient::new("yogur", 150.0),
        RecipeIngredient::new("platano", 100.0),
        RecipeIngredient::new("miel", 15.0),
    ]
}

/// Protein-dominant plate with a large flexible share
///
/// Structural: pollo. Primary: yogur, brocoli (43% of calories).
pub fn pollo_yogur_brocoli() -> Vec<RecipeIngredient> {
    vec![
        RecipeIngredient::new("pollo", 150.0),
        RecipeIngredient::new("yogur", 200.0),
        RecipeIngredient::new("brocoli", 200.0),
    ]
}

/// Classify a recipe with default rules against the reference database
pub fn classify(recipe: &[RecipeIngredient]) -> IngredientClassification {
    let config = ClassificationConfig::default();
    IngredientClassifier::new(&config).classify(recipe, &ingredient_db())
}

/// Current macros of a recipe
pub fn recipe_macros(recipe: &[RecipeIngredient]) -> MacroValues {
    classify(recipe).metadata().total_macros
}

/// Target built by multiplying each of the recipe's current macros
pub fn scaled_target(
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

/// Assert two floats are equal within `tolerance`
pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} (+/- {tolerance}), got {actual}"
    );
}

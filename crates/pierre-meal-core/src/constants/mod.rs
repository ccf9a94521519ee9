// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Energy conversion factors, scaling limits, and service identifiers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped by domain. Tunable thresholds live in the engine's
//! configuration layer; only physical facts and hard invariants belong here.

/// Atwater energy conversion factors
pub mod energy {
    /// Kilocalories per gram of protein
    pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
    /// Kilocalories per gram of carbohydrate
    pub const KCAL_PER_GRAM_CARBS: f64 = 4.0;
    /// Kilocalories per gram of fat
    pub const KCAL_PER_GRAM_FAT: f64 = 9.0;
    /// Nutrition references are expressed per this many grams
    pub const REFERENCE_PORTION_GRAMS: f64 = 100.0;
}

/// Hard limits of the scaling engine
pub mod scaling {
    /// Smallest amount any ingredient may be scaled down to (grams)
    pub const MIN_INGREDIENT_GRAMS: f64 = 0.1;
    /// Maximum number of ingredients that may anchor a recipe
    pub const MAX_STRUCTURAL_INGREDIENTS: usize = 3;
    /// Values below this are treated as zero in divisions
    pub const EPSILON: f64 = 1e-9;
    /// Amount changes below this many grams do not count as adjustments
    pub const ADJUSTMENT_TOLERANCE_GRAMS: f64 = 1e-6;
    /// Recipes with at most this many ingredients are `simple`
    pub const SIMPLE_RECIPE_MAX_INGREDIENTS: usize = 3;
    /// Recipes with at most this many ingredients are `medium`
    pub const MEDIUM_RECIPE_MAX_INGREDIENTS: usize = 6;
}

/// Service identifiers for structured logging
pub mod service_names {
    /// Service name reported by the logging layer
    pub const PIERRE_MEAL_SCALER: &str = "pierre-meal-scaler";
}

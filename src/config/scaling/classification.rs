// ABOUTME: Ingredient classification configuration for the meal scaling engine
// ABOUTME: Configures structural calorie share, anchor count, and fine-tuning density rules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_meal_core::constants::scaling::MAX_STRUCTURAL_INGREDIENTS;
use serde::{Deserialize, Serialize};

/// Rules used to assign a role to every recipe ingredient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationConfig {
    /// Calorie share above which an ingredient anchors the recipe (0.35-0.50)
    pub structural_calorie_share: f64,
    /// Maximum number of structural anchors (at most 3)
    pub max_structural: usize,
    /// Energy density (kcal/g) at which a small ingredient becomes a fine-tuning target
    pub secondary_min_kcal_per_gram: f64,
    /// Amount (g) at or below which a dense ingredient counts as low-mass
    pub secondary_max_grams: f64,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            structural_calorie_share: 0.40,
            max_structural: MAX_STRUCTURAL_INGREDIENTS,
            secondary_min_kcal_per_gram: 6.0,
            secondary_max_grams: 30.0,
        }
    }
}

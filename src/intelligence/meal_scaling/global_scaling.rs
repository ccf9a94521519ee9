// ABOUTME: Layer 1 of the meal scaling engine, one common factor for every ingredient
// ABOUTME: Keeps recipe proportions exactly while matching the priority macro
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_meal_core::constants::scaling::{EPSILON, MIN_INGREDIENT_GRAMS};
use pierre_meal_core::models::{MacroKind, MacroTargets};
use tracing::{debug, warn};

use super::classifier::IngredientClassification;
use super::result::{LayerResult, ScalingMethod};
use super::scoring;
use crate::config::scaling::GlobalScalingConfig;

/// Scales every ingredient by `target[priority] / current[priority]`
pub struct GlobalScaler<'a> {
    config: &'a GlobalScalingConfig,
}

impl<'a> GlobalScaler<'a> {
    /// Create a scaler with the given factor limits
    #[must_use]
    pub const fn new(config: &'a GlobalScalingConfig) -> Self {
        Self { config }
    }

    /// Unclamped factor matching `current` to `target`; 1.0 when `current` is zero
    #[must_use]
    pub fn raw_factor(current: f64, target: f64) -> f64 {
        if current.abs() <= EPSILON {
            1.0
        } else {
            target / current
        }
    }

    /// Scale the recipe toward the target
    #[must_use]
    pub fn scale(
        &self,
        classification: &IngredientClassification,
        target: &MacroTargets,
        priority: MacroKind,
    ) -> LayerResult {
        let current = classification.metadata().total_macros;
        let raw_factor = Self::raw_factor(current.get(priority), target.get(priority));
        let factor = raw_factor.clamp(self.config.min_factor, self.config.max_factor);

        let mut notes = Vec::new();
        if (factor - raw_factor).abs() > EPSILON {
            warn!(
                raw_factor,
                factor,
                min_factor = self.config.min_factor,
                max_factor = self.config.max_factor,
                "Extreme global scale factor clamped"
            );
            notes.push(format!("scale factor {raw_factor:.3} clamped to {factor:.3}"));
        }

        let mut floored = Vec::new();
        let amounts: Vec<f64> = classification
            .ingredients()
            .iter()
            .map(|ingredient| {
                let scaled = ingredient.original_amount * factor;
                if scaled < MIN_INGREDIENT_GRAMS {
                    floored.push(ingredient.ingredient_id.as_str());
                    MIN_INGREDIENT_GRAMS
                } else {
                    scaled
                }
            })
            .collect();
        // the floor breaks exact proportions for these lines
        if !floored.is_empty() {
            debug!(ingredients = ?floored, "Global scaling hit the minimum amount");
            notes.push(format!(
                "{} floored at {MIN_INGREDIENT_GRAMS} g, proportions not exact",
                floored.join(", ")
            ));
        }
        let achieved = classification.macros_for_amounts(&amounts);
        let accuracy = scoring::accuracy(&achieved, target);

        debug!(factor, priority = %priority, accuracy, "Applied global scaling");

        LayerResult {
            method: ScalingMethod::GlobalScaling,
            amounts,
            achieved,
            accuracy,
            preservation: 1.0,
            iterations: 0,
            notes,
        }
    }
}

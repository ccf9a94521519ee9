// ABOUTME: Layer 2 of the meal scaling engine, greedy adjustment of flexible ingredients
// ABOUTME: Structural anchors stay fixed while primary and secondary ingredients close gaps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Hierarchical Adjustment
//!
//! Works on an amount vector indexed like the classification arena. Each
//! iteration tries six moves per flexible ingredient (a quarter, half or all of
//! the remaining room toward its upper and lower bound) and applies the single
//! move that shrinks the macronutrient gap magnitude the most. The loop stops
//! when the gap is below the convergence threshold, when no move helps, or at
//! the iteration cap.

use pierre_meal_core::constants::scaling::{ADJUSTMENT_TOLERANCE_GRAMS, MIN_INGREDIENT_GRAMS};
use pierre_meal_core::models::MacroTargets;
use tracing::debug;

use super::classifier::{IngredientClassification, Role};
use super::result::{LayerResult, ScalingMethod};
use super::scoring;
use crate::config::scaling::HierarchicalConfig;

/// Best move found in one iteration
struct Move {
    index: usize,
    amount: f64,
    magnitude: f64,
}

/// Adjusts flexible ingredients while holding structural ones fixed
pub struct HierarchicalAdjuster<'a> {
    config: &'a HierarchicalConfig,
}

impl<'a> HierarchicalAdjuster<'a> {
    /// Create an adjuster with the given bounds and iteration limits
    #[must_use]
    pub const fn new(config: &'a HierarchicalConfig) -> Self {
        Self { config }
    }

    /// Gram range an ingredient may move within, by role
    #[must_use]
    pub fn bounds(&self, role: Role, original: f64) -> (f64, f64) {
        match role {
            Role::Structural => (original, original),
            Role::FlexiblePrimary => self
                .config
                .primary_bounds
                .gram_range(original, MIN_INGREDIENT_GRAMS),
            Role::FlexibleSecondary => self
                .config
                .secondary_bounds
                .gram_range(original, MIN_INGREDIENT_GRAMS),
        }
    }

    /// Adjust the recipe toward the target
    #[must_use]
    pub fn adjust(
        &self,
        classification: &IngredientClassification,
        target: &MacroTargets,
    ) -> LayerResult {
        let ingredients = classification.ingredients();
        let mut amounts = classification.original_amounts();
        let bounds: Vec<(f64, f64)> = ingredients
            .iter()
            .map(|ingredient| self.bounds(ingredient.role, ingredient.original_amount))
            .collect();
        let flexible: Vec<usize> = classification
            .indices(Role::FlexiblePrimary)
            .iter()
            .chain(classification.indices(Role::FlexibleSecondary))
            .copied()
            .collect();

        let mut achieved = classification.macros_for_amounts(&amounts);
        let mut magnitude = scoring::gap_magnitude(&achieved, target);
        let mut iterations = 0;
        let mut notes = Vec::new();

        if flexible.is_empty() {
            notes.push("no flexible ingredients to adjust".to_owned());
        }

        while iterations < self.config.max_iterations {
            if magnitude < self.config.convergence_threshold {
                break;
            }

            let mut best: Option<Move> = None;
            for &index in &flexible {
                let ingredient = &ingredients[index];
                let current_amount = amounts[index];
                let (lower, upper) = bounds[index];
                let without = achieved.saturating_sub(&ingredient.macros_at(current_amount));

                for &fraction in &self.config.step_fractions {
                    for candidate in [
                        current_amount + (upper - current_amount) * fraction,
                        current_amount - (current_amount - lower) * fraction,
                    ] {
                        if (candidate - current_amount).abs() < ADJUSTMENT_TOLERANCE_GRAMS {
                            continue;
                        }
                        let totals = without + ingredient.macros_at(candidate);
                        let candidate_magnitude = scoring::gap_magnitude(&totals, target);
                        let improves =
                            candidate_magnitude < magnitude - self.config.min_improvement;
                        if improves
                            && best
                                .as_ref()
                                .is_none_or(|found| candidate_magnitude < found.magnitude)
                        {
                            best = Some(Move {
                                index,
                                amount: candidate,
                                magnitude: candidate_magnitude,
                            });
                        }
                    }
                }
            }

            let Some(step) = best else {
                notes.push(format!(
                    "stopped after {iterations} iterations: no adjustment reduces the gap"
                ));
                break;
            };
            amounts[step.index] = step.amount;
            achieved = classification.macros_for_amounts(&amounts);
            magnitude = scoring::gap_magnitude(&achieved, target);
            iterations += 1;
        }

        let accuracy = scoring::accuracy(&achieved, target);
        let preservation = scoring::structural_preservation(
            classification,
            &amounts,
            self.config.structural_penalty_weight,
            self.config.preservation_floor,
        );

        debug!(
            iterations,
            gap_magnitude = magnitude,
            accuracy,
            preservation,
            "Completed hierarchical adjustment"
        );

        LayerResult {
            method: ScalingMethod::HierarchicalAdjustment,
            amounts,
            achieved,
            accuracy,
            preservation,
            iterations,
            notes,
        }
    }
}

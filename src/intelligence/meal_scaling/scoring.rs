// ABOUTME: Shared scoring functions for every scaling layer
// ABOUTME: Relative errors, gap magnitude, accuracy, and structural preservation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_meal_core::constants::scaling::EPSILON;
use pierre_meal_core::models::{MacroGaps, MacroKind, MacroTargets, MacroValues};

use super::classifier::{IngredientClassification, Role};

/// Signed gaps `target - current`
#[must_use]
pub fn gaps(target: &MacroTargets, current: &MacroValues) -> MacroGaps {
    MacroGaps::from_fn(|kind| target.get(kind) - current.get(kind))
}

/// `|target - current| / target` per macro, zero where the target is zero
///
/// A zero target carries no direction to steer toward, so it never drives the
/// priority macro. [`accuracy`] still scores any non-zero result against it as
/// a complete miss.
#[must_use]
pub fn relative_gaps(target: &MacroTargets, current: &MacroValues) -> MacroGaps {
    MacroGaps::from_fn(|kind| {
        let goal = target.get(kind);
        if goal <= EPSILON {
            0.0
        } else {
            (goal - current.get(kind)).abs() / goal
        }
    })
}

/// Relative error of one achieved value
///
/// A zero target is met exactly by a zero result and missed completely otherwise.
#[must_use]
pub fn relative_error(achieved: f64, target: f64) -> f64 {
    if target.abs() <= EPSILON {
        if achieved.abs() <= EPSILON {
            0.0
        } else {
            1.0
        }
    } else {
        (achieved - target).abs() / target
    }
}

/// `1 - max relative error` over all four macros, clamped to [0, 1]
#[must_use]
pub fn accuracy(achieved: &MacroValues, target: &MacroTargets) -> f64 {
    let worst = MacroKind::ALL
        .iter()
        .map(|&kind| relative_error(achieved.get(kind), target.get(kind)))
        .fold(0.0_f64, f64::max);
    (1.0 - worst).clamp(0.0, 1.0)
}

/// Euclidean norm of the protein, carbohydrate and fat relative errors
///
/// Calories are left out: they follow from the macronutrients.
#[must_use]
pub fn gap_magnitude(achieved: &MacroValues, target: &MacroTargets) -> f64 {
    MacroKind::MACRONUTRIENTS
        .iter()
        .map(|&kind| relative_error(achieved.get(kind), target.get(kind)).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// How well structural proportions survived, in [floor, 1]
///
/// `1 - penalty_weight * mean |new / original - 1|` over structural ingredients.
#[must_use]
pub fn structural_preservation(
    classification: &IngredientClassification,
    amounts: &[f64],
    penalty_weight: f64,
    floor: f64,
) -> f64 {
    let structural = classification.indices(Role::Structural);
    if structural.is_empty() {
        return 1.0;
    }

    let ingredients = classification.ingredients();
    let total_change: f64 = structural
        .iter()
        .filter_map(|&idx| {
            let original = ingredients.get(idx)?.original_amount;
            let new_amount = *amounts.get(idx)?;
            (original > EPSILON).then(|| (new_amount / original - 1.0).abs())
        })
        .sum();
    #[allow(clippy::cast_precision_loss)]
    let mean_change = total_change / structural.len() as f64;

    (1.0 - penalty_weight * mean_change).clamp(floor.clamp(0.0, 1.0), 1.0)
}

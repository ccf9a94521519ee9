// ABOUTME: Solver layer configuration for global, hierarchical, and LP scaling
// ABOUTME: Factor clamps, adjustment bounds, iteration caps, objective weights, escalation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_meal_core::models::MacroKind;
use serde::{Deserialize, Serialize};

/// Layer 1: one common factor for every ingredient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalScalingConfig {
    /// Smallest allowed factor
    pub min_factor: f64,
    /// Largest allowed factor
    pub max_factor: f64,
    /// Accuracy below which the orchestrator escalates
    pub accuracy_target: f64,
}

impl Default for GlobalScalingConfig {
    fn default() -> Self {
        Self {
            min_factor: 0.5,
            max_factor: 3.0,
            accuracy_target: 0.90,
        }
    }
}

/// Upper and lower movement allowed for one flexible role, as fractions of the original amount
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AdjustmentBounds {
    /// Maximum increase (1.0 = +100%)
    pub max_increase: f64,
    /// Maximum decrease (0.5 = -50%)
    pub max_decrease: f64,
}

impl AdjustmentBounds {
    /// Lower and upper gram bounds for an ingredient with the given original amount
    #[must_use]
    pub fn gram_range(&self, original: f64, floor: f64) -> (f64, f64) {
        let lower = (original * (1.0 - self.max_decrease)).max(floor);
        let upper = (original * (1.0 + self.max_increase)).max(lower);
        (lower, upper)
    }
}

/// Layer 2: greedy adjustment of flexible ingredients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchicalConfig {
    /// Iteration cap
    pub max_iterations: u32,
    /// Stop once the macronutrient gap magnitude drops below this
    pub convergence_threshold: f64,
    /// Bounds for primary flexible ingredients
    pub primary_bounds: AdjustmentBounds,
    /// Bounds for secondary flexible ingredients
    pub secondary_bounds: AdjustmentBounds,
    /// Fractions of the remaining room tried in each direction
    pub step_fractions: Vec<f64>,
    /// Smallest gap reduction that counts as an improvement
    pub min_improvement: f64,
    /// Preservation penalty per unit of mean structural change
    pub structural_penalty_weight: f64,
    /// Preservation never reported below this
    pub preservation_floor: f64,
    /// Accuracy below which the orchestrator escalates
    pub accuracy_target: f64,
}

impl Default for HierarchicalConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            convergence_threshold: 0.05,
            primary_bounds: AdjustmentBounds {
                max_increase: 1.0,
                max_decrease: 0.5,
            },
            secondary_bounds: AdjustmentBounds {
                max_increase: 2.0,
                max_decrease: 0.8,
            },
            step_fractions: vec![0.25, 0.5, 1.0],
            min_improvement: 1e-6,
            structural_penalty_weight: 2.0,
            preservation_floor: 0.70,
            accuracy_target: 0.93,
        }
    }
}

/// Layer 3: bounded linear program
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LpConfig {
    /// Maximum relative deviation of structural ingredients (0.05 = 5%)
    pub structural_max_deviation: f64,
    /// Objective weight of the calorie error
    pub calorie_weight: f64,
    /// Objective weight of the protein error
    pub protein_weight: f64,
    /// Objective weight of the carbohydrate error
    pub carbs_weight: f64,
    /// Objective weight of the fat error
    pub fat_weight: f64,
    /// Extra multiplier on the strategy's priority macro
    pub priority_weight_multiplier: f64,
    /// Accuracy below which the orchestrator keeps the best earlier attempt
    pub accuracy_target: f64,
}

impl LpConfig {
    /// Objective weight configured for a macro
    #[must_use]
    pub const fn weight(&self, kind: MacroKind) -> f64 {
        match kind {
            MacroKind::Calories => self.calorie_weight,
            MacroKind::Protein => self.protein_weight,
            MacroKind::Carbs => self.carbs_weight,
            MacroKind::Fat => self.fat_weight,
        }
    }
}

impl Default for LpConfig {
    fn default() -> Self {
        Self {
            structural_max_deviation: 0.05,
            calorie_weight: 1.0,
            protein_weight: 1.0,
            carbs_weight: 1.0,
            fat_weight: 1.0,
            priority_weight_multiplier: 2.0,
            accuracy_target: 0.98,
        }
    }
}

/// Orchestrator behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Run the next, more aggressive layer when a layer misses its accuracy target
    pub escalate_on_shortfall: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            escalate_on_shortfall: true,
        }
    }
}

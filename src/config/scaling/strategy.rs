// ABOUTME: Strategy decision configuration for choosing a scaling approach
// ABOUTME: Compatibility penalty factors, approach thresholds, and preservation levels
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// Strategy decider configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Multipliers applied to the compatibility score
    pub compatibility: CompatibilityConfig,
    /// Thresholds of the approach decision tree
    pub selection: ApproachSelectionConfig,
    /// Preservation level bases and nudges
    pub preservation: PreservationConfig,
}

/// Compatibility score factors
///
/// The score starts at 1.0 and is multiplied by every factor whose condition
/// holds; values above 1.0 are bonuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityConfig {
    /// Structural calorie ratio above which the recipe is considered rigid
    pub high_structural_ratio: f64,
    /// Factor for rigid recipes
    pub high_structural_factor: f64,
    /// Flexible calorie ratio below which there is little room to adjust
    pub low_flexible_ratio: f64,
    /// Factor for recipes with little flexible mass
    pub low_flexible_factor: f64,
    /// Flexible calorie ratio above which adjustment is easy
    pub high_flexible_ratio: f64,
    /// Bonus for recipes with plenty of flexible mass
    pub high_flexible_bonus: f64,
    /// Relative gap above which a macro counts as far from target
    pub large_gap_threshold: f64,
    /// Factor when more than two macros are far from target
    pub many_large_gaps_factor: f64,
    /// Bonus when exactly one macro is far from target
    pub single_large_gap_bonus: f64,
    /// Relative gap above which a macro's direction is considered
    pub direction_gap_threshold: f64,
    /// Factor when some macros must rise while others must fall
    pub conflicting_directions_factor: f64,
    /// Upper bound on the final score when macros pull in opposite directions
    pub conflicting_directions_ceiling: f64,
    /// Factor when the recipe's dominant macro differs from the priority macro
    pub dominant_mismatch_factor: f64,
    /// Factor for simple recipes (three ingredients or fewer)
    pub simple_complexity_factor: f64,
    /// Factor for complex recipes (more than six ingredients)
    pub complex_complexity_factor: f64,
}

impl Default for CompatibilityConfig {
    fn default() -> Self {
        Self {
            high_structural_ratio: 0.80,
            high_structural_factor: 0.90,
            low_flexible_ratio: 0.15,
            low_flexible_factor: 0.85,
            high_flexible_ratio: 0.30,
            high_flexible_bonus: 1.05,
            large_gap_threshold: 0.15,
            many_large_gaps_factor: 0.75,
            single_large_gap_bonus: 1.05,
            direction_gap_threshold: 0.05,
            conflicting_directions_factor: 0.80,
            conflicting_directions_ceiling: 0.69,
            dominant_mismatch_factor: 0.95,
            simple_complexity_factor: 1.10,
            complex_complexity_factor: 0.90,
        }
    }
}

/// Approach decision tree thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproachSelectionConfig {
    /// Largest relative gap that forces the LP layer on the last meal of the day
    pub last_meal_gap_threshold: f64,
    /// Compatibility above which global scaling is chosen
    pub global_scaling_threshold: f64,
    /// Compatibility above which hierarchical adjustment is chosen
    pub hierarchical_threshold: f64,
}

impl Default for ApproachSelectionConfig {
    fn default() -> Self {
        Self {
            last_meal_gap_threshold: 0.05,
            global_scaling_threshold: 0.85,
            hierarchical_threshold: 0.50,
        }
    }
}

/// Preservation level computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreservationConfig {
    /// Base level for global scaling
    pub global_base: f64,
    /// Base level for hierarchical adjustment
    pub hierarchical_base: f64,
    /// Base level for LP optimization
    pub lp_base: f64,
    /// Nudge applied for strict (+) or flexible (-) days
    pub flexibility_adjustment: f64,
    /// Nudge applied at compatibility extremes
    pub compatibility_adjustment: f64,
    /// Compatibility above which the level is nudged up
    pub high_compatibility: f64,
    /// Compatibility below which the level is nudged down
    pub low_compatibility: f64,
    /// Lower clamp
    pub min_level: f64,
    /// Upper clamp
    pub max_level: f64,
}

impl Default for PreservationConfig {
    fn default() -> Self {
        Self {
            global_base: 1.0,
            hierarchical_base: 0.85,
            lp_base: 0.70,
            flexibility_adjustment: 0.10,
            compatibility_adjustment: 0.05,
            high_compatibility: 0.90,
            low_compatibility: 0.30,
            min_level: 0.5,
            max_level: 1.0,
        }
    }
}

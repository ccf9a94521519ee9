// ABOUTME: Strategy decider choosing which scaling layer handles a recipe
// ABOUTME: Computes macro gaps, compatibility score, priority macro, and preservation level
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Strategy Decision
//!
//! The decider is a pure function of the target, the recipe's current macros,
//! its classification and the daily context. It estimates how well a simple
//! method can reach the target (the *compatibility score*) and picks the least
//! invasive layer that is likely to succeed:
//!
//! 1. Last meal of the day with any gap above the tolerance: LP optimization,
//!    since no later meal can compensate.
//! 2. Compatibility above the global threshold: global scaling.
//! 3. Compatibility above the hierarchical threshold: hierarchical adjustment.
//! 4. Otherwise: LP optimization.

use std::fmt;

use pierre_meal_core::models::{
    DailyContext, FlexibilityLevel, MacroGaps, MacroKind, MacroTargets, MacroValues,
};
use serde::Serialize;
use tracing::debug;

use super::classifier::{IngredientClassification, RecipeComplexity, Role};
use super::scoring;
use crate::config::scaling::StrategyConfig;

/// The three scaling layers, from most to least preserving
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Approach {
    /// Layer 1: one common factor
    GlobalScaling,
    /// Layer 2: adjust flexible ingredients only
    HierarchicalAdjustment,
    /// Layer 3: bounded linear program over every ingredient
    LpOptimization,
}

impl Approach {
    /// Stable name used in audit trails
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::GlobalScaling => "global_scaling",
            Self::HierarchicalAdjustment => "hierarchical_adjustment",
            Self::LpOptimization => "lp_optimization",
        }
    }

    /// The next, more aggressive layer
    #[must_use]
    pub const fn next(&self) -> Option<Self> {
        match self {
            Self::GlobalScaling => Some(Self::HierarchicalAdjustment),
            Self::HierarchicalAdjustment => Some(Self::LpOptimization),
            Self::LpOptimization => None,
        }
    }
}

impl fmt::Display for Approach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Facts behind a decision
#[derive(Debug, Clone, Serialize)]
pub struct StrategyMetadata {
    /// `target - current`
    pub gaps: MacroGaps,
    /// `|gap| / target`
    pub relative_gaps: MacroGaps,
    /// Largest relative gap
    pub max_relative_gap: f64,
    /// Heuristic in [0, 1]
    pub compatibility_score: f64,
    /// Human-readable steps that led to the decision
    pub reasoning: Vec<String>,
}

/// Which layer to run and how
#[derive(Debug, Clone, Serialize)]
pub struct StrategyDecision {
    /// Selected layer
    pub approach: Approach,
    /// Macro with the largest relative gap
    pub priority_macro: MacroKind,
    /// Ingredient ids the selected layer may change
    pub adjustable_ingredients: Vec<String>,
    /// Target level of recipe fidelity in [0, 1]
    pub preservation_level: f64,
    /// Supporting facts
    pub metadata: StrategyMetadata,
}

/// Chooses a scaling approach for a classified recipe
pub struct StrategyDecider<'a> {
    config: &'a StrategyConfig,
}

impl<'a> StrategyDecider<'a> {
    /// Create a decider with the given thresholds
    #[must_use]
    pub const fn new(config: &'a StrategyConfig) -> Self {
        Self { config }
    }

    /// Decide how to scale a recipe toward the target
    #[must_use]
    pub fn decide(
        &self,
        target: &MacroTargets,
        current: &MacroValues,
        classification: &IngredientClassification,
        context: &DailyContext,
    ) -> StrategyDecision {
        let gaps = scoring::gaps(target, current);
        let relative_gaps = scoring::relative_gaps(target, current);
        let (priority_macro, max_relative_gap) = relative_gaps.max_entry();

        let mut reasoning = vec![format!(
            "priority macro {priority_macro} with relative gap {:.1}%",
            max_relative_gap * 100.0
        )];

        let compatibility_score = self.compatibility_score(
            &gaps,
            &relative_gaps,
            priority_macro,
            classification,
            &mut reasoning,
        );

        let approach = self.select_approach(
            context,
            max_relative_gap,
            compatibility_score,
            &mut reasoning,
        );
        let adjustable_ingredients = Self::adjustable_ingredients(approach, classification);
        let preservation_level =
            self.preservation_level(approach, compatibility_score, context.flexibility);

        debug!(
            approach = %approach,
            priority_macro = %priority_macro,
            compatibility_score,
            preservation_level,
            max_relative_gap,
            "Selected scaling strategy"
        );

        StrategyDecision {
            approach,
            priority_macro,
            adjustable_ingredients,
            preservation_level,
            metadata: StrategyMetadata {
                gaps,
                relative_gaps,
                max_relative_gap,
                compatibility_score,
                reasoning,
            },
        }
    }

    /// Multiplicative compatibility heuristic, clamped to [0, 1]
    fn compatibility_score(
        &self,
        gaps: &MacroGaps,
        relative_gaps: &MacroGaps,
        priority_macro: MacroKind,
        classification: &IngredientClassification,
        reasoning: &mut Vec<String>,
    ) -> f64 {
        let cfg = &self.config.compatibility;
        let metadata = classification.metadata();
        let mut score = 1.0;

        let structural_ratio = metadata.structural_ratio();
        if structural_ratio > cfg.high_structural_ratio {
            score *= cfg.high_structural_factor;
            reasoning.push(format!(
                "structural ingredients carry {:.0}% of calories",
                structural_ratio * 100.0
            ));
        }

        let flexible_ratio = metadata.flexible_ratio();
        if flexible_ratio < cfg.low_flexible_ratio {
            score *= cfg.low_flexible_factor;
            reasoning.push(format!(
                "little flexible mass ({:.0}% of calories)",
                flexible_ratio * 100.0
            ));
        } else if flexible_ratio > cfg.high_flexible_ratio {
            score *= cfg.high_flexible_bonus;
        }

        let large_gaps = MacroKind::ALL
            .iter()
            .filter(|&&kind| relative_gaps.get(kind) > cfg.large_gap_threshold)
            .count();
        match large_gaps {
            0 | 2 => {}
            1 => score *= cfg.single_large_gap_bonus,
            _ => {
                score *= cfg.many_large_gaps_factor;
                reasoning.push(format!("{large_gaps} macros far from target"));
            }
        }

        let significant = || {
            MacroKind::ALL
                .into_iter()
                .filter(|&kind| relative_gaps.get(kind) > cfg.direction_gap_threshold)
        };
        let needs_increase = significant().any(|kind| gaps.get(kind) > 0.0);
        let needs_decrease = significant().any(|kind| gaps.get(kind) < 0.0);
        let conflicting = needs_increase && needs_decrease;
        if conflicting {
            score *= cfg.conflicting_directions_factor;
            reasoning.push("some macros must rise while others must fall".to_owned());
        }

        if priority_macro != MacroKind::Calories
            && metadata
                .dominant_macro
                .is_some_and(|dominant| dominant != priority_macro)
        {
            score *= cfg.dominant_mismatch_factor;
        }

        match metadata.complexity {
            RecipeComplexity::Simple => score *= cfg.simple_complexity_factor,
            RecipeComplexity::Medium => {}
            RecipeComplexity::Complex => score *= cfg.complex_complexity_factor,
        }

        let mut score = f64::clamp(score, 0.0, 1.0);
        // bonuses must not lift a conflicting target back into global scaling
        if conflicting && score > cfg.conflicting_directions_ceiling {
            score = cfg.conflicting_directions_ceiling;
            reasoning.push("opposing macro directions cap compatibility".to_owned());
        }
        reasoning.push(format!("compatibility score {score:.3}"));
        score
    }

    fn select_approach(
        &self,
        context: &DailyContext,
        max_relative_gap: f64,
        compatibility_score: f64,
        reasoning: &mut Vec<String>,
    ) -> Approach {
        let selection = &self.config.selection;

        if context.is_last_meal && max_relative_gap > selection.last_meal_gap_threshold {
            reasoning.push("last meal of the day: accuracy takes precedence".to_owned());
            return Approach::LpOptimization;
        }
        if compatibility_score > selection.global_scaling_threshold {
            reasoning.push("recipe proportions already fit the target".to_owned());
            Approach::GlobalScaling
        } else if compatibility_score > selection.hierarchical_threshold {
            reasoning.push("flexible ingredients can close the gap".to_owned());
            Approach::HierarchicalAdjustment
        } else {
            reasoning.push("gap needs a full optimization".to_owned());
            Approach::LpOptimization
        }
    }

    fn adjustable_ingredients(
        approach: Approach,
        classification: &IngredientClassification,
    ) -> Vec<String> {
        match approach {
            Approach::GlobalScaling | Approach::LpOptimization => classification
                .ingredients()
                .iter()
                .map(|ingredient| ingredient.ingredient_id.clone())
                .collect(),
            Approach::HierarchicalAdjustment => classification
                .by_role(Role::FlexiblePrimary)
                .chain(classification.by_role(Role::FlexibleSecondary))
                .map(|ingredient| ingredient.ingredient_id.clone())
                .collect(),
        }
    }

    /// Fidelity target for the chosen approach
    #[must_use]
    pub fn preservation_level(
        &self,
        approach: Approach,
        compatibility_score: f64,
        flexibility: FlexibilityLevel,
    ) -> f64 {
        let cfg = &self.config.preservation;
        let mut level = match approach {
            Approach::GlobalScaling => cfg.global_base,
            Approach::HierarchicalAdjustment => cfg.hierarchical_base,
            Approach::LpOptimization => cfg.lp_base,
        };

        match flexibility {
            FlexibilityLevel::Strict => level += cfg.flexibility_adjustment,
            FlexibilityLevel::Normal => {}
            FlexibilityLevel::Flexible => level -= cfg.flexibility_adjustment,
        }

        if compatibility_score > cfg.high_compatibility {
            level += cfg.compatibility_adjustment;
        } else if compatibility_score < cfg.low_compatibility {
            level -= cfg.compatibility_adjustment;
        }

        level.clamp(cfg.min_level, cfg.max_level)
    }
}

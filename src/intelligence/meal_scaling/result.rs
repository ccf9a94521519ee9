// ABOUTME: Result and audit trail types returned by the meal scaling engine
// ABOUTME: ScaledIngredient, ScalingResult, per-layer LayerResult, SolverAttempt history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;

use chrono::{DateTime, Utc};
use pierre_meal_core::constants::scaling::{ADJUSTMENT_TOLERANCE_GRAMS, EPSILON};
use pierre_meal_core::models::{MacroTargets, MacroValues, RecipeIngredient};
use serde::Serialize;
use uuid::Uuid;

use super::classifier::{IngredientClassification, Role};
use super::strategy::{Approach, StrategyDecision};

/// Method that produced a result
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum ScalingMethod {
    /// Layer 1
    #[serde(rename = "global_scaling")]
    GlobalScaling,
    /// Layer 2
    #[serde(rename = "hierarchical_adjustment")]
    HierarchicalAdjustment,
    /// Layer 3
    #[serde(rename = "lp_optimization")]
    LpOptimization,
    /// Nothing could be scaled; amounts returned unchanged
    #[serde(rename = "no-op")]
    NoOp,
}

impl ScalingMethod {
    /// Stable name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::GlobalScaling => "global_scaling",
            Self::HierarchicalAdjustment => "hierarchical_adjustment",
            Self::LpOptimization => "lp_optimization",
            Self::NoOp => "no-op",
        }
    }
}

impl From<Approach> for ScalingMethod {
    fn from(approach: Approach) -> Self {
        match approach {
            Approach::GlobalScaling => Self::GlobalScaling,
            Approach::HierarchicalAdjustment => Self::HierarchicalAdjustment,
            Approach::LpOptimization => Self::LpOptimization,
        }
    }
}

impl fmt::Display for ScalingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of a single layer, indexed like the classification arena
#[derive(Debug, Clone, Serialize)]
pub struct LayerResult {
    /// Layer that produced the amounts
    pub method: ScalingMethod,
    /// New amount per classified ingredient (grams)
    pub amounts: Vec<f64>,
    /// Macros at the new amounts
    pub achieved: MacroValues,
    /// `1 - max relative error`
    pub accuracy: f64,
    /// Fidelity to the original proportions
    pub preservation: f64,
    /// Iterations or solver passes performed
    pub iterations: u32,
    /// Layer-specific remarks for the audit trail
    pub notes: Vec<String>,
}

/// Final amount of one ingredient
#[derive(Debug, Clone, Serialize)]
pub struct ScaledIngredient {
    /// Ingredient identifier
    pub ingredient_id: String,
    /// Ingredient name
    pub name: String,
    /// Role assigned during classification
    pub role: Role,
    /// Amount in the original recipe (grams)
    pub original_amount: f64,
    /// Scaled amount (grams, at least 0.1)
    pub new_amount: f64,
    /// `new_amount - original_amount`
    pub change_grams: f64,
    /// Change relative to the original amount, in percent
    pub change_percent: f64,
    /// Macros at the new amount
    pub macros: MacroValues,
    /// Whether the amount changed
    pub adjusted: bool,
}

/// How an attempt ended
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// Returned to the caller
    Accepted,
    /// Completed but a later or earlier attempt was better
    Superseded,
    /// The layer could not produce amounts
    Failed,
}

/// One layer execution recorded in the audit trail
#[derive(Debug, Clone, Serialize)]
pub struct SolverAttempt {
    /// Layer that ran
    pub method: ScalingMethod,
    /// Accuracy reached (0 for failed attempts)
    pub accuracy: f64,
    /// Preservation reached (0 for failed attempts)
    pub preservation: f64,
    /// Iterations or solver passes
    pub iterations: u32,
    /// Wall-clock time spent in the layer
    pub duration_micros: u64,
    /// Final status
    pub outcome: AttemptOutcome,
    /// Failure reason or fallback remark
    pub detail: Option<String>,
}

/// Everything the engine decided while producing a result
#[derive(Debug, Clone, Serialize)]
pub struct AuditTrail {
    /// Unique id of this scaling run
    pub run_id: Uuid,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Ingredient roles, absent only when classification was skipped
    pub classification: Option<IngredientClassification>,
    /// Strategy decision, absent for degenerate recipes
    pub strategy: Option<StrategyDecision>,
    /// Every layer execution in order
    pub attempts: Vec<SolverAttempt>,
    /// Recoverable problems and fallbacks
    pub notes: Vec<String>,
    /// Wall-clock time of the whole run
    pub total_duration_micros: u64,
}

impl AuditTrail {
    /// Start an empty trail
    #[must_use]
    pub fn new(run_id: Uuid, started_at: DateTime<Utc>) -> Self {
        Self {
            run_id,
            started_at,
            classification: None,
            strategy: None,
            attempts: Vec::new(),
            notes: Vec::new(),
            total_duration_micros: 0,
        }
    }

    /// Record a remark
    pub fn note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    /// The attempt whose result was returned
    #[must_use]
    pub fn accepted_attempt(&self) -> Option<&SolverAttempt> {
        self.attempts
            .iter()
            .find(|attempt| attempt.outcome == AttemptOutcome::Accepted)
    }
}

/// Unified result of a scaling run
#[derive(Debug, Clone, Serialize)]
pub struct ScalingResult {
    /// New amounts in recipe order (dropped ingredients excluded)
    pub scaled_ingredients: Vec<ScaledIngredient>,
    /// Macros of the scaled recipe
    pub achieved: MacroValues,
    /// Requested macros
    pub target: MacroTargets,
    /// `1 - max relative error`, in [0, 1]
    pub accuracy: f64,
    /// Fidelity to the original proportions, in [0, 1]
    pub preservation: f64,
    /// Layer whose result was accepted
    pub method: ScalingMethod,
    /// Decisions and attempts behind the result
    pub audit: AuditTrail,
}

impl ScalingResult {
    /// Look up a scaled ingredient by id
    #[must_use]
    pub fn ingredient(&self, ingredient_id: &str) -> Option<&ScaledIngredient> {
        self.scaled_ingredients
            .iter()
            .find(|scaled| scaled.ingredient_id == ingredient_id)
    }

    /// The scaled recipe as plain recipe lines
    #[must_use]
    pub fn to_recipe(&self) -> Vec<RecipeIngredient> {
        self.scaled_ingredients
            .iter()
            .map(|scaled| RecipeIngredient::new(scaled.ingredient_id.clone(), scaled.new_amount))
            .collect()
    }
}

/// Pair arena amounts with their ingredients
#[must_use]
pub fn scaled_ingredients(
    classification: &IngredientClassification,
    amounts: &[f64],
) -> Vec<ScaledIngredient> {
    classification
        .ingredients()
        .iter()
        .zip(amounts)
        .map(|(ingredient, &new_amount)| {
            let original = ingredient.original_amount;
            let change_grams = new_amount - original;
            let change_percent = if original > EPSILON {
                change_grams / original * 100.0
            } else {
                0.0
            };
            ScaledIngredient {
                ingredient_id: ingredient.ingredient_id.clone(),
                name: ingredient.name.clone(),
                role: ingredient.role,
                original_amount: original,
                new_amount,
                change_grams,
                change_percent,
                macros: ingredient.macros_at(new_amount),
                adjusted: change_grams.abs() > ADJUSTMENT_TOLERANCE_GRAMS,
            }
        })
        .collect()
}

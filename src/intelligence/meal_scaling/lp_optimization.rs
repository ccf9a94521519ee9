// ABOUTME: Layer 3 of the meal scaling engine, bounded linear program over all ingredients
// ABOUTME: Minimizes weighted absolute macro errors with structural amounts held near original
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # LP Optimization
//!
//! Formulation, with `x_i` the grams of ingredient `i` and `a_ik` its content of
//! macro `k` per gram:
//!
//! ```text
//! minimize    sum_k w_k * (e_k+ + e_k-)
//! subject to  sum_i a_ik * x_i - e_k+ + e_k- = target_k    for every macro k
//!             lower_i <= x_i <= upper_i
//!             e_k+, e_k- >= 0
//! ```
//!
//! `w_k` is the configured weight divided by the target (so grams and kcal
//! compare), multiplied again for the priority macro. Structural ingredients
//! may move a few percent; flexible ones use the hierarchical bounds.

use pierre_meal_core::constants::energy::REFERENCE_PORTION_GRAMS;
use pierre_meal_core::constants::scaling::MIN_INGREDIENT_GRAMS;
use pierre_meal_core::models::{MacroKind, MacroTargets};
use tracing::debug;

use super::classifier::{IngredientClassification, Role};
use super::hierarchical::HierarchicalAdjuster;
use super::lp_solver::{LpComparison, LpProblem, LpSolver, SolverError};
use super::result::{LayerResult, ScalingMethod};
use super::scoring;
use crate::config::scaling::{HierarchicalConfig, LpConfig};

/// Bounded LP over every ingredient amount
pub struct LpOptimizer<'a, S: LpSolver + ?Sized> {
    config: &'a LpConfig,
    hierarchical: &'a HierarchicalConfig,
    solver: &'a S,
}

impl<'a, S: LpSolver + ?Sized> LpOptimizer<'a, S> {
    /// Create an optimizer; flexible bounds are shared with the hierarchical layer
    #[must_use]
    pub const fn new(config: &'a LpConfig, hierarchical: &'a HierarchicalConfig, solver: &'a S) -> Self {
        Self {
            config,
            hierarchical,
            solver,
        }
    }

    /// Gram bounds of an ingredient in the LP
    #[must_use]
    pub fn bounds(&self, role: Role, original: f64) -> (f64, f64) {
        match role {
            Role::Structural => {
                let deviation = self.config.structural_max_deviation;
                let lower = (original * (1.0 - deviation)).max(MIN_INGREDIENT_GRAMS);
                (lower, (original * (1.0 + deviation)).max(lower))
            }
            Role::FlexiblePrimary | Role::FlexibleSecondary => {
                HierarchicalAdjuster::new(self.hierarchical).bounds(role, original)
            }
        }
    }

    /// Build the linear program; the first `classification.len()` variables are the amounts
    #[must_use]
    pub fn build_problem(
        &self,
        classification: &IngredientClassification,
        target: &MacroTargets,
        priority: MacroKind,
    ) -> LpProblem {
        let mut problem = LpProblem::new();

        let amount_vars: Vec<usize> = classification
            .ingredients()
            .iter()
            .map(|ingredient| {
                let (lower, upper) = self.bounds(ingredient.role, ingredient.original_amount);
                problem.add_variable(ingredient.ingredient_id.clone(), 0.0, lower, upper)
            })
            .collect();

        for kind in MacroKind::ALL {
            let goal = target.get(kind);
            let mut weight = self.config.weight(kind) / goal.max(1.0);
            if kind == priority {
                weight *= self.config.priority_weight_multiplier;
            }
            let over = problem.add_variable(format!("{kind}_over"), weight, 0.0, f64::INFINITY);
            let under = problem.add_variable(format!("{kind}_under"), weight, 0.0, f64::INFINITY);

            let mut terms: Vec<(usize, f64)> = classification
                .ingredients()
                .iter()
                .zip(&amount_vars)
                .map(|(ingredient, &var)| {
                    (var, ingredient.per_100g.get(kind) / REFERENCE_PORTION_GRAMS)
                })
                .collect();
            terms.push((over, -1.0));
            terms.push((under, 1.0));
            problem.add_constraint(format!("{kind}_target"), terms, LpComparison::Eq, goal);
        }

        problem
    }

    /// Solve the program for the recipe
    ///
    /// # Errors
    ///
    /// Returns [`SolverError`] when the backend cannot produce a solution
    pub fn optimize(
        &self,
        classification: &IngredientClassification,
        target: &MacroTargets,
        priority: MacroKind,
    ) -> Result<LayerResult, SolverError> {
        let problem = self.build_problem(classification, target, priority);
        let solution = self.solver.solve(&problem)?;

        // Solver noise can land marginally outside the bounds
        let amounts: Vec<f64> = problem
            .variables()
            .iter()
            .take(classification.len())
            .enumerate()
            .map(|(index, variable)| {
                solution
                    .value(index)
                    .clamp(variable.lower, variable.upper)
                    .max(MIN_INGREDIENT_GRAMS)
            })
            .collect();

        let achieved = classification.macros_for_amounts(&amounts);
        let accuracy = scoring::accuracy(&achieved, target);
        let preservation = scoring::structural_preservation(
            classification,
            &amounts,
            self.hierarchical.structural_penalty_weight,
            self.hierarchical.preservation_floor,
        );

        debug!(
            solver = self.solver.name(),
            objective = solution.objective,
            accuracy,
            preservation,
            "Solved LP optimization"
        );

        Ok(LayerResult {
            method: ScalingMethod::LpOptimization,
            amounts,
            achieved,
            accuracy,
            preservation,
            iterations: 1,
            notes: vec![format!("solved with {}", self.solver.name())],
        })
    }
}

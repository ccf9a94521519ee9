// ABOUTME: Meal scaling orchestrator running classification, strategy, and solver layers
// ABOUTME: Escalates between layers, keeps the most accurate result, and builds the audit trail
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Meal Scaling Engine
//!
//! `classify -> decide -> dispatch -> audit`. No recoverable condition is an
//! error: missing ingredients are skipped, degenerate recipes return a no-op
//! result and LP failures fall back to the hierarchical layer. Each problem is
//! recorded as a note in the [`AuditTrail`].
//!
//! When escalation is enabled and a layer misses its accuracy target, the next
//! more aggressive layer runs. The most accurate attempt wins; ties keep the
//! earlier, more preserving one.

use std::time::Instant;

use chrono::Utc;
use pierre_meal_core::constants::scaling::EPSILON;
use pierre_meal_core::errors::AppResult;
use pierre_meal_core::models::{DailyContext, MacroKind, MacroTargets, RecipeIngredient};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use super::classifier::{IngredientClassification, IngredientClassifier};
use super::global_scaling::GlobalScaler;
use super::hierarchical::HierarchicalAdjuster;
use super::ingredients::IngredientLookup;
use super::lp_optimization::LpOptimizer;
use super::lp_solver::{LpSolver, MicroLpSolver, SolverError};
use super::result::{
    scaled_ingredients, AttemptOutcome, AuditTrail, LayerResult, ScalingMethod, ScalingResult,
    SolverAttempt,
};
use super::strategy::{Approach, StrategyDecider, StrategyDecision};
use crate::config::scaling::MealScalingConfig;

/// One independent scaling job for [`MealScalingEngine::scale_batch`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalingRequest {
    /// Recipe to scale
    pub recipe: Vec<RecipeIngredient>,
    /// Desired macros for the meal
    pub target: MacroTargets,
    /// Where the meal sits in the day
    #[serde(default)]
    pub context: DailyContext,
}

/// Stateless scaling engine
///
/// Holds only configuration and the LP backend, so one engine can serve
/// concurrent callers.
#[derive(Debug, Clone)]
pub struct MealScalingEngine<S: LpSolver = MicroLpSolver> {
    config: MealScalingConfig<true>,
    solver: S,
}

impl MealScalingEngine<MicroLpSolver> {
    /// Engine with the given configuration and the default LP backend
    #[must_use]
    pub const fn new(config: MealScalingConfig<true>) -> Self {
        Self {
            config,
            solver: MicroLpSolver,
        }
    }

    /// Engine configured from defaults and `MEAL_SCALING_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns a configuration error when an override is malformed or invalid
    pub fn from_env() -> AppResult<Self> {
        Ok(Self::new(MealScalingConfig::load()?))
    }
}

impl Default for MealScalingEngine<MicroLpSolver> {
    fn default() -> Self {
        Self::new(MealScalingConfig::default())
    }
}

impl<S: LpSolver> MealScalingEngine<S> {
    /// Engine with a custom LP backend
    #[must_use]
    pub const fn with_solver(config: MealScalingConfig<true>, solver: S) -> Self {
        Self { config, solver }
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &MealScalingConfig<true> {
        &self.config
    }

    /// Scale a recipe toward a macro target
    pub fn scale<L>(
        &self,
        recipe: &[RecipeIngredient],
        ingredient_db: &L,
        target: &MacroTargets,
        context: &DailyContext,
    ) -> ScalingResult
    where
        L: IngredientLookup + ?Sized,
    {
        let started = Instant::now();
        let mut audit = AuditTrail::new(Uuid::new_v4(), Utc::now());

        let classification =
            IngredientClassifier::new(&self.config.classification).classify(recipe, ingredient_db);
        for dropped in classification.dropped_ingredients() {
            audit.note(format!(
                "ingredient {dropped} skipped: not found in nutrition database or invalid amount"
            ));
        }

        if classification.is_empty() || classification.metadata().total_calories <= EPSILON {
            warn!(
                run_id = %audit.run_id,
                ingredients = classification.len(),
                "Degenerate recipe, returning unchanged amounts"
            );
            audit.note(if classification.is_empty() {
                "degenerate recipe: no usable ingredients"
            } else {
                "degenerate recipe: zero base calories"
            });
            return Self::no_op_result(classification, target, audit, started);
        }

        let current = classification.metadata().total_macros;
        let decision = StrategyDecider::new(&self.config.strategy).decide(
            target,
            &current,
            &classification,
            context,
        );

        let best = self.run_layers(
            decision.approach,
            decision.priority_macro,
            &classification,
            target,
            &mut audit,
        );

        let Some(best) = best else {
            audit.note("no scaling layer produced a result");
            audit.strategy = Some(decision);
            return Self::no_op_result(classification, target, audit, started);
        };

        let result = ScalingResult {
            scaled_ingredients: scaled_ingredients(&classification, &best.amounts),
            achieved: best.achieved,
            target: *target,
            accuracy: best.accuracy,
            preservation: best.preservation,
            method: best.method,
            audit: Self::finish_audit(audit, classification, Some(decision), started),
        };

        info!(
            run_id = %result.audit.run_id,
            method = %result.method,
            accuracy = result.accuracy,
            preservation = result.preservation,
            attempts = result.audit.attempts.len(),
            duration_micros = result.audit.total_duration_micros,
            "Scaled recipe"
        );

        result
    }

    /// Scale independent requests in parallel
    pub fn scale_batch<L>(&self, requests: &[ScalingRequest], ingredient_db: &L) -> Vec<ScalingResult>
    where
        L: IngredientLookup + ?Sized,
    {
        requests
            .par_iter()
            .map(|request| {
                self.scale(
                    &request.recipe,
                    ingredient_db,
                    &request.target,
                    &request.context,
                )
            })
            .collect()
    }

    /// Run the selected layer and escalate while targets are missed
    fn run_layers(
        &self,
        first: Approach,
        priority: MacroKind,
        classification: &IngredientClassification,
        target: &MacroTargets,
        audit: &mut AuditTrail,
    ) -> Option<LayerResult> {
        let mut best: Option<(usize, LayerResult)> = None;
        let mut approach = first;

        loop {
            let attempt_start = Instant::now();
            let outcome = self.run_layer(approach, priority, classification, target);
            let duration_micros = elapsed_micros(attempt_start);

            let layer = match outcome {
                Ok(layer) => layer,
                Err(error) => {
                    warn!(
                        run_id = %audit.run_id,
                        approach = %approach,
                        error = %error,
                        "Scaling layer failed"
                    );
                    audit.attempts.push(SolverAttempt {
                        method: approach.into(),
                        accuracy: 0.0,
                        preservation: 0.0,
                        iterations: 0,
                        duration_micros,
                        outcome: AttemptOutcome::Failed,
                        detail: Some(error.to_string()),
                    });

                    let ran_hierarchical = audit
                        .attempts
                        .iter()
                        .any(|attempt| attempt.method == ScalingMethod::HierarchicalAdjustment);
                    if ran_hierarchical {
                        audit.note(format!(
                            "{approach} failed ({error}); keeping the best earlier attempt"
                        ));
                    } else {
                        audit.note(format!(
                            "{approach} failed ({error}); falling back to hierarchical adjustment"
                        ));
                        let fallback_start = Instant::now();
                        let fallback = HierarchicalAdjuster::new(&self.config.hierarchical)
                            .adjust(classification, target);
                        for note in &fallback.notes {
                            audit.note(format!("{}: {note}", fallback.method));
                        }
                        let attempt = Self::attempt_for(
                            &fallback,
                            elapsed_micros(fallback_start),
                            Some(format!("fallback after {approach} failure")),
                        );
                        Self::consider(&mut best, audit, attempt, fallback);
                    }
                    break;
                }
            };

            for note in &layer.notes {
                audit.note(format!("{}: {note}", layer.method));
            }
            let accuracy = layer.accuracy;
            let attempt = Self::attempt_for(&layer, duration_micros, None);
            Self::consider(&mut best, audit, attempt, layer);

            if accuracy + EPSILON >= self.accuracy_target(approach)
                || !self.config.engine.escalate_on_shortfall
            {
                break;
            }
            let Some(next) = approach.next() else {
                break;
            };
            audit.note(format!(
                "{approach} reached accuracy {accuracy:.3}, below target {:.2}; escalating to {next}",
                self.accuracy_target(approach)
            ));
            approach = next;
        }

        best.map(|(index, layer)| {
            if let Some(attempt) = audit.attempts.get_mut(index) {
                attempt.outcome = AttemptOutcome::Accepted;
            }
            layer
        })
    }

    fn run_layer(
        &self,
        approach: Approach,
        priority: MacroKind,
        classification: &IngredientClassification,
        target: &MacroTargets,
    ) -> Result<LayerResult, SolverError> {
        match approach {
            Approach::GlobalScaling => Ok(GlobalScaler::new(&self.config.global_scaling).scale(
                classification,
                target,
                priority,
            )),
            Approach::HierarchicalAdjustment => {
                Ok(HierarchicalAdjuster::new(&self.config.hierarchical)
                    .adjust(classification, target))
            }
            Approach::LpOptimization => {
                LpOptimizer::new(&self.config.lp, &self.config.hierarchical, &self.solver)
                    .optimize(classification, target, priority)
            }
        }
    }

    const fn accuracy_target(&self, approach: Approach) -> f64 {
        match approach {
            Approach::GlobalScaling => self.config.global_scaling.accuracy_target,
            Approach::HierarchicalAdjustment => self.config.hierarchical.accuracy_target,
            Approach::LpOptimization => self.config.lp.accuracy_target,
        }
    }

    fn attempt_for(layer: &LayerResult, duration_micros: u64, detail: Option<String>) -> SolverAttempt {
        SolverAttempt {
            method: layer.method,
            accuracy: layer.accuracy,
            preservation: layer.preservation,
            iterations: layer.iterations,
            duration_micros,
            outcome: AttemptOutcome::Superseded,
            detail,
        }
    }

    /// Record an attempt and keep it if it is strictly more accurate than the best so far
    fn consider(
        best: &mut Option<(usize, LayerResult)>,
        audit: &mut AuditTrail,
        attempt: SolverAttempt,
        layer: LayerResult,
    ) {
        audit.attempts.push(attempt);
        let index = audit.attempts.len() - 1;
        let improves = best
            .as_ref()
            .is_none_or(|(_, current)| layer.accuracy > current.accuracy + EPSILON);
        if improves {
            *best = Some((index, layer));
        }
    }

    fn no_op_result(
        classification: IngredientClassification,
        target: &MacroTargets,
        audit: AuditTrail,
        started: Instant,
    ) -> ScalingResult {
        let amounts = classification.original_amounts();
        let strategy = audit.strategy.clone();
        ScalingResult {
            scaled_ingredients: scaled_ingredients(&classification, &amounts),
            achieved: classification.metadata().total_macros,
            target: *target,
            accuracy: 0.0,
            preservation: 1.0,
            method: ScalingMethod::NoOp,
            audit: Self::finish_audit(audit, classification, strategy, started),
        }
    }

    fn finish_audit(
        mut audit: AuditTrail,
        classification: IngredientClassification,
        strategy: Option<StrategyDecision>,
        started: Instant,
    ) -> AuditTrail {
        audit.classification = Some(classification);
        audit.strategy = strategy;
        audit.total_duration_micros = elapsed_micros(started);
        audit
    }
}

fn elapsed_micros(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX)
}

/// Scale a recipe with the global configuration and the default LP backend
pub fn scale<L>(
    recipe: &[RecipeIngredient],
    ingredient_db: &L,
    target: &MacroTargets,
    context: &DailyContext,
) -> ScalingResult
where
    L: IngredientLookup + ?Sized,
{
    MealScalingEngine::new(MealScalingConfig::global().clone()).scale(
        recipe,
        ingredient_db,
        target,
        context,
    )
}

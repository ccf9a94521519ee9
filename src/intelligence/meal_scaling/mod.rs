// ABOUTME: Meal macro scaling engine: classification, strategy, and three solver layers
// ABOUTME: Rescales recipe ingredient amounts toward a macro target while preserving essence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Meal Scaling
//!
//! Given a recipe and a per-meal macro target, the engine computes new
//! ingredient amounts that approximate the target while keeping the recipe
//! recognizable.
//!
//! ## Pipeline
//!
//! 1. [`IngredientClassifier`] assigns every ingredient a [`Role`]
//! 2. [`StrategyDecider`] picks an [`Approach`], priority macro and preservation level
//! 3. One of three layers produces amounts:
//!    - [`GlobalScaler`]: one common factor, proportions untouched
//!    - [`HierarchicalAdjuster`]: flexible ingredients only, structural locked
//!    - [`LpOptimizer`]: bounded linear program over every ingredient
//! 4. [`MealScalingEngine`] escalates on shortfall and returns a [`ScalingResult`]
//!    with a full [`AuditTrail`]
//!
//! ## Example
//!
//! ```rust,no_run
//! use pierre_meal_scaler::intelligence::meal_scaling::{scale, InMemoryIngredientDb};
//! use pierre_meal_scaler::models::{DailyContext, MacroValues, RecipeIngredient};
//!
//! # fn main() -> pierre_meal_scaler::errors::AppResult<()> {
//! let db = InMemoryIngredientDb::from_json(r#"[
//!     {"id": "pollo", "name": "Pechuga de pollo", "category": "protein",
//!      "per_100g": {"calories": 165.0, "protein": 31.0, "carbs": 0.0, "fat": 3.6}}
//! ]"#)?;
//! let recipe = vec![RecipeIngredient::new("pollo", 100.0)];
//! let target = MacroValues::new(250.0, 45.0, 0.0, 5.0);
//!
//! let result = scale(&recipe, &db, &target, &DailyContext::default());
//! println!("{} -> accuracy {:.2}", result.method, result.accuracy);
//! # Ok(())
//! # }
//! ```

mod classifier;
mod global_scaling;
mod hierarchical;
mod ingredients;
mod lp_optimization;
mod lp_solver;
mod orchestrator;
mod result;
pub mod scoring;
mod strategy;

pub use classifier::{
    ClassificationMetadata, ClassifiedIngredient, IngredientClassification, IngredientClassifier,
    RecipeComplexity, Role,
};
pub use global_scaling::GlobalScaler;
pub use hierarchical::HierarchicalAdjuster;
pub use ingredients::{InMemoryIngredientDb, IngredientLookup};
pub use lp_optimization::LpOptimizer;
pub use lp_solver::{
    LpComparison, LpConstraint, LpProblem, LpSolution, LpSolver, LpVariable, MicroLpSolver,
    SolverError,
};
pub use orchestrator::{scale, MealScalingEngine, ScalingRequest};
pub use result::{
    scaled_ingredients, AttemptOutcome, AuditTrail, LayerResult, ScaledIngredient, ScalingMethod,
    ScalingResult, SolverAttempt,
};
pub use strategy::{Approach, StrategyDecider, StrategyDecision, StrategyMetadata};

// ABOUTME: Main library entry point for the Pierre meal scaling engine
// ABOUTME: Rescales recipe ingredient amounts toward per-meal macro targets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Meal Scaler
//!
//! A meal macro scaling engine: given a recipe and a target nutrient profile
//! (calories, protein, carbohydrates, fat) it computes new per-ingredient
//! amounts that approximate the target while preserving the recipe's essence.
//!
//! ## Architecture
//!
//! - **Models** (`pierre-meal-core`): macro values, ingredients, recipe lines, daily context
//! - **Config**: every threshold, with environment overrides and validation
//! - **Intelligence**: classifier, strategy decider, three solver layers, orchestrator
//! - **Logging**: `tracing-subscriber` setup for embedding applications
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use pierre_meal_scaler::intelligence::meal_scaling::{InMemoryIngredientDb, MealScalingEngine};
//! use pierre_meal_scaler::models::{DailyContext, MacroValues, RecipeIngredient};
//!
//! fn main() -> pierre_meal_scaler::errors::AppResult<()> {
//!     let engine = MealScalingEngine::from_env()?;
//!     let json = std::env::var("PIERRE_INGREDIENTS_JSON").unwrap_or_else(|_| "[]".to_owned());
//!     let db = InMemoryIngredientDb::from_json(&json)?;
//!
//!     let recipe = vec![
//!         RecipeIngredient::new("pollo", 100.0),
//!         RecipeIngredient::new("arroz", 60.0),
//!         RecipeIngredient::new("aceite", 5.0),
//!     ];
//!     let target = MacroValues::new(550.0, 45.0, 60.0, 12.0);
//!
//!     let result = engine.scale(&recipe, &db, &target, &DailyContext::for_meal(2, 3));
//!     println!("{} accuracy={:.2}", result.method, result.accuracy);
//!     Ok(())
//! }
//! ```

/// Unified error handling (`AppError`, `ErrorCode`, `AppResult`)
pub use pierre_meal_core::errors;

/// Energy conversion factors and scaling limits
pub use pierre_meal_core::constants;

/// Nutrition data models
pub use pierre_meal_core::models;

/// Engine configuration with environment overrides
pub mod config;

/// Meal scaling pipeline
pub mod intelligence;

/// Structured logging setup
pub mod logging;

// ABOUTME: Core types and constants for the Pierre meal scaling engine
// ABOUTME: Foundation crate with error handling, nutrition models, and scaling constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Meal Core
//!
//! Foundation crate providing the shared vocabulary of the meal scaling engine.
//! It changes infrequently so the engine crate keeps incremental compilation
//! benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Energy conversion factors and scaling limits
//! - **models**: Macro values, ingredients, recipe lines, and daily context

/// Unified error handling system with standard error codes
pub mod errors;

/// Nutrition and scaling constants organized by domain
pub mod constants;

/// Core nutrition data models (`MacroValues`, `Ingredient`, `RecipeIngredient`, ...)
pub mod models;

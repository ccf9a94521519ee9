// ABOUTME: Core data models for the Pierre meal scaling engine
// ABOUTME: Re-exports nutrition values, ingredient references, and daily context types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! Plain data shared by every stage of the engine. All models are serializable
//! so results and audit trails can be handed to any presentation layer.

// Domain modules
mod context;
mod nutrition;

// Nutrition domain
pub use nutrition::{
    Ingredient, IngredientCategory, MacroGaps, MacroKind, MacroTargets, MacroValues,
    RecipeIngredient,
};

// Daily planning domain
pub use context::{DailyContext, FlexibilityLevel};
